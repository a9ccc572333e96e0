//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use solesync_core::error::CoreError;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated customer extracted from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthCustomer {
    pub cust_id: String,
    pub cust_name: String,
}

impl AuthCustomer {
    /// Reject access to another customer's records.
    pub fn ensure_owner(&self, cust_id: &str) -> Result<(), AppError> {
        if self.cust_id != cust_id {
            return Err(AppError::Core(CoreError::Forbidden(
                "Forbidden: Access denied".into(),
            )));
        }
        Ok(())
    }
}

impl FromRequestParts<AppState> for AuthCustomer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthCustomer {
            cust_id: claims.cust_id,
            cust_name: claims.cust_name,
        })
    }
}
