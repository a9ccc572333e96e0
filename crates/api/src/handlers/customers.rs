//! Handlers for the `/customers` resource (register, login, lookup).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use solesync_core::appointment::parse_date;
use solesync_core::error::CoreError;
use solesync_db::models::customer::{CreateCustomer, Customer};
use solesync_db::repositories::CustomerRepo;
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::handlers::non_blank;
use crate::middleware::auth::AuthCustomer;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /customers/login`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(rename = "cust_bdate")]
    pub cust_bdate: Option<String>,
}

/// Successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub cust_name: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/customers
///
/// Register a customer. Duplicate emails are rejected with 409.
pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateCustomer>,
) -> AppResult<(StatusCode, Json<DataResponse<Customer>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    if let Some(email) = input.cust_email.as_deref() {
        if CustomerRepo::find_by_email(&state.pool, email).await?.is_some() {
            return Err(AppError::Core(CoreError::Conflict(
                "The email provided is already used by another customer.".into(),
            )));
        }
    }

    let customer = CustomerRepo::create(&state.pool, &input).await?;
    tracing::info!(cust_id = %customer.cust_id, "Customer registered");

    Ok((StatusCode::CREATED, Json(DataResponse { data: customer })))
}

/// POST /api/customers/login
///
/// Authenticate with first name, last name and birth date. Returns a bearer
/// token and the customer id.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<LoginRequest>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    let (Some(first), Some(last), Some(bdate)) = (
        non_blank(input.first_name),
        non_blank(input.last_name),
        non_blank(input.cust_bdate),
    ) else {
        return Err(AppError::BadRequest(
            "Missing first name, last name, or birthdate".into(),
        ));
    };

    let birthdate = parse_date(&bdate)?;
    let full_name = format!("{} {}", first.trim(), last.trim());

    let customer = CustomerRepo::find_by_name_and_birthdate(&state.pool, &full_name, birthdate)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid credentials".into())))?;

    let token = generate_access_token(&customer.cust_id, &customer.cust_name, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(cust_id = %customer.cust_id, "Customer logged in");

    Ok(Json(DataResponse {
        data: LoginResponse {
            token,
            user_id: customer.cust_id,
            cust_name: customer.cust_name,
            expires_in: state.config.jwt.expires_in_secs(),
        },
    }))
}

/// GET /api/customers
pub async fn list(
    _auth: AuthCustomer,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Customer>>>> {
    let customers = CustomerRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: customers }))
}

/// GET /api/customers/{id}
///
/// Customers may only read their own record.
pub async fn get_by_id(
    auth: AuthCustomer,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Customer>>> {
    let customer = CustomerRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Customer",
                id: id.clone(),
            })
        })?;

    auth.ensure_owner(&customer.cust_id)?;

    Ok(Json(DataResponse { data: customer }))
}
