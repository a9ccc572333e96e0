//! Branch model.

use serde::Serialize;
use solesync_core::types::Timestamp;
use sqlx::FromRow;

/// Branch type served to the mobile app.
pub const BRANCH_TYPE_B: &str = "B";

/// A row from the `branches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Branch {
    pub branch_id: String,
    pub branch_name: String,
    pub branch_type: String,
    pub location: Option<String>,
    pub created_at: Timestamp,
}
