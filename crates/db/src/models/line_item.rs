//! Line item model.

use chrono::NaiveDate;
use serde::Serialize;
use solesync_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `line_items` table: one pair of shoes in a transaction.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LineItem {
    pub line_item_id: String,
    pub transaction_id: String,
    pub cust_id: String,
    pub branch_id: Option<String>,
    pub shoes: String,
    /// Assigned service ids.
    pub services: Vec<String>,
    /// Before/after image URLs.
    pub images: Vec<String>,
    pub current_status: String,
    pub current_location: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub is_rush: bool,
    pub latest_update: Timestamp,
}
