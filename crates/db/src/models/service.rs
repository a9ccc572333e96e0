//! Service catalog model.

use serde::Serialize;
use solesync_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `services` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Service {
    pub service_id: String,
    pub service_name: String,
    pub service_base_price: f64,
    /// Typical turnaround in days.
    pub service_duration: Option<i32>,
    pub created_at: Timestamp,
}
