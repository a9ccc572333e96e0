//! Per-line-item milestone timestamps.

use serde::Serialize;
use solesync_core::tracking::Milestones;
use solesync_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `dates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DatesRecord {
    pub line_item_id: String,
    pub cust_id: String,
    pub acknowledged_at: Option<Timestamp>,
    pub to_hub_at: Option<Timestamp>,
    pub in_process_at: Option<Timestamp>,
    pub returning_at: Option<Timestamp>,
    pub ready_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

impl DatesRecord {
    /// Milestones in [`TrackingStage`](solesync_core::tracking::TrackingStage) order.
    pub fn milestones(&self) -> Milestones {
        [
            self.acknowledged_at,
            self.to_hub_at,
            self.in_process_at,
            self.returning_at,
            self.ready_at,
        ]
    }
}
