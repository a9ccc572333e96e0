//! Branch unavailability model.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use solesync_core::unavailability::{blocks_slot, UnavailabilityKind};
use sqlx::FromRow;

/// A row from the `unavailability` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Unavailability {
    pub unavailability_id: String,
    pub branch_id: String,
    pub date_unavailable: NaiveDate,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub time_start: Option<NaiveTime>,
    pub time_end: Option<NaiveTime>,
    pub note: Option<String>,
}

impl Unavailability {
    /// Whether this window overlaps the slot `[start, end)`.
    pub fn blocks(&self, start: NaiveTime, end: NaiveTime) -> bool {
        blocks_slot(
            UnavailabilityKind::parse(&self.kind),
            self.time_start,
            self.time_end,
            start,
            end,
        )
    }
}
