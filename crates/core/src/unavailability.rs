//! Branch unavailability windows.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Whether a branch is closed for the whole day or part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnavailabilityKind {
    #[serde(rename = "Full Day")]
    FullDay,
    #[serde(rename = "Partial Day")]
    PartialDay,
}

impl UnavailabilityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullDay => "Full Day",
            Self::PartialDay => "Partial Day",
        }
    }

    /// Parse the stored label. Anything that is not a full day is partial.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("full day") {
            Self::FullDay
        } else {
            Self::PartialDay
        }
    }
}

/// Does an unavailability window overlap the slot `[slot_start, slot_end)`?
///
/// A partial window with no start runs from midnight; with no end it runs to
/// the end of the day.
pub fn blocks_slot(
    kind: UnavailabilityKind,
    window_start: Option<NaiveTime>,
    window_end: Option<NaiveTime>,
    slot_start: NaiveTime,
    slot_end: NaiveTime,
) -> bool {
    match kind {
        UnavailabilityKind::FullDay => true,
        UnavailabilityKind::PartialDay => {
            let start = window_start.unwrap_or(NaiveTime::MIN);
            let blocked_before_end = window_end.map_or(true, |end| slot_start < end);
            blocked_before_end && slot_end > start
        }
    }
}
