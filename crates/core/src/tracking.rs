//! Line-item processing stages.
//!
//! Each line item moves through a fixed, ordered set of stages. The `dates`
//! record stores one optional timestamp per stage; the current stage is the
//! furthest one that has a timestamp, regardless of gaps before it.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Ordered processing stages of a serviced pair of shoes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStage {
    Acknowledged,
    InTransportToHub,
    InProcess,
    ReturningToBranch,
    ReadyForPickup,
}

impl TrackingStage {
    /// All stages in processing order.
    pub const ALL: [TrackingStage; 5] = [
        TrackingStage::Acknowledged,
        TrackingStage::InTransportToHub,
        TrackingStage::InProcess,
        TrackingStage::ReturningToBranch,
        TrackingStage::ReadyForPickup,
    ];

    /// Customer-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Acknowledged => "Shoes acknowledged in shop",
            Self::InTransportToHub => "In transport to Hub for service",
            Self::InProcess => "Arrived in Hub - In process",
            Self::ReturningToBranch => "Returning to assigned service branch",
            Self::ReadyForPickup => "Ready for Pickup",
        }
    }

    /// Zero-based position in [`TrackingStage::ALL`].
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Look a stage up by its label (case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|stage| stage.label().eq_ignore_ascii_case(wanted))
    }
}

/// One row of a rendered status timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub stage: TrackingStage,
    pub label: &'static str,
    pub reached_at: Option<Timestamp>,
}

/// Milestone timestamps indexed by [`TrackingStage::ordinal`].
pub type Milestones = [Option<Timestamp>; 5];

/// Furthest stage that has been reached, if any.
pub fn current_stage(milestones: &Milestones) -> Option<TrackingStage> {
    TrackingStage::ALL
        .into_iter()
        .rev()
        .find(|stage| milestones[stage.ordinal()].is_some())
}

/// Pair every stage label with its milestone timestamp.
pub fn timeline(milestones: &Milestones) -> Vec<TimelineEntry> {
    TrackingStage::ALL
        .into_iter()
        .map(|stage| TimelineEntry {
            stage,
            label: stage.label(),
            reached_at: milestones[stage.ordinal()],
        })
        .collect()
}
