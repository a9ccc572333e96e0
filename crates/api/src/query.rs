//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?branch_id=&date=` as sent by the booking screen.
#[derive(Debug, Deserialize)]
pub struct BranchDateParams {
    pub branch_id: Option<String>,
    pub date: Option<String>,
}

/// `?cust_id=&branch_id=&date_for_inquiry=&time_start=` for slot checks.
#[derive(Debug, Deserialize)]
pub struct SlotParams {
    pub cust_id: Option<String>,
    pub branch_id: Option<String>,
    pub date_for_inquiry: Option<String>,
    pub time_start: Option<String>,
}
