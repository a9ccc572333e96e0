//! Appointment status and booking eligibility rules.
//!
//! The REST layer runs these checks immediately before inserting a new
//! appointment. They are count/existence checks without isolation, so two
//! concurrent submissions can both pass.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Customers at or below this credibility score cannot book.
pub const MIN_CREDIBILITY: i32 = 75;

/// Credibility assigned to newly registered customers.
pub const DEFAULT_CREDIBILITY: i32 = 100;

/// Maximum number of non-canceled appointments per branch/date/start time.
pub const MAX_BOOKINGS_PER_SLOT: i64 = 3;

/// Length of a booking slot when the client does not send an end time.
pub const SLOT_LENGTH_MINS: i64 = 30;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Canceled,
}

impl AppointmentStatus {
    /// Canonical string stored in the `appointments.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Canceled => "Canceled",
        }
    }

    /// Case-insensitive parse. Accepts the `Cancelled` spelling as well.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "canceled" | "cancelled" => Some(Self::Canceled),
            _ => None,
        }
    }

    /// Canceled appointments leave the active set; everything else is in it.
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Canceled)
    }

    /// Whether an appointment with this status, dated `date`, blocks a new
    /// booking for the same customer.
    ///
    /// Pending blocks regardless of date; Approved only from `today` on.
    pub fn blocks_new_booking(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Self::Pending => true,
            Self::Approved => is_upcoming(date, today),
            Self::Canceled => false,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            CoreError::Validation(format!(
                "Unknown appointment status '{s}'. Expected Pending, Approved or Canceled"
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Reject customers whose credibility is at or below [`MIN_CREDIBILITY`].
pub fn check_credibility(score: i32) -> Result<(), CoreError> {
    if score <= MIN_CREDIBILITY {
        return Err(CoreError::Forbidden(format!(
            "Credibility score {score} is too low to book an appointment"
        )));
    }
    Ok(())
}

/// Reject a booking when one of the customer's `existing` appointments
/// (status, date) still blocks a new one. A Pending appointment is reported
/// before an Approved one.
pub fn check_existing_bookings<I>(existing: I, today: NaiveDate) -> Result<(), CoreError>
where
    I: IntoIterator<Item = (AppointmentStatus, NaiveDate)>,
{
    let blocking: Vec<AppointmentStatus> = existing
        .into_iter()
        .filter(|(status, date)| status.blocks_new_booking(*date, today))
        .map(|(status, _)| status)
        .collect();

    if blocking.contains(&AppointmentStatus::Pending) {
        return Err(CoreError::Validation(
            "Customer already has a pending appointment".into(),
        ));
    }
    if blocking.contains(&AppointmentStatus::Approved) {
        return Err(CoreError::Validation(
            "Customer already has an approved appointment today or in the future".into(),
        ));
    }
    Ok(())
}

/// Reject a booking when the slot already holds [`MAX_BOOKINGS_PER_SLOT`]
/// non-canceled appointments.
pub fn check_slot_capacity(booked: i64) -> Result<(), CoreError> {
    if booked >= MAX_BOOKINGS_PER_SLOT {
        return Err(CoreError::Validation(
            "This time slot is fully booked. Please choose a different time".into(),
        ));
    }
    Ok(())
}

/// Parse an `HH:mm` (or `HH:mm:ss`) time of day.
pub fn parse_time(value: &str) -> Result<NaiveTime, CoreError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| CoreError::Validation(format!("Invalid time '{value}', expected HH:mm")))
}

/// Parse a `YYYY-MM-DD` date. A full RFC 3339 timestamp is accepted and
/// truncated to its date part.
pub fn parse_date(value: &str) -> Result<NaiveDate, CoreError> {
    let trimmed = value.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| CoreError::Validation(format!("Invalid date '{value}', expected YYYY-MM-DD")))
}

/// End of a slot that starts at `start` when no explicit end is given.
pub fn default_slot_end(start: NaiveTime) -> NaiveTime {
    start
        .overflowing_add_signed(Duration::minutes(SLOT_LENGTH_MINS))
        .0
}

/// A time window must end strictly after it starts.
pub fn validate_time_window(start: NaiveTime, end: NaiveTime) -> Result<(), CoreError> {
    if end <= start {
        return Err(CoreError::Validation(
            "time_end must be later than time_start".into(),
        ));
    }
    Ok(())
}

/// Whether an appointment dated `date` is today or later.
pub fn is_upcoming(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today
}
