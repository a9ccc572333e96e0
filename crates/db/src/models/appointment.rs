//! Appointment model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use solesync_core::appointment::AppointmentStatus;
use solesync_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `appointments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Appointment {
    pub appointment_id: String,
    pub cust_id: String,
    pub branch_id: String,
    pub date_for_inquiry: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Appointment {
    /// Parsed status. The column has a CHECK constraint, so this only
    /// fails on rows written outside the migrations' rules.
    pub fn status(&self) -> Option<AppointmentStatus> {
        AppointmentStatus::parse(&self.status)
    }
}

/// DTO for inserting an appointment. The id is generated on insert.
#[derive(Debug, Clone)]
pub struct CreateAppointment {
    pub cust_id: String,
    pub branch_id: String,
    pub date_for_inquiry: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub status: AppointmentStatus,
}
