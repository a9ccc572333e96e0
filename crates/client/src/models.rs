//! Records as the REST API and the change feed deliver them.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use solesync_core::appointment::AppointmentStatus;
use solesync_core::tracking::Milestones;
use solesync_core::types::Timestamp;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Customer {
    pub cust_id: String,
    pub cust_name: String,
    #[serde(default)]
    pub cust_bdate: Option<NaiveDate>,
    #[serde(default)]
    pub cust_address: Option<String>,
    #[serde(default)]
    pub cust_contact: Option<String>,
    #[serde(default)]
    pub cust_email: Option<String>,
    #[serde(default)]
    pub total_services: i32,
    #[serde(default)]
    pub total_expenditure: f64,
    pub credibility: i32,
}

/// Body of `POST /customers`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewCustomer {
    pub cust_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cust_bdate: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cust_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cust_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cust_email: Option<String>,
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginSession {
    pub token: String,
    pub user_id: String,
    pub cust_name: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Appointment {
    pub appointment_id: String,
    pub cust_id: String,
    pub branch_id: String,
    pub date_for_inquiry: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub status: String,
}

impl Appointment {
    pub fn status(&self) -> Option<AppointmentStatus> {
        AppointmentStatus::parse(&self.status)
    }
}

/// Body of `POST /appointments`.
#[derive(Debug, Clone, Serialize)]
pub struct NewAppointment {
    pub cust_id: String,
    pub branch_id: String,
    pub date_for_inquiry: NaiveDate,
    #[serde(with = "hh_mm")]
    pub time_start: NaiveTime,
    #[serde(with = "hh_mm")]
    pub time_end: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CanceledSlotCheck {
    pub blocked: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Branch {
    pub branch_id: String,
    pub branch_name: String,
    #[serde(default)]
    pub branch_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Service {
    pub service_id: String,
    pub service_name: String,
    #[serde(default)]
    pub service_base_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub line_item_id: String,
    pub transaction_id: String,
    pub cust_id: String,
    #[serde(default)]
    pub branch_id: Option<String>,
    pub shoes: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub current_status: String,
    #[serde(default)]
    pub current_location: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_rush: bool,
    pub latest_update: Timestamp,
}

/// Milestone timestamps of one line item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Dates {
    pub line_item_id: String,
    pub cust_id: String,
    #[serde(default)]
    pub acknowledged_at: Option<Timestamp>,
    #[serde(default)]
    pub to_hub_at: Option<Timestamp>,
    #[serde(default)]
    pub in_process_at: Option<Timestamp>,
    #[serde(default)]
    pub returning_at: Option<Timestamp>,
    #[serde(default)]
    pub ready_at: Option<Timestamp>,
    /// Ordinal of the furthest stage reached, as computed by the server.
    #[serde(default)]
    pub current_status: Option<usize>,
}

impl Dates {
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

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: Timestamp,
    #[serde(default)]
    pub branch_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Promo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    pub date: Timestamp,
    #[serde(default)]
    pub branch_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Unavailability {
    pub unavailability_id: String,
    pub branch_id: String,
    pub date_unavailable: NaiveDate,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub time_start: Option<NaiveTime>,
    #[serde(default)]
    pub time_end: Option<NaiveTime>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Anything that can be marked read by id.
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Announcement {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Promo {
    fn id(&self) -> &str {
        &self.id
    }
}

/// `HH:MM` on the wire.
mod hh_mm {
    use chrono::NaiveTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format("%H:%M"))
    }
}
