//! Merge change events into client-side state.
//!
//! Each store consumes [`ChangeEvent`]s from the realtime socket and
//! reports what the caller should do next (re-render, refetch, nothing).

use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;
use solesync_core::appointment::{parse_date, parse_time, AppointmentStatus};
use solesync_core::realtime::{ChangeEvent, OperationType};
use solesync_core::tracking::{current_stage, timeline, Milestones, TimelineEntry, TrackingStage};

use crate::models::{Appointment, Dates, LineItem};

// ---------------------------------------------------------------------------
// Appointment
// ---------------------------------------------------------------------------

/// The customer's active appointment as shown on the booking screen.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentAppointment {
    pub appointment_id: String,
    pub branch_id: String,
    pub date: NaiveDate,
    pub time_start: NaiveTime,
    pub status: AppointmentStatus,
}

/// What applying a change did to an [`AppointmentTracker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentChange {
    /// Same signature as the last processed event.
    Duplicate,
    /// Not about this customer's appointment, or not enough data.
    Ignored,
    /// A delete; the caller should refetch the upcoming appointment.
    RefreshNeeded,
    /// The appointment was canceled; show the empty state.
    Cleared,
    Updated,
}

/// Tracks one customer's upcoming appointment from fetches and change events.
#[derive(Debug, Default)]
pub struct AppointmentTracker {
    user_id: Option<String>,
    current: Option<CurrentAppointment>,
    last_signature: Option<String>,
}

impl AppointmentTracker {
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    pub fn current(&self) -> Option<&CurrentAppointment> {
        self.current.as_ref()
    }

    /// Replace state with a fetch result. `None` and Canceled both mean
    /// there is nothing to show.
    pub fn set_fetched(&mut self, appointment: Option<&Appointment>) {
        self.current = appointment.and_then(|appt| {
            let status = appt.status().unwrap_or(AppointmentStatus::Pending);
            status.is_active().then(|| CurrentAppointment {
                appointment_id: appt.appointment_id.clone(),
                branch_id: appt.branch_id.clone(),
                date: appt.date_for_inquiry,
                time_start: appt.time_start,
                status,
            })
        });
    }

    pub fn apply(&mut self, change: &ChangeEvent) -> AppointmentChange {
        let signature = change.signature();
        if self.last_signature.as_deref() == Some(signature.as_str()) {
            return AppointmentChange::Duplicate;
        }
        self.last_signature = Some(signature);

        if change.operation_type == OperationType::Delete {
            return AppointmentChange::RefreshNeeded;
        }

        let Some(doc) = change.full_document.as_ref() else {
            return AppointmentChange::Ignored;
        };

        if let (Some(user), Some(owner)) = (self.user_id.as_deref(), str_field(doc, "cust_id")) {
            if owner != user {
                return AppointmentChange::Ignored;
            }
        }

        let doc_id = str_field(doc, "appointment_id");
        if let (Some(current), Some(id)) = (self.current.as_ref(), doc_id) {
            if current.appointment_id != id {
                return AppointmentChange::Ignored;
            }
        }

        let status = str_field(doc, "status").and_then(AppointmentStatus::parse);
        if status == Some(AppointmentStatus::Canceled) {
            self.current = None;
            return AppointmentChange::Cleared;
        }

        let date = str_field(doc, "date_for_inquiry").and_then(|raw| parse_date(raw).ok());
        let time = str_field(doc, "time_start").and_then(|raw| parse_time(raw).ok());
        let (Some(date), Some(time_start)) = (date, time) else {
            return AppointmentChange::Ignored;
        };

        let previous = self.current.take();
        let appointment_id = doc_id
            .map(str::to_owned)
            .or_else(|| previous.as_ref().map(|p| p.appointment_id.clone()))
            .unwrap_or_else(|| change.document_key.id.clone());
        let branch_id = str_field(doc, "branch_id")
            .map(str::to_owned)
            .or_else(|| previous.as_ref().map(|p| p.branch_id.clone()))
            .unwrap_or_default();
        let status = status
            .or_else(|| previous.as_ref().map(|p| p.status))
            .unwrap_or(AppointmentStatus::Pending);

        self.current = Some(CurrentAppointment {
            appointment_id,
            branch_id,
            date,
            time_start,
            status,
        });
        AppointmentChange::Updated
    }
}

fn str_field<'a>(doc: &'a Value, name: &str) -> Option<&'a str> {
    doc.get(name).and_then(Value::as_str)
}

// ---------------------------------------------------------------------------
// Line items
// ---------------------------------------------------------------------------

/// A customer's line items, newest update first.
#[derive(Debug, Default)]
pub struct LineItemList {
    cust_id: Option<String>,
    items: Vec<LineItem>,
}

impl LineItemList {
    pub fn new(cust_id: Option<String>) -> Self {
        Self {
            cust_id,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, line_item_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.line_item_id == line_item_id)
    }

    pub fn replace_all(&mut self, items: Vec<LineItem>) {
        self.items = items;
    }

    /// Apply a `lineItemUpdated` change. Returns `true` if the list changed.
    pub fn apply(&mut self, change: &ChangeEvent) -> bool {
        let key = change.document_key.id.as_str();
        match change.operation_type {
            OperationType::Delete => {
                let before = self.items.len();
                self.items.retain(|item| item.line_item_id != key);
                before != self.items.len()
            }
            OperationType::Insert | OperationType::Replace => match change.full_document.as_ref() {
                Some(doc) => self.upsert(doc),
                None => false,
            },
            OperationType::Update => match change.full_document.as_ref() {
                Some(doc) => self.upsert(doc),
                None => self.merge_delta(key, change),
            },
        }
    }

    fn upsert(&mut self, doc: &Value) -> bool {
        let item: LineItem = match serde_json::from_value(doc.clone()) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring undecodable line item document");
                return false;
            }
        };
        if self.cust_id.as_deref().is_some_and(|cust| cust != item.cust_id) {
            return false;
        }
        match self
            .items
            .iter()
            .position(|existing| existing.line_item_id == item.line_item_id)
        {
            Some(index) => self.items[index] = item,
            None => self.items.insert(0, item),
        }
        true
    }

    /// Patch an existing item with `updatedFields` / `removedFields` when
    /// the change carries no full document.
    fn merge_delta(&mut self, key: &str, change: &ChangeEvent) -> bool {
        let Some(delta) = change.update_description.as_ref() else {
            return false;
        };
        let Some(index) = self.items.iter().position(|item| item.line_item_id == key) else {
            return false;
        };
        let Ok(Value::Object(mut fields)) = serde_json::to_value(&self.items[index]) else {
            return false;
        };
        for (name, value) in &delta.updated_fields {
            fields.insert(name.clone(), value.clone());
        }
        for name in &delta.removed_fields {
            fields.insert(name.clone(), Value::Null);
        }
        match serde_json::from_value(Value::Object(fields)) {
            Ok(item) => {
                self.items[index] = item;
                true
            }
            Err(e) => {
                tracing::warn!(line_item_id = key, error = %e, "Could not merge line item update");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

const MILESTONE_FIELDS: [&str; 5] = [
    "acknowledged_at",
    "to_hub_at",
    "in_process_at",
    "returning_at",
    "ready_at",
];

/// Milestones of the line item currently on screen.
#[derive(Debug)]
pub struct DatesView {
    line_item_id: String,
    milestones: Milestones,
}

impl DatesView {
    pub fn new(line_item_id: impl Into<String>) -> Self {
        Self {
            line_item_id: line_item_id.into(),
            milestones: [None; 5],
        }
    }

    pub fn from_dates(dates: &Dates) -> Self {
        Self {
            line_item_id: dates.line_item_id.clone(),
            milestones: dates.milestones(),
        }
    }

    pub fn line_item_id(&self) -> &str {
        &self.line_item_id
    }

    pub fn milestones(&self) -> &Milestones {
        &self.milestones
    }

    pub fn current_stage(&self) -> Option<TrackingStage> {
        current_stage(&self.milestones)
    }

    pub fn timeline(&self) -> Vec<TimelineEntry> {
        timeline(&self.milestones)
    }

    /// Apply a `datesUpdated` change. Changes for other line items are
    /// ignored. Returns `true` if the milestones changed.
    pub fn apply(&mut self, change: &ChangeEvent) -> bool {
        if change.document_key.id != self.line_item_id {
            return false;
        }
        let before = self.milestones;
        match change.operation_type {
            OperationType::Delete => self.milestones = [None; 5],
            _ => {
                for (slot, field) in self.milestones.iter_mut().zip(MILESTONE_FIELDS) {
                    if let Some(value) = change.field(field) {
                        *slot = serde_json::from_value(value.clone()).unwrap_or(None);
                    } else if change
                        .update_description
                        .as_ref()
                        .is_some_and(|delta| delta.removed_fields.iter().any(|f| f == field))
                    {
                        *slot = None;
                    }
                }
            }
        }
        before != self.milestones
    }
}
