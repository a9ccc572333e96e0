//! Decoding of trigger notifications into change events.
//!
//! The `notify_change()` trigger sends `{"op", "key", "changed"}` only. The
//! full row is looked up separately, so an event reflects the row as of the
//! lookup, not as of the write.

use serde::Deserialize;
use serde_json::{Map, Value};
use solesync_core::realtime::{ChangeEvent, DocumentKey, OperationType, UpdateDescription};

use crate::error::ChangeFeedError;

/// A notification as received from the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNotification {
    pub channel: String,
    pub payload: String,
}

impl RawNotification {
    pub fn new(channel: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            payload: payload.into(),
        }
    }
}

/// Payload published by the trigger.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotifyPayload {
    pub op: OperationType,
    pub key: String,
    #[serde(default)]
    pub changed: Vec<String>,
}

impl NotifyPayload {
    /// Whether building the event needs the current row.
    pub fn needs_lookup(&self) -> bool {
        self.op != OperationType::Delete
    }
}

pub fn decode_payload(raw: &RawNotification) -> Result<NotifyPayload, ChangeFeedError> {
    serde_json::from_str(&raw.payload).map_err(|e| ChangeFeedError::Decode {
        channel: raw.channel.clone(),
        reason: e.to_string(),
    })
}

/// Build the change event for a decoded notification and the looked-up row.
///
/// For updates, each changed column is copied from the row into
/// `updatedFields`; columns that are now null go to `removedFields`.
/// `document` is `None` for deletes and for rows deleted before the lookup.
pub fn build_change(payload: NotifyPayload, document: Option<Value>) -> ChangeEvent {
    let update_description = match payload.op {
        OperationType::Update | OperationType::Replace => {
            let mut delta = UpdateDescription::default();
            if let Some(row) = document.as_ref().and_then(Value::as_object) {
                delta = describe_update(row, &payload.changed);
            }
            Some(delta)
        }
        OperationType::Insert | OperationType::Delete => None,
    };

    ChangeEvent {
        operation_type: payload.op,
        document_key: DocumentKey { id: payload.key },
        full_document: match payload.op {
            OperationType::Delete => None,
            _ => document,
        },
        update_description,
    }
}

fn describe_update(row: &Map<String, Value>, changed: &[String]) -> UpdateDescription {
    let mut delta = UpdateDescription::default();
    for column in changed {
        match row.get(column) {
            Some(Value::Null) | None => delta.removed_fields.push(column.clone()),
            Some(value) => {
                delta.updated_fields.insert(column.clone(), value.clone());
            }
        }
    }
    delta
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn raw(payload: &str) -> RawNotification {
        RawNotification::new("appointments_changes", payload)
    }

    #[test]
    fn decodes_trigger_payload() {
        let payload =
            decode_payload(&raw(r#"{"op":"update","key":"APPT-1","changed":["status"]}"#)).unwrap();
        assert_eq!(payload.op, OperationType::Update);
        assert_eq!(payload.key, "APPT-1");
        assert_eq!(payload.changed, vec!["status".to_string()]);
        assert!(payload.needs_lookup());
    }

    #[test]
    fn rejects_garbage() {
        assert_matches!(
            decode_payload(&raw("not json")),
            Err(ChangeFeedError::Decode { channel, .. }) if channel == "appointments_changes"
        );
    }

    #[test]
    fn update_splits_changed_columns() {
        let payload = NotifyPayload {
            op: OperationType::Update,
            key: "LI-1".into(),
            changed: vec!["current_status".into(), "current_location".into()],
        };
        let row = json!({
            "line_item_id": "LI-1",
            "current_status": "Ready for Pickup",
            "current_location": null,
        });

        let change = build_change(payload, Some(row.clone()));
        let delta = change.update_description.expect("update has a delta");
        assert_eq!(delta.updated_fields.get("current_status"), Some(&json!("Ready for Pickup")));
        assert_eq!(delta.removed_fields, vec!["current_location".to_string()]);
        assert_eq!(change.full_document, Some(row));
    }

    #[test]
    fn delete_carries_only_key() {
        let payload = NotifyPayload {
            op: OperationType::Delete,
            key: "PROMO-2".into(),
            changed: vec![],
        };
        assert!(!payload.needs_lookup());
        assert_eq!(build_change(payload, None), ChangeEvent::delete("PROMO-2"));
    }

    #[test]
    fn insert_has_full_document_and_no_delta() {
        let payload = NotifyPayload {
            op: OperationType::Insert,
            key: "ANN-1".into(),
            changed: vec![],
        };
        let change = build_change(payload, Some(json!({"title": "Hello"})));
        assert_eq!(change, ChangeEvent::insert("ANN-1", json!({"title": "Hello"})));
    }

    #[test]
    fn update_of_vanished_row_has_empty_delta() {
        let payload = NotifyPayload {
            op: OperationType::Update,
            key: "APPT-9".into(),
            changed: vec!["status".into()],
        };
        let change = build_change(payload, None);
        assert!(change.full_document.is_none());
        assert_eq!(change.update_description, Some(UpdateDescription::default()));
    }
}
