//! Realtime wire types shared by the server relay and the client library.
//!
//! Change events keep the camelCase shape of a document-database change
//! stream (`operationType`, `documentKey._id`, `fullDocument`,
//! `updateDescription`) so that every client sees one stable format.
//!
//! Frames on the socket are JSON objects of the form
//! `{"event": "<name>", "room": "<id>"?, "data": {...}}` in both directions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Event names
// ---------------------------------------------------------------------------

pub const EVENT_APPOINTMENT_UPDATED: &str = "appointmentUpdated";
pub const EVENT_ANNOUNCEMENTS_UPDATED: &str = "announcementsUpdated";
pub const EVENT_PROMOS_UPDATED: &str = "promosUpdated";
pub const EVENT_DATES_UPDATED: &str = "datesUpdated";
pub const EVENT_LINE_ITEM_UPDATED: &str = "lineItemUpdated";

// ---------------------------------------------------------------------------
// Change events
// ---------------------------------------------------------------------------

/// Kind of write that produced a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Insert,
    Update,
    Replace,
    Delete,
}

impl OperationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Replace => "replace",
            Self::Delete => "delete",
        }
    }
}

/// Primary key of the changed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentKey {
    #[serde(rename = "_id")]
    pub id: String,
}

/// Field-level delta of an update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDescription {
    #[serde(default)]
    pub updated_fields: Map<String, Value>,
    #[serde(default)]
    pub removed_fields: Vec<String>,
}

/// One insert/update/delete observed on a watched table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub operation_type: OperationType,
    pub document_key: DocumentKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_document: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_description: Option<UpdateDescription>,
}

impl ChangeEvent {
    pub fn insert(id: impl Into<String>, document: Value) -> Self {
        Self {
            operation_type: OperationType::Insert,
            document_key: DocumentKey { id: id.into() },
            full_document: Some(document),
            update_description: None,
        }
    }

    pub fn update(id: impl Into<String>, document: Value, delta: UpdateDescription) -> Self {
        Self {
            operation_type: OperationType::Update,
            document_key: DocumentKey { id: id.into() },
            full_document: Some(document),
            update_description: Some(delta),
        }
    }

    pub fn delete(id: impl Into<String>) -> Self {
        Self {
            operation_type: OperationType::Delete,
            document_key: DocumentKey { id: id.into() },
            full_document: None,
            update_description: None,
        }
    }

    /// Stable identity of this event, used by clients to skip re-delivered
    /// copies: `op:key[:updatedFields-json]`.
    pub fn signature(&self) -> String {
        let mut parts = vec![
            self.operation_type.as_str().to_string(),
            self.document_key.id.clone(),
        ];
        if let Some(delta) = &self.update_description {
            // Map is key-ordered, so the encoding is deterministic.
            parts.push(Value::Object(delta.updated_fields.clone()).to_string());
        }
        parts.join(":")
    }

    /// Read a field from the full document, falling back to the update delta.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.full_document
            .as_ref()
            .and_then(|doc| doc.get(name))
            .or_else(|| {
                self.update_description
                    .as_ref()
                    .and_then(|delta| delta.updated_fields.get(name))
            })
    }

    /// String value of a field, if present and a string.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }
}

// ---------------------------------------------------------------------------
// Socket frames
// ---------------------------------------------------------------------------

/// Server-to-client frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerMessage {
    pub event: String,
    /// Set when the frame was delivered because the receiver joined this room.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    pub data: ChangeEvent,
}

/// Client-to-server room membership command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientCommand {
    #[serde(rename = "joinLineItem")]
    JoinLineItem(String),
    #[serde(rename = "leaveLineItem")]
    LeaveLineItem(String),
}
