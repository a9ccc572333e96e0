//! In-process fan-out of change events.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` between the change feed
//! watcher (publisher) and the realtime relay (subscriber).

use solesync_core::realtime::ChangeEvent;
use tokio::sync::broadcast;

use crate::collection::Collection;

// ---------------------------------------------------------------------------
// FeedEvent
// ---------------------------------------------------------------------------

/// A change observed on a watched collection.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEvent {
    pub collection: Collection,
    pub change: ChangeEvent,
}

impl FeedEvent {
    pub fn new(collection: Collection, change: ChangeEvent) -> Self {
        Self { collection, change }
    }

    /// Socket event name the change is published under.
    pub fn event_name(&self) -> &'static str {
        self.collection.event
    }

    /// Room the change is scoped to, if its collection is room-scoped.
    ///
    /// When the room field is the key column, the document key is used so
    /// that deletes (which carry no document) are still scoped.
    pub fn room(&self) -> Option<String> {
        let field = self.collection.room_field?;
        if field == self.collection.key_column {
            return Some(self.change.document_key.id.clone());
        }
        self.change.field_str(field).map(str::to_owned)
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

const DEFAULT_CAPACITY: usize = 1024;

/// Broadcast hub for [`FeedEvent`]s.
///
/// Slow receivers observe `RecvError::Lagged` and miss events; delivery is
/// at-most-once.
pub struct EventBus {
    sender: broadcast::Sender<FeedEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Dropped if nobody is listening.
    pub fn publish(&self, event: FeedEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
