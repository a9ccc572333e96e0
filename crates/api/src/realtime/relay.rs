//! Bus-to-socket relay.
//!
//! [`RealtimeRelay`] subscribes to the change feed bus and forwards every
//! event as a [`ServerMessage`] frame. Each connection receives one copy:
//! members of the event's room get it tagged with the room, everyone else
//! gets the plain broadcast.

use std::sync::Arc;

use axum::extract::ws::Message;
use solesync_core::realtime::ServerMessage;
use solesync_events::FeedEvent;
use tokio::sync::broadcast;

use crate::ws::WsManager;

pub struct RealtimeRelay {
    ws_manager: Arc<WsManager>,
}

impl RealtimeRelay {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run until the bus closes.
    pub async fn run(self, mut receiver: broadcast::Receiver<FeedEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.relay(&event).await {
                        tracing::error!(
                            error = %e,
                            event = event.event_name(),
                            "Failed to relay change"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Realtime relay lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, realtime relay shutting down");
                    break;
                }
            }
        }
    }

    async fn relay(&self, event: &FeedEvent) -> Result<(), serde_json::Error> {
        let plain = encode_frame(event, None)?;
        match event.room() {
            Some(room) => {
                let scoped = encode_frame(event, Some(room.clone()))?;
                let members = self.ws_manager.emit_scoped(&room, scoped, plain).await;
                tracing::debug!(
                    event = event.event_name(),
                    room = %room,
                    members,
                    "Relayed change",
                );
            }
            None => {
                self.ws_manager.broadcast(plain).await;
                tracing::debug!(event = event.event_name(), "Broadcast change");
            }
        }
        Ok(())
    }
}

/// Serialize a feed event as a text frame.
pub fn encode_frame(event: &FeedEvent, room: Option<String>) -> Result<Message, serde_json::Error> {
    let frame = ServerMessage {
        event: event.event_name().to_string(),
        room,
        data: event.change.clone(),
    };
    Ok(Message::Text(serde_json::to_string(&frame)?.into()))
}
