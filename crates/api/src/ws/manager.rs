use std::collections::{HashMap, HashSet};

use axum::body::Bytes;
use axum::extract::ws::Message;
use solesync_core::types::Timestamp;
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// State of a single WebSocket connection.
pub struct WsConnection {
    pub sender: WsSender,
    pub connected_at: Timestamp,
    /// Rooms joined via `joinLineItem`.
    pub rooms: HashSet<String>,
}

/// Manages all active WebSocket connections and their room memberships.
///
/// Thread-safe via interior `RwLock`; wrapped in `Arc` and shared across the
/// application. Sends to closed channels are skipped; the connection is
/// removed when its receive loop ends.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink.
    pub async fn add(&self, conn_id: String) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            sender: tx,
            connected_at: chrono::Utc::now(),
            rooms: HashSet::new(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Remove a connection. Its room memberships go with it.
    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Add a connection to a room. Returns `false` if the connection is unknown.
    pub async fn join(&self, conn_id: &str, room: &str) -> bool {
        match self.connections.write().await.get_mut(conn_id) {
            Some(conn) => {
                conn.rooms.insert(room.to_string());
                true
            }
            None => false,
        }
    }

    /// Remove a connection from a room. Returns `true` if it was a member.
    pub async fn leave(&self, conn_id: &str, room: &str) -> bool {
        self.connections
            .write()
            .await
            .get_mut(conn_id)
            .is_some_and(|conn| conn.rooms.remove(room))
    }

    /// Number of connections currently in `room`.
    pub async fn room_size(&self, room: &str) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|conn| conn.rooms.contains(room))
            .count()
    }

    /// Broadcast a message to all connected clients.
    pub async fn broadcast(&self, message: Message) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(message.clone());
        }
    }

    /// Deliver exactly one copy per connection: members of `room` receive
    /// `scoped`, everyone else receives `plain`.
    ///
    /// Returns the number of connections that received the scoped copy.
    pub async fn emit_scoped(&self, room: &str, scoped: Message, plain: Message) -> usize {
        let conns = self.connections.read().await;
        let mut members = 0;
        for conn in conns.values() {
            if conn.rooms.contains(room) {
                let _ = conn.sender.send(scoped.clone());
                members += 1;
            } else {
                let _ = conn.sender.send(plain.clone());
            }
        }
        members
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every connection, then clear the map.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connected client.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
