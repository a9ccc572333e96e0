//! Realtime change-feed subscriber.
//!
//! [`RealtimeClient::spawn`] starts a background task that connects to the
//! server's `/ws` endpoint, forwards every decoded [`ServerMessage`] to an
//! mpsc channel, and reconnects with capped exponential backoff until the
//! [`CancellationToken`] fires. Joined rooms are remembered and joined
//! again after every reconnect.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::{Sink, SinkExt, StreamExt};
use solesync_core::realtime::{ClientCommand, ServerMessage};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

// ---------------------------------------------------------------------------
// Backoff
// ---------------------------------------------------------------------------

/// Tunable parameters for the reconnect backoff.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

/// Calculate the next backoff delay, clamped to `max_delay`.
pub fn next_delay(current: Duration, config: &ReconnectConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct RealtimeClient {
    url: String,
    reconnect: ReconnectConfig,
}

/// Control handle for a running [`RealtimeClient`] task.
pub struct RealtimeHandle {
    rooms: Arc<Mutex<HashSet<String>>>,
    commands: mpsc::UnboundedSender<ClientCommand>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Why a connected session ended.
enum SessionEnd {
    Disconnected,
    Cancelled,
    /// Nobody is reading events any more.
    ReceiverGone,
}

impl RealtimeClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_url(config.socket_url(), config.reconnect.clone())
    }

    pub fn with_url(url: impl Into<String>, reconnect: ReconnectConfig) -> Self {
        Self {
            url: url.into(),
            reconnect,
        }
    }

    /// Start the connection task.
    ///
    /// The returned receiver yields every frame the server pushes. The task
    /// stops when `cancel` fires, the handle is shut down, or the receiver
    /// is dropped.
    pub fn spawn(
        self,
        cancel: CancellationToken,
    ) -> (RealtimeHandle, mpsc::UnboundedReceiver<ServerMessage>) {
        let rooms = Arc::new(Mutex::new(HashSet::new()));
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run_connection_loop(
            self,
            Arc::clone(&rooms),
            command_rx,
            event_tx,
            cancel.clone(),
        ));

        let handle = RealtimeHandle {
            rooms,
            commands: command_tx,
            cancel,
            task,
        };
        (handle, event_rx)
    }
}

impl RealtimeHandle {
    /// Receive `lineItemUpdated` / `datesUpdated` for this line item tagged
    /// with its room.
    pub async fn join_line_item(&self, line_item_id: &str) {
        self.rooms.lock().await.insert(line_item_id.to_string());
        let _ = self
            .commands
            .send(ClientCommand::JoinLineItem(line_item_id.to_string()));
    }

    pub async fn leave_line_item(&self, line_item_id: &str) {
        self.rooms.lock().await.remove(line_item_id);
        let _ = self
            .commands
            .send(ClientCommand::LeaveLineItem(line_item_id.to_string()));
    }

    pub async fn joined_rooms(&self) -> Vec<String> {
        let mut rooms: Vec<String> = self.rooms.lock().await.iter().cloned().collect();
        rooms.sort();
        rooms
    }

    /// Cancel the task and wait up to five seconds for it to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = tokio::time::timeout(Duration::from_secs(5), self.task).await;
    }
}

/// Connect, process frames, and reconnect until cancelled.
async fn run_connection_loop(
    client: RealtimeClient,
    rooms: Arc<Mutex<HashSet<String>>>,
    mut commands: mpsc::UnboundedReceiver<ClientCommand>,
    events: mpsc::UnboundedSender<ServerMessage>,
    cancel: CancellationToken,
) {
    let mut delay = client.reconnect.initial_delay;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let connected = tokio::select! {
            _ = cancel.cancelled() => return,
            result = connect_async(client.url.as_str()) => result,
        };

        match connected {
            Ok((socket, _response)) => {
                tracing::info!(url = %client.url, attempt, "Realtime socket connected");
                attempt = 0;
                delay = client.reconnect.initial_delay;

                match run_session(socket, &rooms, &mut commands, &events, &cancel).await {
                    SessionEnd::Cancelled => {
                        tracing::info!("Realtime socket closed");
                        return;
                    }
                    SessionEnd::ReceiverGone => {
                        tracing::debug!("Realtime event receiver dropped, stopping");
                        return;
                    }
                    SessionEnd::Disconnected => {
                        tracing::warn!(url = %client.url, "Realtime socket disconnected");
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    url = %client.url,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Realtime connect failed",
                );
            }
        }

        // Wait before the next attempt, respecting cancellation.
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
        delay = next_delay(delay, &client.reconnect);
    }
}

/// Drive one connected socket until it drops or the client stops.
async fn run_session(
    socket: Socket,
    rooms: &Mutex<HashSet<String>>,
    commands: &mut mpsc::UnboundedReceiver<ClientCommand>,
    events: &mpsc::UnboundedSender<ServerMessage>,
    cancel: &CancellationToken,
) -> SessionEnd {
    let (mut sink, mut stream) = socket.split();

    // Commands queued while offline are already reflected in `rooms`.
    while commands.try_recv().is_ok() {}
    let joined: Vec<String> = rooms.lock().await.iter().cloned().collect();
    for room in joined {
        if !send_command(&mut sink, &ClientCommand::JoinLineItem(room)).await {
            return SessionEnd::Disconnected;
        }
    }

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                return SessionEnd::Cancelled;
            }
            command = commands.recv() => match command {
                Some(command) => {
                    if !send_command(&mut sink, &command).await {
                        return SessionEnd::Disconnected;
                    }
                }
                // Handle dropped.
                None => {
                    let _ = sink.send(Message::Close(None)).await;
                    return SessionEnd::Cancelled;
                }
            },
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if !forward_frame(&text, events) {
                        return SessionEnd::ReceiverGone;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(?frame, "Server closed realtime socket");
                    return SessionEnd::Disconnected;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Realtime socket receive error");
                    return SessionEnd::Disconnected;
                }
                None => return SessionEnd::Disconnected,
            },
        }
    }
}

/// Decode one text frame and hand it to the receiver. Returns `false` once
/// the receiver is gone; undecodable frames are logged and skipped.
fn forward_frame(text: &str, events: &mpsc::UnboundedSender<ServerMessage>) -> bool {
    let message = match serde_json::from_str::<ServerMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring undecodable frame");
            return true;
        }
    };
    tracing::debug!(
        event = %message.event,
        key = %message.data.document_key.id,
        room = ?message.room,
        "Change received",
    );
    events.send(message).is_ok()
}

async fn send_command<S>(sink: &mut S, command: &ClientCommand) -> bool
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    let text = match serde_json::to_string(command) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode socket command");
            return true;
        }
    };
    match sink.send(Message::Text(text)).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to send socket command");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_delay_doubles() {
        let config = ReconnectConfig::default();
        assert_eq!(next_delay(Duration::from_secs(1), &config), Duration::from_secs(2));
    }

    #[test]
    fn backoff_caps_at_ten_seconds() {
        let config = ReconnectConfig::default();
        let mut delay = config.initial_delay;
        let expected = [1, 2, 4, 8, 10, 10];

        for &expected_secs in &expected {
            assert_eq!(delay.as_secs(), expected_secs);
            delay = next_delay(delay, &config);
        }
    }

    #[tokio::test]
    async fn cancelled_client_stops_without_server() {
        let cancel = CancellationToken::new();
        let client = RealtimeClient::with_url("ws://127.0.0.1:9/ws", ReconnectConfig::default());
        let (handle, _events) = client.spawn(cancel.clone());

        handle.join_line_item("LI-1").await;
        assert_eq!(handle.joined_rooms().await, vec!["LI-1".to_string()]);

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle.shutdown())
            .await
            .expect("task should stop after cancel");
    }
}
