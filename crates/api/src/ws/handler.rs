use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use solesync_core::realtime::ClientCommand;

use crate::state::AppState;
use crate::ws::manager::WsManager;

/// HTTP handler that upgrades the connection to WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Outbound frames come from the manager channel via a sender task; inbound
/// text frames are room membership commands.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let mut rx = ws_manager.add(conn_id.clone()).await;
    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                handle_command(&ws_manager, &conn_id, text.as_str()).await;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

/// Apply a `joinLineItem` / `leaveLineItem` frame. Anything else is ignored.
pub(crate) async fn handle_command(ws_manager: &WsManager, conn_id: &str, text: &str) {
    match serde_json::from_str::<ClientCommand>(text) {
        Ok(ClientCommand::JoinLineItem(room)) => {
            ws_manager.join(conn_id, &room).await;
            tracing::debug!(conn_id = %conn_id, room = %room, "Joined room");
        }
        Ok(ClientCommand::LeaveLineItem(room)) => {
            ws_manager.leave(conn_id, &room).await;
            tracing::debug!(conn_id = %conn_id, room = %room, "Left room");
        }
        Err(e) => {
            tracing::debug!(conn_id = %conn_id, error = %e, "Ignoring unrecognized frame");
        }
    }
}
