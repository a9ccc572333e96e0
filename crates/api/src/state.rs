use std::sync::Arc;

use solesync_events::EventBus;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; inner data is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub pool: solesync_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Connected realtime clients and their rooms.
    pub ws_manager: Arc<WsManager>,
    /// Change feed fan-out; the relay subscribes to it.
    pub event_bus: Arc<EventBus>,
}
