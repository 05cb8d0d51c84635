use std::sync::Arc;

use flux_ai::TextGenerator;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: flux_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Event bus carrying view invalidations.
    pub event_bus: Arc<flux_events::EventBus>,
    /// Text generation backend for AI actions.
    pub ai: Arc<dyn TextGenerator>,
}
