use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use flux_core::error::CoreError;
use flux_core::types::DbId;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::ws::manager::WsManager;

/// Query parameters of the upgrade request. Browsers cannot set headers on
/// a WebSocket handshake, so the access token travels in the URL.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: Option<String>,
}

/// HTTP handler that authenticates the caller and upgrades the connection.
///
/// The token is checked before the upgrade so an unauthenticated client
/// gets a plain 401.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> AppResult<Response> {
    let token = params
        .token
        .ok_or_else(|| CoreError::Unauthorized("Missing token query parameter".into()))?;
    let claims = validate_token(&token, &state.config.jwt)
        .map_err(|_| CoreError::Unauthorized("Invalid or expired token".into()))?;

    let ws = ws.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let ws_manager = state.ws_manager;
    Ok(ws
        .on_upgrade(move |socket| handle_socket(socket, ws_manager, claims.sub))
        .into_response())
}

/// Manage a single WebSocket connection after upgrade.
///
/// Registers the connection, forwards queued messages from the manager
/// channel on a spawned task, and drains inbound frames until the client
/// goes away.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>, user_id: DbId) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id, "WebSocket connected");

    let mut rx = ws_manager.add(conn_id.clone(), user_id).await;

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

    // The channel is push-only; inbound frames other than Close are ignored.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
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
    tracing::info!(conn_id = %conn_id, user_id, "WebSocket disconnected");
}
