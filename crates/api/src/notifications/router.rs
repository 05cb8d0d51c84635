//! Event-to-WebSocket routing.

use std::sync::Arc;

use axum::extract::ws::Message;
use flux_events::FluxEvent;
use tokio::sync::broadcast;

use crate::ws::WsManager;

/// Forwards [`FluxEvent`]s to the owning user's live connections.
pub struct InvalidationRouter {
    ws_manager: Arc<WsManager>,
}

impl InvalidationRouter {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the routing loop.
    ///
    /// Exits when the channel is closed, i.e. when the
    /// [`EventBus`](flux_events::EventBus) is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<FluxEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.deliver(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Invalidation router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, invalidation router shutting down");
                    break;
                }
            }
        }
    }

    /// Push one event to every connection of its owner.
    ///
    /// Returns how many connections it was queued for.
    pub async fn deliver(&self, event: &FluxEvent) -> usize {
        if event.invalidated.is_empty() {
            return 0;
        }
        let msg = invalidation_message(event);
        let sent = self
            .ws_manager
            .send_to_user(event.owner_user_id, Message::Text(msg.to_string().into()))
            .await;
        tracing::debug!(
            event_type = %event.event_type,
            user_id = event.owner_user_id,
            connections = sent,
            "Invalidation delivered"
        );
        sent
    }
}

/// Wire form of an invalidation push.
pub fn invalidation_message(event: &FluxEvent) -> serde_json::Value {
    serde_json::json!({
        "type": "invalidate",
        "event_type": event.event_type,
        "entity_id": event.entity_id,
        "views": event.invalidated,
        "timestamp": event.timestamp,
    })
}
