//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` across the application. Every
//! node-store mutation publishes one [`FluxEvent`]; the API's invalidation
//! router forwards it to the affected user's live connections.

use chrono::{DateTime, Utc};
use flux_core::types::DbId;
use flux_core::views::View;
use serde::Serialize;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// FluxEvent
// ---------------------------------------------------------------------------

/// A change in the node store.
#[derive(Debug, Clone, Serialize)]
pub struct FluxEvent {
    /// Dot-separated event name, e.g. `"node.created"`.
    pub event_type: String,

    /// User whose data changed. Invalidations are delivered to this user.
    pub owner_user_id: DbId,

    /// User who caused the change; `None` for unauthenticated guests.
    pub actor_user_id: Option<DbId>,

    /// Id of the node or edge the event is about.
    pub entity_id: Option<DbId>,

    /// Views whose cached data is now stale.
    pub invalidated: Vec<View>,

    pub timestamp: DateTime<Utc>,
}

impl FluxEvent {
    /// Create an event for a change to `owner_user_id`'s data.
    pub fn new(event_type: impl Into<String>, owner_user_id: DbId) -> Self {
        Self {
            event_type: event_type.into(),
            owner_user_id,
            actor_user_id: None,
            entity_id: None,
            invalidated: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_entity(mut self, entity_id: DbId) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    pub fn invalidating(mut self, views: Vec<View>) -> Self {
        self.invalidated = views;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use flux_events::bus::{EventBus, FluxEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(FluxEvent::new("node.created", 1));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<FluxEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed events are dropped and
    /// slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: FluxEvent) {
        tracing::debug!(
            event_type = %event.event_type,
            owner_user_id = event.owner_user_id,
            views = event.invalidated.len(),
            "Publishing event"
        );
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FluxEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
