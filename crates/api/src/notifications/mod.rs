//! Delivery of view invalidations to connected clients.
//!
//! The [`InvalidationRouter`] subscribes to the event bus and pushes each
//! event to the WebSocket connections of the user whose data changed.

pub mod router;

pub use router::InvalidationRouter;
