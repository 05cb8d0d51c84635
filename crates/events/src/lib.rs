//! Flux event bus.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`FluxEvent`] — a node-store change together with the client views it
//!   invalidates.

pub mod bus;

pub use bus::{EventBus, FluxEvent};
