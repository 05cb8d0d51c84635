//! Flux domain core.
//!
//! Pure types and rules shared by the persistence and HTTP layers: the
//! polymorphic node model, validation, scheduling helpers, view
//! invalidation targets, and the note intent detector. Nothing in this
//! crate performs I/O.

pub mod availability;
pub mod error;
pub mod intent;
pub mod node;
pub mod scheduling;
pub mod types;
pub mod views;
