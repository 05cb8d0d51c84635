//! Text generation for Flux AI actions.
//!
//! - [`client`] -- the [`TextGenerator`] seam and an OpenAI-compatible HTTP
//!   implementation.
//! - [`actions`] -- `summarize` / `plan` dispatch. Generation failures never
//!   surface as errors here; they degrade into inline text.

pub mod actions;
pub mod client;

pub use actions::{dispatch, AiAction, AiOutput};
pub use client::{AiConfig, AiError, OpenAiClient, TextGenerator};
