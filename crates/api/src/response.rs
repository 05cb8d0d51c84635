//! Shared response envelope types for API handlers.
//!
//! Authenticated and public node endpoints answer with a `{ "data": ... }`
//! envelope. The AI endpoint keeps its own `{ "success": ... }` shape, see
//! [`crate::handlers::ai`].

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: node }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
