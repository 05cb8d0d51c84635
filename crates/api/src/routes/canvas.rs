use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::canvas;
use crate::state::AppState;

/// Canvas routes, mounted at `/canvas`.
///
/// ```text
/// GET    /                   -> get_canvas
/// POST   /edges              -> create_edge
/// DELETE /edges/{id}         -> delete_edge
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(canvas::get_canvas))
        .route("/edges", post(canvas::create_edge))
        .route("/edges/{id}", delete(canvas::delete_edge))
}
