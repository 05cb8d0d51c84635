pub mod canvas;
pub mod health;
pub mod nodes;
pub mod public;

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ws?token=                                   WebSocket invalidation push
///
/// /nodes                                       list, create
/// /nodes/{id}                                  get, update, delete
/// /nodes/{id}/intents                          intents of a stored node
/// /intents/detect                              intents of ad-hoc text
///
/// /canvas                                      canvas nodes + edges
/// /canvas/edges                                create edge
/// /canvas/edges/{id}                           delete edge
///
/// /events?start=&end=                          calendar
/// /dashboard                                   recent tasks, events, notes
/// /availability                                save rules (PUT)
///
/// /public/users/{id}/availability              rules + busy slots (no auth)
/// /public/users/{id}/bookings                  guest booking (no auth)
///
/// /ai/action                                   summarize | plan (no auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/nodes", nodes::router())
        .route("/intents/detect", post(handlers::intents::detect))
        .nest("/canvas", canvas::router())
        .route("/events", get(handlers::calendar::list_events))
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/availability", put(handlers::scheduling::save_availability))
        .nest("/public", public::router())
        .route("/ai/action", post(handlers::ai::run_action))
}
