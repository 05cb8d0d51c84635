use axum::routing::{get, post};
use axum::Router;

use crate::handlers::scheduling;
use crate::state::AppState;

/// Unauthenticated booking routes, mounted at `/public`.
///
/// ```text
/// GET    /users/{id}/availability  -> public_availability (?start=&end=)
/// POST   /users/{id}/bookings      -> book_meeting
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{id}/availability",
            get(scheduling::public_availability),
        )
        .route("/users/{id}/bookings", post(scheduling::book_meeting))
}
