use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

use flux_core::node::CALENDAR_TYPES;
use flux_core::scheduling::DateRange;
use flux_db::models::node::{NodeFilter, NodeOrder};
use flux_db::repositories::NodeRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /events?start=&end=
///
/// Dated tasks, events, milestones and meetings touching the range, earliest
/// first. A node is included when its start or its end lies in the range.
pub async fn list_events(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> AppResult<impl IntoResponse> {
    let range = DateRange::new(range.start, range.end)?;
    let filter = NodeFilter::owned_by(auth.user_id)
        .of_types(CALENDAR_TYPES)
        .within(range)
        .ordered_by(NodeOrder::StartDateAsc);
    let nodes = NodeRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: nodes }))
}
