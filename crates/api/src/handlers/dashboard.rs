//! Dashboard summary: recent work across tasks, events and notes.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use flux_core::node::NodeType;
use flux_db::models::node::{Node, NodeFilter, NodeOrder};
use flux_db::repositories::NodeRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const RECENT_TASKS: i64 = 5;
const RECENT_EVENTS: i64 = 3;
const RECENT_NOTES: i64 = 3;

#[derive(Debug, Serialize)]
pub struct DashboardData {
    /// Most recently updated tasks.
    pub tasks: Vec<Node>,
    /// Most recently created events.
    pub events: Vec<Node>,
    /// Most recently updated notes.
    pub notes: Vec<Node>,
}

/// GET /dashboard
pub async fn get_dashboard(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let owned = NodeFilter::owned_by(auth.user_id);
    let tasks = owned
        .clone()
        .of_types(&[NodeType::Task])
        .ordered_by(NodeOrder::UpdatedAtDesc)
        .limit(RECENT_TASKS);
    let events = owned
        .clone()
        .of_types(&[NodeType::Event])
        .ordered_by(NodeOrder::CreatedAtDesc)
        .limit(RECENT_EVENTS);
    let notes = owned
        .of_types(&[NodeType::Note])
        .ordered_by(NodeOrder::UpdatedAtDesc)
        .limit(RECENT_NOTES);

    let (tasks, events, notes) = tokio::try_join!(
        NodeRepo::list(&state.pool, &tasks),
        NodeRepo::list(&state.pool, &events),
        NodeRepo::list(&state.pool, &notes),
    )?;

    Ok(Json(DataResponse {
        data: DashboardData {
            tasks,
            events,
            notes,
        },
    }))
}
