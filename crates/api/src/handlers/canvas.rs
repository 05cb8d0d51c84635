//! Canvas (ideation) queries and edge management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use flux_core::error::CoreError;
use flux_core::node::CANVAS_TYPES;
use flux_core::types::DbId;
use flux_core::views::edge_views;
use flux_db::models::edge::{CreateEdge, Edge};
use flux_db::models::node::{Node, NodeFilter};
use flux_db::repositories::{EdgeRepo, NodeRepo};
use flux_events::FluxEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Everything the canvas renders: placeable nodes and their connections.
#[derive(Debug, Serialize)]
pub struct CanvasData {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// GET /canvas
pub async fn get_canvas(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let filter = NodeFilter::owned_by(auth.user_id).of_types(CANVAS_TYPES);
    let (nodes, edges) = tokio::try_join!(
        NodeRepo::list(&state.pool, &filter),
        EdgeRepo::list_for_user(&state.pool, auth.user_id),
    )?;
    Ok(Json(DataResponse {
        data: CanvasData { nodes, edges },
    }))
}

/// POST /canvas/edges
///
/// Both endpoints must belong to the caller.
pub async fn create_edge(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateEdge>,
) -> AppResult<impl IntoResponse> {
    if input.source_id == input.target_id {
        return Err(CoreError::Validation("A node cannot be connected to itself".into()).into());
    }

    let edge = EdgeRepo::create(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFoundOrUnauthorized {
            entity: "Node",
            id: input.source_id,
        }))?;

    tracing::info!(
        user_id = auth.user_id,
        edge_id = edge.id,
        source_id = edge.source_id,
        target_id = edge.target_id,
        "Edge created"
    );
    state.event_bus.publish(
        FluxEvent::new("edge.created", auth.user_id)
            .with_actor(auth.user_id)
            .with_entity(edge.id)
            .invalidating(edge_views()),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: edge })))
}

/// DELETE /canvas/edges/{id}
pub async fn delete_edge(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !EdgeRepo::delete(&state.pool, id, auth.user_id).await? {
        return Err(CoreError::NotFoundOrUnauthorized { entity: "Edge", id }.into());
    }

    tracing::info!(user_id = auth.user_id, edge_id = id, "Edge deleted");
    state.event_bus.publish(
        FluxEvent::new("edge.deleted", auth.user_id)
            .with_actor(auth.user_id)
            .with_entity(id)
            .invalidating(edge_views()),
    );

    Ok(StatusCode::NO_CONTENT)
}
