//! Handlers for the owner-scoped node store.
//!
//! Every route requires an [`AuthUser`]; reads and writes are filtered by the
//! caller's id inside the query, and a node owned by someone else is reported
//! exactly like a missing one.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use flux_core::error::CoreError;
use flux_core::intent::detect_intents;
use flux_core::node::{parse_type_list, validate_title, NodeProperties, NodeType, Position};
use flux_core::scheduling::DateRange;
use flux_core::types::{DbId, Timestamp};
use flux_core::views::node_mutation_views;
use flux_db::models::node::{CreateNode, NodeFilter, UpdateNode};
use flux_db::repositories::NodeRepo;
use flux_events::FluxEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body of `POST /nodes`.
///
/// `type` and `title` are taken as raw strings so that a missing or unknown
/// value is reported as a validation error rather than a body rejection.
#[derive(Debug, Deserialize)]
pub struct NewNodeRequest {
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default)]
    pub title: String,
    pub content: Option<String>,
    pub parent_id: Option<DbId>,
    pub properties: Option<NodeProperties>,
    pub position: Option<Position>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

impl NewNodeRequest {
    fn into_create(self) -> Result<CreateNode, CoreError> {
        let node_type: NodeType = self.node_type.parse()?;
        validate_title(&self.title)?;
        Ok(CreateNode {
            node_type,
            title: self.title,
            content: self.content,
            parent_id: self.parent_id,
            properties: self.properties,
            position: self.position,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

/// Query parameters for `GET /nodes`.
#[derive(Debug, Deserialize)]
pub struct NodeListParams {
    /// Comma-separated type names, e.g. `task,event`.
    #[serde(rename = "type")]
    pub types: Option<String>,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

/// Build an owner-scoped filter from list query parameters.
pub fn filter_from_params(user_id: DbId, params: &NodeListParams) -> Result<NodeFilter, CoreError> {
    let mut filter = NodeFilter::owned_by(user_id);
    if let Some(raw) = params.types.as_deref() {
        let types = parse_type_list(raw)?;
        if !types.is_empty() {
            filter = filter.of_types(&types);
        }
    }
    match (params.start, params.end) {
        (Some(start), Some(end)) => Ok(filter.within(DateRange::new(start, end)?)),
        (None, None) => Ok(filter),
        _ => Err(CoreError::Validation(
            "start and end must be given together".to_string(),
        )),
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFoundOrUnauthorized { entity: "Node", id })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /nodes?type=&start=&end=
pub async fn list_nodes(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NodeListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = filter_from_params(auth.user_id, &params)?;
    let nodes = NodeRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: nodes }))
}

/// POST /nodes
pub async fn create_node(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<NewNodeRequest>,
) -> AppResult<impl IntoResponse> {
    let input = input.into_create()?;
    let node = NodeRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        node_id = node.id,
        node_type = %node.node_type,
        "Node created"
    );
    state.event_bus.publish(
        FluxEvent::new("node.created", auth.user_id)
            .with_actor(auth.user_id)
            .with_entity(node.id)
            .invalidating(node_mutation_views()),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: node })))
}

/// GET /nodes/{id}
pub async fn get_node(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let node = NodeRepo::find_owned(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: node }))
}

/// PATCH /nodes/{id}
///
/// Absent fields are left unchanged; `properties` and `position` replace
/// the stored value wholesale.
pub async fn update_node(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNode>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = input.title.as_deref() {
        validate_title(title)?;
    }

    let node = NodeRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(user_id = auth.user_id, node_id = id, "Node updated");
    state.event_bus.publish(
        FluxEvent::new("node.updated", auth.user_id)
            .with_actor(auth.user_id)
            .with_entity(id)
            .invalidating(node_mutation_views()),
    );

    Ok(Json(DataResponse { data: node }))
}

/// DELETE /nodes/{id}
pub async fn delete_node(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !NodeRepo::delete(&state.pool, id, auth.user_id).await? {
        return Err(not_found(id));
    }

    tracing::info!(user_id = auth.user_id, node_id = id, "Node deleted");
    state.event_bus.publish(
        FluxEvent::new("node.deleted", auth.user_id)
            .with_actor(auth.user_id)
            .with_entity(id)
            .invalidating(node_mutation_views()),
    );

    Ok(StatusCode::NO_CONTENT)
}

/// GET /nodes/{id}/intents
///
/// Run the intent detector over a stored node's content. The node is not
/// modified.
pub async fn node_intents(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let node = NodeRepo::find_owned(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let intents = detect_intents(node.content.as_deref().unwrap_or_default());
    Ok(Json(DataResponse { data: intents }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn params(
        types: Option<&str>,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> NodeListParams {
        NodeListParams {
            types: types.map(String::from),
            start,
            end,
        }
    }

    #[test]
    fn new_node_requires_known_type_and_title() {
        let ok: NewNodeRequest =
            serde_json::from_value(serde_json::json!({ "type": "task", "title": "Write" }))
                .unwrap();
        assert_eq!(ok.into_create().unwrap().node_type, NodeType::Task);

        let bad_type: NewNodeRequest =
            serde_json::from_value(serde_json::json!({ "type": "image", "title": "x" })).unwrap();
        assert_matches!(bad_type.into_create(), Err(CoreError::Validation(_)));

        let no_title: NewNodeRequest =
            serde_json::from_value(serde_json::json!({ "type": "note" })).unwrap();
        assert_matches!(no_title.into_create(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn filter_params() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 1, 31, 0, 0, 0).unwrap();

        let filter =
            filter_from_params(1, &params(Some("task, event"), Some(start), Some(end))).unwrap();
        assert_eq!(filter.types, Some(vec![NodeType::Task, NodeType::Event]));
        assert!(filter.range.is_some());

        let all = filter_from_params(1, &params(Some(""), None, None)).unwrap();
        assert_eq!(all.types, None);

        assert_matches!(
            filter_from_params(1, &params(None, Some(start), None)),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            filter_from_params(1, &params(None, Some(end), Some(start))),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            filter_from_params(1, &params(Some("task,bogus"), None, None)),
            Err(CoreError::Validation(_))
        );
    }
}
