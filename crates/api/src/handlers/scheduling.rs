//! Availability settings and the public booking surface.
//!
//! `save_availability` is owner-scoped. `public_availability` and
//! `book_meeting` take no credentials: a guest addresses a user by id.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use flux_core::availability::{resolve_rules, validate_rules, AVAILABILITY_NODE_TITLE};
use flux_core::error::CoreError;
use flux_core::node::{NodeProperties, NodeType, BUSY_TYPES};
use flux_core::scheduling::{meeting_content, meeting_properties, validate_booking, DateRange};
use flux_core::types::{DbId, Timestamp};
use flux_core::views::{availability_views, booking_views};
use flux_db::models::node::{CreateNode, NodeFilter, NodeOrder, UpdateNode};
use flux_db::repositories::{NodeRepo, UserRepo};
use flux_events::FluxEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A block of time that is not bookable. Titles and content are withheld
/// from guests.
#[derive(Debug, Serialize)]
pub struct BusySlot {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

/// What a guest needs to compute free slots client-side.
#[derive(Debug, Serialize)]
pub struct PublicAvailability {
    pub rules: NodeProperties,
    pub events: Vec<BusySlot>,
}

/// Body of `POST /public/users/{id}/bookings`.
#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    #[serde(default)]
    pub title: String,
    pub start: Timestamp,
    pub end: Timestamp,
    #[serde(default)]
    pub guest_email: String,
}

async fn ensure_user_exists(state: &AppState, user_id: DbId) -> AppResult<()> {
    if UserRepo::exists(&state.pool, user_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFoundOrUnauthorized {
            entity: "User",
            id: user_id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// PUT /availability
///
/// Upsert the caller's availability node. The body is the complete rules
/// object and replaces whatever was saved before.
pub async fn save_availability(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(rules): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let properties = validate_rules(&rules)?;

    let existing =
        NodeRepo::find_first_of_type(&state.pool, auth.user_id, NodeType::Availability).await?;

    let node = match existing {
        Some(node) => {
            let update = UpdateNode {
                properties: Some(properties),
                ..Default::default()
            };
            NodeRepo::update(&state.pool, node.id, auth.user_id, &update)
                .await?
                .ok_or(AppError::Core(CoreError::NotFoundOrUnauthorized {
                    entity: "Node",
                    id: node.id,
                }))?
        }
        None => {
            let input = CreateNode {
                properties: Some(properties),
                ..CreateNode::new(NodeType::Availability, AVAILABILITY_NODE_TITLE)
            };
            NodeRepo::create(&state.pool, auth.user_id, &input).await?
        }
    };

    tracing::info!(user_id = auth.user_id, node_id = node.id, "Availability saved");
    state.event_bus.publish(
        FluxEvent::new("availability.saved", auth.user_id)
            .with_actor(auth.user_id)
            .with_entity(node.id)
            .invalidating(availability_views(auth.user_id)),
    );

    Ok(Json(DataResponse { data: node }))
}

/// GET /public/users/{id}/availability?start=&end=
///
/// The user's rules (weekdays 09:00-17:00 when none are saved) plus their
/// busy tasks, events and meetings touching the range.
pub async fn public_availability(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(range): Query<DateRange>,
) -> AppResult<impl IntoResponse> {
    let range = DateRange::new(range.start, range.end)?;
    ensure_user_exists(&state, user_id).await?;

    let saved = NodeRepo::find_first_of_type(&state.pool, user_id, NodeType::Availability)
        .await?
        .map(|node| node.properties);

    let filter = NodeFilter::owned_by(user_id)
        .of_types(BUSY_TYPES)
        .within(range)
        .ordered_by(NodeOrder::StartDateAsc);
    let events = NodeRepo::list(&state.pool, &filter)
        .await?
        .into_iter()
        .map(|node| BusySlot {
            node_type: node.node_type,
            start_date: node.start_date,
            end_date: node.end_date,
        })
        .collect();

    Ok(Json(DataResponse {
        data: PublicAvailability {
            rules: resolve_rules(saved),
            events,
        },
    }))
}

/// POST /public/users/{id}/bookings
///
/// Create a scheduled meeting owned by the addressed user. Overlapping
/// bookings are accepted; no slot-capacity check is made.
pub async fn book_meeting(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<BookingRequest>,
) -> AppResult<impl IntoResponse> {
    validate_booking(&input.title, &input.guest_email, input.start, input.end)?;
    ensure_user_exists(&state, user_id).await?;

    let create = CreateNode {
        content: Some(meeting_content(&input.guest_email)),
        properties: Some(meeting_properties(&input.guest_email)),
        start_date: Some(input.start),
        end_date: Some(input.end),
        ..CreateNode::new(NodeType::Meeting, input.title)
    };
    let node = NodeRepo::create(&state.pool, user_id, &create).await?;

    tracing::info!(
        user_id,
        node_id = node.id,
        guest_email = %input.guest_email,
        "Meeting booked"
    );
    state.event_bus.publish(
        FluxEvent::new("meeting.booked", user_id)
            .with_entity(node.id)
            .invalidating(booking_views(user_id)),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: node })))
}
