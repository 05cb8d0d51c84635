//! AI action endpoint.
//!
//! Uses its own envelope: `{ "success": true, "data": ... }` or
//! `{ "success": false, "error": "..." }`. Failures of the text-generation
//! service do not reach this layer; they come back as inline text in `data`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use flux_ai::{dispatch, AiAction, AiOutput};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AiActionRequest {
    pub action: String,
    #[serde(default)]
    pub payload: AiPayload,
}

#[derive(Debug, Default, Deserialize)]
pub struct AiPayload {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AiActionResponse {
    Success { success: bool, data: AiOutput },
    Failure { success: bool, error: String },
}

impl AiActionResponse {
    fn failure(status: StatusCode, error: impl Into<String>) -> Response {
        let body = AiActionResponse::Failure {
            success: false,
            error: error.into(),
        };
        (status, Json(body)).into_response()
    }
}

/// POST /ai/action
pub async fn run_action(
    State(state): State<AppState>,
    body: Result<Json<AiActionRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return AiActionResponse::failure(StatusCode::BAD_REQUEST, rejection.body_text())
        }
    };

    let action: AiAction = match request.action.parse() {
        Ok(action) => action,
        Err(e) => {
            tracing::debug!(action = %request.action, "Rejected AI action");
            return AiActionResponse::failure(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    // A panicking provider surfaces as the 500 envelope below.
    let generator = state.ai.clone();
    let content = request.payload.content;
    let task = tokio::spawn(async move { dispatch(generator.as_ref(), action, &content).await });

    match task.await {
        Ok(output) => {
            tracing::info!(action = %request.action, "AI action completed");
            let body = AiActionResponse::Success {
                success: true,
                data: output,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, action = %request.action, "AI action failed");
            AiActionResponse::failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}
