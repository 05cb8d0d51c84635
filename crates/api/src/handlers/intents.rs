//! Intent detection on ad-hoc text, e.g. a note being edited but not yet saved.

use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use flux_core::intent::detect_intents;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;

#[derive(Debug, Deserialize)]
pub struct DetectIntentsRequest {
    #[serde(default)]
    pub content: String,
}

/// POST /intents/detect
pub async fn detect(
    _auth: AuthUser,
    Json(input): Json<DetectIntentsRequest>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: detect_intents(&input.content),
    }))
}
