#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use flux_ai::{AiConfig, AiError, TextGenerator};
use flux_api::auth::jwt::{generate_access_token, JwtConfig};
use flux_api::config::ServerConfig;
use flux_api::router::build_app_router;
use flux_api::state::AppState;
use flux_api::ws::WsManager;
use flux_core::types::DbId;
use flux_db::models::user::CreateUser;
use flux_db::repositories::UserRepo;
use flux_events::EventBus;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";
pub const TEST_ORIGIN: &str = "http://localhost:3000";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![TEST_ORIGIN.to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
        ai: AiConfig::default(),
    }
}

// ---------------------------------------------------------------------------
// Text generation stubs
// ---------------------------------------------------------------------------

/// Replies with fixed text, or fails with a fixed error kind.
pub struct StubGenerator {
    reply: Option<String>,
}

impl StubGenerator {
    pub fn replying(text: &str) -> Arc<dyn TextGenerator> {
        Arc::new(Self {
            reply: Some(text.to_string()),
        })
    }

    /// Always fails as if no API key were configured.
    pub fn failing() -> Arc<dyn TextGenerator> {
        Arc::new(Self { reply: None })
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate_text(&self, _prompt: &str) -> Result<String, AiError> {
        self.reply.clone().ok_or(AiError::MissingApiKey)
    }
}

/// Panics inside `generate_text`, standing in for a provider bug.
pub struct PanickingGenerator;

impl PanickingGenerator {
    pub fn shared() -> Arc<dyn TextGenerator> {
        Arc::new(Self)
    }
}

#[async_trait]
impl TextGenerator for PanickingGenerator {
    async fn generate_text(&self, _prompt: &str) -> Result<String, AiError> {
        panic!("text generator exploded");
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Application state over `pool` with a fresh event bus and WS manager.
pub fn test_state(pool: PgPool, ai: Arc<dyn TextGenerator>) -> AppState {
    AppState {
        pool,
        config: Arc::new(test_config()),
        ws_manager: Arc::new(WsManager::new()),
        event_bus: Arc::new(EventBus::default()),
        ai,
    }
}

/// Build the full application router (same middleware stack as production)
/// with a stub text generator.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, StubGenerator::replying("Stub summary"))
}

pub fn build_test_app_with(pool: PgPool, ai: Arc<dyn TextGenerator>) -> Router {
    build_app_router(test_state(pool, ai), &test_config())
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Insert a user and return their id.
pub async fn create_user(pool: &PgPool, email: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            name: email.split('@').next().unwrap_or("user").to_string(),
            email: email.to_string(),
        },
    )
    .await
    .expect("user insert should succeed")
    .id
}

/// A valid access token for `user_id`.
pub fn token_for(user_id: DbId) -> String {
    generate_access_token(user_id, &test_config().jwt).expect("token generation should succeed")
}

/// Create a user and return `(id, token)`.
pub async fn login(pool: &PgPool, email: &str) -> (DbId, String) {
    let id = create_user(pool, email).await;
    (id, token_for(id))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::GET, uri, token, None).await
}

pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::DELETE, uri, token, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, token, Some(body)).await
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, token, Some(body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, token, Some(body)).await
}

/// POST a raw (possibly malformed) JSON body.
pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
