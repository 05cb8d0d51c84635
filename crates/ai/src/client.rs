//! Text-generation client for OpenAI-compatible chat completion APIs.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

/// Default base URL of the chat completion API.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model name.
const DEFAULT_MODEL: &str = "gpt-4o";
/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Sampling temperature sent with every request.
const TEMPERATURE: f64 = 0.7;

/// Anything that turns a prompt into text.
///
/// The API holds an `Arc<dyn TextGenerator>` so tests can swap in a stub.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String, AiError>;
}

/// Errors from the text-generation layer.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// No API key is configured.
    #[error("API key is not configured")]
    MissingApiKey,

    /// The HTTP request itself failed (network, DNS, TLS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Text generation API error ({status}): {body}")]
    ApiError {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The service answered but the reply carried no text.
    #[error("Text generation returned no content")]
    EmptyResponse,
}

impl AiError {
    /// The inline text shown to the user in place of a generated answer.
    pub fn degraded_message(&self) -> &'static str {
        match self {
            AiError::MissingApiKey => "Error: API Key missing.",
            AiError::EmptyResponse => "AI Error: No response",
            AiError::Request(_) | AiError::ApiError { .. } => "AI Error: Failed to fetch",
        }
    }
}

/// Text-generation configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Bearer key. `None` disables generation without failing startup.
    pub api_key: Option<String>,
    /// Base URL, without the trailing `/chat/completions`.
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var           | Default                     |
    /// |-------------------|-----------------------------|
    /// | `OPENAI_API_KEY`  | unset                       |
    /// | `AI_BASE_URL`     | `https://api.openai.com/v1` |
    /// | `AI_MODEL`        | `gpt-4o`                    |
    /// | `AI_TIMEOUT_SECS` | `30`                        |
    ///
    /// # Panics
    ///
    /// Panics if `AI_TIMEOUT_SECS` is not a valid u64.
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let base_url = std::env::var("AI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let model = std::env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let timeout_secs: u64 = std::env::var("AI_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("AI_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key,
            base_url,
            model,
            timeout_secs,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    client: reqwest::Client,
    config: AiConfig,
}

impl OpenAiClient {
    /// Build a client with the configured request timeout.
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        if config.api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY is not set; AI actions will return an inline error");
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    /// Send `prompt` as a single user message and return the first choice.
    async fn generate_text(&self, prompt: &str) -> Result<String, AiError> {
        let api_key = self.config.api_key.as_deref().ok_or(AiError::MissingApiKey)?;

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": TEMPERATURE,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletion = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(AiError::EmptyResponse)
    }
}
