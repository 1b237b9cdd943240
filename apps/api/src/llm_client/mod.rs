/// Oracle client: the single point of entry for all generative-text calls.
///
/// No other module talks HTTP to the oracle. Everything goes through the
/// `TextOracle` trait so callers can be exercised against stubs.
///
/// Wire protocol: `POST {endpoint}` with
/// `{model, prompt, stream: false, options: {temperature, num_predict?}}`,
/// answered by `{response: string}`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Oracle returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Oracle returned empty response")]
    EmptyResponse,
}

/// Sampling options for a single oracle call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerateOptions {
    pub temperature: f32,
    /// Upper bound on generated tokens; omitted from the request when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
}

/// Anything that turns a prompt into generated text.
#[async_trait]
pub trait TextOracle: Send + Sync {
    async fn generate(&self, prompt: &str, options: GenerateOptions) -> Result<String, OracleError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// HTTP oracle speaking the generate protocol above, with a fixed per-call timeout.
#[derive(Clone)]
pub struct OracleClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl OracleClient {
    pub fn new(endpoint: String, model: String, timeout: Duration) -> Result<Self, OracleError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextOracle for OracleClient {
    /// One attempt, no retries. Callers decide how to degrade on failure.
    async fn generate(&self, prompt: &str, options: GenerateOptions) -> Result<String, OracleError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options,
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        debug!(
            "Oracle call succeeded: prompt_chars={}, response_chars={}",
            prompt.len(),
            parsed.response.len()
        );

        if parsed.response.trim().is_empty() {
            return Err(OracleError::EmptyResponse);
        }
        Ok(parsed.response)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from oracle output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Isolates the candidate JSON object: first `{` through last `}`.
/// `None` when either brace is missing or they are out of order.
pub fn isolate_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
