use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AiConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Asks the upstream for a JSON object response.
    pub json_mode: bool,
}

/// A chat-completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the first choice's content; empty when the upstream sent none.
    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String>;
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
}

struct AttemptError {
    retryable: bool,
    error: anyhow::Error,
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

const MAX_BACKOFF: Duration = Duration::from_secs(8);

fn backoff(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt)).min(MAX_BACKOFF)
}

/// OpenAI-compatible `/chat/completions` client (OpenRouter by default).
#[derive(Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    referer: Option<String>,
    title: Option<String>,
    max_retries: u32,
    retry_base: Duration,
}

impl OpenRouterClient {
    pub fn new(config: &AiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .context("build completion http client")?;
        Ok(Self {
            http,
            endpoint: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            referer: config.referer.clone(),
            title: config.title.clone(),
            max_retries: config.max_retries,
            retry_base: Duration::from_millis(500),
        })
    }

    async fn attempt(&self, body: &WireRequest<'_>) -> Result<String, AttemptError> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body);
        if let Some(referer) = &self.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            request = request.header("X-Title", title);
        }

        let resp = request.send().await.map_err(|e| AttemptError {
            retryable: e.is_timeout() || e.is_connect(),
            error: anyhow::Error::new(e).context("send completion request"),
        })?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(AttemptError {
                retryable: is_retryable(status),
                error: anyhow::anyhow!("completion endpoint returned {status}: {detail}"),
            });
        }

        let parsed: WireResponse = resp.json().await.map_err(|e| AttemptError {
            retryable: false,
            error: anyhow::Error::new(e).context("decode completion response"),
        })?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String> {
        let body = WireRequest {
            model: &self.model,
            messages: &req.messages,
            temperature: req.temperature,
            max_tokens: req.max_tokens,
            response_format: req.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let mut attempt = 0;
        loop {
            match self.attempt(&body).await {
                Ok(content) => {
                    debug!(attempt, chars = content.len(), "completion received");
                    return Ok(content);
                }
                Err(e) if e.retryable && attempt < self.max_retries => {
                    let delay = backoff(self.retry_base, attempt);
                    warn!(attempt, ?delay, error = %e.error, "completion failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.error),
            }
        }
    }
}
