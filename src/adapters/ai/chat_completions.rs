//! Chat Completions Client - `CompletionClient` for OpenAI-compatible APIs.
//!
//! Defaults target DeepSeek (`https://api.deepseek.com/v1`), which speaks the
//! OpenAI chat completions protocol.
//!
//! # Configuration
//!
//! ```ignore
//! let config = ChatCompletionsConfig::new(api_key)
//!     .with_base_url("https://api.deepseek.com/v1")
//!     .with_timeout(Duration::from_secs(20));
//!
//! let client = ChatCompletionsClient::new(config)?;
//! ```
//!
//! # Timeouts
//!
//! Single-shot requests carry `timeout` end to end. Streaming requests carry no
//! total timeout since a reply may legitimately stream for a long time; callers
//! bound stalls per read instead.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;

use super::event_stream::decode_event_stream;
use crate::ports::{
    ChatCompletion, ChatRequest, CompletionClient, CompletionError, DeltaStream, Message,
};

/// Configuration for the chat completions client.
#[derive(Debug, Clone)]
pub struct ChatCompletionsConfig {
    /// API key for bearer authentication.
    api_key: Secret<String>,
    /// Base URL of the API; `/chat/completions` is appended.
    pub base_url: String,
    /// Upper bound for single-shot requests.
    pub timeout: Duration,
}

impl ChatCompletionsConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://api.deepseek.com/v1".to_string(),
            timeout: Duration::from_secs(20),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the single-shot timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// HTTP client for the chat completions endpoint.
pub struct ChatCompletionsClient {
    config: ChatCompletionsConfig,
    client: Client,
}

impl ChatCompletionsClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: ChatCompletionsConfig) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .build()
            .map_err(|e| CompletionError::transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    async fn send(
        &self,
        request: &ChatRequest,
        stream: bool,
    ) -> Result<Response, CompletionError> {
        let body = WireRequest {
            model: &request.model,
            stream,
            messages: &request.messages,
            temperature: request.temperature,
        };

        tracing::debug!(
            model = %request.model,
            stream,
            messages = request.messages.len(),
            "sending chat completion request"
        );

        let mut builder = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(&body);
        if !stream {
            builder = builder.timeout(self.config.timeout);
        }

        let response = builder.send().await.map_err(|e| self.map_reqwest_error(e))?;
        Self::check_status(response).await
    }

    async fn check_status(response: Response) -> Result<Response, CompletionError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), body = %body, "chat completion request rejected");
        Err(CompletionError::Status {
            status: status.as_u16(),
            body,
        })
    }

    fn map_reqwest_error(&self, e: reqwest::Error) -> CompletionError {
        if e.is_timeout() {
            CompletionError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if e.is_connect() {
            CompletionError::transport(format!("connection failed: {}", e))
        } else {
            CompletionError::transport(e.to_string())
        }
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionsClient {
    async fn stream_chat(&self, request: ChatRequest) -> Result<DeltaStream, CompletionError> {
        let response = self.send(&request, true).await?;
        Ok(Box::pin(decode_event_stream(response.bytes_stream())))
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, CompletionError> {
        let response = self.send(&request, false).await?;
        let bytes = response.bytes().await.map_err(|e| self.map_reqwest_error(e))?;

        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(error = %e, "failed to decode chat completion envelope");
            CompletionError::malformed(e.to_string())
        })
    }
}

// ----- Wire Types -----

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}
