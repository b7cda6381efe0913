//! Completion Client Port - Interface for the upstream chat completion API.
//!
//! The upstream speaks the OpenAI-compatible chat completions protocol. Two modes
//! are exposed:
//!
//! - `stream_chat` returns a lazy stream of text deltas, decoded as bytes arrive.
//!   Dropping the stream cancels the upstream request.
//! - `complete` issues a single-shot request and returns the typed response envelope.
//!
//! Neither mode retries; every failure is reported to the caller as-is.

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::domain::chat::ChatDelta;

/// Lazy, ordered stream of deltas from one streaming completion.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<ChatDelta, CompletionError>> + Send>>;

/// Port for upstream completion calls.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Starts a streaming completion.
    ///
    /// Fails before yielding anything if the request cannot be sent or the
    /// upstream answers with a non-success status.
    async fn stream_chat(&self, request: ChatRequest) -> Result<DeltaStream, CompletionError>;

    /// Issues a single-shot (non-streaming) completion.
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, CompletionError>;
}

/// Request for a chat completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Model identifier sent upstream.
    pub model: String,
    pub messages: Vec<Message>,
    /// Sampling temperature; omitted from the wire request when `None`.
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Creates an empty request for `model`.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
        }
    }

    /// Adds a message to the conversation.
    pub fn with_message(mut self, role: MessageRole, content: impl Into<String>) -> Self {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Single-shot response envelope: `{"choices":[{"message":{"content":...}}]}`.
///
/// Every level is optional so that a missing field is an explicit `None`
/// rather than a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub message: Option<CompletionMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    /// Builds an envelope holding one choice with `content`.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            choices: vec![CompletionChoice {
                message: Some(CompletionMessage {
                    content: Some(content.into()),
                }),
            }],
        }
    }

    /// Content of the first choice's message, if present.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
    }
}

/// Upstream completion errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    /// Network failure reaching or reading from the upstream.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request exceeded its time budget.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The upstream answered with a non-success status.
    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The upstream body did not decode into the expected envelope.
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
}

impl CompletionError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a malformed response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }
}
