//! Streaming chat relay handler.
//!
//! Forwards one upstream streaming completion to one client, delta by delta.
//! Each delta is written as its own message in receipt order; nothing is batched
//! and upstream reads wait for the previous write to finish.

use futures::{Sink, SinkExt, StreamExt};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::chat::{CloseReason, RelaySession};
use crate::ports::{ChatRequest, CompletionClient, CompletionError, MessageRole};

/// Prefix of the single message sent when the upstream fails.
pub const UPSTREAM_FAILURE_PREFIX: &str = "AI 调用失败: ";

/// Configuration for the relay handler.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Model identifier sent upstream.
    pub model: String,
    /// System message preceding the user's message.
    pub system_prompt: String,
    pub temperature: Option<f32>,
    /// Longest wait for the upstream response headers and for each following
    /// delta; `None` waits forever.
    pub idle_timeout: Option<Duration>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            model: "deepseek-chat".to_string(),
            system_prompt: "你是一个美食推荐助手，根据用户描述推荐菜品。".to_string(),
            temperature: Some(0.7),
            idle_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl RelayConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }
}

/// Summary of a finished relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOutcome {
    pub session_id: Uuid,
    pub deltas_forwarded: usize,
    pub close_reason: CloseReason,
}

/// Handler relaying upstream deltas to a client sink.
pub struct RelayChatHandler {
    client: Arc<dyn CompletionClient>,
    config: RelayConfig,
}

impl RelayChatHandler {
    pub fn new(client: Arc<dyn CompletionClient>, config: RelayConfig) -> Self {
        Self { client, config }
    }

    /// Builds the streaming request for one user message.
    pub fn build_request(&self, message: &str) -> ChatRequest {
        let request = ChatRequest::new(&self.config.model)
            .with_message(MessageRole::System, &self.config.system_prompt)
            .with_message(MessageRole::User, message);

        match self.config.temperature {
            Some(temperature) => request.with_temperature(temperature),
            None => request,
        }
    }

    /// Relays the reply to `message` into `sink` until the upstream ends,
    /// fails, or the sink stops accepting messages.
    ///
    /// `session` must still be awaiting its request. The upstream stream is
    /// dropped before this returns on every path.
    pub async fn relay<S>(&self, mut session: RelaySession, message: &str, sink: &mut S) -> RelayOutcome
    where
        S: Sink<String> + Unpin,
        S::Error: Display,
    {
        let session_id = session.id();
        if let Err(e) = session.begin_streaming() {
            tracing::warn!(%session_id, error = %e, "relay started on a session that is not awaiting a request");
        }
        tracing::info!(%session_id, chars = message.chars().count(), "relay session started");

        let opened = match self.config.idle_timeout {
            Some(idle) => {
                match tokio::time::timeout(idle, self.client.stream_chat(self.build_request(message)))
                    .await
                {
                    Ok(opened) => opened,
                    Err(_) => Err(idle_error(idle)),
                }
            }
            None => self.client.stream_chat(self.build_request(message)).await,
        };

        let close_reason = match opened {
            Ok(mut stream) => loop {
                let next = match self.config.idle_timeout {
                    Some(idle) => match tokio::time::timeout(idle, stream.next()).await {
                        Ok(next) => next,
                        Err(_) => Some(Err(idle_error(idle))),
                    },
                    None => stream.next().await,
                };

                match next {
                    Some(Ok(delta)) => {
                        if let Err(e) = sink.send(delta.into_text()).await {
                            tracing::info!(%session_id, error = %e, "client went away mid-stream");
                            break CloseReason::ClientGone;
                        }
                        if let Err(e) = session.record_delta() {
                            tracing::warn!(%session_id, error = %e, "delta recorded outside streaming");
                        }
                    }
                    Some(Err(e)) => {
                        self.report_failure(session_id, &e, sink).await;
                        break CloseReason::UpstreamFailed;
                    }
                    None => break CloseReason::Completed,
                }
            },
            Err(e) => {
                self.report_failure(session_id, &e, sink).await;
                CloseReason::UpstreamFailed
            }
        };

        if let Err(e) = session.close(close_reason) {
            tracing::warn!(%session_id, error = %e, "relay session closed twice");
        }
        tracing::info!(
            %session_id,
            deltas = session.deltas_forwarded(),
            reason = %close_reason,
            "relay session closed"
        );

        RelayOutcome {
            session_id,
            deltas_forwarded: session.deltas_forwarded(),
            close_reason,
        }
    }

    async fn report_failure<S>(&self, session_id: Uuid, error: &CompletionError, sink: &mut S)
    where
        S: Sink<String> + Unpin,
        S::Error: Display,
    {
        tracing::warn!(%session_id, error = %error, "upstream completion failed");
        let notice = failure_notice(error);
        if let Err(e) = sink.send(notice).await {
            tracing::debug!(%session_id, error = %e, "could not deliver failure notice");
        }
    }
}

fn idle_error(idle: Duration) -> CompletionError {
    CompletionError::transport(format!("upstream stream idle for {}s", idle.as_secs()))
}

/// Client-facing failure text. Upstream response bodies stay in the logs.
fn failure_notice(error: &CompletionError) -> String {
    match error {
        CompletionError::Status { status, .. } => {
            format!("{}upstream returned status {}", UPSTREAM_FAILURE_PREFIX, status)
        }
        other => format!("{}{}", UPSTREAM_FAILURE_PREFIX, other),
    }
}
