//! Mock Completion Client for testing.
//!
//! Scripted implementation of the `CompletionClient` port, so handlers can be
//! exercised without an upstream.
//!
//! # Features
//!
//! - Queued replies, consumed in order by either call mode
//! - Streams that end cleanly, fail mid-way, or stall forever
//! - Error injection
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let client = MockCompletionClient::new()
//!     .with_stream(["你好", "，来碗面"])
//!     .with_reply("推荐：牛肉面\n理由：暖胃");
//! ```

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::chat::ChatDelta;
use crate::ports::{ChatCompletion, ChatRequest, CompletionClient, CompletionError, DeltaStream};

/// A scripted outcome for one call.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Single-shot envelope. Streamed as one delta per non-empty line.
    Complete(ChatCompletion),
    /// Stream items, yielded in order before the stream ends.
    Stream(Vec<Result<ChatDelta, CompletionError>>),
    /// Stream that yields the deltas and then never ends.
    StalledStream(Vec<ChatDelta>),
    /// Fail the call before anything is produced.
    Error(CompletionError),
}

/// Mock completion client.
#[derive(Debug, Clone, Default)]
pub struct MockCompletionClient {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Simulated latency per call.
    delay: Duration,
    calls: Arc<Mutex<Vec<ChatRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a single-shot reply with `content`.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        self.with_response(MockResponse::Complete(ChatCompletion::with_content(content)))
    }

    /// Queues a stream that yields `deltas` and ends.
    pub fn with_stream<I, S>(self, deltas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = deltas.into_iter().map(|d| Ok(ChatDelta::new(d))).collect();
        self.with_response(MockResponse::Stream(items))
    }

    /// Queues an error.
    pub fn with_error(self, error: CompletionError) -> Self {
        self.with_response(MockResponse::Error(error))
    }

    /// Queues an arbitrary response.
    pub fn with_response(self, response: MockResponse) -> Self {
        lock(&self.responses).push_back(response);
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded requests.
    pub fn get_calls(&self) -> Vec<ChatRequest> {
        lock(&self.calls).clone()
    }

    async fn begin_call(&self, request: ChatRequest) -> MockResponse {
        lock(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Complete(ChatCompletion::with_content("Mock response")))
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn stream_chat(&self, request: ChatRequest) -> Result<DeltaStream, CompletionError> {
        match self.begin_call(request).await {
            MockResponse::Complete(completion) => {
                let lines: Vec<Result<ChatDelta, CompletionError>> = completion
                    .first_content()
                    .unwrap_or_default()
                    .lines()
                    .filter(|line| !line.is_empty())
                    .map(|line| Ok(ChatDelta::new(line)))
                    .collect();
                Ok(Box::pin(stream::iter(lines)))
            }
            MockResponse::Stream(items) => Ok(Box::pin(stream::iter(items))),
            MockResponse::StalledStream(deltas) => {
                let head = stream::iter(deltas.into_iter().map(Ok));
                Ok(Box::pin(head.chain(stream::pending())))
            }
            MockResponse::Error(err) => Err(err),
        }
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, CompletionError> {
        match self.begin_call(request).await {
            MockResponse::Complete(completion) => Ok(completion),
            MockResponse::Stream(items) => {
                let mut content = String::new();
                for item in items {
                    content.push_str(item?.as_str());
                }
                Ok(ChatCompletion::with_content(content))
            }
            MockResponse::StalledStream(_) => std::future::pending().await,
            MockResponse::Error(err) => Err(err),
        }
    }
}
