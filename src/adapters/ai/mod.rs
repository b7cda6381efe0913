//! Completion Client Adapters.
//!
//! Implementations of the `CompletionClient` port.
//!
//! ## Available Adapters
//!
//! - `ChatCompletionsClient` - OpenAI-compatible HTTP API (DeepSeek by default)
//! - `MockCompletionClient` - Scripted mock for testing

mod chat_completions;
mod event_stream;
mod mock_client;

pub use chat_completions::{ChatCompletionsClient, ChatCompletionsConfig};
pub use event_stream::{decode_event_stream, decode_line, LineOutcome, SkipReason};
pub use mock_client::{MockCompletionClient, MockResponse};
