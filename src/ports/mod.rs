//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! - `CompletionClient` - Upstream chat completion API (streaming and single-shot)
//! - `CandidateCatalog` - Read access to the dish catalog

mod catalog;
mod completion_client;

pub use catalog::{CandidateCatalog, CatalogError};
pub use completion_client::{
    ChatCompletion, ChatRequest, CompletionChoice, CompletionClient, CompletionError,
    CompletionMessage, DeltaStream, Message, MessageRole,
};
