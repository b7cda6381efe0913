//! Domain layer - Pure types and rules with no I/O.
//!
//! - `chat` - Streamed chat deltas and the relay session lifecycle
//! - `recommendation` - Candidates, requests, prompt rendering and reply resolution

pub mod chat;
pub mod recommendation;
