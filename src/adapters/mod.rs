//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Upstream chat completion clients
//! - `catalog` - Candidate catalog storage
//! - `http` - Axum routes for the chat relay and recommendations

pub mod ai;
pub mod catalog;
pub mod http;
