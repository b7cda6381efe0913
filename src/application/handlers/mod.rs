//! Application handlers.
//!
//! Handlers that orchestrate domain operations over the ports.

mod recommend_dish;
mod relay_chat;

pub use recommend_dish::{RecommendDishHandler, RecommendError, RecommendationConfig};
pub use relay_chat::{RelayChatHandler, RelayConfig, RelayOutcome, UPSTREAM_FAILURE_PREFIX};
