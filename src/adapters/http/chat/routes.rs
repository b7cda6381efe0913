//! Axum router configuration for the chat relay.

use axum::{routing::get, Router};

use super::ws_handler::{chat_ws_handler, ChatAppState};

/// Create the chat router.
///
/// # Routes
/// - `GET /ws` - WebSocket upgrade; one request message, then streamed deltas
pub fn chat_routes() -> Router<ChatAppState> {
    Router::new().route("/ws", get(chat_ws_handler))
}
