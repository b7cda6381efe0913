//! HTTP adapter for the streaming chat relay.

pub mod dto;
pub mod routes;
pub mod ws_handler;

pub use dto::{ChatClientMessage, MALFORMED_NOTICE, RECEIVE_FAILED_NOTICE};
pub use routes::chat_routes;
pub use ws_handler::{chat_ws_handler, ChatAppState};
