//! WebSocket handler for the streaming chat relay.
//!
//! # Connection Flow
//! 1. Client requests a WebSocket upgrade; every origin is accepted
//! 2. Client sends one data frame `{"message": "..."}` (text, or UTF-8 binary)
//! 3. Server streams one text frame per upstream delta
//! 4. On upstream failure, server sends one `AI 调用失败: ...` frame
//! 5. Server sends a close frame
//!
//! A malformed first message gets `格式错误`, a failed read gets `接收消息失败`.
//! A client that closes before sending anything is closed silently.

use std::fmt::Display;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::future::ready;
use futures::{Sink, SinkExt, Stream, StreamExt};

use crate::application::handlers::RelayChatHandler;
use crate::domain::chat::{CloseReason, RelaySession};

use super::dto::{ChatClientMessage, MALFORMED_NOTICE, RECEIVE_FAILED_NOTICE};

// ════════════════════════════════════════════════════════════════════════════════
// WebSocket State
// ════════════════════════════════════════════════════════════════════════════════

/// State required for chat WebSocket handling.
#[derive(Clone)]
pub struct ChatAppState {
    pub relay_handler: Arc<RelayChatHandler>,
}

impl ChatAppState {
    pub fn new(relay_handler: Arc<RelayChatHandler>) -> Self {
        Self { relay_handler }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// WebSocket Upgrade Handler
// ════════════════════════════════════════════════════════════════════════════════

/// Handle WebSocket upgrade for chat streaming.
///
/// Route: `GET /api/chat/ws`
pub async fn chat_ws_handler(ws: WebSocketUpgrade, State(state): State<ChatAppState>) -> Response {
    ws.on_upgrade(move |socket| handle_chat_socket(socket, state))
}

async fn handle_chat_socket(socket: WebSocket, state: ChatAppState) {
    let (mut sender, mut receiver) = socket.split();
    serve_connection(&state.relay_handler, &mut sender, &mut receiver).await;
}

// ════════════════════════════════════════════════════════════════════════════════
// Connection Handling
// ════════════════════════════════════════════════════════════════════════════════

/// First data frame read from the client.
#[derive(Debug)]
enum Inbound {
    Payload(String),
    NotUtf8,
    Closed,
    Failed(String),
}

/// Runs one relay session over an established connection.
async fn serve_connection<Tx, Rx, E>(
    handler: &RelayChatHandler,
    sender: &mut Tx,
    receiver: &mut Rx,
) -> CloseReason
where
    Tx: Sink<Message> + Unpin,
    Tx::Error: Display,
    Rx: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let mut session = RelaySession::new();
    let session_id = session.id();
    tracing::info!(%session_id, "chat WebSocket connection established");

    let rejection = match read_first_message(receiver).await {
        Inbound::Payload(payload) => match ChatClientMessage::parse(&payload) {
            Some(request) => {
                let mut sink = (&mut *sender)
                    .with(|text: String| ready(Ok::<Message, Tx::Error>(Message::Text(text))));
                let outcome = handler.relay(session, &request.message, &mut sink).await;
                drop(sink);
                close_connection(sender).await;
                return outcome.close_reason;
            }
            None => MALFORMED_NOTICE,
        },
        Inbound::NotUtf8 => MALFORMED_NOTICE,
        Inbound::Failed(e) => {
            tracing::warn!(%session_id, error = %e, "failed to receive chat message");
            RECEIVE_FAILED_NOTICE
        }
        Inbound::Closed => {
            tracing::debug!(%session_id, "client closed before sending a message");
            close_session(&mut session, CloseReason::ClientGone);
            return CloseReason::ClientGone;
        }
    };

    if let Err(e) = sender.send(Message::Text(rejection.to_string())).await {
        tracing::debug!(%session_id, error = %e, "could not deliver rejection notice");
    }
    close_session(&mut session, CloseReason::Rejected);
    close_connection(sender).await;
    tracing::info!(%session_id, notice = rejection, "chat request rejected");
    CloseReason::Rejected
}

/// Reads until the first data frame, skipping control frames.
async fn read_first_message<Rx, E>(receiver: &mut Rx) -> Inbound
where
    Rx: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => return Inbound::Payload(text),
            Ok(Message::Binary(bytes)) => {
                return match String::from_utf8(bytes) {
                    Ok(text) => Inbound::Payload(text),
                    Err(_) => Inbound::NotUtf8,
                };
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
            Ok(Message::Close(_)) => return Inbound::Closed,
            Err(e) => return Inbound::Failed(e.to_string()),
        }
    }
    Inbound::Closed
}

fn close_session(session: &mut RelaySession, reason: CloseReason) {
    if let Err(e) = session.close(reason) {
        tracing::warn!(session_id = %session.id(), error = %e, "unexpected relay session state");
    }
}

async fn close_connection<Tx>(sender: &mut Tx)
where
    Tx: Sink<Message> + Unpin,
    Tx::Error: Display,
{
    if let Err(e) = sender.send(Message::Close(None)).await {
        tracing::debug!(error = %e, "close frame not delivered");
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
