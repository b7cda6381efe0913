//! Wire messages for the chat WebSocket.

use serde::Deserialize;

/// Sent when the first client message is not `{"message": "<non-empty>"}`.
pub const MALFORMED_NOTICE: &str = "格式错误";

/// Sent when reading the first client message fails.
pub const RECEIVE_FAILED_NOTICE: &str = "接收消息失败";

/// The single message a client sends after connecting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatClientMessage {
    pub message: String,
}

impl ChatClientMessage {
    /// Parses a client payload; `None` when it is not valid JSON or the message is empty.
    pub fn parse(payload: &str) -> Option<Self> {
        match serde_json::from_str::<ChatClientMessage>(payload) {
            Ok(parsed) if !parsed.message.is_empty() => Some(parsed),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "rejecting malformed chat message");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_message() {
        let parsed = ChatClientMessage::parse(r#"{"message":"今天吃什么"}"#).unwrap();
        assert_eq!(parsed.message, "今天吃什么");
    }

    #[test]
    fn ignores_unknown_fields() {
        assert!(ChatClientMessage::parse(r#"{"message":"hi","extra":1}"#).is_some());
    }

    #[test]
    fn rejects_bad_payloads() {
        for payload in ["", "hello", "{}", r#"{"message":""}"#, r#"{"message":3}"#, "[]"] {
            assert!(ChatClientMessage::parse(payload).is_none(), "payload: {payload}");
        }
    }

    #[test]
    fn whitespace_message_is_accepted() {
        assert!(ChatClientMessage::parse(r#"{"message":" "}"#).is_some());
    }
}
