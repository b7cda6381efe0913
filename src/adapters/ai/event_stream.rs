//! Event-stream decoder for streaming chat completions.
//!
//! The upstream frames its reply as `\n`-terminated lines. Lines starting with
//! `data: ` carry one JSON chunk; a payload containing `[DONE]` ends the stream.
//! Everything else is ignored.
//!
//! Decoding is lenient: a line with the wrong prefix, invalid JSON or no
//! `choices[0].delta.content` is skipped and decoding carries on. Running out of
//! input without a sentinel is a normal end; an unterminated fragment left at
//! that point is not a line and is discarded.

use bytes::{Bytes, BytesMut};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use std::fmt::Display;
use std::pin::Pin;

use crate::domain::chat::ChatDelta;
use crate::ports::CompletionError;

/// Prefix of lines that carry a JSON payload.
pub const DATA_PREFIX: &str = "data: ";

/// Marker that ends the logical stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Classification of one decoded line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Delta(ChatDelta),
    Done,
    Skip(SkipReason),
}

/// Why a line produced no delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotData,
    InvalidUtf8,
    InvalidJson,
    NoContent,
}

// ----- Chunk schema -----

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Option<StreamDelta>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

impl StreamChunk {
    fn into_content(self) -> Option<String> {
        self.choices.into_iter().next()?.delta?.content
    }
}

/// Classifies one line (without its line terminator).
pub fn decode_line(line: &str) -> LineOutcome {
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return LineOutcome::Skip(SkipReason::NotData);
    };

    if payload.contains(DONE_SENTINEL) {
        return LineOutcome::Done;
    }

    let chunk: StreamChunk = match serde_json::from_str(payload) {
        Ok(chunk) => chunk,
        Err(_) => return LineOutcome::Skip(SkipReason::InvalidJson),
    };

    match chunk.into_content() {
        Some(content) => LineOutcome::Delta(ChatDelta::new(content)),
        None => LineOutcome::Skip(SkipReason::NoContent),
    }
}

fn decode_line_bytes(mut line: &[u8]) -> LineOutcome {
    if let Some(stripped) = line.strip_suffix(b"\n") {
        line = stripped;
    }
    if let Some(stripped) = line.strip_suffix(b"\r") {
        line = stripped;
    }
    match std::str::from_utf8(line) {
        Ok(line) => decode_line(line),
        Err(_) => LineOutcome::Skip(SkipReason::InvalidUtf8),
    }
}

struct DecoderState<S> {
    bytes: Pin<Box<S>>,
    buffer: BytesMut,
    finished: bool,
}

/// Turns a raw byte stream into an ordered, lazy stream of deltas.
///
/// Only the current partial line is buffered. A read error yields one
/// `CompletionError::Transport` and ends the stream.
pub fn decode_event_stream<S, E>(
    bytes: S,
) -> impl Stream<Item = Result<ChatDelta, CompletionError>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = DecoderState {
        bytes: Box::pin(bytes),
        buffer: BytesMut::with_capacity(4096),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if state.finished {
                return None;
            }

            if let Some(pos) = state.buffer.iter().position(|&b| b == b'\n') {
                let line = state.buffer.split_to(pos + 1);
                match decode_line_bytes(&line) {
                    LineOutcome::Delta(delta) => return Some((Ok(delta), state)),
                    LineOutcome::Done => {
                        tracing::debug!(sentinel_seen = true, "upstream stream finished");
                        return None;
                    }
                    LineOutcome::Skip(reason) => {
                        tracing::trace!(?reason, "skipping event-stream line");
                        continue;
                    }
                }
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => state.buffer.extend_from_slice(&chunk),
                Some(Err(e)) => {
                    state.finished = true;
                    let err = CompletionError::transport(format!("stream read failed: {}", e));
                    return Some((Err(err), state));
                }
                None => {
                    if !state.buffer.is_empty() {
                        tracing::debug!(
                            bytes = state.buffer.len(),
                            "discarding unterminated trailing fragment"
                        );
                    }
                    tracing::debug!(sentinel_seen = false, "upstream stream ended without sentinel");
                    return None;
                }
            }
        }
    })
}
