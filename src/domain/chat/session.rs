//! Relay session lifecycle.
//!
//! A relay session is bound to one upgraded client connection and moves through
//! `AwaitingRequest -> Streaming -> Closed`. Nothing about a session is persisted.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Why a relay session was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// The upstream stream ended (sentinel or end of input).
    Completed,
    /// The upstream request failed or the stream broke mid-way.
    UpstreamFailed,
    /// Writing to the client failed; no further writes were attempted.
    ClientGone,
    /// The initial client message was rejected before streaming began.
    Rejected,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CloseReason::Completed => "completed",
            CloseReason::UpstreamFailed => "upstream_failed",
            CloseReason::ClientGone => "client_gone",
            CloseReason::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// State of a relay session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    /// Connection upgraded, waiting for the single client request.
    AwaitingRequest,
    /// Upstream deltas are being forwarded.
    Streaming,
    /// Terminal.
    Closed(CloseReason),
}

impl RelayState {
    /// Returns true if moving from `self` to `target` is allowed.
    pub fn can_transition_to(&self, target: &RelayState) -> bool {
        use RelayState::*;
        matches!(
            (self, target),
            (AwaitingRequest, Streaming)
                | (AwaitingRequest, Closed(CloseReason::Rejected))
                | (AwaitingRequest, Closed(CloseReason::ClientGone))
                | (Streaming, Closed(CloseReason::Completed))
                | (Streaming, Closed(CloseReason::UpstreamFailed))
                | (Streaming, Closed(CloseReason::ClientGone))
        )
    }

    /// Returns true for the closed state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RelayState::Closed(_))
    }
}

/// Invalid use of a relay session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot transition relay session from {from:?} to {to:?}")]
    InvalidTransition { from: RelayState, to: RelayState },

    #[error("deltas can only be recorded while streaming (state: {0:?})")]
    NotStreaming(RelayState),
}

/// One relay session.
#[derive(Debug, Clone)]
pub struct RelaySession {
    id: Uuid,
    state: RelayState,
    deltas_forwarded: usize,
}

impl RelaySession {
    /// Creates a session awaiting its request.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: RelayState::AwaitingRequest,
            deltas_forwarded: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn deltas_forwarded(&self) -> usize {
        self.deltas_forwarded
    }

    /// Returns the close reason once the session is closed.
    pub fn close_reason(&self) -> Option<CloseReason> {
        match self.state {
            RelayState::Closed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Enters `Streaming` after the client request was accepted.
    pub fn begin_streaming(&mut self) -> Result<(), SessionError> {
        self.transition(RelayState::Streaming)
    }

    /// Counts one delta forwarded to the client.
    pub fn record_delta(&mut self) -> Result<(), SessionError> {
        if self.state != RelayState::Streaming {
            return Err(SessionError::NotStreaming(self.state));
        }
        self.deltas_forwarded += 1;
        Ok(())
    }

    /// Closes the session.
    pub fn close(&mut self, reason: CloseReason) -> Result<(), SessionError> {
        self.transition(RelayState::Closed(reason))
    }

    fn transition(&mut self, target: RelayState) -> Result<(), SessionError> {
        if !self.state.can_transition_to(&target) {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to: target,
            });
        }
        self.state = target;
        Ok(())
    }
}

impl Default for RelaySession {
    fn default() -> Self {
        Self::new()
    }
}
