//! Incremental text fragments of a streamed model reply.

use std::fmt;

/// One incremental fragment of model-generated text.
///
/// Deltas are ordered and append-only within a relay session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatDelta(String);

impl ChatDelta {
    /// Creates a delta from its text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the delta text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the delta and returns its text.
    pub fn into_text(self) -> String {
        self.0
    }
}

impl fmt::Display for ChatDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
