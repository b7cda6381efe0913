//! Chat relay domain types.

mod delta;
mod session;

pub use delta::ChatDelta;
pub use session::{CloseReason, RelaySession, RelayState, SessionError};
