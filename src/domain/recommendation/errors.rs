//! Resolver failures.

use thiserror::Error;

/// The model reply could not be grounded to a candidate.
///
/// These are business-level outcomes, distinct from transport failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no recommended dish name found in the model reply")]
    EmptySelection,

    #[error("recommended dish not found among candidates: {name}")]
    SelectionNotFound { name: String },
}
