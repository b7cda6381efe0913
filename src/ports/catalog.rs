//! Candidate Catalog Port - Read access to the dish catalog.
//!
//! The catalog is an external collaborator; the recommendation core only lists
//! candidates and asks whether a user has liked a dish.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recommendation::Candidate;

/// Port for reading catalog candidates.
#[async_trait]
pub trait CandidateCatalog: Send + Sync {
    /// Lists every candidate, in catalog order.
    async fn list_candidates(&self) -> Result<Vec<Candidate>, CatalogError>;

    /// Returns true if `user_id` has liked `dish_id`.
    async fn is_liked(&self, user_id: i64, dish_id: i64) -> Result<bool, CatalogError>;
}

/// Catalog errors.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}
