//! In-memory candidate catalog.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::domain::recommendation::Candidate;
use crate::ports::{CandidateCatalog, CatalogError};

/// Catalog backed by a fixed list of candidates and likes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    candidates: Vec<Candidate>,
    likes: HashSet<(i64, i64)>,
    unavailable: Option<String>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a candidate; listing preserves insertion order.
    pub fn with_candidate(mut self, candidate: Candidate) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// Records that `user_id` liked `dish_id`.
    pub fn with_like(mut self, user_id: i64, dish_id: i64) -> Self {
        self.likes.insert((user_id, dish_id));
        self
    }

    /// Makes every call fail with `CatalogError::Unavailable`.
    pub fn unavailable(mut self, reason: impl Into<String>) -> Self {
        self.unavailable = Some(reason.into());
        self
    }

    fn check_available(&self) -> Result<(), CatalogError> {
        match &self.unavailable {
            Some(reason) => Err(CatalogError::unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CandidateCatalog for InMemoryCatalog {
    async fn list_candidates(&self) -> Result<Vec<Candidate>, CatalogError> {
        self.check_available()?;
        Ok(self.candidates.clone())
    }

    async fn is_liked(&self, user_id: i64, dish_id: i64) -> Result<bool, CatalogError> {
        self.check_available()?;
        Ok(self.likes.contains(&(user_id, dish_id)))
    }
}
