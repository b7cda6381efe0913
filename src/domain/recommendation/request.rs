//! Recommendation inputs and outputs.

use super::Candidate;

/// Constraints for one structured recommendation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationRequest {
    /// Requester identity; used for the liked lookup and tracing only.
    pub user_id: i64,
    pub taste: String,
    pub mood: String,
    pub weather: String,
    /// Budget in whole yuan.
    pub budget: i64,
    /// Accepted for API compatibility; not part of the prompt.
    pub distance: String,
}

/// A grounded recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// Exact member of the candidate set the prompt was built from.
    pub candidate: Candidate,
    pub reason: String,
    pub liked: bool,
}
