//! Catalog candidates.

use serde::{Deserialize, Serialize};

/// One catalog dish eligible for recommendation.
///
/// A per-request snapshot; the catalog owns the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub taste: String,
    pub score: f64,
    pub image_url: String,
}

/// Displayed price range, in whole yuan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

impl Candidate {
    /// Price range shown to clients: `floor(price * 0.9)` to `floor(price * 1.2)`.
    pub fn price_range(&self) -> PriceRange {
        PriceRange {
            min: (self.price * 0.9).floor() as i64,
            max: (self.price * 1.2).floor() as i64,
        }
    }
}
