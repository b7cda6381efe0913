//! Axum router configuration for recommendation endpoints.

use axum::{routing::post, Router};

use super::handlers::{recommend_custom_dish, RecommendationAppState};

/// Create the recommendation router.
///
/// # Routes
/// - `POST /custom` - Recommend one catalog dish for the given constraints
pub fn recommendation_routes() -> Router<RecommendationAppState> {
    Router::new().route("/custom", post(recommend_custom_dish))
}
