//! HTTP adapter for structured dish recommendations.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{CustomDishRequest, CustomDishResponse, DishResponse, ErrorResponse};
pub use handlers::{recommend_custom_dish, RecommendationAppState};
pub use routes::recommendation_routes;
