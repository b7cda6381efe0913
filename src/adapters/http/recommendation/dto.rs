//! HTTP DTOs for recommendation endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::RecommendError;
use crate::domain::recommendation::{Recommendation, RecommendationRequest};
use crate::ports::CompletionError;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request for a custom recommendation. Missing fields default to zero or empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomDishRequest {
    pub user_id: i64,
    pub taste: String,
    pub distance: String,
    /// Budget in whole yuan.
    pub budget: i64,
    pub mood: String,
    pub weather: String,
}

impl From<CustomDishRequest> for RecommendationRequest {
    fn from(req: CustomDishRequest) -> Self {
        RecommendationRequest {
            user_id: req.user_id,
            taste: req.taste,
            mood: req.mood,
            weather: req.weather,
            budget: req.budget,
            distance: req.distance,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Successful recommendation: `{"code": 0, "dish": {...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct CustomDishResponse {
    pub code: u16,
    pub dish: DishResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishResponse {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub reason: String,
    pub price_min: i64,
    pub price_max: i64,
    pub liked: bool,
}

impl From<Recommendation> for CustomDishResponse {
    fn from(rec: Recommendation) -> Self {
        let range = rec.candidate.price_range();
        CustomDishResponse {
            code: 0,
            dish: DishResponse {
                id: rec.candidate.id,
                name: rec.candidate.name,
                image: rec.candidate.image_url,
                reason: rec.reason,
                price_min: range.min,
                price_max: range.max,
                liked: rec.liked,
            },
        }
    }
}

/// Failure: `{"code": n, "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl From<&RecommendError> for ErrorResponse {
    fn from(err: &RecommendError) -> Self {
        let message = match err {
            RecommendError::InputMalformed(_) => "请求参数错误".to_string(),
            RecommendError::CatalogUnavailable(_) => "数据库查询失败".to_string(),
            RecommendError::Upstream(CompletionError::Status { status, .. }) => {
                format!("AI 接口返回错误状态 {}", status)
            }
            RecommendError::Upstream(e) => format!("AI 调用失败: {}", e),
            RecommendError::MalformedUpstreamResponse(_) => "AI 响应解析失败".to_string(),
            RecommendError::EmptySelection => "AI输出中未提取到推荐菜名".to_string(),
            RecommendError::SelectionNotFound { name } => {
                format!("未在数据库中找到推荐菜品：{}", name)
            }
        };
        ErrorResponse {
            code: err.code(),
            message,
        }
    }
}
