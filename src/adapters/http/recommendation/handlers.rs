//! HTTP handlers for recommendation endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::handlers::{RecommendDishHandler, RecommendError};

use super::dto::{CustomDishRequest, CustomDishResponse, ErrorResponse};

/// Shared state for recommendation endpoints.
#[derive(Clone)]
pub struct RecommendationAppState {
    pub recommend_handler: Arc<RecommendDishHandler>,
}

impl RecommendationAppState {
    pub fn new(recommend_handler: Arc<RecommendDishHandler>) -> Self {
        Self { recommend_handler }
    }
}

/// POST /api/dish/custom - Recommend one dish for the given constraints.
pub async fn recommend_custom_dish(
    State(state): State<RecommendationAppState>,
    payload: Result<Json<CustomDishRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "rejecting recommendation request");
            return error_response(RecommendError::InputMalformed(rejection.body_text()));
        }
    };

    match state.recommend_handler.handle(request.into()).await {
        Ok(recommendation) => {
            (StatusCode::OK, Json(CustomDishResponse::from(recommendation))).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: RecommendError) -> Response {
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(&err))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockCompletionClient;
    use crate::adapters::catalog::InMemoryCatalog;
    use crate::adapters::http::recommendation::recommendation_routes;
    use crate::application::handlers::RecommendationConfig;
    use crate::domain::recommendation::Candidate;
    use axum::body::Body;
    use axum::http::Request;
    use axum::Router;
    use tower::ServiceExt;

    fn app(catalog: InMemoryCatalog, client: MockCompletionClient) -> Router {
        let handler =
            RecommendDishHandler::new(Arc::new(catalog), Arc::new(client), RecommendationConfig::default());
        recommendation_routes().with_state(RecommendationAppState::new(Arc::new(handler)))
    }

    fn noodles() -> Candidate {
        Candidate {
            id: 1,
            name: "热干面".to_string(),
            price: 10.0,
            description: "芝麻酱".to_string(),
            taste: "咸香".to_string(),
            score: 4.6,
            image_url: "/img/1.jpg".to_string(),
        }
    }

    async fn post(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/custom")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn returns_recommendation() {
        let app = app(
            InMemoryCatalog::new().with_candidate(noodles()),
            MockCompletionClient::new().with_reply("推荐：热干面\n理由：过早首选"),
        );

        let (status, body) = post(app, r#"{"user_id":1,"taste":"咸","budget":15}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 0);
        assert_eq!(body["dish"]["name"], "热干面");
        assert_eq!(body["dish"]["priceMin"], 9);
        assert_eq!(body["dish"]["priceMax"], 12);
        assert_eq!(body["dish"]["liked"], false);
    }

    #[tokio::test]
    async fn malformed_body_is_code_1() {
        let client = MockCompletionClient::new();
        let app = app(InMemoryCatalog::new(), client.clone());

        let (status, body) = post(app, "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 1);
        assert_eq!(body["message"], "请求参数错误");
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn wrong_field_type_is_code_1() {
        let app = app(InMemoryCatalog::new(), MockCompletionClient::new());
        let (status, body) = post(app, r#"{"budget":"cheap"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 1);
    }

    #[tokio::test]
    async fn catalog_outage_is_code_2() {
        let app = app(
            InMemoryCatalog::new().unavailable("down"),
            MockCompletionClient::new(),
        );
        let (status, body) = post(app, "{}").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], 2);
    }

    #[tokio::test]
    async fn unknown_dish_is_code_4() {
        let app = app(
            InMemoryCatalog::new().with_candidate(noodles()),
            MockCompletionClient::new().with_reply("推荐：小笼包"),
        );
        let (status, body) = post(app, "{}").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], 4);
        assert_eq!(body["message"], "未在数据库中找到推荐菜品：小笼包");
    }
}
