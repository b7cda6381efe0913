//! HTTP adapters - REST and WebSocket endpoints.
//!
//! Each feature has its own HTTP adapter; `api_router` mounts them under `/api`.

pub mod chat;
pub mod recommendation;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use chat::{chat_routes, ChatAppState};
pub use recommendation::{recommendation_routes, RecommendationAppState};

/// Builds the full API router.
///
/// # Routes
/// - `GET /api/chat/ws` - Streaming chat relay
/// - `POST /api/dish/custom` - Structured recommendation
pub fn api_router(
    chat: ChatAppState,
    recommendation: RecommendationAppState,
    cors_origins: &[String],
) -> Router {
    Router::new()
        .nest("/api/chat", chat_routes().with_state(chat))
        .nest("/api/dish", recommendation_routes().with_state(recommendation))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}

/// Permissive when no origins are configured; unparsable origins are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockCompletionClient;
    use crate::adapters::catalog::InMemoryCatalog;
    use crate::application::handlers::{
        RecommendDishHandler, RecommendationConfig, RelayChatHandler, RelayConfig,
    };
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router(origins: &[String]) -> Router {
        let client = Arc::new(MockCompletionClient::new());
        let relay = RelayChatHandler::new(client.clone(), RelayConfig::default());
        let recommend = RecommendDishHandler::new(
            Arc::new(InMemoryCatalog::new()),
            client,
            RecommendationConfig::default(),
        );
        api_router(
            ChatAppState::new(Arc::new(relay)),
            RecommendationAppState::new(Arc::new(recommend)),
            origins,
        )
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = router(&[])
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn ws_route_requires_upgrade() {
        let response = router(&[])
            .oneshot(Request::builder().uri("/api/chat/ws").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.status().is_client_error());
        assert_ne!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn configured_origin_is_allowed() {
        let origins = vec!["https://todayeat.example".to_string()];
        let response = router(&origins)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/dish/custom")
                    .header("origin", "https://todayeat.example")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://todayeat.example"
        );
    }
}
