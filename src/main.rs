//! TodayEat backend server.

use std::error::Error;
use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use todayeat::adapters::ai::{ChatCompletionsClient, ChatCompletionsConfig};
use todayeat::adapters::catalog::{InMemoryCatalog, PostgresCatalog};
use todayeat::adapters::http::{api_router, ChatAppState, RecommendationAppState};
use todayeat::application::{
    RecommendDishHandler, RecommendationConfig, RelayChatHandler, RelayConfig,
};
use todayeat::config::{AppConfig, ConfigError};
use todayeat::ports::{CandidateCatalog, CompletionClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate().map_err(ConfigError::from)?;

    init_tracing(&config);

    let catalog = build_catalog(&config)?;
    let client = build_client(&config)?;

    let relay = RelayChatHandler::new(
        client.clone(),
        RelayConfig::default()
            .with_model(&config.ai.model)
            .with_system_prompt(&config.ai.chat_system_prompt)
            .with_temperature(Some(config.ai.chat_temperature))
            .with_idle_timeout(config.ai.stream_idle_timeout()),
    );
    let recommend = RecommendDishHandler::new(
        catalog,
        client,
        RecommendationConfig::default().with_model(&config.ai.model),
    );

    let router = api_router(
        ChatAppState::new(Arc::new(relay)),
        RecommendationAppState::new(Arc::new(recommend)),
        &config.server.cors_origins_list(),
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "todayeat server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("todayeat server stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` wins over config.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

fn build_catalog(config: &AppConfig) -> Result<Arc<dyn CandidateCatalog>, sqlx::Error> {
    match config.database.url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect_lazy(url)?;
            tracing::info!(max_connections = config.database.max_connections, "using PostgreSQL catalog");
            Ok(Arc::new(PostgresCatalog::new(pool)))
        }
        None => {
            tracing::warn!("no database configured; using an empty in-memory catalog");
            Ok(Arc::new(InMemoryCatalog::new()))
        }
    }
}

fn build_client(config: &AppConfig) -> Result<Arc<dyn CompletionClient>, Box<dyn Error>> {
    let api_key = config
        .ai
        .api_key
        .as_ref()
        .map(|k| k.expose_secret().clone())
        .unwrap_or_default();

    let client = ChatCompletionsClient::new(
        ChatCompletionsConfig::new(api_key)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout()),
    )?;
    Ok(Arc::new(client))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
