//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `TODAYEAT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use todayeat::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}:{}", config.server.host, config.server.port);
//! ```

mod ai;
mod database;
mod error;
mod server;

pub use ai::AiConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging, CORS)
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion API configuration (DeepSeek by default)
    #[serde(default)]
    pub ai: AiConfig,

    /// Catalog database configuration (PostgreSQL, optional)
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `TODAYEAT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `TODAYEAT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `TODAYEAT__AI__API_KEY=...` -> `ai.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TODAYEAT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.database.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("TODAYEAT__AI__API_KEY", "sk-test");
    }

    fn clear_env() {
        for key in [
            "TODAYEAT__AI__API_KEY",
            "TODAYEAT__AI__MODEL",
            "TODAYEAT__AI__STREAM_IDLE_TIMEOUT_SECS",
            "TODAYEAT__SERVER__PORT",
            "TODAYEAT__SERVER__ENVIRONMENT",
            "TODAYEAT__DATABASE__URL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(
            config.ai.api_key.as_ref().map(|k| k.expose_secret().as_str()),
            Some("sk-test")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.ai.model, "deepseek-chat");
        assert!(!config.database.is_configured());
    }

    #[test]
    fn test_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("TODAYEAT__SERVER__PORT", "3000");
        env::set_var("TODAYEAT__SERVER__ENVIRONMENT", "production");
        env::set_var("TODAYEAT__AI__MODEL", "deepseek-reasoner");
        env::set_var("TODAYEAT__AI__STREAM_IDLE_TIMEOUT_SECS", "0");
        env::set_var("TODAYEAT__DATABASE__URL", "postgres://localhost/todayeat");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert_eq!(config.ai.model, "deepseek-reasoner");
        assert_eq!(config.ai.stream_idle_timeout(), None);
        assert!(config.database.is_configured());
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }
}
