//! Database configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL; the catalog is in-memory when unset
    pub url: Option<String>,

    /// Maximum connections allowed
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Check if a database is configured
    pub fn is_configured(&self) -> bool {
        self.url.as_ref().is_some_and(|u| !u.is_empty())
    }

    /// Validate database configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(ValidationError::InvalidDatabaseUrl);
            }
        }
        if self.max_connections == 0 || self.max_connections > 100 {
            return Err(ValidationError::InvalidPoolSize);
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid_without_url() {
        let config = DatabaseConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.max_connections, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_valid_postgres_urls() {
        for url in ["postgres://u@localhost/db", "postgresql://u@localhost/db"] {
            let config = DatabaseConfig {
                url: Some(url.to_string()),
                ..Default::default()
            };
            assert!(config.is_configured());
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_invalid_url_scheme() {
        let config = DatabaseConfig {
            url: Some("mysql://root@localhost/todayeat".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidDatabaseUrl)
        ));
    }

    #[test]
    fn test_pool_size_bounds() {
        for max_connections in [0, 101] {
            let config = DatabaseConfig {
                max_connections,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(ValidationError::InvalidPoolSize)));
        }
    }
}
