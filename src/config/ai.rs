//! Upstream completion API configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Completion API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key sent as a bearer token
    pub api_key: Option<Secret<String>>,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// System message for the streaming chat relay
    #[serde(default = "default_chat_system_prompt")]
    pub chat_system_prompt: String,

    /// Sampling temperature for the streaming chat relay
    #[serde(default = "default_chat_temperature")]
    pub chat_temperature: f32,

    /// Single-shot request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Longest wait for the next streamed delta, in seconds (0 disables)
    #[serde(default = "default_stream_idle_timeout")]
    pub stream_idle_timeout_secs: u64,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the stream idle timeout; `None` when disabled
    pub fn stream_idle_timeout(&self) -> Option<Duration> {
        match self.stream_idle_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("TODAYEAT__AI__API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if !(0.0..=2.0).contains(&self.chat_temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            chat_system_prompt: default_chat_system_prompt(),
            chat_temperature: default_chat_temperature(),
            timeout_secs: default_timeout(),
            stream_idle_timeout_secs: default_stream_idle_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_chat_system_prompt() -> String {
    "你是一个美食推荐助手，根据用户描述推荐菜品。".to_string()
}

fn default_chat_temperature() -> f32 {
    0.7
}

fn default_timeout() -> u64 {
    20
}

fn default_stream_idle_timeout() -> u64 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> AiConfig {
        AiConfig {
            api_key: Some(Secret::new("sk-xxx".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.base_url, "https://api.deepseek.com/v1");
        assert_eq!(config.model, "deepseek-chat");
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.stream_idle_timeout_secs, 120);
        assert!((config.chat_temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_durations() {
        let config = AiConfig {
            timeout_secs: 5,
            stream_idle_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.stream_idle_timeout(), None);
        assert_eq!(
            AiConfig::default().stream_idle_timeout(),
            Some(Duration::from_secs(120))
        );
    }

    #[test]
    fn test_validation_requires_key() {
        assert!(matches!(
            AiConfig::default().validate(),
            Err(ValidationError::MissingRequired(_))
        ));

        let empty = AiConfig {
            api_key: Some(Secret::new(String::new())),
            ..Default::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(with_key().validate().is_ok());
    }

    #[test]
    fn test_validation_base_url_scheme() {
        let config = AiConfig {
            base_url: "api.deepseek.com".to_string(),
            ..with_key()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidBaseUrl)));
    }

    #[test]
    fn test_validation_temperature_range() {
        let config = AiConfig {
            chat_temperature: 2.5,
            ..with_key()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTemperature)
        ));
    }

    #[test]
    fn test_validation_timeout() {
        let config = AiConfig {
            timeout_secs: 0,
            ..with_key()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidTimeout)));
    }

    #[test]
    fn test_debug_redacts_key() {
        assert!(!format!("{:?}", with_key()).contains("sk-xxx"));
    }
}
