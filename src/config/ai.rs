//! Upstream AI provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upstream chat-completion configuration
///
/// The API key is optional on purpose: the server starts without it and the
/// relay reports the missing credential on each request.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<Secret<String>>,

    /// Chat model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL, without the `/chat/completions` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional client-side request timeout in seconds; unset or 0 waits
    /// for the upstream indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Maximum tokens per reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl AiConfig {
    /// Get timeout as Duration, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Returns the API key if one is set and non-empty
    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
            .filter(|k| !k.trim().is_empty())
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.api_key().is_some()
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidMaxTokens);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_temperature() -> f32 {
    0.7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.max_tokens, 1500);
        assert_eq!(config.temperature, 0.7);
        assert!(!config.has_openai());
    }

    #[test]
    fn test_no_timeout_by_default() {
        let config = AiConfig::default();
        assert_eq!(config.timeout_secs, None);
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: Some(30),
            ..Default::default()
        };
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let config = AiConfig {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(config.timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = AiConfig {
            openai_api_key: Some(Secret::new("   ".to_string())),
            ..Default::default()
        };
        assert!(!config.has_openai());
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_key_is_exposed_only_through_accessor() {
        let config = AiConfig {
            openai_api_key: Some(Secret::new("sk-test".to_string())),
            ..Default::default()
        };
        assert_eq!(config.api_key(), Some("sk-test"));
        assert!(!format!("{:?}", config).contains("sk-test"));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let bad_url = AiConfig {
            base_url: "api.openai.com".to_string(),
            ..Default::default()
        };
        assert_eq!(bad_url.validate(), Err(ValidationError::InvalidBaseUrl));

        let hot = AiConfig {
            temperature: 2.5,
            ..Default::default()
        };
        assert_eq!(hot.validate(), Err(ValidationError::InvalidTemperature));

        let no_tokens = AiConfig {
            max_tokens: 0,
            ..Default::default()
        };
        assert_eq!(no_tokens.validate(), Err(ValidationError::InvalidMaxTokens));
    }

    #[test]
    fn test_validation_does_not_require_key() {
        assert!(AiConfig::default().validate().is_ok());
    }
}
