//! Platform configuration.
//!
//! Values come from the environment with the defaults below. CLI flags may
//! override individual fields after loading.

use std::time::Duration;

use thiserror::Error;

use crate::assistant::DEFAULT_GENERATION_TIMEOUT;
use crate::llm::{DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TTL_MS};

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

pub const DEFAULT_APP_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// PostgreSQL URL. Only the database-backed commands need it.
    pub database_url: Option<String>,
    /// Base URL for public portfolio links.
    pub app_url: String,

    // LLM settings
    pub api_base: String,
    pub api_key: Option<String>,
    pub default_model: String,
    /// Upper bound on a single completion call.
    pub generation_timeout: Duration,

    /// Default lifetime of AI cache entries in milliseconds.
    pub cache_ttl_ms: i64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            app_url: DEFAULT_APP_URL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            default_model: DEFAULT_MODEL.to_string(),
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
            cache_ttl_ms: DEFAULT_TTL_MS,
        }
    }
}

impl PlatformConfig {
    /// Load configuration from environment variables.
    ///
    /// - `DATABASE_URL`
    /// - `LAUNCHPAD_APP_URL` (default: http://localhost:3000)
    /// - `LITELLM_API_BASE` (default: https://api.openai.com/v1)
    /// - `LITELLM_API_KEY`
    /// - `LITELLM_DEFAULT_MODEL` (default: gpt-3.5-turbo)
    /// - `LAUNCHPAD_GENERATION_TIMEOUT_SECS` (default: 30)
    /// - `LAUNCHPAD_CACHE_TTL_MS` (default: 604800000, seven days)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed or the result
    /// fails [`PlatformConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PlatformConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        config.database_url = non_empty("DATABASE_URL");

        if let Some(val) = non_empty("LAUNCHPAD_APP_URL") {
            config.app_url = val.trim_end_matches('/').to_string();
        }

        if let Some(val) = non_empty("LITELLM_API_BASE") {
            config.api_base = val;
        }
        config.api_key = non_empty("LITELLM_API_KEY");
        if let Some(val) = non_empty("LITELLM_DEFAULT_MODEL") {
            config.default_model = val;
        }

        if let Some(val) = non_empty("LAUNCHPAD_GENERATION_TIMEOUT_SECS") {
            let secs: u64 = parse_env_value(&val, "LAUNCHPAD_GENERATION_TIMEOUT_SECS")?;
            config.generation_timeout = Duration::from_secs(secs);
        }

        if let Some(val) = non_empty("LAUNCHPAD_CACHE_TTL_MS") {
            config.cache_ttl_ms = parse_env_value(&val, "LAUNCHPAD_CACHE_TTL_MS")?;
        }

        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if any values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation_timeout.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "generation_timeout must be greater than 0".to_string(),
            ));
        }

        if self.cache_ttl_ms <= 0 {
            return Err(ConfigError::ValidationFailed(
                "cache_ttl_ms must be greater than 0".to_string(),
            ));
        }

        if !(self.app_url.starts_with("http://") || self.app_url.starts_with("https://")) {
            return Err(ConfigError::ValidationFailed(format!(
                "app_url must start with http:// or https://, got '{}'",
                self.app_url
            )));
        }

        if self.default_model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "default_model cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// The database URL, or an error naming the missing variable.
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))
    }

    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

fn parse_env_value<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("could not parse '{}'", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<PlatformConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PlatformConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.app_url, "http://localhost:3000");
        assert_eq!(config.api_base, "https://api.openai.com/v1");
        assert_eq!(config.default_model, "gpt-3.5-turbo");
        assert_eq!(config.generation_timeout, Duration::from_secs(30));
        assert_eq!(config.cache_ttl_ms, 604_800_000);
        assert!(config.database_url.is_none());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/launchpad"),
            ("LAUNCHPAD_APP_URL", "https://launchpad.dev/"),
            ("LITELLM_API_KEY", "sk-test"),
            ("LITELLM_DEFAULT_MODEL", "gpt-4o-mini"),
            ("LAUNCHPAD_GENERATION_TIMEOUT_SECS", "5"),
            ("LAUNCHPAD_CACHE_TTL_MS", "1000"),
        ])
        .unwrap();
        assert_eq!(
            config.require_database_url().unwrap(),
            "postgres://localhost/launchpad"
        );
        assert_eq!(config.app_url, "https://launchpad.dev");
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.default_model, "gpt-4o-mini");
        assert_eq!(config.generation_timeout, Duration::from_secs(5));
        assert_eq!(config.cache_ttl_ms, 1000);
    }

    #[test]
    fn test_invalid_number() {
        let err = load(&[("LAUNCHPAD_CACHE_TTL_MS", "a week")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "LAUNCHPAD_CACHE_TTL_MS"));
    }

    #[test]
    fn test_validation_rejects_zero_values() {
        assert!(load(&[("LAUNCHPAD_GENERATION_TIMEOUT_SECS", "0")]).is_err());
        assert!(load(&[("LAUNCHPAD_CACHE_TTL_MS", "0")]).is_err());
    }

    #[test]
    fn test_validation_rejects_bad_app_url() {
        let err = load(&[("LAUNCHPAD_APP_URL", "launchpad.dev")]).unwrap_err();
        assert!(err.to_string().contains("app_url"));
    }

    #[test]
    fn test_missing_database_url() {
        let err = PlatformConfig::default().require_database_url().unwrap_err();
        assert_eq!(err.to_string(), "Missing environment variable: DATABASE_URL");
    }
}
