//! Environment-driven configuration.
//!
//! Settings come from the process environment, with `.env` support via
//! dotenvy at the binary entry point. Secret values are wrapped in
//! [`SecretString`] so they never appear in debug output.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Base URL of the UniEval inference service.
pub const ENV_UNIEVAL_URL: &str = "UNISCORE_UNIEVAL_URL";
/// Bearer token for the UniEval inference service.
pub const ENV_UNIEVAL_API_KEY: &str = "UNISCORE_UNIEVAL_API_KEY";
/// Request timeout in seconds.
pub const ENV_UNIEVAL_TIMEOUT_SECS: &str = "UNISCORE_UNIEVAL_TIMEOUT_SECS";

/// Connection settings for the UniEval inference service.
#[derive(Debug, Clone)]
pub struct UniEvalConfig {
    /// Base URL of the serving endpoint.
    pub base_url: String,
    /// Optional bearer token.
    pub api_key: Option<SecretString>,
    /// Request timeout in seconds. Model evaluation is slow on CPU, so the
    /// default is generous.
    pub timeout_secs: u64,
}

impl Default for UniEvalConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8590".to_string(),
            api_key: None,
            timeout_secs: 300,
        }
    }
}

impl UniEvalConfig {
    /// Load from the environment, falling back to defaults for unset values.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_UNIEVAL_URL) {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        if let Ok(key) = std::env::var(ENV_UNIEVAL_API_KEY) {
            if !key.is_empty() {
                config.api_key = Some(SecretString::from(key));
            }
        }
        if let Ok(raw) = std::env::var(ENV_UNIEVAL_TIMEOUT_SECS) {
            config.timeout_secs = parse_timeout(&raw)?;
        }

        Ok(config)
    }
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidVar {
        var: ENV_UNIEVAL_TIMEOUT_SECS.to_string(),
        reason: format!("expected seconds, got {raw:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UniEvalConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8590");
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout_secs, 300);
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("120").unwrap(), 120);
        assert_eq!(parse_timeout(" 60 ").unwrap(), 60);
        assert!(parse_timeout("soon").is_err());
        assert!(parse_timeout("-1").is_err());
    }
}
