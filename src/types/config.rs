//! Configuration structures.
//!
//! Configuration is assembled once at startup from CLI flags / environment
//! variables and is immutable afterwards.

use crate::api::Credentials;
use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Per-call upstream timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Global server configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Upstream API configuration.
    pub api: ApiConfig,

    /// Observability configuration.
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Validate and assemble the configuration. Any error here is fatal.
    pub fn new(base_url: &str, key: &str, secret: &str) -> Result<Self> {
        Ok(Self {
            api: ApiConfig::new(base_url, key, secret)?,
            observability: ObservabilityConfig::default(),
        })
    }
}

/// FeedMob API configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    /// API base URL, e.g. `https://api.feedmob.com`.
    pub base_url: Url,

    /// Key identifier and signing secret.
    #[serde(skip)]
    pub credentials: Credentials,

    /// Timeout applied to every upstream request.
    pub request_timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: &str, key: &str, secret: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::config(format!("invalid FEEDMOB_API_BASE '{base_url}': {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "FEEDMOB_API_BASE must be an http(s) URL, got scheme '{}'",
                base_url.scheme()
            )));
        }

        Ok(Self {
            base_url,
            credentials: Credentials::new(key, secret)?,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;

    #[test]
    fn test_valid_config() {
        let config = Config::new("https://api.feedmob.com", "key-1", "s3cret").unwrap();
        assert_eq!(config.api.base_url.as_str(), "https://api.feedmob.com/");
        assert_eq!(config.api.request_timeout, Duration::from_secs(30));
        assert_eq!(config.api.credentials.key(), "key-1");
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_empty_key_is_fatal() {
        let err = Config::new("https://api.feedmob.com", "", "s3cret").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_empty_secret_is_fatal() {
        let err = Config::new("https://api.feedmob.com", "key-1", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        assert!(Config::new("ftp://api.feedmob.com", "k", "s").is_err());
        assert!(Config::new("not a url", "k", "s").is_err());
    }

    #[test]
    fn test_serialized_config_omits_credentials() {
        let config = Config::new("https://api.feedmob.com", "key-1", "s3cret").unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("s3cret"));
        assert!(!json.contains("key-1"));
    }
}
