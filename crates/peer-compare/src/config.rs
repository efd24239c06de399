//! Configuration for the comparison menu

use crate::error::{CompareError, Result};
use peer_utils::TerminalConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Default Polygon REST endpoint
pub const POLYGON_BASE_URL: &str = "https://api.polygon.io";

/// Default Finviz site root
pub const FINVIZ_BASE_URL: &str = "https://finviz.com";

/// Configuration handed to the comparison menu at construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Prompt flair and line editor toggle
    pub terminal: TerminalConfig,

    /// Polygon API key, required only by `get -p`
    pub polygon_api_key: Option<String>,

    /// Polygon REST endpoint
    pub polygon_base_url: String,

    /// Polygon requests allowed per minute
    pub polygon_rate_limit: u32,

    /// Finviz site root used for quote pages and the screener
    pub finviz_base_url: String,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// How long screener peer lists are reused
    pub screener_cache_ttl: Duration,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            terminal: TerminalConfig::default(),
            polygon_api_key: None,
            polygon_base_url: POLYGON_BASE_URL.to_string(),
            polygon_rate_limit: 5, // free tier
            finviz_base_url: FINVIZ_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            screener_cache_ttl: Duration::from_secs(3600),
        }
    }
}

impl CompareConfig {
    /// Create a new configuration builder
    pub fn builder() -> CompareConfigBuilder {
        CompareConfigBuilder::default()
    }

    /// Build from the environment: terminal flags and `POLYGON_API_KEY`
    pub fn from_env() -> Result<Self> {
        Self::builder()
            .terminal(TerminalConfig::from_env())
            .with_env_api_key()
            .build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("polygon_base_url", &self.polygon_base_url),
            ("finviz_base_url", &self.finviz_base_url),
        ] {
            Url::parse(value)
                .map_err(|e| CompareError::ConfigError(format!("{name} `{value}`: {e}")))?;
        }

        if self.polygon_rate_limit == 0 {
            return Err(CompareError::ConfigError(
                "polygon_rate_limit must be greater than 0".to_string(),
            ));
        }

        if self.polygon_api_key.as_deref().is_some_and(str::is_empty) {
            return Err(CompareError::ConfigError(
                "polygon_api_key must not be empty when set".to_string(),
            ));
        }

        Ok(())
    }

    /// Polygon key, or a config error naming the variable to set
    pub fn require_polygon_key(&self) -> Result<&str> {
        self.polygon_api_key.as_deref().ok_or_else(|| {
            CompareError::ConfigError("POLYGON_API_KEY is not set".to_string())
        })
    }
}

/// Builder for CompareConfig
#[derive(Debug, Default)]
pub struct CompareConfigBuilder {
    terminal: Option<TerminalConfig>,
    polygon_api_key: Option<String>,
    polygon_base_url: Option<String>,
    polygon_rate_limit: Option<u32>,
    finviz_base_url: Option<String>,
    request_timeout: Option<Duration>,
    screener_cache_ttl: Option<Duration>,
}

impl CompareConfigBuilder {
    /// Set terminal settings
    pub fn terminal(mut self, terminal: TerminalConfig) -> Self {
        self.terminal = Some(terminal);
        self
    }

    /// Set Polygon API key
    pub fn polygon_api_key(mut self, key: impl Into<String>) -> Self {
        self.polygon_api_key = Some(key.into());
        self
    }

    /// Load Polygon API key from environment
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var("POLYGON_API_KEY") {
            self.polygon_api_key = Some(key);
        }
        self
    }

    /// Set Polygon endpoint
    pub fn polygon_base_url(mut self, url: impl Into<String>) -> Self {
        self.polygon_base_url = Some(url.into());
        self
    }

    /// Set Polygon requests per minute
    pub fn polygon_rate_limit(mut self, per_minute: u32) -> Self {
        self.polygon_rate_limit = Some(per_minute);
        self
    }

    /// Set Finviz site root
    pub fn finviz_base_url(mut self, url: impl Into<String>) -> Self {
        self.finviz_base_url = Some(url.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set screener cache TTL
    pub fn screener_cache_ttl(mut self, duration: Duration) -> Self {
        self.screener_cache_ttl = Some(duration);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<CompareConfig> {
        let defaults = CompareConfig::default();

        let config = CompareConfig {
            terminal: self.terminal.unwrap_or(defaults.terminal),
            polygon_api_key: self.polygon_api_key,
            polygon_base_url: self.polygon_base_url.unwrap_or(defaults.polygon_base_url),
            polygon_rate_limit: self.polygon_rate_limit.unwrap_or(defaults.polygon_rate_limit),
            finviz_base_url: self.finviz_base_url.unwrap_or(defaults.finviz_base_url),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            screener_cache_ttl: self.screener_cache_ttl.unwrap_or(defaults.screener_cache_ttl),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompareConfig::default();
        assert_eq!(config.polygon_base_url, POLYGON_BASE_URL);
        assert_eq!(config.polygon_rate_limit, 5);
        assert!(config.polygon_api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = CompareConfig::builder()
            .polygon_api_key("secret")
            .polygon_rate_limit(100)
            .request_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(config.polygon_api_key.as_deref(), Some("secret"));
        assert_eq!(config.polygon_rate_limit, 100);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_validation_bad_url() {
        let result = CompareConfig::builder().finviz_base_url("not a url").build();
        assert!(matches!(result, Err(CompareError::ConfigError(_))));
    }

    #[test]
    fn test_validation_zero_rate_limit() {
        let config = CompareConfig {
            polygon_rate_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_require_polygon_key() {
        let config = CompareConfig::default();
        assert!(config.require_polygon_key().is_err());

        let config = CompareConfig {
            polygon_api_key: Some("k".to_string()),
            ..Default::default()
        };
        assert_eq!(config.require_polygon_key().unwrap(), "k");
    }
}
