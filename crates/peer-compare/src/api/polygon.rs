//! Polygon company metadata client

use crate::config::CompareConfig;
use crate::error::{CompareError, Result};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Polygon API client
#[derive(Debug, Clone)]
pub struct PolygonClient {
    client: Client,
    api_key: String,
    base_url: String,
    rate_limiter: SharedRateLimiter,
}

/// Company metadata envelope returned on success
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyMeta {
    pub similar: Vec<String>,
}

/// Envelope returned on failure
#[derive(Debug, Clone, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

impl PolygonClient {
    /// Create a new Polygon client
    ///
    /// # Arguments
    /// * `api_key` - Polygon API key
    /// * `base_url` - REST endpoint, e.g. `https://api.polygon.io`
    /// * `rate_limit` - Maximum requests per minute
    /// * `timeout` - Per-request timeout
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        rate_limit: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::MIN));
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Create from the menu configuration; fails when no key is configured
    pub fn from_config(config: &CompareConfig) -> Result<Self> {
        Self::new(
            config.require_polygon_key()?,
            config.polygon_base_url.clone(),
            config.polygon_rate_limit,
            config.request_timeout,
        )
    }

    /// Get company metadata, including Polygon's list of similar tickers
    pub async fn company(&self, ticker: &str) -> Result<CompanyMeta> {
        self.rate_limiter.until_ready().await;

        let url = format!(
            "{}/v1/meta/symbols/{}/company",
            self.base_url,
            ticker.to_uppercase()
        );
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::OK {
            return Ok(serde_json::from_str(&body)?);
        }

        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map_or_else(|_| format!("HTTP error: {status}"), |envelope| envelope.error);
        Err(CompareError::provider("Polygon", message))
    }

    /// Tickers Polygon considers similar to `ticker`
    pub async fn similar_companies(&self, ticker: &str) -> Result<Vec<String>> {
        Ok(self.company(ticker).await?.similar)
    }
}
