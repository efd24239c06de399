//! Similar-company discovery
//!
//! Two providers feed the `get` command: Polygon's company metadata (`get -p`) and
//! the Finviz screener (default). Whatever they return goes through
//! [`cap_similar`] before it reaches the session.

use crate::api::{CompareAxis, FinvizClient, PolygonClient};
use crate::cache::{PeerCache, PeerKey};
use crate::config::CompareConfig;
use crate::error::{CompareError, Result};
use crate::session::Owner;
use async_trait::async_trait;
use rand::Rng;
use rand::seq::SliceRandom;

/// Most tickers a discovered comparison set may hold
pub const MAX_SIMILAR: usize = 10;

/// Axes used by the screener when `--nocountry` is not given
pub const DEFAULT_AXES: [CompareAxis; 3] =
    [CompareAxis::Sector, CompareAxis::Industry, CompareAxis::Country];

/// Axes used by the screener with `--nocountry`
pub const NO_COUNTRY_AXES: [CompareAxis; 2] = [CompareAxis::Sector, CompareAxis::Industry];

/// Source of tickers similar to a given one
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SimilarityProvider: Send + Sync {
    /// Label recorded as the owner of the set this provider produces
    fn owner(&self) -> Owner;

    /// Tickers similar to `ticker`; providers that do not screen by attribute ignore `axes`
    async fn similar(&self, ticker: &str, axes: &[CompareAxis]) -> Result<Vec<String>>;
}

/// Upper-case every ticker, then keep a random sample of [`MAX_SIMILAR`] when there
/// are more, stored in ascending order.
///
/// The sample is random but the stored order is not: the shuffled subset is sorted.
pub fn cap_similar<R: Rng + ?Sized>(peers: Vec<String>, rng: &mut R) -> Vec<String> {
    let mut peers: Vec<String> = peers.into_iter().map(|p| p.to_uppercase()).collect();
    if peers.len() <= MAX_SIMILAR {
        return peers;
    }

    peers.shuffle(rng);
    peers.truncate(MAX_SIMILAR);
    peers.sort();
    peers
}

/// Polygon company-metadata provider
pub struct PolygonProvider {
    client: Option<PolygonClient>,
}

impl PolygonProvider {
    pub fn new(client: PolygonClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Build from config; without an API key every lookup fails with a config error
    pub fn from_config(config: &CompareConfig) -> Result<Self> {
        let client = match config.polygon_api_key {
            Some(_) => Some(PolygonClient::from_config(config)?),
            None => None,
        };
        Ok(Self { client })
    }
}

#[async_trait]
impl SimilarityProvider for PolygonProvider {
    fn owner(&self) -> Owner {
        Owner::Polygon
    }

    async fn similar(&self, ticker: &str, _axes: &[CompareAxis]) -> Result<Vec<String>> {
        let client = self.client.as_ref().ok_or_else(|| {
            CompareError::ConfigError("POLYGON_API_KEY is not set".to_string())
        })?;
        client.similar_companies(ticker).await
    }
}

/// Finviz screener provider, caching each screen for the configured TTL
pub struct FinvizProvider {
    client: FinvizClient,
    cache: PeerCache,
}

impl FinvizProvider {
    pub fn new(client: FinvizClient, cache: PeerCache) -> Self {
        Self { client, cache }
    }

    pub fn from_config(config: &CompareConfig) -> Result<Self> {
        Ok(Self::new(
            FinvizClient::from_config(config)?,
            PeerCache::new(config.screener_cache_ttl),
        ))
    }
}

#[async_trait]
impl SimilarityProvider for FinvizProvider {
    fn owner(&self) -> Owner {
        Owner::Finviz
    }

    async fn similar(&self, ticker: &str, axes: &[CompareAxis]) -> Result<Vec<String>> {
        self.cache
            .get_or_fetch(PeerKey::new(ticker, axes), || self.client.compare(ticker, axes))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    fn tickers(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("t{i:02}")).collect()
    }

    #[test]
    fn test_cap_keeps_small_sets_in_provider_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let peers = vec!["xpev".to_string(), "LI".to_string()];
        assert_eq!(cap_similar(peers, &mut rng), vec!["XPEV", "LI"]);
    }

    #[test]
    fn test_cap_samples_ten_sorted() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let capped = cap_similar(tickers(15), &mut rng);

            assert_eq!(capped.len(), MAX_SIMILAR);
            assert!(capped.windows(2).all(|w| w[0] < w[1]));
            assert!(capped.iter().all(|t| tickers(15).contains(&t.to_lowercase())));
        }
    }

    #[test]
    fn test_cap_sample_varies_with_seed() {
        let samples: Vec<Vec<String>> = (0..10)
            .map(|seed| cap_similar(tickers(30), &mut StdRng::seed_from_u64(seed)))
            .collect();
        assert!(samples.iter().any(|s| s != &samples[0]));
    }

    #[tokio::test]
    async fn test_polygon_without_key_is_config_error() {
        let provider = PolygonProvider::from_config(&CompareConfig::default()).unwrap();
        assert_eq!(provider.owner(), Owner::Polygon);

        let err = provider.similar("TSLA", &[]).await.unwrap_err();
        assert!(matches!(err, CompareError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_finviz_provider_caches_screens() {
        let server = MockServer::start_async().await;
        let quote = server
            .mock_async(|when, then| {
                when.method(GET).path("/quote.ashx");
                then.status(200)
                    .body(r#"<a href="screener.ashx?v=111&f=sec_technology">Technology</a>"#);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/screener.ashx");
                then.status(200)
                    .body(r#"<a href="quote.ashx?t=AAPL">AAPL</a><a href="quote.ashx?t=MSFT">MSFT</a>"#);
            })
            .await;

        let client = FinvizClient::new(server.base_url(), Duration::from_secs(5)).unwrap();
        let provider = FinvizProvider::new(client, PeerCache::new(Duration::from_secs(60)));

        let axes = [CompareAxis::Sector];
        assert_eq!(provider.similar("aapl", &axes).await.unwrap(), vec!["AAPL", "MSFT"]);
        assert_eq!(provider.similar("AAPL", &axes).await.unwrap(), vec!["AAPL", "MSFT"]);
        quote.assert_calls_async(1).await;
    }
}
