//! Finviz screener client
//!
//! Finviz has no JSON API. The quote page of a ticker links its sector, industry
//! and country to screener filters (`f=sec_...`, `f=ind_...`, `f=geo_...`), so the
//! client lifts those filter codes from the page, runs the screener with them and
//! collects the tickers of every result page.

use crate::config::CompareConfig;
use crate::error::{CompareError, Result};
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Rows per screener result page
pub const PAGE_SIZE: usize = 20;

/// Upper bound on result pages fetched for one screen
const MAX_PAGES: usize = 100;

/// Attribute a peer must share with the active ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareAxis {
    Sector,
    Industry,
    Country,
}

impl CompareAxis {
    /// Screener filter prefix for this axis
    pub fn filter_prefix(self) -> &'static str {
        match self {
            CompareAxis::Sector => "sec",
            CompareAxis::Industry => "ind",
            CompareAxis::Country => "geo",
        }
    }
}

impl fmt::Display for CompareAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareAxis::Sector => write!(f, "Sector"),
            CompareAxis::Industry => write!(f, "Industry"),
            CompareAxis::Country => write!(f, "Country"),
        }
    }
}

/// Finviz client
#[derive(Debug, Clone)]
pub struct FinvizClient {
    client: Client,
    base_url: String,
    filter_link: Regex,
    ticker_link: Regex,
}

impl FinvizClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        let filter_link =
            Regex::new(r"screener\.ashx\?v=\d+&(?:amp;)?f=((?:sec|ind|geo)_[a-z0-9]+)")
                .map_err(|e| CompareError::Other(e.to_string()))?;
        let ticker_link = Regex::new(r"quote\.ashx\?t=([A-Z0-9.\-]+)")
            .map_err(|e| CompareError::Other(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            filter_link,
            ticker_link,
        })
    }

    pub fn from_config(config: &CompareConfig) -> Result<Self> {
        Self::new(config.finviz_base_url.clone(), config.request_timeout)
    }

    async fn get_page(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        if !response.status().is_success() {
            return Err(CompareError::provider(
                "Finviz",
                format!("HTTP error: {}", response.status()),
            ));
        }
        Ok(response.text().await?)
    }

    /// Screener filter codes for `ticker`, one per requested axis
    pub async fn filters_for(&self, ticker: &str, axes: &[CompareAxis]) -> Result<Vec<String>> {
        let page = self
            .get_page("quote.ashx", &[("t", ticker.to_uppercase())])
            .await?;
        self.extract_filters(&page, ticker, axes)
    }

    fn extract_filters(&self, page: &str, ticker: &str, axes: &[CompareAxis]) -> Result<Vec<String>> {
        axes.iter()
            .map(|axis| {
                let prefix = format!("{}_", axis.filter_prefix());
                self.filter_link
                    .captures_iter(page)
                    .map(|c| c[1].to_string())
                    .find(|code| code.starts_with(&prefix))
                    .ok_or_else(|| {
                        CompareError::provider(
                            "Finviz",
                            format!("No {axis} found for {}", ticker.to_uppercase()),
                        )
                    })
            })
            .collect()
    }

    fn extract_tickers(&self, page: &str) -> Vec<String> {
        let mut tickers: Vec<String> = Vec::new();
        for capture in self.ticker_link.captures_iter(page) {
            let ticker = &capture[1];
            if !tickers.iter().any(|t| t == ticker) {
                tickers.push(ticker.to_string());
            }
        }
        tickers
    }

    /// Run the overview screener with the given filter codes, walking every page
    pub async fn screen(&self, filters: &[String]) -> Result<Vec<String>> {
        let filter = filters.join(",");
        let mut tickers: Vec<String> = Vec::new();

        for page_index in 0..MAX_PAGES {
            let first_row = page_index * PAGE_SIZE + 1;
            let page = self
                .get_page(
                    "screener.ashx",
                    &[
                        ("v", "111".to_string()),
                        ("f", filter.clone()),
                        ("r", first_row.to_string()),
                    ],
                )
                .await?;

            let found = self.extract_tickers(&page);
            let before = tickers.len();
            for ticker in &found {
                if !tickers.contains(ticker) {
                    tickers.push(ticker.clone());
                }
            }

            if found.len() < PAGE_SIZE || tickers.len() == before {
                break;
            }
        }

        Ok(tickers)
    }

    /// Tickers sharing the given attributes with `ticker` (including `ticker` itself)
    pub async fn compare(&self, ticker: &str, axes: &[CompareAxis]) -> Result<Vec<String>> {
        let filters = self.filters_for(ticker, axes).await?;
        tracing::debug!("Finviz filters for {}: {:?}", ticker, filters);
        self.screen(&filters).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const QUOTE_PAGE: &str = r#"
        <a href="screener.ashx?v=111&amp;f=sec_consumercyclical" class="tab-link">Consumer Cyclical</a>
        <a href="screener.ashx?v=111&amp;f=ind_automanufacturers" class="tab-link">Auto Manufacturers</a>
        <a href="screener.ashx?v=111&amp;f=geo_china" class="tab-link">China</a>
    "#;

    fn client(base: &str) -> FinvizClient {
        FinvizClient::new(base, Duration::from_secs(5)).unwrap()
    }

    fn screener_page(tickers: &[&str]) -> String {
        tickers
            .iter()
            .map(|t| format!(r#"<a href="quote.ashx?t={t}&ty=c">{t}</a><a href="quote.ashx?t={t}">Co</a>"#))
            .collect()
    }

    #[test]
    fn test_extract_filters() {
        let finviz = client("https://finviz.com");
        let filters = finviz
            .extract_filters(
                QUOTE_PAGE,
                "nio",
                &[CompareAxis::Sector, CompareAxis::Industry, CompareAxis::Country],
            )
            .unwrap();
        assert_eq!(
            filters,
            vec!["sec_consumercyclical", "ind_automanufacturers", "geo_china"]
        );
    }

    #[test]
    fn test_extract_filters_missing_axis() {
        let finviz = client("https://finviz.com");
        let err = finviz
            .extract_filters("<html></html>", "nio", &[CompareAxis::Country])
            .unwrap_err();
        assert_eq!(err.to_string(), "Finviz error: No Country found for NIO");
    }

    #[test]
    fn test_extract_tickers_dedupes_in_order() {
        let finviz = client("https://finviz.com");
        let tickers = finviz.extract_tickers(&screener_page(&["NIO", "LI", "XPEV"]));
        assert_eq!(tickers, vec!["NIO", "LI", "XPEV"]);
    }

    #[tokio::test]
    async fn test_compare_walks_pages() {
        let server = MockServer::start_async().await;
        let first: Vec<String> = (0..PAGE_SIZE).map(|i| format!("T{i}")).collect();
        let first_refs: Vec<&str> = first.iter().map(String::as_str).collect();

        server
            .mock_async(|when, then| {
                when.method(GET).path("/quote.ashx").query_param("t", "NIO");
                then.status(200).body(QUOTE_PAGE);
            })
            .await;
        let page_one = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/screener.ashx")
                    .query_param("f", "sec_consumercyclical,ind_automanufacturers")
                    .query_param("r", "1");
                then.status(200).body(screener_page(&first_refs));
            })
            .await;
        let page_two = server
            .mock_async(|when, then| {
                when.method(GET).path("/screener.ashx").query_param("r", "21");
                then.status(200).body(screener_page(&["NIO", "LI"]));
            })
            .await;

        let tickers = client(&server.base_url())
            .compare("nio", &[CompareAxis::Sector, CompareAxis::Industry])
            .await
            .unwrap();

        page_one.assert_async().await;
        page_two.assert_async().await;
        assert_eq!(tickers.len(), PAGE_SIZE + 2);
        assert_eq!(tickers.last().map(String::as_str), Some("LI"));
    }

    #[tokio::test]
    async fn test_http_failure_is_provider_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/quote.ashx");
                then.status(403);
            })
            .await;

        let err = client(&server.base_url())
            .compare("NIO", &[CompareAxis::Sector])
            .await
            .unwrap_err();
        assert!(matches!(err, CompareError::Provider { .. }));
    }
}
