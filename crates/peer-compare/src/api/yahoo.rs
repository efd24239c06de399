//! Yahoo Finance API client

use crate::error::{CompareError, Result};
use crate::session::Interval;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// Yahoo Finance API client
pub struct YahooFinanceClient {}

/// Stock quote data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
}

/// Price history loaded once when the menu is entered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub interval: Interval,
    pub quotes: Vec<Quote>,
}

impl PriceSeries {
    /// A series with no bars, for menus entered without loading data
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            interval: Interval::Daily,
            quotes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Adjusted closes in chronological order
    pub fn adjusted_closes(&self) -> Vec<f64> {
        self.quotes.iter().map(|q| q.adjclose).collect()
    }
}

/// Yahoo interval code for a bar length
fn interval_code(interval: Interval) -> String {
    match interval {
        Interval::Daily => "1d".to_string(),
        Interval::Intraday(minutes) => format!("{minutes}m"),
    }
}

/// Default look-back when the caller gives no start date
fn default_start(interval: Interval, end: DateTime<Utc>) -> DateTime<Utc> {
    match interval {
        Interval::Daily => end - chrono::Duration::days(365),
        Interval::Intraday(_) => end - chrono::Duration::days(5),
    }
}

fn to_offset(at: DateTime<Utc>) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(at.timestamp())
        .map_err(|e| CompareError::YahooFinanceError(format!("Invalid timestamp: {e}")))
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {}
    }

    /// Get historical quotes for a symbol
    pub async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Interval,
    ) -> Result<Vec<Quote>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| CompareError::YahooFinanceError(e.to_string()))?;

        let response = provider
            .get_quote_history_interval(
                symbol,
                to_offset(start)?,
                to_offset(end)?,
                &interval_code(interval),
            )
            .await
            .map_err(|e| CompareError::YahooFinanceError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| CompareError::YahooFinanceError(e.to_string()))?;

        Ok(quotes
            .iter()
            .map(|q| Quote {
                symbol: symbol.to_string(),
                timestamp: DateTime::from_timestamp(q.timestamp as i64, 0)
                    .unwrap_or_else(Utc::now),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
                adjclose: q.adjclose,
            })
            .collect())
    }

    /// Load the series for `symbol` from `start` (or a default look-back) until now
    pub async fn load_series(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        interval: Interval,
    ) -> Result<PriceSeries> {
        let end = Utc::now();
        let start = start
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map_or_else(|| default_start(interval, end), |dt| dt.and_utc());

        let quotes = self
            .get_historical_quotes(symbol, start, end, interval)
            .await?;
        tracing::debug!("Loaded {} {} bars for {}", quotes.len(), interval, symbol);

        Ok(PriceSeries {
            symbol: symbol.to_uppercase(),
            interval,
            quotes,
        })
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_code() {
        assert_eq!(interval_code(Interval::Daily), "1d");
        assert_eq!(interval_code(Interval::Intraday(5)), "5m");
    }

    #[test]
    fn test_default_start() {
        let end = Utc::now();
        assert_eq!((end - default_start(Interval::Daily, end)).num_days(), 365);
        assert_eq!((end - default_start(Interval::Intraday(1), end)).num_days(), 5);
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::empty("NIO");
        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
        assert!(series.adjusted_closes().is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_load_series() {
        let client = YahooFinanceClient::new();
        let series = client
            .load_series("AAPL", None, Interval::Daily)
            .await
            .unwrap();

        assert_eq!(series.symbol, "AAPL");
        assert!(!series.is_empty());
        assert!(series.quotes[0].close > 0.0);
    }
}
