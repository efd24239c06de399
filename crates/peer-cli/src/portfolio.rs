//! Portfolio optimization hand-off

use async_trait::async_trait;
use peer_compare::{ControlSignal, PortfolioMenu, Result};
use tracing::info;

/// Reports the tickers a portfolio optimizer would receive, then returns to the menu
#[derive(Debug, Default)]
pub struct PortfolioSummary;

impl PortfolioSummary {
    pub fn summary(tickers: &[String]) -> String {
        format!(
            "\nPortfolio optimization over {} tickers: {}\n",
            tickers.len(),
            tickers.join(", ")
        )
    }
}

#[async_trait]
impl PortfolioMenu for PortfolioSummary {
    async fn menu(&self, tickers: Vec<String>) -> Result<ControlSignal> {
        info!(?tickers, "Portfolio optimization requested");
        println!("{}", Self::summary(&tickers));
        Ok(ControlSignal::Continue)
    }
}
