//! Collaborators the comparison menu delegates to
//!
//! The menu owns no rendering or analytics. Each comparison verb forwards its raw
//! argument tokens plus the relevant slice of session state to a [`ComparisonViews`]
//! implementation, and `po` hands the tickers to a [`PortfolioMenu`].

use crate::api::PriceSeries;
use crate::error::Result;
use crate::menu::ControlSignal;
use crate::menu::commands::ScreenerMode;
use crate::session::Interval;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Renderers for every comparison the menu offers
///
/// Implementations parse their own arguments from `args`. Errors are reported by the
/// menu and never end the loop.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComparisonViews: Send + Sync {
    /// Historical price comparison (`historical`)
    async fn historical(
        &self,
        args: &[String],
        series: &PriceSeries,
        ticker: &str,
        start: Option<NaiveDate>,
        interval: Interval,
        similar: &[String],
    ) -> Result<()>;

    /// Historical price correlation (`hcorr`)
    async fn correlation(
        &self,
        args: &[String],
        series: &PriceSeries,
        ticker: &str,
        start: Option<NaiveDate>,
        interval: Interval,
        similar: &[String],
    ) -> Result<()>;

    async fn income(&self, args: &[String], ticker: &str, similar: &[String]) -> Result<()>;

    async fn balance(&self, args: &[String], ticker: &str, similar: &[String]) -> Result<()>;

    async fn cashflow(&self, args: &[String], ticker: &str, similar: &[String]) -> Result<()>;

    async fn sentiment(&self, args: &[String], ticker: &str, similar: &[String]) -> Result<()>;

    /// Sentiment correlation (`scorr`)
    async fn sentiment_correlation(
        &self,
        args: &[String],
        ticker: &str,
        similar: &[String],
    ) -> Result<()>;

    /// Screener comparison; `mode` is the verb that was typed
    async fn screener(
        &self,
        args: &[String],
        mode: ScreenerMode,
        ticker: &str,
        similar: &[String],
    ) -> Result<()>;

    /// Close any open plot surfaces; called before every dispatch
    fn close_plots(&self) {}
}

/// Portfolio optimization sub-menu
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PortfolioMenu: Send + Sync {
    /// Run the sub-menu over `tickers`; the returned signal is passed through unchanged
    async fn menu(&self, tickers: Vec<String>) -> Result<ControlSignal>;
}
