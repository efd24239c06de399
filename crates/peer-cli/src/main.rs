//! Comparison analysis terminal

mod editor;
mod portfolio;
mod views;

use chrono::NaiveDate;
use clap::Parser;
use editor::LineEditor;
use peer_compare::api::{PriceSeries, YahooFinanceClient};
use peer_compare::menu::input::{ScriptedLines, StdinLines};
use peer_compare::{CompareConfig, ComparisonMenu, Interval, Session};
use portfolio::PortfolioSummary;
use std::sync::Arc;
use tracing::{info, warn};
use views::ConsoleViews;

#[derive(Parser, Debug)]
#[command(name = "peers")]
#[command(about = "Compare a stock against similar companies", long_about = None)]
struct Args {
    /// Stock to compare
    #[arg(short, long)]
    ticker: String,

    /// First day of the loaded price history (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date)]
    start: Option<NaiveDate>,

    /// Bar interval, e.g. 5min for intraday or 1440min for daily
    #[arg(short, long, default_value = "1440min")]
    interval: Interval,

    /// Enter the menu without loading price history
    #[arg(long)]
    no_load: bool,

    /// Run `;`-separated menu commands instead of reading the terminal
    #[arg(short, long)]
    commands: Option<String>,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| format!("{value}: {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    peer_utils::init_tracing();

    let args = Args::parse();
    let config = CompareConfig::from_env()?;
    let ticker = args.ticker.to_uppercase();

    info!("Starting comparison analysis for {}", ticker);

    let yahoo = YahooFinanceClient::new();
    let series = if args.no_load {
        PriceSeries::empty(&ticker)
    } else {
        match yahoo.load_series(&ticker, args.start, args.interval).await {
            Ok(series) => series,
            Err(e) => {
                warn!("Could not load {} price history: {}", ticker, e);
                PriceSeries::empty(&ticker)
            }
        }
    };

    let session = Session::new(ticker, args.start, args.interval, Arc::new(series));
    let use_line_editor = config.terminal.use_line_editor;
    let mut menu = ComparisonMenu::from_config(
        session,
        config,
        Arc::new(ConsoleViews::new(yahoo)),
        Arc::new(PortfolioSummary),
    )?;

    let signal = match args.commands {
        Some(script) => {
            let mut input = ScriptedLines::from_script(&script).echo(true);
            menu.run(&mut input).await?
        }
        None if use_line_editor => menu.run(&mut LineEditor::new()?).await?,
        None => menu.run(&mut StdinLines::stdin()).await?,
    };

    info!(?signal, "Comparison menu closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["peers", "--ticker", "tsla"]).unwrap();
        assert_eq!(args.ticker, "tsla");
        assert_eq!(args.interval, Interval::Daily);
        assert!(args.start.is_none());
        assert!(!args.no_load);
    }

    #[test]
    fn test_args_intraday_and_script() {
        let args = Args::try_parse_from([
            "peers",
            "-t",
            "NIO",
            "-s",
            "2021-03-01",
            "-i",
            "5min",
            "--no-load",
            "-c",
            "select LI; q",
        ])
        .unwrap();
        assert_eq!(args.interval, Interval::Intraday(5));
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2021, 3, 1));
        assert!(args.no_load);
        assert_eq!(args.commands.as_deref(), Some("select LI; q"));
    }

    #[test]
    fn test_args_require_ticker() {
        assert!(Args::try_parse_from(["peers"]).is_err());
    }
}
