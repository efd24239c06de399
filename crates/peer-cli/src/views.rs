//! Terminal renderings of the comparison views
//!
//! Price comparisons are tabulated from Yahoo Finance bars. The statement,
//! sentiment and screener comparisons have no data source here and report so.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, ValueEnum};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use peer_compare::api::{PriceSeries, Quote, YahooFinanceClient};
use peer_compare::menu::args::parse_args;
use peer_compare::{CompareError, ComparisonViews, Interval, Result, ScreenerMode};
use std::collections::BTreeMap;
use tracing::debug;

/// Bar field being compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriceField {
    #[value(name = "o")]
    Open,
    #[value(name = "h")]
    High,
    #[value(name = "l")]
    Low,
    #[value(name = "c")]
    Close,
    #[value(name = "a")]
    AdjClose,
}

impl PriceField {
    fn of(self, quote: &Quote) -> f64 {
        match self {
            PriceField::Open => quote.open,
            PriceField::High => quote.high,
            PriceField::Low => quote.low,
            PriceField::Close => quote.close,
            PriceField::AdjClose => quote.adjclose,
        }
    }
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("`{value}` is not a YYYY-MM-DD date: {e}"))
}

/// Arguments of `historical`
#[derive(Parser, Debug)]
#[command(
    name = "historical",
    about = "Historical price comparison between similar companies.",
    disable_version_flag = true
)]
struct HistoricalArgs {
    /// Price field: o(pen), h(igh), l(ow), c(lose), a(djusted close)
    #[arg(short = 't', long = "type", value_enum, default_value_t = PriceField::AdjClose)]
    field: PriceField,

    /// Show raw prices instead of min-max scaled ones
    #[arg(long = "no-scale")]
    no_scale: bool,

    /// Start date, overriding the one the menu was entered with
    #[arg(short = 's', long = "start", value_parser = parse_date)]
    start: Option<NaiveDate>,

    /// Most recent rows to show
    #[arg(short = 'n', long = "num", default_value_t = 10)]
    rows: usize,
}

/// Arguments of `hcorr`
#[derive(Parser, Debug)]
#[command(
    name = "hcorr",
    about = "Correlation heatmap based on historical price comparison between similar companies.",
    disable_version_flag = true
)]
struct CorrelationArgs {
    #[arg(short = 't', long = "type", value_enum, default_value_t = PriceField::AdjClose)]
    field: PriceField,

    #[arg(short = 's', long = "start", value_parser = parse_date)]
    start: Option<NaiveDate>,
}

/// Prices of several tickers aligned on bar timestamps
#[derive(Debug, Default, PartialEq)]
pub struct PriceTable {
    pub symbols: Vec<String>,
    pub rows: BTreeMap<DateTime<Utc>, Vec<Option<f64>>>,
}

impl PriceTable {
    pub fn align(series: &[PriceSeries], field: PriceField) -> Self {
        let symbols: Vec<String> = series.iter().map(|s| s.symbol.clone()).collect();
        let mut rows: BTreeMap<DateTime<Utc>, Vec<Option<f64>>> = BTreeMap::new();

        for (column, s) in series.iter().enumerate() {
            for quote in &s.quotes {
                rows.entry(quote.timestamp)
                    .or_insert_with(|| vec![None; symbols.len()])[column] = Some(field.of(quote));
            }
        }

        Self { symbols, rows }
    }

    /// Rescale every column to [0, 1]; constant columns become 0
    pub fn min_max_scale(&mut self) {
        for column in 0..self.symbols.len() {
            let values = self.rows.values().filter_map(|row| row[column]);
            let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
            let range = max - min;

            for row in self.rows.values_mut() {
                if let Some(value) = row[column].as_mut() {
                    *value = if range > 0.0 { (*value - min) / range } else { 0.0 };
                }
            }
        }
    }

    /// Columns restricted to timestamps where every ticker has a price
    pub fn complete_columns(&self) -> Vec<Vec<f64>> {
        let complete: Vec<Vec<f64>> = self
            .rows
            .values()
            .filter_map(|row| row.iter().copied().collect::<Option<Vec<f64>>>())
            .collect();

        (0..self.symbols.len())
            .map(|column| complete.iter().map(|row| row[column]).collect())
            .collect()
    }

    /// Pairwise Pearson correlation over complete rows
    pub fn correlation_matrix(&self) -> Vec<Vec<Option<f64>>> {
        let columns = self.complete_columns();
        columns
            .iter()
            .map(|a| columns.iter().map(|b| pearson(a, b)).collect())
            .collect()
    }
}

/// Pearson correlation; `None` with fewer than two points or zero variance
pub fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len().min(b.len());
    if n < 2 {
        return None;
    }
    let (a, b) = (&a[..n], &b[..n]);
    let mean_a = a.iter().sum::<f64>() / n as f64;
    let mean_b = b.iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denominator = (var_a * var_b).sqrt();
    (denominator > 0.0).then(|| cov / denominator)
}

fn render_prices(table: &PriceTable, interval: Interval, rows: usize) -> Table {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL);

    let mut header = vec![Cell::new("Date")];
    header.extend(table.symbols.iter().map(Cell::new));
    out.set_header(header);

    let skip = table.rows.len().saturating_sub(rows);
    for (timestamp, values) in table.rows.iter().skip(skip) {
        let date = match interval {
            Interval::Daily => timestamp.format("%Y-%m-%d").to_string(),
            Interval::Intraday(_) => timestamp.format("%Y-%m-%d %H:%M").to_string(),
        };
        let mut row = vec![Cell::new(date)];
        row.extend(values.iter().map(|value| {
            let text = value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
            Cell::new(text).set_alignment(CellAlignment::Right)
        }));
        out.add_row(row);
    }

    out
}

fn render_correlation(table: &PriceTable) -> Table {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL);

    let mut header = vec![Cell::new("")];
    header.extend(table.symbols.iter().map(Cell::new));
    out.set_header(header);

    for (symbol, correlations) in table.symbols.iter().zip(table.correlation_matrix()) {
        let mut row = vec![Cell::new(symbol)];
        row.extend(correlations.into_iter().map(|c| {
            let text = c.map_or_else(|| "-".to_string(), |c| format!("{c:.2}"));
            Cell::new(text).set_alignment(CellAlignment::Right)
        }));
        out.add_row(row);
    }

    out
}

/// Console implementation of the comparison views
#[derive(Default)]
pub struct ConsoleViews {
    yahoo: YahooFinanceClient,
}

impl ConsoleViews {
    pub fn new(yahoo: YahooFinanceClient) -> Self {
        Self { yahoo }
    }

    /// Bars for the active ticker and every similar one
    ///
    /// The menu's series is reused for the active ticker unless a different start
    /// was asked for or it was never loaded.
    async fn load_all(
        &self,
        series: &PriceSeries,
        ticker: &str,
        start: Option<NaiveDate>,
        override_start: Option<NaiveDate>,
        interval: Interval,
        similar: &[String],
    ) -> Result<Vec<PriceSeries>> {
        if similar.is_empty() {
            return Err(CompareError::Other(
                "No similar companies selected. Use `get` or `select` first.".to_string(),
            ));
        }

        let start = override_start.or(start);
        let mut all = Vec::with_capacity(similar.len() + 1);
        if series.is_empty() || override_start.is_some() {
            all.push(self.yahoo.load_series(ticker, start, interval).await?);
        } else {
            all.push(series.clone());
        }

        for symbol in similar {
            debug!(symbol, "Loading comparison series");
            all.push(self.yahoo.load_series(symbol, start, interval).await?);
        }
        Ok(all)
    }
}

#[async_trait]
impl ComparisonViews for ConsoleViews {
    async fn historical(
        &self,
        args: &[String],
        series: &PriceSeries,
        ticker: &str,
        start: Option<NaiveDate>,
        interval: Interval,
        similar: &[String],
    ) -> Result<()> {
        let args: HistoricalArgs = parse_args("historical", args)?;
        let all = self
            .load_all(series, ticker, start, args.start, interval, similar)
            .await?;

        let mut table = PriceTable::align(&all, args.field);
        if !args.no_scale {
            table.min_max_scale();
        }

        println!("\n{}\n", render_prices(&table, interval, args.rows));
        Ok(())
    }

    async fn correlation(
        &self,
        args: &[String],
        series: &PriceSeries,
        ticker: &str,
        start: Option<NaiveDate>,
        interval: Interval,
        similar: &[String],
    ) -> Result<()> {
        let args: CorrelationArgs = parse_args("hcorr", args)?;
        let all = self
            .load_all(series, ticker, start, args.start, interval, similar)
            .await?;

        let table = PriceTable::align(&all, args.field);
        println!("\n{}\n", render_correlation(&table));
        Ok(())
    }

    async fn income(&self, _args: &[String], _ticker: &str, _similar: &[String]) -> Result<()> {
        Err(CompareError::Unsupported("income".to_string()))
    }

    async fn balance(&self, _args: &[String], _ticker: &str, _similar: &[String]) -> Result<()> {
        Err(CompareError::Unsupported("balance".to_string()))
    }

    async fn cashflow(&self, _args: &[String], _ticker: &str, _similar: &[String]) -> Result<()> {
        Err(CompareError::Unsupported("cashflow".to_string()))
    }

    async fn sentiment(&self, _args: &[String], _ticker: &str, _similar: &[String]) -> Result<()> {
        Err(CompareError::Unsupported("sentiment".to_string()))
    }

    async fn sentiment_correlation(
        &self,
        _args: &[String],
        _ticker: &str,
        _similar: &[String],
    ) -> Result<()> {
        Err(CompareError::Unsupported("scorr".to_string()))
    }

    async fn screener(
        &self,
        _args: &[String],
        mode: ScreenerMode,
        _ticker: &str,
        _similar: &[String],
    ) -> Result<()> {
        Err(CompareError::Unsupported(mode.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn quote(symbol: &str, day: u32, close: f64) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1_000,
            adjclose: close,
        }
    }

    fn series(symbol: &str, closes: &[(u32, f64)]) -> PriceSeries {
        PriceSeries {
            symbol: symbol.to_string(),
            interval: Interval::Daily,
            quotes: closes.iter().map(|&(day, c)| quote(symbol, day, c)).collect(),
        }
    }

    #[test]
    fn test_align_fills_gaps() {
        let table = PriceTable::align(
            &[
                series("TSLA", &[(2, 10.0), (3, 11.0)]),
                series("GM", &[(3, 20.0), (4, 21.0)]),
            ],
            PriceField::Close,
        );

        assert_eq!(table.symbols, vec!["TSLA", "GM"]);
        let rows: Vec<_> = table.rows.values().cloned().collect();
        assert_eq!(
            rows,
            vec![
                vec![Some(10.0), None],
                vec![Some(11.0), Some(20.0)],
                vec![None, Some(21.0)],
            ]
        );
        assert_eq!(table.complete_columns(), vec![vec![11.0], vec![20.0]]);
    }

    #[test]
    fn test_align_picks_field() {
        let table = PriceTable::align(&[series("TSLA", &[(2, 10.0)])], PriceField::High);
        assert_eq!(table.rows.values().next().unwrap(), &vec![Some(11.0)]);
    }

    #[test]
    fn test_min_max_scale() {
        let mut table = PriceTable::align(
            &[
                series("TSLA", &[(2, 10.0), (3, 15.0), (4, 20.0)]),
                series("GM", &[(2, 5.0), (3, 5.0), (4, 5.0)]),
            ],
            PriceField::Close,
        );
        table.min_max_scale();

        let tsla: Vec<f64> = table.rows.values().filter_map(|r| r[0]).collect();
        let gm: Vec<f64> = table.rows.values().filter_map(|r| r[1]).collect();
        assert_eq!(tsla, vec![0.0, 0.5, 1.0]);
        assert_eq!(gm, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_pearson() {
        let a = [1.0, 2.0, 3.0, 4.0];
        assert!((pearson(&a, &[2.0, 4.0, 6.0, 8.0]).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&a, &[4.0, 3.0, 2.0, 1.0]).unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&a, &[1.0, 1.0, 1.0, 1.0]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
    }

    #[test]
    fn test_correlation_matrix_is_symmetric() {
        let table = PriceTable::align(
            &[
                series("TSLA", &[(2, 10.0), (3, 12.0), (4, 11.0)]),
                series("GM", &[(2, 20.0), (3, 24.0), (4, 22.0)]),
                series("F", &[(2, 9.0), (3, 7.0), (4, 8.0)]),
            ],
            PriceField::AdjClose,
        );
        let matrix = table.correlation_matrix();

        assert_eq!(matrix.len(), 3);
        for (i, row) in matrix.iter().enumerate() {
            assert!((row[i].unwrap() - 1.0).abs() < 1e-12);
            for (j, value) in row.iter().enumerate() {
                assert_eq!(*value, matrix[j][i]);
            }
        }
        assert!(matrix[0][2].unwrap() < 0.0);
    }

    #[test]
    fn test_render_prices_keeps_latest_rows() {
        let table = PriceTable::align(
            &[series("TSLA", &[(2, 10.0), (3, 11.0), (4, 12.0)])],
            PriceField::Close,
        );
        let rendered = render_prices(&table, Interval::Daily, 2).to_string();

        assert!(rendered.contains("TSLA"));
        assert!(!rendered.contains("2024-01-02"));
        assert!(rendered.contains("2024-01-04"));
        assert!(rendered.contains("12.00"));
    }

    #[test]
    fn test_historical_args() {
        let args: HistoricalArgs = parse_args(
            "historical",
            &["-t".to_string(), "c".to_string(), "--no-scale".to_string()],
        )
        .unwrap();
        assert_eq!(args.field, PriceField::Close);
        assert!(args.no_scale);
        assert_eq!(args.rows, 10);

        let bad = parse_args::<HistoricalArgs>("historical", &["-s".to_string(), "01/02/2020".to_string()]);
        assert!(bad.is_err());
    }

    #[tokio::test]
    async fn test_unsourced_views_report_unsupported() {
        let views = ConsoleViews::default();
        let err = views.income(&[], "TSLA", &[]).await.unwrap_err();
        assert!(matches!(err, CompareError::Unsupported(ref v) if v == "income"));

        let err = views
            .screener(&[], ScreenerMode::Technical, "TSLA", &[])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No data source configured for `technical`");
    }

    #[tokio::test]
    async fn test_historical_requires_similar() {
        let views = ConsoleViews::default();
        let series = PriceSeries::empty("TSLA");
        let result = views
            .historical(&[], &series, "TSLA", None, Interval::Daily, &[])
            .await;
        tokio_test::assert_err!(result);
    }
}
