//! Session state owned by one running comparison menu

use crate::api::PriceSeries;
use crate::error::{CompareError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Minutes in a day; an interval of this length means daily bars
pub const DAILY_MINUTES: u32 = 1440;

/// Bar interval of the loaded price series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interval {
    /// Intraday bars of the given number of minutes
    Intraday(u32),
    /// Daily bars
    #[default]
    Daily,
}

impl Interval {
    /// Interval length in minutes
    pub fn minutes(self) -> u32 {
        match self {
            Interval::Intraday(minutes) => minutes,
            Interval::Daily => DAILY_MINUTES,
        }
    }

    /// Heading shown in the help screen
    pub fn label(self) -> String {
        match self {
            Interval::Daily => "Daily".to_string(),
            Interval::Intraday(_) => format!("Intraday {self}"),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}min", self.minutes())
    }
}

impl FromStr for Interval {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_end_matches("min");
        let minutes: u32 = digits
            .parse()
            .map_err(|_| CompareError::Other(format!("Invalid interval: {s}")))?;

        match minutes {
            0 => Err(CompareError::Other(format!("Invalid interval: {s}"))),
            DAILY_MINUTES => Ok(Interval::Daily),
            m => Ok(Interval::Intraday(m)),
        }
    }
}

/// Which mechanism last populated the similar-company set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    Polygon,
    Finviz,
    User,
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Polygon => write!(f, "Polygon"),
            Owner::Finviz => write!(f, "Finviz"),
            Owner::User => write!(f, "User"),
        }
    }
}

/// State threaded through every dispatch of the comparison menu
///
/// `ticker`, `start`, `interval` and `series` come from the caller and stay fixed.
/// Only the `get` and `select` handlers replace the similar set, always through
/// [`Session::set_similar`], which keeps `owner` absent exactly when the set is empty.
#[derive(Debug, Clone)]
pub struct Session {
    ticker: String,
    start: Option<NaiveDate>,
    interval: Interval,
    series: Arc<PriceSeries>,
    similar: Vec<String>,
    owner: Option<Owner>,
}

impl Session {
    pub fn new(
        ticker: impl Into<String>,
        start: Option<NaiveDate>,
        interval: Interval,
        series: Arc<PriceSeries>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            start,
            interval,
            series,
            similar: Vec::new(),
            owner: None,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn similar(&self) -> &[String] {
        &self.similar
    }

    pub fn owner(&self) -> Option<Owner> {
        self.owner
    }

    /// Replace the similar set wholesale
    pub fn set_similar(&mut self, similar: Vec<String>, owner: Owner) {
        self.owner = if similar.is_empty() { None } else { Some(owner) };
        self.similar = similar;
    }

    /// Active ticker followed by the similar set, as handed to portfolio optimization
    pub fn all_tickers(&self) -> Vec<String> {
        std::iter::once(self.ticker.clone())
            .chain(self.similar.iter().cloned())
            .collect()
    }
}
