//! Command parsing for the comparison menu
//!
//! Verbs are matched exactly (case-sensitive) against a fixed table. Everything after
//! the verb is handed to the handler untouched.

use crate::error::{CompareError, Result};
use std::fmt;

/// Screener comparison dimension, forwarded to the generic screener view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenerMode {
    Overview,
    Valuation,
    Financial,
    Ownership,
    Performance,
    Technical,
}

impl ScreenerMode {
    /// All modes in menu order
    pub const ALL: [ScreenerMode; 6] = [
        ScreenerMode::Overview,
        ScreenerMode::Valuation,
        ScreenerMode::Financial,
        ScreenerMode::Ownership,
        ScreenerMode::Performance,
        ScreenerMode::Technical,
    ];

    /// Mode name, identical to the menu verb
    pub fn as_str(self) -> &'static str {
        match self {
            ScreenerMode::Overview => "overview",
            ScreenerMode::Valuation => "valuation",
            ScreenerMode::Financial => "financial",
            ScreenerMode::Ownership => "ownership",
            ScreenerMode::Performance => "performance",
            ScreenerMode::Technical => "technical",
        }
    }
}

impl fmt::Display for ScreenerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognized menu verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Show the menu again
    Help,
    /// Leave this menu (`q`)
    Back,
    /// Leave the whole program (`quit`)
    Quit,
    /// Discover similar companies
    Get,
    /// Set similar companies by hand
    Select,
    /// Historical price comparison
    Historical,
    /// Historical price correlation
    HistoricalCorrelation,
    /// Income statement comparison
    Income,
    /// Balance sheet comparison
    Balance,
    /// Cash flow comparison
    Cashflow,
    /// Sentiment comparison
    Sentiment,
    /// Sentiment correlation
    SentimentCorrelation,
    /// Screener comparison in one of the six modes
    Screener(ScreenerMode),
    /// Portfolio optimization sub-menu (`po`)
    PortfolioOptimization,
}

/// Verb table, in help order
const VERBS: [(&str, Command); 19] = [
    ("help", Command::Help),
    ("q", Command::Back),
    ("quit", Command::Quit),
    ("get", Command::Get),
    ("select", Command::Select),
    ("historical", Command::Historical),
    ("hcorr", Command::HistoricalCorrelation),
    ("income", Command::Income),
    ("balance", Command::Balance),
    ("cashflow", Command::Cashflow),
    ("sentiment", Command::Sentiment),
    ("scorr", Command::SentimentCorrelation),
    ("overview", Command::Screener(ScreenerMode::Overview)),
    ("valuation", Command::Screener(ScreenerMode::Valuation)),
    ("financial", Command::Screener(ScreenerMode::Financial)),
    ("ownership", Command::Screener(ScreenerMode::Ownership)),
    ("performance", Command::Screener(ScreenerMode::Performance)),
    ("technical", Command::Screener(ScreenerMode::Technical)),
    ("po", Command::PortfolioOptimization),
];

/// A verb with the raw tokens that followed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: Command,
    pub args: Vec<String>,
}

impl Command {
    /// Every verb the menu accepts, in help order
    pub fn verbs() -> impl Iterator<Item = &'static str> {
        VERBS.iter().map(|(verb, _)| *verb)
    }

    /// Exact lookup of a verb
    pub fn from_verb(verb: &str) -> Option<Self> {
        VERBS
            .iter()
            .find(|(candidate, _)| *candidate == verb)
            .map(|(_, command)| *command)
    }

    /// The verb that selects this command
    pub fn verb(self) -> &'static str {
        VERBS
            .iter()
            .find(|(_, command)| *command == self)
            .map_or("", |(verb, _)| *verb)
    }

    /// Split a line into verb and residual arguments
    ///
    /// Returns `Ok(None)` for a blank line.
    pub fn parse(input: &str) -> Result<Option<ParsedCommand>> {
        let mut tokens = input.split_whitespace();
        let Some(verb) = tokens.next() else {
            return Ok(None);
        };

        let command = Self::from_verb(verb)
            .ok_or_else(|| CompareError::UnrecognizedCommand(verb.to_string()))?;

        Ok(Some(ParsedCommand {
            command,
            args: tokens.map(str::to_string).collect(),
        }))
    }

    /// One-line description shown in the help screen
    pub fn description(self) -> &'static str {
        match self {
            Command::Help => "show this comparison analysis menu again",
            Command::Back => "quit this menu, and shows back to main menu",
            Command::Quit => "quit to abandon program",
            Command::Get => "get similar companies",
            Command::Select => "select similar companies",
            Command::Historical => "historical price data comparison",
            Command::HistoricalCorrelation => "historical price correlation",
            Command::Income => "income financials comparison",
            Command::Balance => "balance financials comparison",
            Command::Cashflow => "cashflow comparison",
            Command::Sentiment => "sentiment analysis comparison",
            Command::SentimentCorrelation => "sentiment correlation",
            Command::Screener(ScreenerMode::Overview) => "brief overview comparison",
            Command::Screener(ScreenerMode::Valuation) => "brief valuation comparison",
            Command::Screener(ScreenerMode::Financial) => "brief financial comparison",
            Command::Screener(ScreenerMode::Ownership) => "brief ownership comparison",
            Command::Screener(ScreenerMode::Performance) => "brief performance comparison",
            Command::Screener(ScreenerMode::Technical) => "brief technical comparison",
            Command::PortfolioOptimization => "portfolio optimization for selected tickers",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_args() {
        let parsed = Command::parse("get -p  --nocountry").unwrap().unwrap();
        assert_eq!(parsed.command, Command::Get);
        assert_eq!(parsed.args, vec!["-p", "--nocountry"]);
    }

    #[test]
    fn test_parse_screener_modes() {
        for mode in ScreenerMode::ALL {
            let parsed = Command::parse(mode.as_str()).unwrap().unwrap();
            assert_eq!(parsed.command, Command::Screener(mode));
            assert!(parsed.args.is_empty());
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let err = Command::parse("HELP").unwrap_err();
        assert!(matches!(err, CompareError::UnrecognizedCommand(ref v) if v == "HELP"));
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(
            Command::parse("analyze TSLA"),
            Err(CompareError::UnrecognizedCommand(_))
        ));
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_quit_verbs() {
        assert_eq!(Command::from_verb("q"), Some(Command::Back));
        assert_eq!(Command::from_verb("quit"), Some(Command::Quit));
        assert_eq!(Command::from_verb("exit"), None);
    }

    #[test]
    fn test_verb_table_is_consistent() {
        assert_eq!(Command::verbs().count(), 19);
        for verb in Command::verbs() {
            let command = Command::from_verb(verb).unwrap();
            assert_eq!(command.verb(), verb);
            assert!(!command.description().is_empty());
        }
    }
}
