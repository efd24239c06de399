//! Argument grammars of the menu's own handlers

use crate::api::CompareAxis;
use crate::error::Result;
use crate::similarity::{DEFAULT_AXES, NO_COUNTRY_AXES};
use clap::Parser;

/// Parse handler arguments, using the verb as the program name in usage output
pub fn parse_args<T: Parser>(verb: &str, args: &[String]) -> Result<T> {
    Ok(T::try_parse_from(
        std::iter::once(verb.to_string()).chain(args.iter().cloned()),
    )?)
}

/// Message for tokens a handler accepted but did not use; `None` when all were used
pub fn unparsed_message(unparsed: &[String]) -> Option<String> {
    if unparsed.is_empty() {
        return None;
    }
    Some(format!("The following args couldn't be interpreted: {unparsed:?}"))
}

/// Arguments of `get`
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "get",
    about = "Get similar companies to compare with.",
    disable_version_flag = true
)]
pub struct GetArgs {
    /// Polygon data source flag.
    #[arg(short = 'p', long = "polygon")]
    pub polygon: bool,

    /// Similar stocks from finviz using only Industry and Sector.
    #[arg(long = "nocountry")]
    pub no_country: bool,

    /// Leftover tokens, reported and otherwise ignored
    #[arg(hide = true, num_args = 0.., allow_hyphen_values = true)]
    pub unparsed: Vec<String>,
}

impl GetArgs {
    /// Screener axes implied by the flags
    pub fn axes(&self) -> &'static [CompareAxis] {
        if self.no_country {
            &NO_COUNTRY_AXES
        } else {
            &DEFAULT_AXES
        }
    }
}

/// Comma-separated, upper-cased ticker list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TickerList(pub Vec<String>);

fn parse_ticker_list(value: &str) -> std::result::Result<TickerList, String> {
    Ok(TickerList(
        value
            .split(',')
            .map(str::trim)
            .filter(|ticker| !ticker.is_empty())
            .map(str::to_uppercase)
            .collect(),
    ))
}

/// Arguments of `select`
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "select",
    about = "Select similar companies to compare with.",
    disable_version_flag = true
)]
pub struct SelectArgs {
    /// similar companies to compare with.
    #[arg(short = 's', long = "similar", value_parser = parse_ticker_list)]
    pub similar: Option<TickerList>,

    /// Leftover tokens, reported and otherwise ignored
    #[arg(hide = true, num_args = 0.., allow_hyphen_values = true)]
    pub unparsed: Vec<String>,
}

impl SelectArgs {
    /// Parse `select` arguments; a leading bare value is taken as the `-s` list,
    /// so `select NIO,XPEV,LI` works like `select -s NIO,XPEV,LI`.
    pub fn from_menu_args(args: &[String]) -> Result<Self> {
        match args.first() {
            Some(first) if !first.starts_with('-') => {
                let mut args = args.to_vec();
                args.insert(0, "-s".to_string());
                parse_args("select", &args)
            }
            _ => parse_args("select", args),
        }
    }

    /// The selected tickers, empty when none were given
    pub fn tickers(&self) -> Vec<String> {
        self.similar.clone().map(|list| list.0).unwrap_or_default()
    }
}
