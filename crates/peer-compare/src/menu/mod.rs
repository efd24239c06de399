//! Comparison analysis menu
//!
//! A line-oriented loop over a single [`Session`]. Each line is parsed into a
//! [`Command`], dispatched to its handler and answered with a [`ControlSignal`].
//! Handler failures are printed and never leave the loop.
//!
//! # Example
//!
//! ```rust,ignore
//! use peer_compare::menu::{ComparisonMenu, input::StdinLines};
//!
//! let mut menu = ComparisonMenu::from_config(session, config, views, portfolio)?;
//! let signal = menu.run(&mut StdinLines::stdin()).await?;
//! ```

pub mod args;
pub mod commands;
pub mod input;

use crate::config::CompareConfig;
use crate::error::{CompareError, Result};
use crate::session::{Owner, Session};
use crate::similarity::{
    FinvizProvider, MAX_SIMILAR, PolygonProvider, SimilarityProvider, cap_similar,
};
use crate::views::{ComparisonViews, PortfolioMenu};
use args::{GetArgs, SelectArgs, parse_args, unparsed_message};
use commands::{Command, ParsedCommand, ScreenerMode};
use input::LineSource;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the caller should do after a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// Prompt again
    Continue,
    /// Leave this menu and return to the parent
    ExitMenu,
    /// Leave the program
    ExitProgram,
}

impl ControlSignal {
    /// `None` to stay, `Some(false)` to leave the menu, `Some(true)` to leave the program
    pub fn into_exit(self) -> Option<bool> {
        match self {
            ControlSignal::Continue => None,
            ControlSignal::ExitMenu => Some(false),
            ControlSignal::ExitProgram => Some(true),
        }
    }
}

impl From<ControlSignal> for Option<bool> {
    fn from(signal: ControlSignal) -> Self {
        signal.into_exit()
    }
}

/// Everything the menu delegates to
pub struct Collaborators {
    /// Source for `get -p`
    pub polygon: Arc<dyn SimilarityProvider>,
    /// Source for plain `get`
    pub screener: Arc<dyn SimilarityProvider>,
    pub views: Arc<dyn ComparisonViews>,
    pub portfolio: Arc<dyn PortfolioMenu>,
}

impl Collaborators {
    /// Wire the Polygon and Finviz providers from config
    pub fn from_config(
        config: &CompareConfig,
        views: Arc<dyn ComparisonViews>,
        portfolio: Arc<dyn PortfolioMenu>,
    ) -> Result<Self> {
        Ok(Self {
            polygon: Arc::new(PolygonProvider::from_config(config)?),
            screener: Arc::new(FinvizProvider::from_config(config)?),
            views,
            portfolio,
        })
    }
}

/// Help sections, separated by blank lines
const HELP_SECTIONS: [&[Command]; 4] = [
    &[Command::Help, Command::Back, Command::Quit],
    &[Command::Get, Command::Select],
    &[
        Command::Historical,
        Command::HistoricalCorrelation,
        Command::Income,
        Command::Balance,
        Command::Cashflow,
        Command::Sentiment,
        Command::SentimentCorrelation,
    ],
    &[
        Command::Screener(ScreenerMode::Overview),
        Command::Screener(ScreenerMode::Valuation),
        Command::Screener(ScreenerMode::Financial),
        Command::Screener(ScreenerMode::Ownership),
        Command::Screener(ScreenerMode::Performance),
        Command::Screener(ScreenerMode::Technical),
    ],
];

/// The comparison analysis controller
pub struct ComparisonMenu {
    session: Session,
    config: CompareConfig,
    collaborators: Collaborators,
}

impl ComparisonMenu {
    pub fn new(session: Session, config: CompareConfig, collaborators: Collaborators) -> Self {
        Self {
            session,
            config,
            collaborators,
        }
    }

    /// Build with the configured similarity providers
    pub fn from_config(
        session: Session,
        config: CompareConfig,
        views: Arc<dyn ComparisonViews>,
        portfolio: Arc<dyn PortfolioMenu>,
    ) -> Result<Self> {
        let collaborators = Collaborators::from_config(&config, views, portfolio)?;
        Ok(Self::new(session, config, collaborators))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Prompt shown before each line
    pub fn prompt(&self) -> String {
        self.config.terminal.prompt("ca")
    }

    /// Print help, then read and dispatch lines until a handler asks to leave
    ///
    /// End of input counts as leaving the program. Only a failing line source
    /// returns an error.
    pub async fn run(&mut self, input: &mut dyn LineSource) -> Result<ControlSignal> {
        println!("{}", self.help());
        let prompt = self.prompt();

        loop {
            let Some(line) = input.read_line(&prompt)? else {
                debug!("End of input");
                return Ok(ControlSignal::ExitProgram);
            };

            match self.dispatch(&line).await {
                ControlSignal::Continue => {}
                signal => {
                    debug!(?signal, "Leaving comparison menu");
                    return Ok(signal);
                }
            }
        }
    }

    /// Process one input line
    ///
    /// Never fails: unknown verbs and handler errors are printed and answered with
    /// [`ControlSignal::Continue`], leaving the session as it was.
    pub async fn dispatch(&mut self, line: &str) -> ControlSignal {
        self.collaborators.views.close_plots();

        let parsed = match Command::parse(line) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => return ControlSignal::Continue,
            Err(e) => {
                report(&e);
                return ControlSignal::Continue;
            }
        };

        debug!(command = %parsed.command, args = ?parsed.args, "Dispatching");
        match self.execute(parsed).await {
            Ok(signal) => signal,
            Err(e) => {
                report(&e);
                ControlSignal::Continue
            }
        }
    }

    /// Run a parsed command
    pub async fn execute(&mut self, parsed: ParsedCommand) -> Result<ControlSignal> {
        let ParsedCommand { command, args } = parsed;
        let views = Arc::clone(&self.collaborators.views);

        match command {
            Command::Help => println!("{}", self.help()),
            Command::Back => return Ok(ControlSignal::ExitMenu),
            Command::Quit => return Ok(ControlSignal::ExitProgram),
            Command::Get => self.get_similar(&args).await?,
            Command::Select => self.select_similar(&args)?,
            Command::Historical => {
                let s = &self.session;
                views
                    .historical(&args, s.series(), s.ticker(), s.start(), s.interval(), s.similar())
                    .await?;
            }
            Command::HistoricalCorrelation => {
                let s = &self.session;
                views
                    .correlation(&args, s.series(), s.ticker(), s.start(), s.interval(), s.similar())
                    .await?;
            }
            Command::Income => {
                views
                    .income(&args, self.session.ticker(), self.session.similar())
                    .await?;
            }
            Command::Balance => {
                views
                    .balance(&args, self.session.ticker(), self.session.similar())
                    .await?;
            }
            Command::Cashflow => {
                views
                    .cashflow(&args, self.session.ticker(), self.session.similar())
                    .await?;
            }
            Command::Sentiment => {
                views
                    .sentiment(&args, self.session.ticker(), self.session.similar())
                    .await?;
            }
            Command::SentimentCorrelation => {
                views
                    .sentiment_correlation(&args, self.session.ticker(), self.session.similar())
                    .await?;
            }
            Command::Screener(mode) => {
                views
                    .screener(&args, mode, self.session.ticker(), self.session.similar())
                    .await?;
            }
            Command::PortfolioOptimization => {
                let tickers = self.session.all_tickers();
                return self.collaborators.portfolio.menu(tickers).await;
            }
        }

        Ok(ControlSignal::Continue)
    }

    /// `get`: replace the similar set from Polygon (`-p`) or the screener
    async fn get_similar(&mut self, args: &[String]) -> Result<()> {
        let parsed: GetArgs = parse_args("get", args)?;
        report_unparsed(&parsed.unparsed);
        let provider = if parsed.polygon {
            Arc::clone(&self.collaborators.polygon)
        } else {
            Arc::clone(&self.collaborators.screener)
        };
        let owner = provider.owner();

        let peers = provider
            .similar(self.session.ticker(), parsed.axes())
            .await
            .inspect_err(|e| {
                warn!(%owner, ticker = self.session.ticker(), error = %e, "Similar companies lookup failed");
            })?;
        let peers: Vec<String> = peers.into_iter().map(|p| p.to_uppercase()).collect();

        if !peers.is_empty() {
            println!("\n[{owner}] Similar Companies: {}", peers.join(", "));
        }

        let total = peers.len();
        let peers = cap_similar(peers, &mut rand::rng());
        if total > MAX_SIMILAR {
            println!(
                "\nThe limit of stocks to compare with are {MAX_SIMILAR}. Hence, {MAX_SIMILAR} random similar stocks will be displayed.\nThe selected list will be: {}",
                peers.join(", ")
            );
        }
        println!();

        info!(%owner, count = peers.len(), total, "Similar companies updated");
        self.session.set_similar(peers, owner);
        Ok(())
    }

    /// `select`: replace the similar set with a user list
    fn select_similar(&mut self, args: &[String]) -> Result<()> {
        let parsed = SelectArgs::from_menu_args(args)?;
        report_unparsed(&parsed.unparsed);
        let tickers = parsed.tickers();
        info!(count = tickers.len(), "Similar companies selected");
        self.session.set_similar(tickers, Owner::User);
        println!();
        Ok(())
    }

    /// Help screen for the current session
    pub fn help(&self) -> String {
        let session = &self.session;
        let mut lines = Vec::new();

        let heading = format!("\n{} Stock: {}", session.interval().label(), session.ticker());
        match session.start() {
            Some(start) => lines.push(format!("{heading} (from {})", start.format("%Y-%m-%d"))),
            None => lines.push(heading),
        }

        if let Some(owner) = session.owner() {
            lines.push(format!(
                "[{owner}] Similar Companies: {}",
                session.similar().join(", ")
            ));
        }

        lines.push("\nComparison Analysis Mode:".to_string());
        for section in HELP_SECTIONS {
            for command in section {
                lines.push(format!("   {:<14}{}", command.verb(), command.description()));
            }
            lines.push(String::new());
        }

        if !session.similar().is_empty() {
            let po = Command::PortfolioOptimization;
            lines.push(format!("   > {:<12}{}", po.verb(), po.description()));
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

/// Run a comparison menu to completion
///
/// Returns `false` to go back to the parent menu, `true` to leave the program.
pub async fn menu(
    session: Session,
    config: CompareConfig,
    collaborators: Collaborators,
    input: &mut dyn LineSource,
) -> Result<bool> {
    let mut menu = ComparisonMenu::new(session, config, collaborators);
    let signal = menu.run(input).await?;
    Ok(signal.into_exit().unwrap_or(true))
}

fn report_unparsed(unparsed: &[String]) {
    if let Some(message) = unparsed_message(unparsed) {
        debug!(?unparsed, "Ignoring leftover arguments");
        println!("{message}");
    }
}

fn report(err: &CompareError) {
    if err.is_help_request() {
        println!("{err}");
        return;
    }
    debug!(error = %err, "Command failed");
    println!("{err}\n");
}
