//! Comparison analysis menu
//!
//! An interactive sub-menu that compares one stock against a set of similar
//! companies. It includes:
//!
//! - A verb parser over a fixed command table
//! - Similar-company discovery from Polygon or the Finviz screener, capped at 10
//! - Manual selection of the comparison set
//! - Dispatch of comparison verbs to pluggable views and a portfolio sub-menu
//!
//! # Example
//!
//! ```rust,ignore
//! use peer_compare::{CompareConfig, ComparisonMenu, Session};
//! use peer_compare::menu::input::StdinLines;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = CompareConfig::from_env()?;
//!     let session = Session::new("TSLA", None, Interval::Daily, series);
//!
//!     let mut menu = ComparisonMenu::from_config(session, config, views, portfolio)?;
//!     let signal = menu.run(&mut StdinLines::stdin()).await?;
//!     println!("{:?}", signal.into_exit());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod menu;
pub mod session;
pub mod similarity;
pub mod views;

pub use config::CompareConfig;
pub use error::{CompareError, Result};
pub use menu::commands::{Command, ScreenerMode};
pub use menu::{Collaborators, ComparisonMenu, ControlSignal};
pub use session::{Interval, Owner, Session};
pub use similarity::{FinvizProvider, PolygonProvider, SimilarityProvider};
pub use views::{ComparisonViews, PortfolioMenu};
