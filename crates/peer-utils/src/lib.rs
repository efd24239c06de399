//! Shared utilities for peer-rs
//!
//! This crate provides functionality shared by every interactive menu in the
//! workspace: logging setup and the terminal-wide settings (prompt flair,
//! line editor toggle).

pub mod config;
pub mod logging;

pub use config::TerminalConfig;
pub use logging::{init_tracing, init_tracing_with};
