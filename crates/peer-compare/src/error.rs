//! Error types for the comparison menu

use thiserror::Error;

/// Comparison menu errors
///
/// None of these end the menu: the dispatcher reports them and prompts again.
#[derive(Debug, Error)]
pub enum CompareError {
    /// The first token of the input line is not a menu verb
    #[error("The command selected doesn't exist: {0}")]
    UnrecognizedCommand(String),

    /// A handler rejected its arguments, or the user asked for `-h`
    #[error("{0}")]
    Arguments(#[from] clap::Error),

    /// A similarity provider answered with an error envelope
    #[error("{provider} error: {message}")]
    Provider { provider: String, message: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A comparison has no data source wired in
    #[error("No data source configured for `{0}`")]
    Unsupported(String),

    /// Reading from the terminal failed
    #[error("Input error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl CompareError {
    /// Shorthand for a provider error envelope
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// True when clap produced help output rather than a real failure
    pub fn is_help_request(&self) -> bool {
        matches!(
            self,
            Self::Arguments(err) if err.kind() == clap::error::ErrorKind::DisplayHelp
        )
    }
}

/// Result type alias for comparison menu operations
pub type Result<T> = std::result::Result<T, CompareError>;
