//! Terminal-wide configuration shared by all menus

use serde::{Deserialize, Serialize};

/// Settings that apply to every menu prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Decoration printed in front of every menu prompt
    pub flair: String,
    /// Use the line editor (history + command completion) instead of plain stdin
    pub use_line_editor: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            flair: String::new(),
            use_line_editor: true,
        }
    }
}

impl TerminalConfig {
    /// Load overrides from `PEER_FLAIR` and `PEER_USE_LINE_EDITOR`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(flair) = std::env::var("PEER_FLAIR") {
            config.flair = flair;
        }
        if let Ok(flag) = std::env::var("PEER_USE_LINE_EDITOR") {
            config.use_line_editor = parse_flag(&flag).unwrap_or(config.use_line_editor);
        }
        config
    }

    /// Prompt shown by a menu, e.g. `🦍 (ca)> `
    pub fn prompt(&self, menu: &str) -> String {
        if self.flair.is_empty() {
            format!("({menu})> ")
        } else {
            format!("{} ({menu})> ", self.flair)
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_with_flair() {
        let config = TerminalConfig {
            flair: "🦍".to_string(),
            use_line_editor: false,
        };
        assert_eq!(config.prompt("ca"), "🦍 (ca)> ");
    }

    #[test]
    fn test_prompt_without_flair() {
        assert_eq!(TerminalConfig::default().prompt("ca"), "(ca)> ");
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
