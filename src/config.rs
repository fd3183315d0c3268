//! Tunable knobs for parsing and deck reconstruction
//!
//! Both option sets deserialize from JSON with every field optional, so a config
//! file only needs to name the values it overrides.

use crate::{LogError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for [`crate::parser::LogParser`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// How many lines after a "drew N cards" line are searched for revealed card bullets
    pub draw_lookahead: usize,
    /// Prize cards needed to infer a winner when the log has no explicit win line
    pub prize_win_threshold: u32,
    /// Damage represented by one damage counter
    pub damage_per_counter: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            draw_lookahead: 5,
            prize_win_threshold: 6,
            damage_per_counter: 10,
        }
    }
}

/// Options for [`crate::deck::DeckReconstructor`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeckOptions {
    /// Copy limit for every card except basic energy
    pub max_copies: u32,
}

impl Default for DeckOptions {
    fn default() -> Self {
        DeckOptions { max_copies: 4 }
    }
}

/// Combined configuration file layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parse: ParseOptions,
    pub deck: DeckOptions,
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a configuration from JSON text
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| LogError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.parse.draw_lookahead, 5);
        assert_eq!(config.parse.prize_win_threshold, 6);
        assert_eq!(config.parse.damage_per_counter, 10);
        assert_eq!(config.deck.max_copies, 4);
    }

    #[test]
    fn test_partial_override() {
        let config = Config::parse(r#"{ "parse": { "drawLookahead": 8 } }"#).unwrap();
        assert_eq!(config.parse.draw_lookahead, 8);
        assert_eq!(config.parse.prize_win_threshold, 6);
        assert_eq!(config.deck, DeckOptions::default());
    }

    #[test]
    fn test_invalid_config() {
        let err = Config::parse("{ not json").unwrap_err();
        assert!(matches!(err, LogError::Config(_)));
    }
}
