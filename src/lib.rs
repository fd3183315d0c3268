//! Pokémon TCG Live log analysis
//!
//! Parses an exported battle log into a typed event stream with per-player
//! statistics, and reconstructs the observed part of each player's deck.

pub mod config;
pub mod core;
pub mod deck;
pub mod error;
pub mod parser;
pub mod stats;

pub use config::{Config, DeckOptions, ParseOptions};
pub use crate::core::{EventSequence, EventType, GameEvent, MatchData, Player, WinCondition};
pub use deck::{reconstruct_decks, DeckCard, DeckReconstructor, PlayerDecks, ReconstructedDeck};
pub use error::{LogError, Result};
pub use parser::{parse_log, LogParser};
pub use stats::PlayerStatistics;
