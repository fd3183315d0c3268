//! Parse result types: players, turns and the assembled match

use crate::core::GameEvent;
use crate::stats::PlayerStatistics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A participant identified in the setup phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub username: String,
    pub is_first: bool,
}

impl Player {
    pub fn new(username: impl Into<String>, is_first: bool) -> Self {
        Player {
            username: username.into(),
            is_first,
        }
    }
}

/// Seat picked by the coin-flip winner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinFlipChoice {
    First,
    Second,
}

/// How the match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinCondition {
    Prizes,
    DeckOut,
    NoPokemon,
    Concede,
}

impl fmt::Display for WinCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WinCondition::Prizes => "prizes",
            WinCondition::DeckOut => "deck_out",
            WinCondition::NoPokemon => "no_pokemon",
            WinCondition::Concede => "concede",
        };
        write!(f, "{s}")
    }
}

/// One player's block of actions between two turn markers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// 1-based turn number
    pub number: u32,
    pub player: String,
    pub events: Vec<GameEvent>,
}

/// Everything recovered from one log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchData {
    pub players: [Player; 2],
    pub coin_flip_winner: String,
    pub coin_flip_choice: CoinFlipChoice,
    pub turns: Vec<Turn>,
    /// Setup events followed by turn events
    pub events: Vec<GameEvent>,
    pub winner: Option<String>,
    pub win_condition: Option<WinCondition>,
    pub statistics: BTreeMap<String, PlayerStatistics>,
    pub pokemon_in_match: Vec<String>,
}

impl MatchData {
    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    pub fn first_player(&self) -> &Player {
        if self.players[1].is_first {
            &self.players[1]
        } else {
            &self.players[0]
        }
    }

    /// The other participant, if `username` is one of the two players
    pub fn opponent_of(&self, username: &str) -> Option<&str> {
        match &self.players {
            [a, b] if a.username == username => Some(b.username.as_str()),
            [a, b] if b.username == username => Some(a.username.as_str()),
            _ => None,
        }
    }

    pub fn events_for<'a>(&'a self, username: &'a str) -> impl Iterator<Item = &'a GameEvent> + 'a {
        self.events.iter().filter(move |e| e.player == username)
    }
}
