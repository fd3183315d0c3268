//! Log parsing
//!
//! [`LogParser`] is the single entry point: it validates the text, runs the setup
//! and turn parsers over the shared [`PatternLibrary`], folds statistics and
//! resolves the winner.

pub mod card_list;
pub mod patterns;
pub mod setup;
pub mod turns;

pub use patterns::{Concession, LineMatch, PatternLibrary, SetupLine, TurnRule, TURN_PRECEDENCE};
pub use setup::{parse_setup, SetupOutcome};
pub use turns::{TurnOutcome, TurnParser};

use crate::config::ParseOptions;
use crate::core::{EventSequence, MatchData, WinCondition};
use crate::stats;
use crate::{LogError, Result};
use rustc_hash::FxHashSet;
use tracing::debug;

/// Insertion-ordered set of Pokémon names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PokemonNames {
    order: Vec<String>,
    seen: FxHashSet<String>,
}

impl PokemonNames {
    /// Add a name unless already present
    pub fn insert(&mut self, name: &str) {
        if !self.seen.contains(name) {
            self.seen.insert(name.to_string());
            self.order.push(name.to_string());
        }
    }

    /// Append the names of `other` after the existing ones
    pub fn extend(&mut self, other: &PokemonNames) {
        for name in &other.order {
            self.insert(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.order
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

/// Parses raw log text into [`MatchData`]
pub struct LogParser {
    patterns: &'static PatternLibrary,
    options: ParseOptions,
}

impl LogParser {
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        LogParser {
            patterns: PatternLibrary::global(),
            options,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse with a fresh event sequence, so IDs always start at `event-0`
    pub fn parse(&self, text: &str) -> Result<MatchData> {
        let mut sequence = EventSequence::new();
        self.parse_with(text, &mut sequence)
    }

    /// Parse, drawing event IDs from a caller-owned sequence
    pub fn parse_with(&self, text: &str, sequence: &mut EventSequence) -> Result<MatchData> {
        if text.trim().is_empty() {
            return Err(LogError::EmptyLog);
        }
        let lines: Vec<&str> = text.lines().collect();

        let setup_idx = lines
            .iter()
            .position(|line| self.patterns.is_setup_marker(line))
            .ok_or(LogError::MissingSetup)?;
        let turns_idx = lines
            .iter()
            .skip(setup_idx + 1)
            .position(|line| self.patterns.is_turn_marker(line))
            .map(|offset| setup_idx + 1 + offset)
            .unwrap_or(lines.len());

        let setup = parse_setup(
            self.patterns,
            &self.options,
            &lines,
            setup_idx + 1,
            turns_idx,
            sequence,
        )?;
        let turn_order = setup.turn_order();
        let outcome =
            TurnParser::new(self.patterns, &self.options, turn_order).parse(&lines, setup.turns_start, sequence);
        if outcome.turns.is_empty() {
            return Err(LogError::NoTurns);
        }

        let mut pokemon = setup.pokemon.clone();
        pokemon.extend(&outcome.pokemon);

        let mut events = setup.events;
        events.extend(outcome.events);

        let usernames = [setup.players[0].username.as_str(), setup.players[1].username.as_str()];
        let mut statistics = stats::aggregate(&events, usernames);

        let (winner, win_condition) = match outcome.winner {
            Some(winner) => (Some(winner), outcome.win_condition),
            None => match self.find_concession(&lines, usernames) {
                Some(winner) => (Some(winner), Some(WinCondition::Concede)),
                None => match stats::prize_leader(&statistics, self.options.prize_win_threshold) {
                    Some(winner) => (Some(winner), Some(WinCondition::Prizes)),
                    None => (None, None),
                },
            },
        };

        stats::count_turns(&mut statistics, &outcome.turns);

        debug!(
            events = events.len(),
            turns = outcome.turns.len(),
            winner = winner.as_deref().unwrap_or("-"),
            "parsed match"
        );

        Ok(MatchData {
            players: setup.players,
            coin_flip_winner: setup.coin_flip_winner,
            coin_flip_choice: setup.coin_flip_choice,
            turns: outcome.turns,
            events,
            winner,
            win_condition,
            statistics,
            pokemon_in_match: pokemon.into_vec(),
        })
    }

    /// Winner named by the first concession line anywhere in the log
    fn find_concession(&self, lines: &[&str], players: [&str; 2]) -> Option<String> {
        lines.iter().find_map(|line| match self.patterns.concession(line)? {
            Concession::Winner(name) if players.contains(&name.as_str()) => Some(name),
            Concession::Loser(name) => match players {
                [a, b] if a == name => Some(b.to_string()),
                [a, b] if b == name => Some(a.to_string()),
                _ => None,
            },
            Concession::Winner(_) => None,
        })
    }
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a log with default options
pub fn parse_log(text: &str) -> Result<MatchData> {
    LogParser::new().parse(text)
}
