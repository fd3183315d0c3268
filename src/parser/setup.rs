//! Setup-phase parsing
//!
//! The header region before the first turn marker names both players, the coin
//! flip, who goes first, the opening hands and any Pokémon placed before turn 1.

use crate::config::ParseOptions;
use crate::core::{
    CoinFlipChoice, EventClock, EventDetails, EventSequence, EventType, GameEvent, Player,
};
use crate::parser::card_list::revealed_after;
use crate::parser::patterns::{PatternLibrary, SetupLine};
use crate::parser::PokemonNames;
use crate::{LogError, Result};
use tracing::debug;

/// Everything recovered from the setup region
#[derive(Debug, Clone)]
pub struct SetupOutcome {
    /// Players in first-seen order
    pub players: [Player; 2],
    pub coin_flip_winner: String,
    pub coin_flip_choice: CoinFlipChoice,
    pub events: Vec<GameEvent>,
    pub pokemon: PokemonNames,
    /// Index of the first turn-marker line
    pub turns_start: usize,
}

impl SetupOutcome {
    /// Usernames ordered first player first
    pub fn turn_order(&self) -> [&str; 2] {
        let [a, b] = &self.players;
        if b.is_first {
            [b.username.as_str(), a.username.as_str()]
        } else {
            [a.username.as_str(), b.username.as_str()]
        }
    }
}

/// First-seen-wins assignment of the two player slots
#[derive(Default)]
struct PlayerSlots {
    names: Vec<String>,
}

impl PlayerSlots {
    fn observe(&mut self, name: &str) {
        if self.names.len() < 2 && !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }

    fn other(&self, name: &str) -> Option<&str> {
        self.names.iter().find(|n| n.as_str() != name).map(String::as_str)
    }

    fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// Parse `lines[start..end]`, where `end` is the first turn marker
pub fn parse_setup(
    patterns: &PatternLibrary,
    options: &ParseOptions,
    lines: &[&str],
    start: usize,
    end: usize,
    sequence: &mut EventSequence,
) -> Result<SetupOutcome> {
    let end = end.min(lines.len());
    let mut slots = PlayerSlots::default();
    let mut coin_winner: Option<String> = None;
    let mut decision: Option<(String, bool)> = None;
    let mut events = Vec::new();
    let mut pokemon = PokemonNames::default();
    let mut clock = EventClock::new(sequence, 0);

    for index in start..end {
        let Some(parsed) = patterns.classify_setup(lines[index]) else {
            continue;
        };

        match parsed {
            SetupLine::CoinChoice { player, call } => {
                debug!(player = %player, call = %call, "opening coin flip call");
                slots.observe(&player);
            }
            SetupLine::CoinWinner { player } => {
                slots.observe(&player);
                coin_winner.get_or_insert(player);
            }
            SetupLine::GoesFirst { player, first } => {
                slots.observe(&player);
                decision.get_or_insert((player, first));
            }
            SetupLine::OpeningHand { player, count } => {
                slots.observe(&player);
                let card_names = revealed_after(patterns, lines, index, options.draw_lookahead);
                let description = format!("{player} drew {count} cards for the opening hand");
                events.push(clock.stamp(
                    &player,
                    EventType::Draw,
                    description,
                    EventDetails {
                        card_count: Some(count),
                        card_names,
                        ..Default::default()
                    },
                ));
            }
            SetupLine::Mulligan { player, count } => {
                let description = if count == 1 {
                    format!("{player} took a mulligan")
                } else {
                    format!("{player} took {count} mulligans")
                };
                events.push(clock.stamp(
                    &player,
                    EventType::Mulligan,
                    description,
                    EventDetails {
                        card_count: Some(count),
                        ..Default::default()
                    },
                ));
            }
            SetupLine::MulliganDraw { player, count, mulliganer } => {
                let card_names = revealed_after(patterns, lines, index, options.draw_lookahead);
                let description =
                    format!("{player} drew {count} more cards because {mulliganer} took a mulligan");
                events.push(clock.stamp(
                    &player,
                    EventType::Draw,
                    description,
                    EventDetails {
                        card_count: Some(count),
                        card_names,
                        ..Default::default()
                    },
                ));
            }
            SetupLine::PokemonPlay { player, pokemon: name, location } => {
                pokemon.insert(&name);
                let description = format!("{player} played {name} to the {location}");
                events.push(clock.stamp(
                    &player,
                    EventType::PlayPokemon,
                    description,
                    EventDetails {
                        pokemon_name: Some(name),
                        location: Some(location),
                        ..Default::default()
                    },
                ));
            }
        }
    }

    if slots.names.len() < 2 {
        return Err(LogError::PlayersNotFound);
    }
    let coin_winner = coin_winner.ok_or(LogError::MissingCoinFlip)?;

    // The explicit decision wins; otherwise the coin-flip winner goes first
    let (first_player, choice) = match &decision {
        Some((decider, first)) if slots.contains(decider) => {
            let choice = if *first {
                CoinFlipChoice::First
            } else {
                CoinFlipChoice::Second
            };
            let first_player = if *first {
                Some(decider.as_str())
            } else {
                slots.other(decider)
            };
            (first_player, choice)
        }
        _ => (Some(coin_winner.as_str()), CoinFlipChoice::First),
    };
    let first_player = first_player
        .filter(|name| slots.contains(name))
        .unwrap_or(slots.names[0].as_str())
        .to_string();

    let players = [
        Player::new(slots.names[0].clone(), slots.names[0] == first_player),
        Player::new(slots.names[1].clone(), slots.names[1] == first_player),
    ];

    Ok(SetupOutcome {
        players,
        coin_flip_winner: coin_winner,
        coin_flip_choice: choice,
        events,
        pokemon,
        turns_start: end,
    })
}
