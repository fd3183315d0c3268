//! Game events recognized in a log

use crate::core::{TrainerKind, WinCondition};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of action an event records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Draw,
    PlayPokemon,
    Evolve,
    AttachEnergy,
    PlayTrainer,
    UseAbility,
    Attack,
    Knockout,
    PrizeTaken,
    Switch,
    CoinFlip,
    Mulligan,
    Win,
}

/// Type-specific fields of an event; everything is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pokemon_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evolved_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ability_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attacking_pokemon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_pokemon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage_breakdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer_category: Option<TrainerKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knocked_out_pokemon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prizes_taken: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heads_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tails_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_condition: Option<WinCondition>,
}

/// One recognized action
///
/// Events are immutable once built; `timestamp` orders events inside a turn and
/// restarts at 0 on every turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: String,
    pub turn: u32,
    pub player: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub description: String,
    pub details: EventDetails,
    pub timestamp: u32,
}

/// Source of event IDs
///
/// Owned by the caller and threaded through a parse, so two parses started from
/// the same position produce identical IDs.
#[derive(Debug, Clone, Default)]
pub struct EventSequence {
    next: u64,
}

impl EventSequence {
    pub fn new() -> Self {
        EventSequence { next: 0 }
    }

    pub fn starting_at(next: u64) -> Self {
        EventSequence { next }
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }

    /// Number of IDs handed out since the last reset
    pub fn position(&self) -> u64 {
        self.next
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("event-{}", self.next);
        self.next += 1;
        id
    }
}

/// Per-turn event builder that stamps IDs, turn numbers and timestamps
pub struct EventClock<'a> {
    sequence: &'a mut EventSequence,
    turn: u32,
    timestamp: u32,
}

impl<'a> EventClock<'a> {
    pub fn new(sequence: &'a mut EventSequence, turn: u32) -> Self {
        EventClock {
            sequence,
            turn,
            timestamp: 0,
        }
    }

    /// Move to a new turn; timestamps restart at 0
    pub fn advance_turn(&mut self, turn: u32) {
        self.turn = turn;
        self.timestamp = 0;
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn stamp(
        &mut self,
        player: &str,
        event_type: EventType,
        description: String,
        details: EventDetails,
    ) -> GameEvent {
        let event = GameEvent {
            id: self.sequence.next_id(),
            turn: self.turn,
            player: player.to_string(),
            event_type,
            description,
            details,
            timestamp: self.timestamp,
        };
        self.timestamp += 1;
        event
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[T{}.{}] {}", self.turn, self.timestamp, self.description)
    }
}
