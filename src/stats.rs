//! Per-player statistics folded from the event list

use crate::core::{EventType, GameEvent, TrainerKind, Turn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One trainer card and how often it was played
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerUsage {
    pub name: String,
    pub count: u32,
}

/// Trainer plays split by subtype, each list in first-played order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainersPlayed {
    pub supporters: Vec<TrainerUsage>,
    pub items: Vec<TrainerUsage>,
    pub tools: Vec<TrainerUsage>,
    pub stadiums: Vec<TrainerUsage>,
}

impl TrainersPlayed {
    /// The list stored under a plural key ("supporters", "items", ...)
    pub fn list_mut(&mut self, key: &str) -> Option<&mut Vec<TrainerUsage>> {
        match key {
            "supporters" => Some(&mut self.supporters),
            "items" => Some(&mut self.items),
            "tools" => Some(&mut self.tools),
            "stadiums" => Some(&mut self.stadiums),
            _ => None,
        }
    }

    pub fn list(&self, kind: TrainerKind) -> &[TrainerUsage] {
        match kind {
            TrainerKind::Supporter => &self.supporters,
            TrainerKind::Item => &self.items,
            TrainerKind::Tool => &self.tools,
            TrainerKind::Stadium => &self.stadiums,
        }
    }

    /// Record one play, inserting the card on first sight
    pub fn record(&mut self, kind: TrainerKind, name: &str) {
        let Some(list) = self.list_mut(kind.plural()) else {
            return;
        };
        match list.iter_mut().find(|usage| usage.name == name) {
            Some(usage) => usage.count = usage.count.saturating_add(1),
            None => list.push(TrainerUsage {
                name: name.to_string(),
                count: 1,
            }),
        }
    }

    pub fn total(&self) -> u32 {
        [&self.supporters, &self.items, &self.tools, &self.stadiums]
            .iter()
            .flat_map(|list| list.iter())
            .map(|usage| usage.count)
            .sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinFlipTally {
    pub heads: u32,
    pub tails: u32,
}

/// Aggregate counters for one player; every field only grows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatistics {
    pub total_damage_dealt: u32,
    pub total_cards_drawn: u32,
    pub trainers_played: TrainersPlayed,
    pub pokemon_knocked_out: u32,
    pub prize_cards_taken: u32,
    pub coin_flips: CoinFlipTally,
    pub turns_played: u32,
}

impl PlayerStatistics {
    /// Fold one event into the counters
    pub fn apply(&mut self, event: &GameEvent) {
        let details = &event.details;
        match event.event_type {
            EventType::Draw => {
                self.total_cards_drawn = self.total_cards_drawn.saturating_add(details.card_count.unwrap_or(1))
            }
            EventType::Attack => {
                self.total_damage_dealt = self.total_damage_dealt.saturating_add(details.damage.unwrap_or(0))
            }
            EventType::Knockout => self.pokemon_knocked_out = self.pokemon_knocked_out.saturating_add(1),
            EventType::PrizeTaken => {
                self.prize_cards_taken = self.prize_cards_taken.saturating_add(details.prizes_taken.unwrap_or(1))
            }
            EventType::PlayTrainer => {
                if let (Some(name), Some(kind)) = (&details.trainer_name, details.trainer_category) {
                    self.trainers_played.record(kind, name);
                }
            }
            EventType::CoinFlip => {
                self.coin_flips.heads = self.coin_flips.heads.saturating_add(details.heads_count.unwrap_or(0));
                self.coin_flips.tails = self.coin_flips.tails.saturating_add(details.tails_count.unwrap_or(0));
            }
            _ => {}
        }
    }
}

/// Fold `events` into one zeroed [`PlayerStatistics`] per player
///
/// Events attributed to anyone other than the two players are ignored.
pub fn aggregate(events: &[GameEvent], players: [&str; 2]) -> BTreeMap<String, PlayerStatistics> {
    let mut stats: BTreeMap<String, PlayerStatistics> = players
        .iter()
        .map(|name| (name.to_string(), PlayerStatistics::default()))
        .collect();

    for event in events {
        if let Some(entry) = stats.get_mut(&event.player) {
            entry.apply(event);
        }
    }
    stats
}

/// Credit each turn to the player who took it
pub fn count_turns(stats: &mut BTreeMap<String, PlayerStatistics>, turns: &[Turn]) {
    for turn in turns {
        if let Some(entry) = stats.get_mut(&turn.player) {
            entry.turns_played += 1;
        }
    }
}

/// The player whose prize count reached `threshold`, if any
pub fn prize_leader(stats: &BTreeMap<String, PlayerStatistics>, threshold: u32) -> Option<String> {
    stats
        .iter()
        .filter(|(_, s)| s.prize_cards_taken >= threshold)
        .max_by_key(|(_, s)| s.prize_cards_taken)
        .map(|(name, _)| name.clone())
}
