//! Deck reconstruction
//!
//! Rebuilds each player's partial deck list from the cards seen in their events.
//! Reconstruction is total: a malformed event is logged and skipped, and the
//! player's remaining events still count.

pub mod evolution;
pub mod extract;

pub use evolution::{sort_by_evolution_line, EvolutionMap};
pub use extract::{CardTally, Observation, Source};

use crate::config::DeckOptions;
use crate::core::{CardCategory, CardSubcategory, EnergyKind, GameEvent, MatchData, TrainerKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Reconstructed decks keyed by username
pub type PlayerDecks = BTreeMap<String, ReconstructedDeck>;

/// Problems met while reconstructing one player's deck
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("event {event_id} has no {field}")]
    MissingDetail { event_id: String, field: &'static str },

    #[error("event {event_id}: cannot read an energy card from {description:?}")]
    UnparsableEnergy { event_id: String, description: String },

    #[error("evolution chain through {name} loops back on itself")]
    EvolutionCycle { name: String },
}

/// Whether a card was seen directly or deduced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Confirmed,
    Inferred,
}

/// One card in a reconstructed deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckCard {
    pub name: String,
    pub category: CardCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<CardSubcategory>,
    pub count: u32,
    /// Lower bound on copies in the deck; equals `count` for now
    pub min_count: u32,
    pub confidence: Confidence,
    /// Hops from the basic form; only set for Pokémon
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evolution_stage: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evolves_from: Option<String>,
}

impl DeckCard {
    pub fn new(name: impl Into<String>, category: CardCategory, subcategory: Option<CardSubcategory>) -> Self {
        DeckCard {
            name: name.into(),
            category,
            subcategory,
            count: 0,
            min_count: 0,
            confidence: Confidence::Confirmed,
            evolution_stage: None,
            evolves_from: None,
        }
    }

    pub fn is_basic_energy(&self) -> bool {
        self.category == CardCategory::Energy
            && self.subcategory == Some(CardSubcategory::Energy(EnergyKind::Basic))
    }

    pub fn stage(&self) -> u32 {
        self.evolution_stage.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckTrainers {
    pub supporters: Vec<DeckCard>,
    pub items: Vec<DeckCard>,
    pub tools: Vec<DeckCard>,
    pub stadiums: Vec<DeckCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEnergy {
    pub basic: Vec<DeckCard>,
    pub special: Vec<DeckCard>,
}

/// The observed part of one player's deck
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructedDeck {
    /// Every card in first-observed order
    pub cards: Vec<DeckCard>,
    pub total_cards_observed: u32,
    /// Pokémon grouped by evolution line
    pub pokemon: Vec<DeckCard>,
    pub trainers: DeckTrainers,
    pub energy: DeckEnergy,
}

impl ReconstructedDeck {
    /// Partition `cards` and total their counts
    pub fn assemble(cards: Vec<DeckCard>) -> Self {
        let mut pokemon = Vec::new();
        let mut trainers = DeckTrainers::default();
        let mut energy = DeckEnergy::default();

        for card in &cards {
            let card = card.clone();
            match (card.category, card.subcategory) {
                (CardCategory::Pokemon, _) => pokemon.push(card),
                (CardCategory::Trainer, Some(CardSubcategory::Trainer(TrainerKind::Supporter))) => {
                    trainers.supporters.push(card)
                }
                (CardCategory::Trainer, Some(CardSubcategory::Trainer(TrainerKind::Tool))) => trainers.tools.push(card),
                (CardCategory::Trainer, Some(CardSubcategory::Trainer(TrainerKind::Stadium))) => {
                    trainers.stadiums.push(card)
                }
                (CardCategory::Trainer, _) => trainers.items.push(card),
                (CardCategory::Energy, Some(CardSubcategory::Energy(EnergyKind::Basic))) => energy.basic.push(card),
                (CardCategory::Energy, _) => energy.special.push(card),
            }
        }

        let total_cards_observed = cards.iter().map(|c| c.count).sum();
        ReconstructedDeck {
            cards,
            total_cards_observed,
            pokemon: sort_by_evolution_line(pokemon),
            trainers,
            energy,
        }
    }

    pub fn card(&self, name: &str) -> Option<&DeckCard> {
        self.cards.iter().find(|c| c.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Rebuilds decks from a parsed match
#[derive(Debug, Clone, Default)]
pub struct DeckReconstructor {
    options: DeckOptions,
}

impl DeckReconstructor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DeckOptions) -> Self {
        DeckReconstructor { options }
    }

    /// One deck per player, built only from that player's events
    pub fn reconstruct(&self, data: &MatchData) -> PlayerDecks {
        let mut decks = PlayerDecks::new();
        for player in &data.players {
            let username = player.username.as_str();
            let events = data.events.iter().filter(|e| e.player == username);
            let deck = self.reconstruct_player(username, events);
            debug!(player = username, cards = deck.total_cards_observed, "reconstructed deck");
            decks.insert(player.username.clone(), deck);
        }
        decks
    }

    /// Rebuild one player's deck from their own events
    ///
    /// An event that cannot be read is logged and skipped; the rest still count.
    pub fn reconstruct_player<'e>(
        &self,
        player: &str,
        events: impl IntoIterator<Item = &'e GameEvent>,
    ) -> ReconstructedDeck {
        let mut tally = CardTally::new(self.options.max_copies);
        let mut chains = EvolutionMap::new();
        for event in events {
            let observed = chains.observe_event(event).and_then(|()| tally.observe_event(event));
            if let Err(e) = observed {
                warn!(player, event = %event.id, error = %e, "skipping event");
            }
        }

        let mut cards = tally.into_cards();
        chains.resolve(&mut cards);
        ReconstructedDeck::assemble(cards)
    }
}

/// Reconstruct both players' decks with default options
pub fn reconstruct_decks(data: &MatchData) -> PlayerDecks {
    DeckReconstructor::new().reconstruct(data)
}
