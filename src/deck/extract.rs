//! Card observations pulled from events, and the capped per-card tally

use crate::core::card::{classify_card, energy_kind, trainer_kind};
use crate::core::{CardCategory, CardSubcategory, EventType, GameEvent};
use crate::deck::{Confidence, DeckCard, DeckError};
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;

/// Energy attachments keep the card name only in their description
static ATTACHED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.+? attached (.+?) to .+$").unwrap_or_else(|e| panic!("attached pattern: {e}"))
});

/// Where a card sighting came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A structured event that names the card's role
    Event,
    /// A name revealed in a draw; the category is guessed
    Reveal,
    /// The base of an evolution; counts a copy but not a direct sighting
    Inferred,
}

/// One sighting of a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub name: String,
    pub category: CardCategory,
    pub subcategory: Option<CardSubcategory>,
    pub evolves_from: Option<String>,
    pub source: Source,
}

impl Observation {
    fn event(name: String, category: CardCategory, subcategory: Option<CardSubcategory>) -> Self {
        Observation {
            name,
            category,
            subcategory,
            evolves_from: None,
            source: Source::Event,
        }
    }

    fn reveal(name: &str) -> Self {
        let (category, subcategory) = classify_card(name);
        Observation {
            name: name.to_string(),
            category,
            subcategory,
            evolves_from: None,
            source: Source::Reveal,
        }
    }
}

/// Card sightings implied by one event
///
/// Event types that say nothing about deck contents yield an empty list.
pub fn observations(event: &GameEvent) -> Result<Vec<Observation>, DeckError> {
    let details = &event.details;
    let missing = |field| DeckError::MissingDetail {
        event_id: event.id.clone(),
        field,
    };

    let found = match event.event_type {
        EventType::PlayPokemon => {
            let name = details.pokemon_name.clone().ok_or_else(|| missing("pokemonName"))?;
            vec![Observation::event(name, CardCategory::Pokemon, None)]
        }
        EventType::Evolve => {
            let name = details.pokemon_name.clone().ok_or_else(|| missing("pokemonName"))?;
            let base = details.evolved_from.clone().ok_or_else(|| missing("evolvedFrom"))?;
            if base == name {
                return Err(DeckError::EvolutionCycle { name });
            }
            vec![
                Observation {
                    evolves_from: Some(base.clone()),
                    ..Observation::event(name, CardCategory::Pokemon, None)
                },
                Observation {
                    source: Source::Inferred,
                    ..Observation::event(base, CardCategory::Pokemon, None)
                },
            ]
        }
        EventType::PlayTrainer => {
            let name = details.trainer_name.clone().ok_or_else(|| missing("trainerName"))?;
            let kind = details.trainer_category.unwrap_or_else(|| trainer_kind(&name));
            vec![Observation::event(
                name,
                CardCategory::Trainer,
                Some(CardSubcategory::Trainer(kind)),
            )]
        }
        EventType::AttachEnergy => {
            let unparsable = || DeckError::UnparsableEnergy {
                event_id: event.id.clone(),
                description: event.description.clone(),
            };
            let name = ATTACHED
                .captures(&event.description)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .ok_or_else(unparsable)?;
            let kind = energy_kind(&name).ok_or_else(unparsable)?;
            vec![Observation::event(
                name,
                CardCategory::Energy,
                Some(CardSubcategory::Energy(kind)),
            )]
        }
        EventType::Draw => details
            .card_names
            .iter()
            .flatten()
            .map(|name| Observation::reveal(name))
            .collect(),
        _ => Vec::new(),
    };
    Ok(found)
}

/// Running per-card counts in first-observed order
#[derive(Debug, Clone)]
pub struct CardTally {
    cards: Vec<DeckCard>,
    /// Cards whose category so far is only a guess from a reveal
    guessed: Vec<bool>,
    index: FxHashMap<String, usize>,
    max_copies: u32,
}

impl CardTally {
    pub fn new(max_copies: u32) -> Self {
        CardTally {
            cards: Vec::new(),
            guessed: Vec::new(),
            index: FxHashMap::default(),
            max_copies,
        }
    }

    /// Record every card an event implies
    pub fn observe_event(&mut self, event: &GameEvent) -> Result<(), DeckError> {
        for observation in observations(event)? {
            self.observe(observation);
        }
        Ok(())
    }

    pub fn observe(&mut self, obs: Observation) {
        let Some(&slot) = self.index.get(&obs.name) else {
            self.insert(obs);
            return;
        };

        let card = &mut self.cards[slot];
        if card.is_basic_energy() || card.count < self.max_copies {
            card.count += 1;
        }
        if obs.source != Source::Inferred {
            card.confidence = Confidence::Confirmed;
        }

        if self.guessed[slot] && obs.source == Source::Event {
            card.category = obs.category;
            card.subcategory = obs.subcategory;
            self.guessed[slot] = false;
        }
        if card.subcategory.is_none() {
            card.subcategory = obs.subcategory;
        }
        if card.evolves_from.is_none() {
            card.evolves_from = obs.evolves_from;
        }
    }

    fn insert(&mut self, obs: Observation) {
        let confidence = if obs.source == Source::Inferred {
            Confidence::Inferred
        } else {
            Confidence::Confirmed
        };
        let mut card = DeckCard::new(obs.name.clone(), obs.category, obs.subcategory);
        card.count = 1;
        card.confidence = confidence;
        card.evolves_from = obs.evolves_from;

        self.index.insert(obs.name, self.cards.len());
        self.cards.push(card);
        self.guessed.push(obs.source == Source::Reveal);
    }

    pub fn get(&self, name: &str) -> Option<&DeckCard> {
        self.index.get(name).map(|&i| &self.cards[i])
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Finished cards with `min_count` filled in
    pub fn into_cards(self) -> Vec<DeckCard> {
        self.cards
            .into_iter()
            .map(|mut card| {
                card.min_count = card.count;
                card
            })
            .collect()
    }
}
