//! Evolution chains and evolution-line ordering

use crate::core::{CardCategory, EventType, GameEvent};
use crate::deck::{DeckCard, DeckError};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Evolved name to immediate pre-evolution, built from evolve events only
///
/// Links never form a cycle: a link that would close one is refused.
#[derive(Debug, Clone, Default)]
pub struct EvolutionMap {
    parents: FxHashMap<String, String>,
}

impl EvolutionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the link an evolve event carries; other events are ignored
    pub fn observe_event(&mut self, event: &GameEvent) -> Result<(), DeckError> {
        if event.event_type != EventType::Evolve {
            return Ok(());
        }
        match (&event.details.pokemon_name, &event.details.evolved_from) {
            (Some(to), Some(from)) => self.link(to, from),
            _ => Ok(()),
        }
    }

    /// Add `to` evolving from `from`; the first link for a name wins
    pub fn link(&mut self, to: &str, from: &str) -> Result<(), DeckError> {
        if self.parents.contains_key(to) {
            return Ok(());
        }
        let mut current = Some(from);
        while let Some(name) = current {
            if name == to {
                return Err(DeckError::EvolutionCycle { name: to.to_string() });
            }
            current = self.base_of(name);
        }
        self.parents.insert(to.to_string(), from.to_string());
        Ok(())
    }

    pub fn base_of(&self, name: &str) -> Option<&str> {
        self.parents.get(name).map(String::as_str)
    }

    /// Hops from `name` back to the root of its chain
    pub fn stage(&self, name: &str) -> u32 {
        let mut hops = 0;
        let mut current = name;
        while let Some(base) = self.base_of(current) {
            hops += 1;
            current = base;
        }
        hops
    }

    /// Set stage and `evolves_from` on every Pokémon card
    ///
    /// The map overrides `evolves_from` so links refused by [`Self::link`] do not survive.
    pub fn resolve(&self, cards: &mut [DeckCard]) {
        for card in cards.iter_mut().filter(|c| c.category == CardCategory::Pokemon) {
            card.evolution_stage = Some(self.stage(&card.name));
            card.evolves_from = self.base_of(&card.name).map(str::to_string);
        }
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// One evolution line, kept sorted by stage
#[derive(Default)]
struct Line {
    members: SmallVec<[DeckCard; 3]>,
}

impl Line {
    /// Insert before the first member with a strictly greater stage
    fn insert(&mut self, card: DeckCard) {
        let at = self
            .members
            .iter()
            .position(|m| m.stage() > card.stage())
            .unwrap_or(self.members.len());
        self.members.insert(at, card);
    }
}

/// Index of the earliest ancestor of `cards[start]` that is itself in `cards`
fn line_root(cards: &[DeckCard], index: &FxHashMap<&str, usize>, start: usize) -> usize {
    let mut visited = FxHashSet::default();
    let mut current = start;
    while visited.insert(current) {
        let card = &cards[current];
        let parent = card
            .evolves_from
            .as_deref()
            .filter(|_| card.stage() > 0)
            .and_then(|name| index.get(name));
        match parent {
            Some(&i) => current = i,
            None => break,
        }
    }
    current
}

/// Order Pokémon so each evolution line is contiguous and ascends by stage
///
/// Lines appear in the order their first member was seen. A card whose
/// pre-evolution is not in the list starts its own line.
pub fn sort_by_evolution_line(cards: Vec<DeckCard>) -> Vec<DeckCard> {
    let roots: Vec<usize> = {
        let mut index = FxHashMap::default();
        for (i, card) in cards.iter().enumerate() {
            index.entry(card.name.as_str()).or_insert(i);
        }
        (0..cards.len()).map(|i| line_root(&cards, &index, i)).collect()
    };

    let mut lines: Vec<Line> = Vec::new();
    let mut line_of: FxHashMap<usize, usize> = FxHashMap::default();
    for (card, root) in cards.into_iter().zip(roots) {
        let slot = *line_of.entry(root).or_insert_with(|| {
            lines.push(Line::default());
            lines.len() - 1
        });
        lines[slot].insert(card);
    }

    lines.into_iter().flat_map(|line| line.members).collect()
}
