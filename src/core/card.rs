//! Card categories and name-based classification
//!
//! Logs never state a card's type, so categories are inferred from the name:
//! the "Basic <Type> Energy" naming rule, a trailing "Energy", and a built-in
//! catalogue of common trainer cards.

use deunicode::deunicode;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level card category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardCategory {
    Pokemon,
    Trainer,
    Energy,
}

/// Trainer card subtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainerKind {
    Supporter,
    Item,
    Tool,
    Stadium,
}

impl TrainerKind {
    /// Plural form, as used for the per-kind trainer lists
    pub fn plural(&self) -> &'static str {
        match self {
            TrainerKind::Supporter => "supporters",
            TrainerKind::Item => "items",
            TrainerKind::Tool => "tools",
            TrainerKind::Stadium => "stadiums",
        }
    }
}

impl fmt::Display for TrainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrainerKind::Supporter => "supporter",
            TrainerKind::Item => "item",
            TrainerKind::Tool => "tool",
            TrainerKind::Stadium => "stadium",
        };
        write!(f, "{s}")
    }
}

/// Energy card subtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyKind {
    Basic,
    Special,
}

/// Subcategory of a reconstructed card (serialized as the bare subtype name)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardSubcategory {
    Trainer(TrainerKind),
    Energy(EnergyKind),
}

static BASIC_ENERGY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Basic \w+ Energy$").expect("basic energy pattern"));

/// True for names following the fixed "Basic <Type> Energy" pattern
pub fn is_basic_energy(name: &str) -> bool {
    BASIC_ENERGY.is_match(name.trim())
}

/// Energy subtype for a card name, or `None` if the name is not an energy card
pub fn energy_kind(name: &str) -> Option<EnergyKind> {
    let name = name.trim();
    if is_basic_energy(name) {
        Some(EnergyKind::Basic)
    } else if name.ends_with("Energy") {
        Some(EnergyKind::Special)
    } else {
        None
    }
}

/// Normalized lookup key: ASCII-folded, lowercased, single-spaced
///
/// Folds the right single quote to an apostrophe, so "Boss’s Orders" and
/// "Boss's Orders" share a key.
pub fn lookup_key(name: &str) -> String {
    deunicode(name)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

const SUPPORTERS: &[&str] = &[
    "Arven",
    "Boss's Orders",
    "Briar",
    "Carmine",
    "Ciphermaniac's Codebreaking",
    "Clive",
    "Colress's Experiment",
    "Crispin",
    "Cynthia's Ambition",
    "Dawn",
    "Eri",
    "Giacomo",
    "Hilda",
    "Iono",
    "Irida",
    "Jacq",
    "Judge",
    "Katy",
    "Kieran",
    "Lacey",
    "Lillie's Determination",
    "Marnie",
    "Miriam",
    "Nemona",
    "Penny",
    "Perrin",
    "Professor's Research",
    "Professor Sada's Vitality",
    "Professor Turo's Scenario",
    "Raihan",
    "Roxanne",
    "Salvatore",
];

const ITEMS: &[&str] = &[
    "Battle VIP Pass",
    "Buddy-Buddy Poffin",
    "Capturing Aroma",
    "Counter Catcher",
    "Earthen Vessel",
    "Energy Retrieval",
    "Energy Search",
    "Energy Switch",
    "Escape Rope",
    "Evolution Incense",
    "Great Ball",
    "Hisuian Heavy Ball",
    "Hyper Potion",
    "Level Ball",
    "Lost Vacuum",
    "Master Ball",
    "Mirage Gate",
    "Nest Ball",
    "Night Stretcher",
    "Pal Pad",
    "Poké Ball",
    "Pokégear 3.0",
    "Precious Trolley",
    "Prime Catcher",
    "Quick Ball",
    "Rare Candy",
    "Secret Box",
    "Super Potion",
    "Super Rod",
    "Superior Energy Retrieval",
    "Switch",
    "Trekking Shoes",
    "Ultra Ball",
    "Unfair Stamp",
];

const TOOLS: &[&str] = &[
    "Air Balloon",
    "Binding Mochi",
    "Bravery Charm",
    "Choice Belt",
    "Counter Gain",
    "Defiance Band",
    "Exp. Share",
    "Forest Seal Stone",
    "Heavy Baton",
    "Hero's Cape",
    "Lucky Helmet",
    "Luxurious Cape",
    "Maximum Belt",
    "Protective Goggles",
    "Rescue Board",
    "Sparkling Crystal",
    "Technical Machine: Devolution",
    "Technical Machine: Evolution",
    "Technical Machine: Turbo Energize",
    "Vitality Band",
];

const STADIUMS: &[&str] = &[
    "Area Zero Underdepths",
    "Artazon",
    "Beach Court",
    "Collapsed Stadium",
    "Full Metal Lab",
    "Gapejaw Bog",
    "Grand Tree",
    "Jamming Tower",
    "Levincia",
    "Lost City",
    "Magma Basin",
    "Mesagoza",
    "Neutralization Zone",
    "Path to the Peak",
    "Perilous Jungle",
    "Pokémon League Headquarters",
    "Postwick",
    "Temple of Sinnoh",
    "Town Store",
    "Training Court",
];

static KNOWN_TRAINERS: Lazy<FxHashMap<String, TrainerKind>> = Lazy::new(|| {
    let mut table = FxHashMap::default();
    for (names, kind) in [
        (SUPPORTERS, TrainerKind::Supporter),
        (ITEMS, TrainerKind::Item),
        (TOOLS, TrainerKind::Tool),
        (STADIUMS, TrainerKind::Stadium),
    ] {
        for name in names {
            table.insert(lookup_key(name), kind);
        }
    }
    table
});

/// Look a trainer up in the built-in catalogue
pub fn known_trainer(name: &str) -> Option<TrainerKind> {
    KNOWN_TRAINERS.get(&lookup_key(name)).copied()
}

/// Trainer subtype for a name already known to be a trainer card
///
/// Falls back to naming conventions, then to `Item`.
pub fn trainer_kind(name: &str) -> TrainerKind {
    if let Some(kind) = known_trainer(name) {
        return kind;
    }
    let key = lookup_key(name);
    if key.starts_with("technical machine") {
        TrainerKind::Tool
    } else {
        TrainerKind::Item
    }
}

/// Best-effort category for a card seen only by name (e.g. revealed by a draw)
///
/// Energy pattern first, then the trainer catalogue; anything else is assumed to
/// be a Pokémon.
pub fn classify_card(name: &str) -> (CardCategory, Option<CardSubcategory>) {
    if let Some(kind) = energy_kind(name) {
        return (CardCategory::Energy, Some(CardSubcategory::Energy(kind)));
    }
    if let Some(kind) = known_trainer(name) {
        return (CardCategory::Trainer, Some(CardSubcategory::Trainer(kind)));
    }
    (CardCategory::Pokemon, None)
}
