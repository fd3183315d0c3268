//! Data model shared by the parser, statistics and deck reconstruction

pub mod card;
pub mod event;
pub mod match_data;

pub use card::{CardCategory, CardSubcategory, EnergyKind, TrainerKind};
pub use event::{EventClock, EventDetails, EventSequence, EventType, GameEvent};
pub use match_data::{CoinFlipChoice, MatchData, Player, Turn, WinCondition};
