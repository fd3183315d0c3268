//! Turn parsing
//!
//! A small state machine over the lines after setup. Turn markers open a new turn;
//! the acting player alternates from the first player because the marker text
//! itself does not reliably name anyone. Each remaining line is either noise,
//! one event, or silently ignored.

use crate::config::ParseOptions;
use crate::core::card::trainer_kind;
use crate::core::{
    EventClock, EventDetails, EventSequence, EventType, GameEvent, TrainerKind, Turn, WinCondition,
};
use crate::parser::card_list::revealed_after;
use crate::parser::patterns::{LineMatch, PatternLibrary};
use crate::parser::PokemonNames;
use tracing::{debug, trace};

/// Everything recovered from the turn region
#[derive(Debug, Clone, Default)]
pub struct TurnOutcome {
    /// Turns with at least one event
    pub turns: Vec<Turn>,
    pub events: Vec<GameEvent>,
    pub pokemon: PokemonNames,
    pub winner: Option<String>,
    pub win_condition: Option<WinCondition>,
}

/// Parses the turn region for a known pair of players
pub struct TurnParser<'a> {
    patterns: &'a PatternLibrary,
    options: &'a ParseOptions,
    /// First player first
    players: [&'a str; 2],
}

/// Mutable state threaded through one pass
struct PassState<'s> {
    clock: EventClock<'s>,
    pending_breakdown: Option<String>,
    outcome: TurnOutcome,
}

impl<'a> TurnParser<'a> {
    pub fn new(patterns: &'a PatternLibrary, options: &'a ParseOptions, players: [&'a str; 2]) -> Self {
        TurnParser {
            patterns,
            options,
            players,
        }
    }

    /// Acting player for a 1-based turn number
    pub fn player_for_turn(&self, number: u32) -> &'a str {
        self.players[((number + 1) % 2) as usize]
    }

    fn opponent(&self, name: &str) -> Option<&'a str> {
        match self.players {
            [a, b] if a == name => Some(b),
            [a, b] if b == name => Some(a),
            _ => None,
        }
    }

    /// Map a name captured from a line onto a known player
    ///
    /// Falls back to the turn's acting player when the capture is not a username
    /// ("Opponent", a mangled name).
    fn resolve(&self, captured: &str, acting: &'a str) -> &'a str {
        let captured = captured.replace('\u{2019}', "'");
        self.players
            .into_iter()
            .find(|p| p.replace('\u{2019}', "'") == captured)
            .unwrap_or(acting)
    }

    fn is_known(&self, name: &str) -> bool {
        self.players.contains(&name)
    }

    /// Parse every line from `start` (the first turn marker) to the end
    pub fn parse(&self, lines: &[&str], start: usize, sequence: &mut EventSequence) -> TurnOutcome {
        let mut state = PassState {
            clock: EventClock::new(sequence, 0),
            pending_breakdown: None,
            outcome: TurnOutcome::default(),
        };
        let mut current: Option<Turn> = None;
        let mut turn_number = 0;

        for index in start..lines.len() {
            let raw = lines[index];
            let line = raw.trim();

            if self.patterns.is_turn_marker(line) {
                if let Some(turn) = current.take() {
                    Self::close_turn(&mut state.outcome, turn);
                }
                turn_number += 1;
                state.clock.advance_turn(turn_number);
                current = Some(Turn {
                    number: turn_number,
                    player: self.player_for_turn(turn_number).to_string(),
                    events: Vec::new(),
                });
                continue;
            }

            let Some(turn) = current.as_mut() else {
                continue;
            };

            if self.patterns.is_skip(raw) {
                if let Some(note) = self.patterns.damage_annotation(raw) {
                    state.pending_breakdown = Some(note);
                }
                continue;
            }

            let Some(matched) = self.patterns.classify(line) else {
                trace!(turn = turn_number, line, "unrecognized line ignored");
                continue;
            };

            let acting = self.player_for_turn(turn_number);
            let event = self.build_event(matched, acting, lines, index, &mut state);
            debug!(turn = turn_number, event_type = ?event.event_type, "{}", event.description);
            turn.events.push(event.clone());
            state.outcome.events.push(event);
        }

        if let Some(turn) = current.take() {
            Self::close_turn(&mut state.outcome, turn);
        }
        state.outcome
    }

    fn close_turn(outcome: &mut TurnOutcome, turn: Turn) {
        if !turn.events.is_empty() {
            outcome.turns.push(turn);
        }
    }

    fn build_event(
        &self,
        matched: LineMatch,
        acting: &'a str,
        lines: &[&str],
        index: usize,
        state: &mut PassState<'_>,
    ) -> GameEvent {
        let pokemon = &mut state.outcome.pokemon;

        let (player, event_type, description, details) = match matched {
            LineMatch::Win { winner, loser, condition } => {
                let winner = self.resolve_winner(winner, loser, condition, acting);
                if state.outcome.winner.is_none() {
                    state.outcome.winner = Some(winner.to_string());
                    state.outcome.win_condition = Some(condition);
                }
                (
                    winner,
                    EventType::Win,
                    format!("{winner} wins ({condition})"),
                    EventDetails {
                        win_condition: Some(condition),
                        ..Default::default()
                    },
                )
            }
            LineMatch::Attack { player, pokemon: attacker, attack, target_player, target, damage } => {
                let player = self.resolve(&player, acting);
                pokemon.insert(&attacker);
                let mut description = format!("{player}'s {attacker} used {attack}");
                if let (Some(owner), Some(target)) = (&target_player, &target) {
                    pokemon.insert(target);
                    description.push_str(&format!(" on {owner}'s {target}"));
                }
                if let Some(damage) = damage {
                    description.push_str(&format!(" for {damage} damage"));
                }
                (
                    player,
                    EventType::Attack,
                    description,
                    EventDetails {
                        attack_name: Some(attack),
                        attacking_pokemon: Some(attacker),
                        target_pokemon: target,
                        damage,
                        damage_breakdown: state.pending_breakdown.take(),
                        ..Default::default()
                    },
                )
            }
            LineMatch::DamageCounters { player, counters, target_player, target } => {
                let player = self.resolve(&player, acting);
                pokemon.insert(&target);
                (
                    player,
                    EventType::Attack,
                    format!("{player} put {counters} damage counters on {target_player}'s {target}"),
                    EventDetails {
                        target_pokemon: Some(target),
                        damage: Some(counters.saturating_mul(self.options.damage_per_counter)),
                        damage_breakdown: state.pending_breakdown.take(),
                        ..Default::default()
                    },
                )
            }
            LineMatch::Knockout { owner, pokemon: knocked_out } => {
                pokemon.insert(&knocked_out);
                // Credit goes to whoever caused the knockout, not the owner
                let causer = if self.is_known(&owner) {
                    self.opponent(&owner).unwrap_or(acting)
                } else {
                    acting
                };
                (
                    causer,
                    EventType::Knockout,
                    format!("{owner}'s {knocked_out} was Knocked Out"),
                    EventDetails {
                        knocked_out_pokemon: Some(knocked_out),
                        ..Default::default()
                    },
                )
            }
            LineMatch::Prize { player, count } => {
                let player = self.resolve(&player, acting);
                let description = if count == 1 {
                    format!("{player} took a Prize card")
                } else {
                    format!("{player} took {count} Prize cards")
                };
                (
                    player,
                    EventType::PrizeTaken,
                    description,
                    EventDetails {
                        prizes_taken: Some(count),
                        ..Default::default()
                    },
                )
            }
            LineMatch::Switch { player, pokemon: name, replaced, location } => {
                let player = self.resolve(&player, acting);
                pokemon.insert(&name);
                let description = match &replaced {
                    Some(old) => {
                        pokemon.insert(old);
                        format!("{player} switched {old} with {name}")
                    }
                    None if location == "Bench" => format!("{player} retreated {name} to the Bench"),
                    None => format!("{player}'s {name} is now in the Active Spot"),
                };
                (
                    player,
                    EventType::Switch,
                    description,
                    EventDetails {
                        pokemon_name: Some(name),
                        location: Some(location.to_string()),
                        ..Default::default()
                    },
                )
            }
            LineMatch::Ability { player, pokemon: name, ability } => {
                let player = self.resolve(&player, acting);
                pokemon.insert(&name);
                (
                    player,
                    EventType::UseAbility,
                    format!("{player}'s {name} used {ability}"),
                    EventDetails {
                        pokemon_name: Some(name),
                        ability_name: Some(ability),
                        ..Default::default()
                    },
                )
            }
            LineMatch::Evolve { player, from, to, location } => {
                let player = self.resolve(&player, acting);
                pokemon.insert(&from);
                pokemon.insert(&to);
                let mut description = format!("{player} evolved {from} to {to}");
                if let Some(location) = &location {
                    description.push_str(&format!(" ({location})"));
                }
                (
                    player,
                    EventType::Evolve,
                    description,
                    EventDetails {
                        pokemon_name: Some(to),
                        evolved_from: Some(from),
                        location,
                        ..Default::default()
                    },
                )
            }
            LineMatch::Stadium { player, card } => {
                let player = self.resolve(&player, acting);
                (
                    player,
                    EventType::PlayTrainer,
                    format!("{player} played {card} to the Stadium spot"),
                    EventDetails {
                        trainer_name: Some(card),
                        trainer_category: Some(TrainerKind::Stadium),
                        ..Default::default()
                    },
                )
            }
            LineMatch::PokemonPlay { player, pokemon: name, location } => {
                let player = self.resolve(&player, acting);
                pokemon.insert(&name);
                (
                    player,
                    EventType::PlayPokemon,
                    format!("{player} played {name} to the {location}"),
                    EventDetails {
                        pokemon_name: Some(name),
                        location: Some(location),
                        ..Default::default()
                    },
                )
            }
            LineMatch::TrainerPlay { player, card, attached_to } => {
                let player = self.resolve(&player, acting);
                let (category, description) = match &attached_to {
                    Some(target) => (TrainerKind::Tool, format!("{player} attached {card} to {target}")),
                    None => (trainer_kind(&card), format!("{player} played {card}")),
                };
                (
                    player,
                    EventType::PlayTrainer,
                    description,
                    EventDetails {
                        trainer_name: Some(card),
                        trainer_category: Some(category),
                        pokemon_name: attached_to,
                        ..Default::default()
                    },
                )
            }
            LineMatch::Energy { player, energy, target, location } => {
                let player = self.resolve(&player, acting);
                let mut description = format!("{player} attached {energy} to {target}");
                match location.as_deref() {
                    Some("Bench") => description.push_str(" on the Bench"),
                    Some(spot) => description.push_str(&format!(" in the {spot}")),
                    None => {}
                }
                (
                    player,
                    EventType::AttachEnergy,
                    description,
                    EventDetails {
                        pokemon_name: Some(target),
                        location,
                        ..Default::default()
                    },
                )
            }
            LineMatch::DrawSingle { player, card } => {
                let player = self.resolve(&player, acting);
                (
                    player,
                    EventType::Draw,
                    format!("{player} drew {card}"),
                    EventDetails {
                        card_count: Some(1),
                        card_names: Some(vec![card]),
                        ..Default::default()
                    },
                )
            }
            LineMatch::DrawMulti { player, count } => {
                let player = self.resolve(&player, acting);
                let card_names = revealed_after(self.patterns, lines, index, self.options.draw_lookahead);
                let description = if count == 1 {
                    format!("{player} drew a card")
                } else {
                    format!("{player} drew {count} cards")
                };
                (
                    player,
                    EventType::Draw,
                    description,
                    EventDetails {
                        card_count: Some(count),
                        card_names,
                        ..Default::default()
                    },
                )
            }
            LineMatch::CoinFlip { player, heads, tails } => {
                let player = self.resolve(&player, acting);
                (
                    player,
                    EventType::CoinFlip,
                    format!("{player} flipped {heads} heads and {tails} tails"),
                    EventDetails {
                        heads_count: Some(heads),
                        tails_count: Some(tails),
                        ..Default::default()
                    },
                )
            }
        };

        state.clock.stamp(player, event_type, description, details)
    }

    fn resolve_winner(
        &self,
        winner: Option<String>,
        loser: Option<String>,
        condition: WinCondition,
        acting: &'a str,
    ) -> &'a str {
        if let Some(winner) = winner.as_deref().filter(|w| self.is_known(w)) {
            return self.resolve(winner, acting);
        }
        if let Some(opponent) = loser.as_deref().and_then(|l| self.opponent(l)) {
            return opponent;
        }
        match condition {
            // The player unable to draw is the one whose turn just started
            WinCondition::DeckOut => self.opponent(acting).unwrap_or(acting),
            _ => acting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(lines: &[&str]) -> TurnOutcome {
        let options = ParseOptions::default();
        let parser = TurnParser::new(PatternLibrary::global(), &options, ["Ash", "Gary"]);
        let mut seq = EventSequence::new();
        parser.parse(lines, 0, &mut seq)
    }

    #[test]
    fn test_turns_alternate_from_first_player() {
        let outcome = parse(&[
            "[playerName]'s Turn",
            "Ash drew a card.",
            "[playerName]'s Turn",
            "Gary drew a card.",
            "[playerName]'s Turn",
            "Ash drew Nest Ball.",
        ]);
        let players: Vec<_> = outcome.turns.iter().map(|t| t.player.as_str()).collect();
        assert_eq!(players, vec!["Ash", "Gary", "Ash"]);
        assert_eq!(outcome.turns[2].number, 3);
        assert_eq!(outcome.events.len(), 3);
    }

    #[test]
    fn test_empty_turns_are_dropped() {
        let outcome = parse(&[
            "[playerName]'s Turn",
            "Ash ended their turn.",
            "[playerName]'s Turn",
            "Gary drew a card.",
        ]);
        assert_eq!(outcome.turns.len(), 1);
        assert_eq!(outcome.turns[0].number, 2);
        assert_eq!(outcome.turns[0].player, "Gary");
    }

    #[test]
    fn test_unrecognized_lines_are_ignored() {
        let outcome = parse(&[
            "[playerName]'s Turn",
            "Ash waved at the crowd.",
            "Ash drew a card.",
            "some cosmetic banner",
        ]);
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].timestamp, 0);
    }

    #[test]
    fn test_knockout_credited_to_causer() {
        let outcome = parse(&[
            "[playerName]'s Turn",
            "Ash's Pikachu used Thunderbolt on Gary's Eevee for 120 damage.",
            "Gary's Eevee was Knocked Out!",
            "Ash took a Prize card.",
        ]);
        let ko = &outcome.events[1];
        assert_eq!(ko.event_type, EventType::Knockout);
        assert_eq!(ko.player, "Ash");
        assert_eq!(ko.details.knocked_out_pokemon.as_deref(), Some("Eevee"));
        assert_eq!(outcome.events[2].details.prizes_taken, Some(1));
    }

    #[test]
    fn test_damage_breakdown_carried_to_next_attack() {
        let outcome = parse(&[
            "[playerName]'s Turn",
            "- Damage breakdown:",
            "   • Total damage: 60 damage",
            "Ash's Pikachu used Quick Attack on Gary's Eevee for 60 damage.",
            "Ash's Pikachu used Quick Attack on Gary's Eevee for 10 damage.",
        ]);
        assert_eq!(
            outcome.events[0].details.damage_breakdown.as_deref(),
            Some("Total damage: 60 damage")
        );
        assert_eq!(outcome.events[1].details.damage_breakdown, None);
    }

    #[test]
    fn test_damage_counters_scale() {
        let outcome = parse(&["[playerName]'s Turn", "Ash put 5 damage counters on Gary's Eevee."]);
        assert_eq!(outcome.events[0].event_type, EventType::Attack);
        assert_eq!(outcome.events[0].details.damage, Some(50));
    }

    #[test]
    fn test_draw_lookahead_attaches_names() {
        let outcome = parse(&[
            "[playerName]'s Turn",
            "Ash drew 2 cards.",
            "- 2 drawn cards.",
            "   • Iono, Basic Lightning Energy",
            "Ash played Iono.",
        ]);
        let draw = &outcome.events[0];
        assert_eq!(draw.details.card_count, Some(2));
        assert_eq!(
            draw.details.card_names.clone().unwrap(),
            vec!["Iono".to_string(), "Basic Lightning Energy".to_string()]
        );
        let play = &outcome.events[1];
        assert_eq!(play.details.trainer_category, Some(TrainerKind::Supporter));
    }

    #[test]
    fn test_win_line_sets_winner_and_emits_event() {
        let outcome = parse(&[
            "[playerName]'s Turn",
            "Ash took 2 Prize cards.",
            "All Prize cards taken. Ash wins.",
        ]);
        assert_eq!(outcome.winner.as_deref(), Some("Ash"));
        assert_eq!(outcome.win_condition, Some(WinCondition::Prizes));
        assert_eq!(outcome.events.last().unwrap().event_type, EventType::Win);
    }

    #[test]
    fn test_deck_out_without_names() {
        let outcome = parse(&[
            "[playerName]'s Turn",
            "Ash drew a card.",
            "[playerName]'s Turn",
            "Opponent's deck ran out.",
        ]);
        assert_eq!(outcome.winner.as_deref(), Some("Ash"));
        assert_eq!(outcome.win_condition, Some(WinCondition::DeckOut));
    }

    #[test]
    fn test_timestamps_and_turns_monotonic() {
        let outcome = parse(&[
            "[playerName]'s Turn",
            "Ash drew a card.",
            "Ash played Pikachu to the Bench.",
            "Ash attached Basic Lightning Energy to Pikachu on the Bench.",
            "[playerName]'s Turn",
            "Gary drew a card.",
            "Gary flipped a coin and it landed on heads.",
        ]);
        for pair in outcome.events.windows(2) {
            assert!(pair[0].turn <= pair[1].turn);
            if pair[0].turn == pair[1].turn {
                assert!(pair[0].timestamp < pair[1].timestamp);
            }
        }
        assert_eq!(outcome.pokemon.as_slice().to_vec(), vec!["Pikachu"]);
    }
}
