//! Line classifier
//!
//! Every recognizable log line shape is a compiled regex held by [`PatternLibrary`].
//! Turn lines are tried in the fixed order of [`TURN_PRECEDENCE`]; the first rule
//! that matches decides the line, so a line yields at most one event.

use crate::core::WinCondition;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Apostrophe class: logs mix ASCII `'` with the right single quote
const APOS: &str = "['\u{2019}]";

/// The literal line that opens the setup section
pub const SETUP_MARKER: &str = "Setup";

/// Turn-line rules in precedence order
pub const TURN_PRECEDENCE: [TurnRule; 14] = [
    TurnRule::Win,
    TurnRule::Attack,
    TurnRule::Knockout,
    TurnRule::Prize,
    TurnRule::Switch,
    TurnRule::Ability,
    TurnRule::Evolve,
    TurnRule::Stadium,
    TurnRule::PokemonPlay,
    TurnRule::TrainerPlay,
    TurnRule::Energy,
    TurnRule::DrawSingle,
    TurnRule::DrawMulti,
    TurnRule::CoinFlip,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRule {
    Win,
    Attack,
    Knockout,
    Prize,
    Switch,
    Ability,
    Evolve,
    Stadium,
    PokemonPlay,
    TrainerPlay,
    Energy,
    DrawSingle,
    DrawMulti,
    CoinFlip,
}

/// Structured content of a recognized turn line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineMatch {
    Win {
        winner: Option<String>,
        /// Player named as the loser, when the line names one instead of the winner
        loser: Option<String>,
        condition: WinCondition,
    },
    Attack {
        player: String,
        pokemon: String,
        attack: String,
        target_player: Option<String>,
        target: Option<String>,
        damage: Option<u32>,
    },
    DamageCounters {
        player: String,
        counters: u32,
        target_player: String,
        target: String,
    },
    Knockout {
        owner: String,
        pokemon: String,
    },
    Prize {
        player: String,
        count: u32,
    },
    Switch {
        player: String,
        pokemon: String,
        replaced: Option<String>,
        location: &'static str,
    },
    Ability {
        player: String,
        pokemon: String,
        ability: String,
    },
    Evolve {
        player: String,
        from: String,
        to: String,
        location: Option<String>,
    },
    Stadium {
        player: String,
        card: String,
    },
    PokemonPlay {
        player: String,
        pokemon: String,
        location: String,
    },
    TrainerPlay {
        player: String,
        card: String,
        /// Set when the trainer is a tool attached to a Pokémon
        attached_to: Option<String>,
    },
    Energy {
        player: String,
        energy: String,
        target: String,
        location: Option<String>,
    },
    DrawSingle {
        player: String,
        card: String,
    },
    DrawMulti {
        player: String,
        count: u32,
    },
    CoinFlip {
        player: String,
        heads: u32,
        tails: u32,
    },
}

/// Structured content of a recognized setup line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupLine {
    CoinChoice { player: String, call: String },
    CoinWinner { player: String },
    GoesFirst { player: String, first: bool },
    OpeningHand { player: String, count: u32 },
    Mulligan { player: String, count: u32 },
    MulliganDraw { player: String, count: u32, mulliganer: String },
    PokemonPlay { player: String, pokemon: String, location: String },
}

/// Result of a concession line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Concession {
    /// The line names the winner
    Winner(String),
    /// The line names the player who conceded
    Loser(String),
}

/// Compiled patterns for every line shape the parser understands
pub struct PatternLibrary {
    setup_coin_choice: Regex,
    setup_coin_winner: Regex,
    setup_goes_first: Regex,
    setup_opening_hand: Regex,
    setup_mulligan: Regex,
    setup_mulligan_draw: Regex,
    turn_marker: Regex,
    win_deck_out: Regex,
    win_all_prizes: Regex,
    win_took_all_prizes: Regex,
    win_no_pokemon: Regex,
    attack: Regex,
    damage_counters: Regex,
    knockout: Regex,
    prize: Regex,
    retreat: Regex,
    now_active: Regex,
    switched: Regex,
    ability: Regex,
    evolve: Regex,
    stadium: Regex,
    pokemon_play: Regex,
    trainer_play: Regex,
    attach: Regex,
    draw_single: Regex,
    draw_multi: Regex,
    coin_flip_single: Regex,
    coin_flip_multi: Regex,
    concede_named_winner: Regex,
    concede_named_loser: Regex,
    skip: Regex,
    damage_annotation: Regex,
    bullet: Regex,
}

static PATTERNS: Lazy<PatternLibrary> = Lazy::new(PatternLibrary::new);

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid log pattern {pattern:?}: {e}"))
}

fn text(caps: &Captures, i: usize) -> Option<String> {
    caps.get(i)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a count word: digits, or "a"/"an" for one
fn count(word: &str) -> Option<u32> {
    match word.to_ascii_lowercase().as_str() {
        "a" | "an" => Some(1),
        other => other.parse().ok(),
    }
}

impl PatternLibrary {
    pub fn new() -> Self {
        let location = r"(?: (?:in|on) the (Active Spot|Bench))?";

        PatternLibrary {
            setup_coin_choice: compile(r"^(.+?) chose (heads|tails) for the opening coin flip\.?$"),
            setup_coin_winner: compile(r"^(.+?) won the coin (?:toss|flip)\.?$"),
            setup_goes_first: compile(r"^(.+?) decided to go (first|second)\.?$"),
            setup_opening_hand: compile(r"^(.+?) drew (\d+) cards? for the opening hand\.?$"),
            setup_mulligan: compile(r"^(.+?) took (a|\d+) mulligans?\.?$"),
            setup_mulligan_draw: compile(
                r"^(.+?) drew (a|\d+) more cards? because (.+?) took (?:at least )?(?:a|\d+) mulligans?\.?$",
            ),
            turn_marker: compile(&format!(
                r"^(?:\[playerName\]{APOS}s Turn|Turn # ?\d+ - .+{APOS}s Turn)$"
            )),
            win_deck_out: compile(&format!(
                r"^(?:(.+?){APOS}s )?(?i:opponent){APOS}s deck ran out(?: of cards)?\.?(?:\s*(.+?) wins\.?)?$"
            )),
            win_all_prizes: compile(r"^(?i:all prize cards taken)\.?(?:\s*(.+?) wins\.?)?$"),
            win_took_all_prizes: compile(
                r"^(.+?) took all (?:of their |the remaining )?(?i:prize cards)\.?(?:\s*(.+?) wins\.?)?$",
            ),
            win_no_pokemon: compile(
                r"^(.+?) ha(?:s|ve) no Pok[eé]mon (?:left )?in play\.?(?:\s*(.+?) wins\.?)?$",
            ),
            attack: compile(&format!(
                r"^(.+?){APOS}s (.+?) used (.+?) on (.+?){APOS}s (.+?)(?: for (\d+) damage)?\.?$"
            )),
            damage_counters: compile(&format!(
                r"^(.+?) put (\d+) damage counters? on (.+?){APOS}s (.+?)\.?$"
            )),
            knockout: compile(&format!(r"^(.+?){APOS}s (.+?) was Knocked Out!?\.?$")),
            prize: compile(r"^(.+?) took (a|\d+) (?i:prize cards?)\.?$"),
            retreat: compile(r"^(.+?) retreated (.+?) to the Bench\.?$"),
            now_active: compile(&format!(r"^(.+?){APOS}s (.+?) is now in the Active Spot\.?$")),
            switched: compile(r"^(.+?) switched (.+?) (?:with|for) (.+?)\.?$"),
            ability: compile(&format!(r"^(.+?){APOS}s (.+?) used (.+?)\.?$")),
            evolve: compile(&format!(r"^(.+?) evolved (.+?) to (.+?){location}\.?$")),
            stadium: compile(r"^(.+?) played (.+?) to the (?i:stadium spot)\.?$"),
            pokemon_play: compile(r"^(.+?) played (.+?) to the (Active Spot|Bench)\.?$"),
            trainer_play: compile(r"^(.+?) played ([A-Z].*?)\.?$"),
            attach: compile(&format!(r"^(.+?) attached (.+?) to (.+?){location}\.?$")),
            draw_single: compile(r"^(.+?) drew ([A-Z].*?)\.?$"),
            draw_multi: compile(r"^(.+?) drew (a|an|\d+)(?: more)? cards?(?:[ .].*)?$"),
            coin_flip_single: compile(r"^(.+?) flipped a coin,? and it landed on (heads|tails)\.?$"),
            coin_flip_multi: compile(
                r"^(.+?) flipped (\d+) coins?,? and (\d+) (?:of them )?landed on heads\.?$",
            ),
            concede_named_winner: compile(r"^(?i:you|opponent) conceded\.\s*(.+?) wins\.?$"),
            concede_named_loser: compile(r"^(.+?) conceded\.?$"),
            skip: compile(
                r"(?i)^\s*$|^\s*[•·]|^\s*- |shuffled|discarded|ended their turn|on the bottom of their deck|damage breakdown",
            ),
            damage_annotation: compile(
                r"(?i)^\s*[•·-]?\s*((?:damage breakdown|base damage|total damage|weakness|resistance).*?)\s*$",
            ),
            bullet: compile(r"^\s*[•·]"),
        }
    }

    /// Shared instance, compiled on first use
    pub fn global() -> &'static PatternLibrary {
        &PATTERNS
    }

    pub fn is_setup_marker(&self, line: &str) -> bool {
        line.trim() == SETUP_MARKER
    }

    pub fn is_turn_marker(&self, line: &str) -> bool {
        self.turn_marker.is_match(line.trim())
    }

    /// Known-noise line the turn parser should consume silently
    pub fn is_skip(&self, line: &str) -> bool {
        self.skip.is_match(line)
    }

    pub fn is_bullet(&self, line: &str) -> bool {
        self.bullet.is_match(line)
    }

    /// Damage annotation text carried by a skipped line, if any
    pub fn damage_annotation(&self, line: &str) -> Option<String> {
        self.damage_annotation.captures(line).and_then(|c| text(&c, 1))
    }

    /// Classify a setup-region line
    pub fn classify_setup(&self, line: &str) -> Option<SetupLine> {
        let line = line.trim();
        if let Some(c) = self.setup_coin_choice.captures(line) {
            return Some(SetupLine::CoinChoice {
                player: text(&c, 1)?,
                call: text(&c, 2)?,
            });
        }
        if let Some(c) = self.setup_coin_winner.captures(line) {
            return Some(SetupLine::CoinWinner { player: text(&c, 1)? });
        }
        if let Some(c) = self.setup_goes_first.captures(line) {
            return Some(SetupLine::GoesFirst {
                player: text(&c, 1)?,
                first: &c[2] == "first",
            });
        }
        if let Some(c) = self.setup_opening_hand.captures(line) {
            return Some(SetupLine::OpeningHand {
                player: text(&c, 1)?,
                count: count(&c[2])?,
            });
        }
        if let Some(c) = self.setup_mulligan_draw.captures(line) {
            return Some(SetupLine::MulliganDraw {
                player: text(&c, 1)?,
                count: count(&c[2])?,
                mulliganer: text(&c, 3)?,
            });
        }
        if let Some(c) = self.setup_mulligan.captures(line) {
            return Some(SetupLine::Mulligan {
                player: text(&c, 1)?,
                count: count(&c[2])?,
            });
        }
        if let Some(c) = self.pokemon_play.captures(line) {
            return Some(SetupLine::PokemonPlay {
                player: text(&c, 1)?,
                pokemon: text(&c, 2)?,
                location: text(&c, 3)?,
            });
        }
        None
    }

    /// Classify a turn line using the fixed rule precedence
    pub fn classify(&self, line: &str) -> Option<LineMatch> {
        let line = line.trim();
        TURN_PRECEDENCE
            .iter()
            .find_map(|rule| self.apply(*rule, line))
    }

    /// Try a single rule against an already-trimmed line
    pub fn apply(&self, rule: TurnRule, line: &str) -> Option<LineMatch> {
        match rule {
            TurnRule::Win => self.match_win(line),
            TurnRule::Attack => {
                if let Some(c) = self.attack.captures(line) {
                    return Some(LineMatch::Attack {
                        player: text(&c, 1)?,
                        pokemon: text(&c, 2)?,
                        attack: text(&c, 3)?,
                        target_player: text(&c, 4),
                        target: text(&c, 5),
                        damage: c.get(6).and_then(|m| m.as_str().parse().ok()),
                    });
                }
                let c = self.damage_counters.captures(line)?;
                Some(LineMatch::DamageCounters {
                    player: text(&c, 1)?,
                    counters: c[2].parse().ok()?,
                    target_player: text(&c, 3)?,
                    target: text(&c, 4)?,
                })
            }
            TurnRule::Knockout => {
                let c = self.knockout.captures(line)?;
                Some(LineMatch::Knockout {
                    owner: text(&c, 1)?,
                    pokemon: text(&c, 2)?,
                })
            }
            TurnRule::Prize => {
                let c = self.prize.captures(line)?;
                Some(LineMatch::Prize {
                    player: text(&c, 1)?,
                    count: count(&c[2])?,
                })
            }
            TurnRule::Switch => {
                if let Some(c) = self.retreat.captures(line) {
                    return Some(LineMatch::Switch {
                        player: text(&c, 1)?,
                        pokemon: text(&c, 2)?,
                        replaced: None,
                        location: "Bench",
                    });
                }
                if let Some(c) = self.now_active.captures(line) {
                    return Some(LineMatch::Switch {
                        player: text(&c, 1)?,
                        pokemon: text(&c, 2)?,
                        replaced: None,
                        location: "Active Spot",
                    });
                }
                let c = self.switched.captures(line)?;
                Some(LineMatch::Switch {
                    player: text(&c, 1)?,
                    pokemon: text(&c, 3)?,
                    replaced: text(&c, 2),
                    location: "Active Spot",
                })
            }
            TurnRule::Ability => {
                let c = self.ability.captures(line)?;
                Some(LineMatch::Ability {
                    player: text(&c, 1)?,
                    pokemon: text(&c, 2)?,
                    ability: text(&c, 3)?,
                })
            }
            TurnRule::Evolve => {
                let c = self.evolve.captures(line)?;
                Some(LineMatch::Evolve {
                    player: text(&c, 1)?,
                    from: text(&c, 2)?,
                    to: text(&c, 3)?,
                    location: text(&c, 4),
                })
            }
            TurnRule::Stadium => {
                let c = self.stadium.captures(line)?;
                Some(LineMatch::Stadium {
                    player: text(&c, 1)?,
                    card: text(&c, 2)?,
                })
            }
            TurnRule::PokemonPlay => {
                let c = self.pokemon_play.captures(line)?;
                Some(LineMatch::PokemonPlay {
                    player: text(&c, 1)?,
                    pokemon: text(&c, 2)?,
                    location: text(&c, 3)?,
                })
            }
            TurnRule::TrainerPlay => {
                if let Some(c) = self.attach.captures(line) {
                    let card = text(&c, 2)?;
                    if card.ends_with("Energy") {
                        return None;
                    }
                    return Some(LineMatch::TrainerPlay {
                        player: text(&c, 1)?,
                        card,
                        attached_to: text(&c, 3),
                    });
                }
                let c = self.trainer_play.captures(line)?;
                Some(LineMatch::TrainerPlay {
                    player: text(&c, 1)?,
                    card: text(&c, 2)?,
                    attached_to: None,
                })
            }
            TurnRule::Energy => {
                let c = self.attach.captures(line)?;
                let energy = text(&c, 2)?;
                if !energy.ends_with("Energy") {
                    return None;
                }
                Some(LineMatch::Energy {
                    player: text(&c, 1)?,
                    energy,
                    target: text(&c, 3)?,
                    location: text(&c, 4),
                })
            }
            TurnRule::DrawSingle => {
                let c = self.draw_single.captures(line)?;
                Some(LineMatch::DrawSingle {
                    player: text(&c, 1)?,
                    card: text(&c, 2)?,
                })
            }
            TurnRule::DrawMulti => {
                let c = self.draw_multi.captures(line)?;
                Some(LineMatch::DrawMulti {
                    player: text(&c, 1)?,
                    count: count(&c[2])?,
                })
            }
            TurnRule::CoinFlip => {
                if let Some(c) = self.coin_flip_single.captures(line) {
                    let heads = c[2].eq_ignore_ascii_case("heads");
                    return Some(LineMatch::CoinFlip {
                        player: text(&c, 1)?,
                        heads: u32::from(heads),
                        tails: u32::from(!heads),
                    });
                }
                let c = self.coin_flip_multi.captures(line)?;
                let flips: u32 = c[2].parse().ok()?;
                let heads: u32 = c[3].parse().ok()?;
                Some(LineMatch::CoinFlip {
                    player: text(&c, 1)?,
                    heads: heads.min(flips),
                    tails: flips.saturating_sub(heads),
                })
            }
        }
    }

    fn match_win(&self, line: &str) -> Option<LineMatch> {
        if let Some(c) = self.win_deck_out.captures(line) {
            // "X's opponent's deck ran out" names the winner as X
            return Some(LineMatch::Win {
                winner: text(&c, 2).or_else(|| text(&c, 1)),
                loser: None,
                condition: WinCondition::DeckOut,
            });
        }
        if let Some(c) = self.win_all_prizes.captures(line) {
            return Some(LineMatch::Win {
                winner: text(&c, 1),
                loser: None,
                condition: WinCondition::Prizes,
            });
        }
        if let Some(c) = self.win_took_all_prizes.captures(line) {
            return Some(LineMatch::Win {
                winner: text(&c, 2).or_else(|| text(&c, 1)),
                loser: None,
                condition: WinCondition::Prizes,
            });
        }
        if let Some(c) = self.win_no_pokemon.captures(line) {
            return Some(LineMatch::Win {
                winner: text(&c, 2),
                loser: text(&c, 1),
                condition: WinCondition::NoPokemon,
            });
        }
        None
    }

    /// Recognize a concession line
    pub fn concession(&self, line: &str) -> Option<Concession> {
        let line = line.trim();
        if let Some(c) = self.concede_named_winner.captures(line) {
            return text(&c, 1).map(Concession::Winner);
        }
        let c = self.concede_named_loser.captures(line)?;
        text(&c, 1).map(Concession::Loser)
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(line: &str) -> Option<LineMatch> {
        PatternLibrary::global().classify(line)
    }

    #[test]
    fn test_attack_line() {
        let m = classify("Player1's Pikachu used Thunder Shock on Player2's Alakazam ex for 20 damage.");
        assert_eq!(
            m,
            Some(LineMatch::Attack {
                player: "Player1".into(),
                pokemon: "Pikachu".into(),
                attack: "Thunder Shock".into(),
                target_player: Some("Player2".into()),
                target: Some("Alakazam ex".into()),
                damage: Some(20),
            })
        );
    }

    #[test]
    fn test_attack_accepts_curly_apostrophe() {
        let m = classify("Ash\u{2019}s Pikachu used Quick Attack on Gary\u{2019}s Eevee for 30 damage.");
        assert!(matches!(m, Some(LineMatch::Attack { damage: Some(30), .. })));
    }

    #[test]
    fn test_damage_counters() {
        let m = classify("Player1 put 22 damage counters on Player2's Gardevoir ex.");
        assert_eq!(
            m,
            Some(LineMatch::DamageCounters {
                player: "Player1".into(),
                counters: 22,
                target_player: "Player2".into(),
                target: "Gardevoir ex".into(),
            })
        );
    }

    #[test]
    fn test_ability_versus_attack() {
        let m = classify("Player1's Drakloak used Recon Directive.");
        assert!(matches!(m, Some(LineMatch::Ability { ref ability, .. }) if ability == "Recon Directive"));
    }

    #[test]
    fn test_stadium_before_pokemon_and_trainer() {
        assert!(matches!(
            classify("Misty played Artazon to the Stadium spot."),
            Some(LineMatch::Stadium { .. })
        ));
        assert!(matches!(
            classify("Misty played Staryu to the Bench."),
            Some(LineMatch::PokemonPlay { ref location, .. }) if location == "Bench"
        ));
        assert!(matches!(
            classify("Misty played Nest Ball."),
            Some(LineMatch::TrainerPlay { attached_to: None, .. })
        ));
    }

    #[test]
    fn test_attach_energy_versus_tool() {
        assert_eq!(
            classify("Brock attached Basic Fighting Energy to Onix in the Active Spot."),
            Some(LineMatch::Energy {
                player: "Brock".into(),
                energy: "Basic Fighting Energy".into(),
                target: "Onix".into(),
                location: Some("Active Spot".into()),
            })
        );
        assert!(matches!(
            classify("Brock attached Bravery Charm to Onix on the Bench."),
            Some(LineMatch::TrainerPlay { attached_to: Some(ref t), .. }) if t == "Onix"
        ));
    }

    #[test]
    fn test_draw_single_versus_multi() {
        assert!(matches!(
            classify("Player1 drew Nest Ball."),
            Some(LineMatch::DrawSingle { ref card, .. }) if card == "Nest Ball"
        ));
        assert!(matches!(classify("Player1 drew 3 cards."), Some(LineMatch::DrawMulti { count: 3, .. })));
        assert!(matches!(classify("Player1 drew a card."), Some(LineMatch::DrawMulti { count: 1, .. })));
    }

    #[test]
    fn test_switch_lines() {
        assert_eq!(
            classify("Player2 retreated Pikachu to the Bench."),
            Some(LineMatch::Switch {
                player: "Player2".into(),
                pokemon: "Pikachu".into(),
                replaced: None,
                location: "Bench",
            })
        );
        assert!(matches!(
            classify("Player2's Raichu is now in the Active Spot."),
            Some(LineMatch::Switch { location: "Active Spot", .. })
        ));
    }

    #[test]
    fn test_knockout_and_prizes() {
        assert!(matches!(
            classify("Player2's Alakazam ex was Knocked Out!"),
            Some(LineMatch::Knockout { ref owner, .. }) if owner == "Player2"
        ));
        assert!(matches!(classify("Player1 took a Prize card."), Some(LineMatch::Prize { count: 1, .. })));
        assert!(matches!(classify("Player1 took 2 Prize cards."), Some(LineMatch::Prize { count: 2, .. })));
    }

    #[test]
    fn test_win_lines_take_precedence() {
        assert_eq!(
            classify("Player1 took all Prize cards."),
            Some(LineMatch::Win {
                winner: Some("Player1".into()),
                loser: None,
                condition: WinCondition::Prizes,
            })
        );
        assert!(matches!(
            classify("Opponent's deck ran out. Player2 wins."),
            Some(LineMatch::Win { winner: Some(ref w), condition: WinCondition::DeckOut, .. }) if w == "Player2"
        ));
        assert!(matches!(
            classify("All Prize cards taken. Player1 wins."),
            Some(LineMatch::Win { condition: WinCondition::Prizes, .. })
        ));
    }

    #[test]
    fn test_coin_flips() {
        assert_eq!(
            classify("Player1 flipped a coin and it landed on tails."),
            Some(LineMatch::CoinFlip { player: "Player1".into(), heads: 0, tails: 1 })
        );
        assert_eq!(
            classify("Player1 flipped 3 coins, and 2 landed on heads."),
            Some(LineMatch::CoinFlip { player: "Player1".into(), heads: 2, tails: 1 })
        );
    }

    #[test]
    fn test_evolve_location() {
        assert_eq!(
            classify("Player1 evolved Dreepy to Drakloak in the Active Spot."),
            Some(LineMatch::Evolve {
                player: "Player1".into(),
                from: "Dreepy".into(),
                to: "Drakloak".into(),
                location: Some("Active Spot".into()),
            })
        );
    }

    #[test]
    fn test_skip_and_annotations() {
        let p = PatternLibrary::global();
        assert!(p.is_skip(""));
        assert!(p.is_skip("   • Nest Ball, Dreepy"));
        assert!(p.is_skip("- 3 drawn cards."));
        assert!(p.is_skip("Player1 shuffled their deck."));
        assert!(p.is_skip("Player1 ended their turn."));
        assert!(!p.is_skip("Player1 drew 3 cards."));
        assert_eq!(
            p.damage_annotation("   • Base damage: 120 damage"),
            Some("Base damage: 120 damage".to_string())
        );
        assert_eq!(p.damage_annotation("   • Nest Ball"), None);
    }

    #[test]
    fn test_markers() {
        let p = PatternLibrary::global();
        assert!(p.is_setup_marker("Setup"));
        assert!(p.is_setup_marker("  Setup  "));
        assert!(!p.is_setup_marker("Setup phase"));
        assert!(p.is_turn_marker("[playerName]'s Turn"));
        assert!(p.is_turn_marker("Turn # 3 - Player1's Turn"));
        assert!(!p.is_turn_marker("Player1 ended their turn."));
    }

    #[test]
    fn test_setup_lines() {
        let p = PatternLibrary::global();
        assert_eq!(
            p.classify_setup("Player1 decided to go second."),
            Some(SetupLine::GoesFirst { player: "Player1".into(), first: false })
        );
        assert_eq!(
            p.classify_setup("Player2 drew 7 cards for the opening hand."),
            Some(SetupLine::OpeningHand { player: "Player2".into(), count: 7 })
        );
        assert_eq!(
            p.classify_setup("Player1 drew 2 more cards because Player2 took at least 1 mulligan."),
            Some(SetupLine::MulliganDraw {
                player: "Player1".into(),
                count: 2,
                mulliganer: "Player2".into(),
            })
        );
        assert_eq!(
            p.classify_setup("Player2 took a mulligan."),
            Some(SetupLine::Mulligan { player: "Player2".into(), count: 1 })
        );
    }

    #[test]
    fn test_concessions() {
        let p = PatternLibrary::global();
        assert_eq!(p.concession("Player2 conceded."), Some(Concession::Loser("Player2".into())));
        assert_eq!(
            p.concession("Opponent conceded. Player1 wins."),
            Some(Concession::Winner("Player1".into()))
        );
        assert_eq!(
            p.concession("You conceded. Player2 wins."),
            Some(Concession::Winner("Player2".into()))
        );
    }
}
