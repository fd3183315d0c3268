//! Fixture log tests
//!
//! One test is generated per `.log` file in `test_logs/` using the `dir-test`
//! procedural macro; each checks the invariants every parsed match must hold.
//! The named-fixture tests below pin down exact results for individual logs.

use dir_test::{dir_test, Fixture};
use ptcg_log::{
    core::{EventType, TrainerKind},
    deck::Confidence,
    parse_log, reconstruct_decks, EventSequence, LogParser, WinCondition,
};
use similar_asserts::assert_eq;

#[dir_test(
    dir: "$CARGO_MANIFEST_DIR/test_logs",
    glob: "**/*.log",
)]
fn test_log_invariants(fixture: Fixture<&str>) {
    let path = fixture.path();
    let data = parse_log(fixture.content()).unwrap_or_else(|e| panic!("{path}: {e}"));

    // Parsing is repeatable
    let again = LogParser::new()
        .parse_with(fixture.content(), &mut EventSequence::new())
        .unwrap();
    assert_eq!(data, again, "{path} parsed differently on the second run");

    for pair in data.events.windows(2) {
        assert!(pair[0].turn <= pair[1].turn, "{path}: turn order broken at {}", pair[1]);
        if pair[0].turn == pair[1].turn {
            assert!(pair[0].timestamp < pair[1].timestamp, "{path}: timestamp order broken at {}", pair[1]);
        }
    }

    let turn_events: usize = data.turns.iter().map(|t| t.events.len()).sum();
    let setup_events = data.events.iter().filter(|e| e.turn == 0).count();
    assert_eq!(setup_events + turn_events, data.events.len());

    for player in &data.players {
        let name = player.username.as_str();
        let stats = &data.statistics[name];
        let dealt: u32 = data
            .events_for(name)
            .filter(|e| e.event_type == EventType::Attack)
            .filter_map(|e| e.details.damage)
            .sum();
        assert_eq!(stats.total_damage_dealt, dealt, "{path}: damage for {name}");
        assert!(
            stats.prize_cards_taken >= stats.pokemon_knocked_out,
            "{path}: {name} has more knockouts than prizes"
        );
    }

    for (player, deck) in reconstruct_decks(&data) {
        let total: u32 = deck.cards.iter().map(|c| c.count).sum();
        assert_eq!(deck.total_cards_observed, total);
        for card in &deck.cards {
            if !card.is_basic_energy() {
                assert!(card.count <= 4, "{path}: {player} has {} x{}", card.name, card.count);
            }
            assert_eq!(card.min_count, card.count);
        }
        for (i, card) in deck.pokemon.iter().enumerate() {
            if let Some(base) = &card.evolves_from {
                if let Some(j) = deck.pokemon.iter().position(|c| &c.name == base) {
                    assert!(j < i, "{path}: {base} listed after {}", card.name);
                }
            }
        }
    }
}

#[test]
fn test_dragapult_vs_charizard() {
    let data = parse_log(include_str!("../test_logs/dragapult_vs_charizard.log")).unwrap();

    assert_eq!(data.turn_count(), 7);
    assert_eq!(data.winner.as_deref(), Some("Ash"));
    assert_eq!(data.win_condition, Some(WinCondition::Prizes));
    assert_eq!(data.opponent_of("Ash"), Some("Gary"));
    assert_eq!(
        data.pokemon_in_match,
        vec!["Dreepy", "Charmander", "Pidgey", "Drakloak", "Charmeleon", "Dragapult ex"]
    );

    let ash = &data.statistics["Ash"];
    assert_eq!(ash.total_damage_dealt, 530);
    assert_eq!(ash.total_cards_drawn, 15);
    assert_eq!(ash.pokemon_knocked_out, 4);
    assert_eq!(ash.prize_cards_taken, 6);
    assert_eq!(ash.turns_played, 4);

    let gary = &data.statistics["Gary"];
    assert_eq!(gary.total_damage_dealt, 110);
    assert_eq!(gary.total_cards_drawn, 10);
    assert_eq!(gary.coin_flips.tails, 1);
    assert_eq!(gary.turns_played, 3);
    assert_eq!(gary.trainers_played.list(TrainerKind::Stadium)[0].name, "Artazon");
    assert_eq!(gary.trainers_played.list(TrainerKind::Supporter)[0].name, "Boss's Orders");

    let phantom_dive = data
        .events
        .iter()
        .find(|e| e.details.attack_name.as_deref() == Some("Phantom Dive"))
        .unwrap();
    assert_eq!(
        phantom_dive.details.damage_breakdown.as_deref(),
        Some("Total damage: 200 damage")
    );

    let decks = reconstruct_decks(&data);
    let deck = &decks["Ash"];
    let pokemon: Vec<_> = deck
        .pokemon
        .iter()
        .map(|c| (c.name.as_str(), c.count, c.evolution_stage))
        .collect();
    assert_eq!(
        pokemon,
        vec![
            ("Dreepy", 4, Some(0)),
            ("Drakloak", 3, Some(1)),
            ("Dragapult ex", 1, Some(2)),
        ]
    );
    assert_eq!(deck.card("Basic Psychic Energy").unwrap().count, 7);
    assert_eq!(deck.card("Nest Ball").unwrap().count, 3);
    assert_eq!(deck.total_cards_observed, 25);
}

#[test]
fn test_starmie_deck_out() {
    let data = parse_log(include_str!("../test_logs/starmie_deck_out.log")).unwrap();

    assert_eq!(data.turn_count(), 4);
    assert_eq!(data.first_player().username, "Misty");
    assert_eq!(data.coin_flip_winner, "Brock");
    assert_eq!(data.winner.as_deref(), Some("Misty"));
    assert_eq!(data.win_condition, Some(WinCondition::DeckOut));

    let mulligan = data.events.iter().find(|e| e.event_type == EventType::Mulligan).unwrap();
    assert_eq!(mulligan.player, "Misty");

    let misty = &data.statistics["Misty"];
    assert_eq!(misty.total_damage_dealt, 80);
    assert_eq!(misty.total_cards_drawn, 16);
    assert_eq!((misty.coin_flips.heads, misty.coin_flips.tails), (1, 1));
    assert_eq!(data.statistics["Brock"].total_cards_drawn, 9);

    let decks = reconstruct_decks(&data);
    let misty_deck = &decks["Misty"];
    assert_eq!(misty_deck.card("Basic Water Energy").unwrap().count, 4);
    assert_eq!(misty_deck.card("Starmie").unwrap().evolves_from.as_deref(), Some("Staryu"));
    assert_eq!(misty_deck.trainers.supporters[0].name, "Professor\u{2019}s Research");
    assert_eq!(decks["Brock"].trainers.tools[0].name, "Bravery Charm");
}

#[test]
fn test_pikachu_concede() {
    let data = parse_log(include_str!("../test_logs/pikachu_concede.log")).unwrap();

    assert_eq!(data.winner.as_deref(), Some("Blue"));
    assert_eq!(data.win_condition, Some(WinCondition::Concede));
    assert_eq!(data.statistics["Blue"].total_damage_dealt, 30);
    assert_eq!(data.statistics["Red"].total_damage_dealt, 20);

    let decks = reconstruct_decks(&data);
    let red = &decks["Red"];
    assert_eq!(red.card("Ralts").unwrap().confidence, Confidence::Confirmed);
    assert_eq!(red.card("Kirlia").unwrap().evolution_stage, Some(1));
    assert_eq!(decks["Blue"].trainers.stadiums[0].name, "Mesagoza");
}
