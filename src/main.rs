//! ptcg-log - Pokémon TCG Live log analyzer
//!
//! Parses exported battle logs and prints the match, the reconstructed decks, or
//! a one-line summary per log.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use ptcg_log::{
    core::TrainerKind,
    deck::{Confidence, DeckCard},
    Config, DeckReconstructor, LogParser, MatchData, ReconstructedDeck,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// How much diagnostic output to show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
enum VerbosityLevel {
    /// No diagnostics
    Silent = 0,
    /// Errors only
    Minimal = 1,
    /// Warnings about skipped events (default)
    #[default]
    Normal = 2,
    /// Per-line parsing decisions and every event in text output
    Verbose = 3,
}

impl VerbosityLevel {
    fn filter(self) -> &'static str {
        match self {
            VerbosityLevel::Silent => "off",
            VerbosityLevel::Minimal => "error",
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "debug",
        }
    }
}

/// Accepts a level name or its number, case-insensitively
fn parse_verbosity(s: &str) -> Result<VerbosityLevel, String> {
    let level = match s.trim().to_ascii_lowercase().as_str() {
        "silent" | "0" => VerbosityLevel::Silent,
        "minimal" | "1" => VerbosityLevel::Minimal,
        "normal" | "2" => VerbosityLevel::Normal,
        "verbose" | "3" => VerbosityLevel::Verbose,
        other => return Err(format!("unknown verbosity '{other}', use silent, minimal, normal, verbose or 0-3")),
    };
    Ok(level)
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "ptcg-log")]
#[command(about = "Pokémon TCG Live log analyzer", long_about = None)]
struct Cli {
    /// JSON file overriding parse and deck options
    #[arg(long, global = true, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Diagnostic verbosity (0=silent, 1=minimal, 2=normal, 3=verbose); RUST_LOG overrides
    #[arg(long, short = 'v', global = true, default_value = "normal", value_parser = parse_verbosity)]
    verbosity: VerbosityLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a log and print the match
    Parse {
        #[arg(value_name = "LOG_FILE")]
        log: PathBuf,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Reconstruct both players' decks from a log
    Deck {
        #[arg(value_name = "LOG_FILE")]
        log: PathBuf,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Parse many logs in parallel and print one line per log
    Summary {
        #[arg(value_name = "LOG_FILE", required = true)]
        logs: Vec<PathBuf>,
    },
}

fn init_tracing(verbosity: VerbosityLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let verbosity = cli.verbosity;
    init_tracing(verbosity);

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Parse { log, format } => run_parse(&config, &log, format, verbosity)?,
        Commands::Deck { log, format } => run_deck(&config, &log, format)?,
        Commands::Summary { logs } => run_summary(&config, &logs),
    }

    Ok(())
}

fn load_match(config: &Config, path: &Path) -> anyhow::Result<MatchData> {
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let data = LogParser::with_options(config.parse.clone())
        .parse(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(data)
}

fn run_parse(config: &Config, path: &Path, format: OutputFormat, verbosity: VerbosityLevel) -> anyhow::Result<()> {
    let data = load_match(config, path)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
        OutputFormat::Text => print_match(&data, verbosity >= VerbosityLevel::Verbose),
    }
    Ok(())
}

fn print_match(data: &MatchData, show_events: bool) {
    let [a, b] = &data.players;
    println!("=== {} vs {} ===", a.username, b.username);
    println!(
        "Coin flip: {} won, {} goes first",
        data.coin_flip_winner,
        data.first_player().username
    );
    match (&data.winner, data.win_condition) {
        (Some(winner), Some(condition)) => println!("Winner: {winner} ({condition})"),
        (Some(winner), None) => println!("Winner: {winner}"),
        _ => println!("Winner: undecided"),
    }
    println!("Turns: {}, events: {}", data.turn_count(), data.events.len());
    println!("Pokémon seen: {}", data.pokemon_in_match.join(", "));
    println!();

    for (name, stats) in &data.statistics {
        println!("{name}:");
        println!("  Damage dealt:   {}", stats.total_damage_dealt);
        println!("  Cards drawn:    {}", stats.total_cards_drawn);
        println!("  Knockouts:      {}", stats.pokemon_knocked_out);
        println!("  Prizes taken:   {}", stats.prize_cards_taken);
        println!("  Trainers:       {}", stats.trainers_played.total());
        println!(
            "  Coin flips:     {} heads, {} tails",
            stats.coin_flips.heads, stats.coin_flips.tails
        );
        println!("  Turns played:   {}", stats.turns_played);
    }

    if show_events {
        println!();
        for event in &data.events {
            println!("{event}");
        }
    }
}

fn run_deck(config: &Config, path: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let data = load_match(config, path)?;
    let decks = DeckReconstructor::with_options(config.deck.clone()).reconstruct(&data);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&decks)?),
        OutputFormat::Text => {
            for (player, deck) in &decks {
                print_deck(player, deck);
            }
        }
    }
    Ok(())
}

fn print_section(title: &str, cards: &[DeckCard]) {
    if cards.is_empty() {
        return;
    }
    println!("{title}:");
    for card in cards {
        let mut line = format!("  {} {}", card.count, card.name);
        if let Some(stage) = card.evolution_stage.filter(|s| *s > 0) {
            line.push_str(&format!(" (stage {stage})"));
        }
        if card.confidence == Confidence::Inferred {
            line.push_str(" [inferred]");
        }
        println!("{line}");
    }
}

fn print_deck(player: &str, deck: &ReconstructedDeck) {
    println!("=== {player} ({} cards observed) ===", deck.total_cards_observed);
    print_section("Pokémon", &deck.pokemon);
    for (kind, cards) in [
        (TrainerKind::Supporter, &deck.trainers.supporters),
        (TrainerKind::Item, &deck.trainers.items),
        (TrainerKind::Tool, &deck.trainers.tools),
        (TrainerKind::Stadium, &deck.trainers.stadiums),
    ] {
        let title = format!("Trainers - {}", kind.plural());
        print_section(&title, cards);
    }
    print_section("Basic energy", &deck.energy.basic);
    print_section("Special energy", &deck.energy.special);
    println!();
}

fn run_summary(config: &Config, logs: &[PathBuf]) {
    let lines: Vec<String> = logs
        .par_iter()
        .map(|path| match load_match(config, path) {
            Ok(data) => {
                let winner = data.winner.as_deref().unwrap_or("undecided");
                let condition = data
                    .win_condition
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string());
                format!(
                    "{}: {} vs {}, winner {winner} ({condition}), {} turns",
                    path.display(),
                    data.players[0].username,
                    data.players[1].username,
                    data.turn_count()
                )
            }
            Err(e) => format!("{}: error: {e:#}", path.display()),
        })
        .collect();

    for line in lines {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_names_and_numbers() {
        assert_eq!(parse_verbosity("silent"), Ok(VerbosityLevel::Silent));
        assert_eq!(parse_verbosity("1"), Ok(VerbosityLevel::Minimal));
        assert_eq!(parse_verbosity("Verbose"), Ok(VerbosityLevel::Verbose));
        assert!(parse_verbosity("loud").is_err());
    }

    #[test]
    fn test_cli_verbosity_flag() {
        let cli = Cli::try_parse_from(["ptcg-log", "-v", "3", "summary", "a.log"]).unwrap();
        assert_eq!(cli.verbosity, VerbosityLevel::Verbose);
        let cli = Cli::try_parse_from(["ptcg-log", "summary", "a.log"]).unwrap();
        assert_eq!(cli.verbosity, VerbosityLevel::Normal);
        assert_eq!(cli.verbosity.filter(), "warn");
    }
}
