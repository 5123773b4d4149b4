//! Quoridor-Rust: a wall-and-pawn race engine with an MCTS player.
//!
//! ## Usage
//!
//! - `quoridor-rust` - Show a demo
//! - `quoridor-rust protocol` - Serve the text protocol on stdin/stdout
//! - `quoridor-rust demo` - Search one move and show the board
//! - `quoridor-rust self-play --games 10` - Let the engine play itself

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{LevelFilter, info};

use quoridor_rust::config::SearchConfig;
use quoridor_rust::constants::DEFAULT_SIZE;
use quoridor_rust::game::{GameState, PlayerId};
use quoridor_rust::mcts::{search, search_with_rng};
use quoridor_rust::protocol::ProtocolEngine;

/// Quoridor-Rust: a wall-and-pawn race engine with an MCTS player
#[derive(Parser)]
#[command(name = "quoridor-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Platforms per side
    #[arg(long, global = true, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Search iterations per move (overrides the config file)
    #[arg(long, global = true)]
    iterations: Option<usize>,

    /// Random seed (overrides the config file)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// JSON file with search settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log search progress
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the text protocol for use with a host application
    Protocol,
    /// Run a single search and show the result
    Demo,
    /// Let the engine play against itself
    SelfPlay {
        /// Number of games to play
        #[arg(long, default_value_t = 1)]
        games: usize,

        /// Abandon a game after this many turns
        #[arg(long, default_value_t = 500)]
        max_turns: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        Some(Commands::Protocol) => {
            let mut engine = ProtocolEngine::with_size(cli.size, config)
                .context("failed to start protocol engine")?;
            engine.run().context("protocol I/O failed")?;
        }
        Some(Commands::SelfPlay { games, max_turns }) => {
            run_self_play(cli.size, &config, games, max_turns)?;
        }
        Some(Commands::Demo) | None => {
            run_demo(cli.size, &config)?;
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<SearchConfig> {
    let mut config = match &cli.config {
        Some(path) => SearchConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SearchConfig::default(),
    };
    if let Some(iterations) = cli.iterations {
        config.iterations = iterations;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.validate().context("invalid search settings")?;
    Ok(config)
}

fn search_progress() -> Result<ProgressBar> {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}% ({msg})")?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

fn run_demo(size: usize, config: &SearchConfig) -> Result<()> {
    println!("Quoridor-Rust: wall-and-pawn race with MCTS\n");

    let game = GameState::with_size(size)?;
    println!("{game}\n");

    println!("Running {} MCTS iterations...", config.iterations);
    let pb = search_progress()?;
    pb.set_message(format!("{} to move", game.current_turn()));
    let result = search(&game, config, |percent| pb.set_position(percent as u64))?;
    pb.finish_and_clear();

    println!("Best action: {}", result.action);
    println!(
        "Visits: {}  average score: {:.3}\n",
        result.visits, result.average
    );
    println!("{}", result.state);
    Ok(())
}

fn run_self_play(size: usize, config: &SearchConfig, games: usize, max_turns: usize) -> Result<()> {
    let mut rng = match config.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let mut wins = [0usize; 2];
    let mut unfinished = 0;

    let pb = ProgressBar::new(games as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games ({msg})")?
            .progress_chars("=>-"),
    );

    for game_index in 0..games {
        let mut game = GameState::with_size(size)?;
        while game.check_winner(false).is_none() && game.turn_count() <= max_turns {
            let result = search_with_rng(&game, config, &mut rng, |_| {})
                .with_context(|| format!("search failed in game {}", game_index + 1))?;
            info!("game {}: {} plays {}", game_index + 1, game.current_turn(), result.action);
            game = result.state;
        }

        match game.check_winner(false) {
            Some(PlayerId::P1) => wins[0] += 1,
            Some(PlayerId::P2) => wins[1] += 1,
            None => unfinished += 1,
        }
        pb.set_message(format!("P1 {} / P2 {}", wins[0], wins[1]));
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!("Games:      {games}");
    println!("P1 wins:    {}", wins[0]);
    println!("P2 wins:    {}", wins[1]);
    if unfinished > 0 {
        println!("Unfinished: {unfinished}");
    }
    Ok(())
}
