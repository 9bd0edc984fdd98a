use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use halite_core::{compute_metrics, Event, EventLevel, GameState};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

mod bench;
mod game;

use bench::SeedRange;
use game::{Game, GameSetup};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "halite_cli", about = "Halite fleet bot, played locally")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter (e.g. `info`, `halite_control=debug`). Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Args)]
struct GameArgs {
    /// Number of players: 1, 2, or 4.
    #[arg(long, default_value_t = 2, value_parser = parse_players)]
    players: u32,
    #[arg(long, default_value = "./content")]
    content_dir: String,
    /// Strategy JSON; built-in defaults when omitted.
    #[arg(long)]
    strategy: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game and print its progress.
    Run {
        #[command(flatten)]
        game: GameArgs,
        /// Stop after this many turns (default: the game's max_turns).
        #[arg(long)]
        turns: Option<u64>,
        /// Seeds the map and every bot. Random when omitted.
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 50)]
        print_every: u64,
        #[arg(long, default_value = "normal", value_parser = ["normal", "debug"])]
        event_level: String,
    },
    /// Play a range of seeds in parallel and write a JSON summary.
    Bench {
        #[command(flatten)]
        game: GameArgs,
        /// Seeds to play, e.g. `0..=31`.
        #[arg(long, default_value = "0..=15")]
        seeds: SeedRange,
        #[arg(long, default_value = "runs/bench_summary.json")]
        output: PathBuf,
    },
}

fn parse_players(s: &str) -> Result<u32, String> {
    match s.parse::<u32>() {
        Ok(n @ (1 | 2 | 4)) => Ok(n),
        Ok(n) => Err(format!("{n} players unsupported, expected 1, 2, or 4")),
        Err(e) => Err(e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

fn init_tracing(log_level: Option<&str>, log_file: Option<&PathBuf>) -> Result<()> {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).with_context(|| format!("bad log filter '{level}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating log file: {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Run loop
// ---------------------------------------------------------------------------

fn run(
    args: &GameArgs,
    turns: Option<u64>,
    seed: Option<u64>,
    print_every: u64,
    event_level: EventLevel,
) -> Result<()> {
    let setup = GameSetup::load(&args.content_dir, args.strategy.as_deref(), args.players)?;
    let seed = seed.unwrap_or_else(rand::random);
    tracing::info!(seed, players = setup.players, "bot rng seed");

    let mut game = Game::new(&setup, seed);
    let last_turn = turns.map_or(game.state.meta.max_turns, |t| t.min(game.state.meta.max_turns));

    println!(
        "Starting game: seed={seed} players={} map={}x{} turns={last_turn}",
        setup.players, setup.constants.map_width, setup.constants.map_height,
    );
    println!("{}", "-".repeat(80));

    while game.turn() < last_turn {
        let events = game.step(event_level);

        for event in &events {
            if let Event::ShipsCollided { ship_ids, position } = &event.event {
                tracing::info!(turn = event.turn, %position, ships = ship_ids.len(), "collision");
            }
        }

        if print_every > 0 && game.turn() % print_every == 0 {
            print_status(&game.state);
        }
    }

    println!("{}", "-".repeat(80));
    println!("Done. Final state at turn {}:", game.turn());
    print_status(&game.state);
    if let Some(leader) = game.leader() {
        println!("Leader: {leader}");
    }
    Ok(())
}

fn print_status(state: &GameState) {
    let metrics = compute_metrics(state);
    let players: Vec<String> = metrics
        .players
        .iter()
        .map(|p| {
            format!(
                "{}: ships={:3} bank={:6} cargo={:6}",
                p.player, p.ships, p.halite_banked, p.halite_carried
            )
        })
        .collect();
    println!(
        "[turn={:04}]  map={:7}  {}",
        metrics.turn,
        metrics.map_halite,
        players.join("  |  ")
    );
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref(), cli.log_file.as_ref())?;

    match cli.command {
        Commands::Run {
            game,
            turns,
            seed,
            print_every,
            event_level,
        } => {
            let level = match event_level.as_str() {
                "debug" => EventLevel::Debug,
                _ => EventLevel::Normal,
            };
            run(&game, turns, seed, print_every, level)?;
        }
        Commands::Bench {
            game,
            seeds,
            output,
        } => {
            let setup = GameSetup::load(&game.content_dir, game.strategy.as_deref(), game.players)?;
            let summary = bench::run(&setup, seeds, &output)?;
            bench::print_summary(&summary);
            println!("Summary written to {}", output.display());
        }
    }
    Ok(())
}
