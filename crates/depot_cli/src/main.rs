//! DEPOT.ARENA CLI
//!
//! Inspect match logs and replay them against the demo board rules.

#![warn(missing_docs)]
#![warn(clippy::all)]

use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use depot_core::MatchMeta;
use depot_log::source::load_match;
use depot_replay::ReplaySession;
use depot_sim::{Board, BoardRules};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "depot")]
#[command(about = "DEPOT.ARENA - match log inspection and replay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a log's version, metadata, and diagnostics
    Inspect {
        /// Path to the text log
        #[arg(short, long)]
        log: PathBuf,
        /// Sidecar path, if not the default sibling
        #[arg(long)]
        sidecar: Option<PathBuf>,
    },
    /// Replay a log on the demo board and print the reached state
    Replay {
        /// Path to the text log
        #[arg(short, long)]
        log: PathBuf,
        /// Turn index to stop at (defaults to the last reachable one)
        #[arg(short, long)]
        to: Option<usize>,
        /// Checkpoint interval
        #[arg(long, default_value_t = depot_replay::DEFAULT_CHECKPOINT_INTERVAL)]
        interval: usize,
        /// Board seed for legacy logs that declare none
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect { log, sidecar } => inspect(&log, sidecar.as_deref()),
        Commands::Replay {
            log,
            to,
            interval,
            seed,
        } => replay(&log, to, interval, seed),
    }
}

fn inspect(log: &std::path::Path, sidecar: Option<&std::path::Path>) -> Result<()> {
    let loaded = load_match(log, sidecar)?;
    println!("version:  {}", loaded.version);
    println!("source:   {:?}", loaded.source);
    match loaded.meta.seed {
        Some(seed) => println!("seed:     {seed}"),
        None => println!("seed:     (not declared)"),
    }
    if !loaded.meta.agents.is_empty() {
        println!("agents:   {}", loaded.meta.agents.join(", "));
    }
    if let Some(game) = loaded.meta.game_index {
        println!("game:     {game}");
    }
    println!("moves:    {}", loaded.records.len());
    if let Some(outcome) = &loaded.outcome {
        let winner = match outcome.winner {
            Some(agent) => format!("agent {agent}"),
            None => "draw".to_string(),
        };
        println!("result:   {winner}, scores {:?}", outcome.scores);
    }
    for warning in loaded.diagnostics.warnings() {
        println!("warning:  {warning}");
    }
    if let Some(reason) = loaded.diagnostics.truncation_reason() {
        println!("truncated: {reason}");
    }
    Ok(())
}

fn replay(
    log: &std::path::Path,
    to: Option<usize>,
    interval: usize,
    seed: Option<u64>,
) -> Result<()> {
    let init = |meta: &MatchMeta| {
        let seed = seed.or(meta.seed).unwrap_or_default();
        Board::generate(seed)
    };
    let mut session = ReplaySession::open_with(log, None, interval, BoardRules, init)?;

    let target = to.unwrap_or_else(|| session.engine().navigable_len());
    let board = session
        .engine()
        .go_to_index(target)
        .map_err(|err| eyre!("{err}"))?;

    println!("state after {target} of {} moves:", session.engine().len());
    println!("{}", serde_json::to_string_pretty(&board)?);
    println!("balances: {:?}", board.balances());

    let diagnostics = session.diagnostics();
    for warning in diagnostics.warnings() {
        println!("warning:  {warning}");
    }
    if let Some(reason) = diagnostics.truncation_reason() {
        println!("truncated: {reason}");
    }
    Ok(())
}
