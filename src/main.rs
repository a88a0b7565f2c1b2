//! Apparatchik - headless turn runner
//!
//! Builds a fresh game, optionally performs a few player actions, then runs
//! turns and prints one summary line (or one JSON report) per turn.

use std::path::PathBuf;

use apparatchik::actions::ActionRequest;
use apparatchik::catalog::Catalog;
use apparatchik::core::config::EngineConfig;
use apparatchik::core::error::Result;
use apparatchik::core::types::ActorId;
use apparatchik::turn::TurnEngine;
use apparatchik::world::{new_game, SetupOptions, StatKind};
use clap::Parser;

/// Run the political simulation without a front end
#[derive(Parser, Debug)]
#[command(name = "apparatchik")]
#[command(about = "Run turns of the political simulation and report what happened")]
struct Args {
    /// Number of turns to run
    #[arg(long, default_value_t = 20)]
    turns: u32,

    /// Random seed, overriding the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Engine configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog of laws, positions and actions (TOML); the built-in one if absent
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Player action before the first turn: `id`, `id=<actor id>` or `id=<law key>`
    #[arg(long = "action")]
    actions: Vec<String>,

    /// Print each turn report as JSON
    #[arg(long)]
    json: bool,
}

fn parse_action(raw: &str) -> ActionRequest {
    match raw.split_once('=') {
        Some((id, target)) => match target.parse::<u32>() {
            Ok(actor) => ActionRequest::new(id).targeting(ActorId(actor)),
            Err(_) => ActionRequest::new(id).on_law(target),
        },
        None => ActionRequest::new(raw),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("apparatchik=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin()?,
    };

    let mut engine = TurnEngine::new(config)?;
    let mut world = new_game(&catalog, &SetupOptions::default(), engine.dice_mut());
    tracing::info!(seed = engine.config().seed, officials = world.actor_count(), "Game created");

    for raw in &args.actions {
        let outcome = engine.perform_action(&mut world, &catalog, &parse_action(raw));
        match &outcome.reason {
            None => println!("action {}: ok", outcome.action),
            Some(reason) => println!("action {}: refused ({reason})", outcome.action),
        }
    }

    for _ in 0..args.turns {
        let report = engine.run_turn(&mut world);
        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            println!(
                "turn {:>3}  stability {:>3}  standing {:>3}  treasury {:>5}  fired {}  npc {}  processes {}",
                report.turn,
                world.stat(StatKind::Stability),
                world.stat(StatKind::PlayerStanding),
                world.stat(StatKind::Treasury),
                report.fired.len(),
                report.decisions.len(),
                world.processes.len(),
            );
        }
        if report.status.is_over() {
            println!("game over: {:?}", report.status);
            break;
        }
    }

    Ok(())
}
