use std::path::PathBuf;

use anyhow::{Context, Result};
use antworld::{World, WorldConfig};
use clap::Parser;
use tracing::info;

/// Command-line arguments for AntWorld.
#[derive(Parser)]
#[command(name = "AntWorld", version, about = "Headless ant foraging simulation")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of steps to run.
    #[arg(short, long, default_value_t = 500)]
    steps: u64,

    /// RNG seed; overrides the one in the config file.
    #[arg(long)]
    seed: Option<u64>,

    /// Log a summary every this many steps (0 disables).
    #[arg(long, default_value_t = 50)]
    report_every: u64,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Loads the world configuration from a TOML file or uses defaults.
fn load_config(path: Option<PathBuf>) -> Result<WorldConfig> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
            let config: WorldConfig =
                toml::from_str(&content).context("Failed to parse config file")?;
            info!(path = %path.display(), "loaded config");
            Ok(config)
        }
        None => {
            info!("no config file provided, using defaults");
            Ok(WorldConfig::default())
        }
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = load_config(cli.config)?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let mut world = World::new(config).context("Invalid world configuration")?;

    while world.tick() < cli.steps && world.is_running() {
        world.step();
        if cli.report_every > 0 && world.tick() % cli.report_every == 0 {
            info!(
                tick = world.tick(),
                ants = world.ant_count(),
                predators = world.predator_count(),
                food = world.total_food(),
                home = world.home_amount(),
                entropy = world.entropy_history().last().copied().unwrap_or(0.0),
                "progress"
            );
        }
    }

    match world.stop_reason() {
        Some(reason) => info!(tick = world.tick(), %reason, "run ended"),
        None => info!(tick = world.tick(), "step limit reached"),
    }
    info!(
        ants = world.ant_count(),
        predators = world.predator_count(),
        food_left = world.total_food(),
        delivered = world.home_amount(),
        "final state"
    );
    for (i, stats) in world.predator_stats().iter().enumerate() {
        info!(
            predator = i,
            kills = stats.kills_total,
            streaks = ?stats.streak_history,
            "predator summary"
        );
    }

    Ok(())
}
