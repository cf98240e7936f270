#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays a command script against a Nightfield session.

mod presenter;
mod script;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use nightfield_core::{GameConfig, Phase};
use nightfield_session::Session;
use nightfield_world::query;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use presenter::LogPresenter;
use script::Step;

/// Headless runner for Nightfield sessions.
#[derive(Debug, Parser)]
#[command(name = "nightfield", version)]
struct Args {
    /// TOML file overriding the default game configuration.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed used for every random decision of the session.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
    /// Command script to replay; a built-in demo runs when omitted.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
}

/// Entry point for the Nightfield command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }

    let source = match &args.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?,
        None => script::DEMO.to_owned(),
    };
    let steps = script::parse(&source).context("failed to parse script")?;

    let mut session =
        Session::new(config, LogPresenter::default()).context("invalid game configuration")?;
    info!(banner = query::welcome_banner(session.world()), "ready");
    for step in steps {
        run_step(&mut session, step);
    }

    let stats = query::stats(session.world());
    let economy = query::economy(session.world());
    println!(
        "cycle {} | phase {:?} | plants {} | seeds {} | extracted {}",
        stats.cycle,
        query::phase(session.world()),
        stats.plants,
        stats.seeds,
        stats.extracted,
    );
    println!(
        "hydration {} | nutrients {:.2} | enemies {}/{} | weapon {:?} | visuals {}",
        economy.hydration,
        economy.nutrients,
        query::active_enemies(session.world()),
        query::enemy_limit(session.world()),
        query::weapon(session.world()),
        session.presenter().visible(),
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("failed to parse config {}", path.display()))
}

fn run_step(session: &mut Session<LogPresenter>, step: Step) {
    match step {
        Step::Click(cell) => {
            if let Err(error) = session.on_tile_activated(cell) {
                warn!(%error, "click ignored");
            }
        }
        Step::Advance => session.advance_phase(),
        Step::Tick(dt) => session.tick(dt),
        Step::WaitNight(frame) => {
            if query::phase(session.world()) != Phase::Night {
                warn!("wait-night outside the night");
            }
            while query::phase(session.world()) == Phase::Night {
                session.tick(frame);
            }
        }
        Step::Weapon(weapon) => session.select_weapon(weapon),
        Step::Retarget => session.retarget_idle_enemies(),
    }
}
