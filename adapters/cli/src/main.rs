#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Mergeworks from a script of directives.
//!
//! Each input line is one gesture or query, for example `press 0 0`,
//! `drag 1 0`, `over pit`, `drop pit`, `tick 12`, `board` or `mission`.
//! Lines are read from the script file when given and from stdin otherwise.

mod config;
mod script;
mod session;

use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use mergeworks_world::World;
use tracing_subscriber::EnvFilter;

use crate::session::{Session, TextBackend};

/// Command-line arguments for the Mergeworks driver.
#[derive(Debug, Parser)]
#[command(name = "mergeworks", about = "Play Mergeworks from a script of directives")]
struct CliArgs {
    /// TOML file overriding the built-in game configuration.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for the generator draws, overriding the configured one.
    #[arg(long)]
    seed: Option<u64>,
    /// Script to execute instead of reading stdin.
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,
    /// Tracing filter such as `debug` or `mergeworks_world=trace`.
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
    /// Side length of one cell for `point` lookups.
    #[arg(long, default_value_t = 32.0)]
    cell_size: f32,
}

/// Entry point for the Mergeworks command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_level.as_deref())?;

    let mut config = config::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    tracing::info!(seed = config.seed, "starting session");

    let world = World::new(config).context("invalid game configuration")?;
    let stdout = io::stdout();
    let mut session = Session::new(world, TextBackend::new(stdout.lock()), args.cell_size)?;

    match args.script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            session.run(BufReader::new(file))
        }
        None => session.run(io::stdin().lock()),
    }
}

fn init_tracing(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(filter) => EnvFilter::try_new(filter)
            .with_context(|| format!("invalid log filter `{filter}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
    Ok(())
}
