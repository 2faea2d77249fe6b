use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::{constants::*, lifecycle::LifecycleTiming};
use common::maze::MazeLayout;

// ============================================================================
// CLI Argument Parsing
// ============================================================================

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless maze-pursuit agent simulation", long_about = None)]
pub struct Args {
    /// Seed for every random draw in the run
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Stop after this many levels have been won
    #[arg(long, default_value_t = DEFAULT_LEVELS)]
    pub levels: u32,

    /// Stop after this many ticks
    #[arg(long)]
    pub max_ticks: Option<u64>,

    /// Ticks per second; 0 runs flat out
    #[arg(long, default_value_t = 0)]
    pub tick_hz: u64,

    /// Number of player agents
    #[arg(long, default_value_t = 1)]
    pub pacs: u32,

    /// Run without ghosts
    #[arg(long, default_value_t = false)]
    pub no_ghosts: bool,

    /// ASCII maze layout to load instead of the built-in one
    #[arg(long)]
    pub maze: Option<PathBuf>,

    /// Default log filter (RUST_LOG takes precedence)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Print the run summary as JSON
    #[cfg(feature = "json")]
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

// ============================================================================
// Simulation Configuration
// ============================================================================

#[derive(Clone, Debug)]
pub struct SimConfig {
    pub seed: u64,
    pub levels: u32,
    pub max_ticks: Option<u64>,
    pub pacs: u32,
    pub ghosts: bool,
    pub timing: LifecycleTiming,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            levels: DEFAULT_LEVELS,
            max_ticks: None,
            pacs: 1,
            ghosts: true,
            timing: LifecycleTiming::default(),
        }
    }
}

impl SimConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        if args.pacs == 0 {
            bail!("at least one player agent is required");
        }
        Ok(Self {
            seed: args.seed,
            levels: args.levels,
            max_ticks: args.max_ticks,
            pacs: args.pacs,
            ghosts: !args.no_ghosts,
            timing: LifecycleTiming::default(),
        })
    }
}

pub fn load_maze(args: &Args) -> Result<MazeLayout> {
    match &args.maze {
        Some(path) => MazeLayout::load(path),
        None => MazeLayout::classic(),
    }
}

// ============================================================================
// Logging
// ============================================================================

pub fn init_tracing(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
