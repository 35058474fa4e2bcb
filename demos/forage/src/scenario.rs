//! JSON scenario files and command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use fg_core::SimConfig;
use serde::Deserialize;

/// Concurrent agents race across a grid for a single food cell.
#[derive(Parser, Debug)]
#[command(name = "forage")]
#[command(version)]
pub struct Args {
    /// JSON scenario file; missing fields fall back to the defaults
    #[arg(long, env = "FORAGE_SCENARIO")]
    pub scenario: Option<PathBuf>,

    /// Side length of the square grid
    #[arg(long, env = "FORAGE_SIZE")]
    pub size: Option<i32>,

    /// Number of autonomous agents
    #[arg(long, env = "FORAGE_AGENTS")]
    pub agents: Option<usize>,

    /// Number of bombs
    #[arg(long, env = "FORAGE_BOMBS")]
    pub bombs: Option<usize>,

    /// Number of rocks
    #[arg(long, env = "FORAGE_ROCKS")]
    pub rocks: Option<usize>,

    /// Master RNG seed (random if omitted)
    #[arg(long, env = "FORAGE_SEED")]
    pub seed: Option<u64>,

    /// Minimum pause between moves, in milliseconds
    #[arg(long, env = "FORAGE_PAUSE_MS")]
    pub pause_ms: Option<u64>,

    /// Random extra pause on top of --pause-ms, in milliseconds
    #[arg(long, env = "FORAGE_JITTER_MS")]
    pub jitter_ms: Option<u64>,

    /// Convergence poll interval, in milliseconds
    #[arg(long, env = "FORAGE_POLL_MS")]
    pub poll_ms: Option<u64>,

    /// How long to wait for agent threads after convergence, in milliseconds
    #[arg(long, env = "FORAGE_JOIN_TIMEOUT_MS")]
    pub join_timeout_ms: Option<u64>,

    /// Maximum turns per agent
    #[arg(long, env = "FORAGE_MOVE_BUDGET")]
    pub move_budget: Option<u64>,

    /// Directory for agent_stats.csv and agent_snapshots.csv
    #[arg(long, env = "FORAGE_OUTPUT")]
    pub output: Option<PathBuf>,
}

/// Everything needed to build one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub sim:    SimConfig,
    pub agents: usize,
    pub bombs:  usize,
    pub rocks:  usize,
}

impl Default for Scenario {
    fn default() -> Self {
        Self { sim: SimConfig::default(), agents: 3, bombs: 1, rocks: 2 }
    }
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid scenario JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// The scenario file (or defaults) with every given flag applied on top.
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut s = match &args.scenario {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(v) = args.size {
            s.sim.grid_size = v;
        }
        if let Some(v) = args.agents {
            s.agents = v;
        }
        if let Some(v) = args.bombs {
            s.bombs = v;
        }
        if let Some(v) = args.rocks {
            s.rocks = v;
        }
        if let Some(v) = args.pause_ms {
            s.sim.pause_min_ms = v;
        }
        if let Some(v) = args.jitter_ms {
            s.sim.pause_jitter_ms = v;
        }
        if let Some(v) = args.poll_ms {
            s.sim.poll_interval_ms = v;
        }
        if let Some(v) = args.join_timeout_ms {
            s.sim.join_timeout_ms = v;
        }
        if let Some(v) = args.move_budget {
            s.sim.move_budget = v;
        }
        if args.seed.is_some() {
            s.sim.seed = args.seed;
        }
        Ok(s)
    }
}
