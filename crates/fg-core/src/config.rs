//! Simulation configuration.

use std::time::Duration;

use crate::{FgError, FgResult};

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// `fg_sim::SimBuilder`.  With the `serde` feature every field is optional in
/// the serialized form and falls back to [`SimConfig::default`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Side length of the square grid.  Must be positive.  Default: 4.
    pub grid_size: i32,

    /// Master RNG seed.  `None` seeds placement and agent RNGs from OS
    /// entropy.
    pub seed: Option<u64>,

    /// Minimum pause between two moves of one agent, in milliseconds.
    pub pause_min_ms: u64,

    /// Upper bound of the random extra pause added to `pause_min_ms`.
    pub pause_jitter_ms: u64,

    /// Interval at which the driver polls for convergence.  Must be non-zero.
    pub poll_interval_ms: u64,

    /// How long the driver waits for agent threads to exit after convergence.
    pub join_timeout_ms: u64,

    /// Cap on decide-and-move cycles per agent.  An agent that reaches it
    /// stops as if stuck, so every autonomous agent eventually exits even
    /// when rocks wall the food off.  Must be non-zero.  Default: 500.
    pub move_budget: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size:        4,
            seed:             None,
            pause_min_ms:     300,
            pause_jitter_ms:  400,
            poll_interval_ms: 400,
            join_timeout_ms:  200,
            move_budget:      500,
        }
    }
}

impl SimConfig {
    /// Reject configurations the driver cannot run.
    pub fn validate(&self) -> FgResult<()> {
        if self.grid_size <= 0 {
            return Err(FgError::Config(format!(
                "grid_size must be positive, got {}",
                self.grid_size
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(FgError::Config("poll_interval_ms must be non-zero".into()));
        }
        if self.move_budget == 0 {
            return Err(FgError::Config("move_budget must be non-zero".into()));
        }
        Ok(())
    }

    /// Resolve the master seed, drawing one from the OS if none was given.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    #[inline]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[inline]
    pub fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms)
    }

    /// Number of cells on the grid.
    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.grid_size.max(0) as usize).pow(2)
    }
}
