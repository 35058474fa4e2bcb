//! The command and query surface for code outside the agent threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use fg_core::{AgentId, Direction};
use fg_grid::{GridSnapshot, SharedGrid};
use fg_mobility::{MoveOutcome, MoveResult};

/// Cheap, cloneable access to a simulation's grid.
///
/// Renderers take snapshots; manual controllers issue moves.  Every call
/// takes the grid lock once, exactly like an agent thread's move.
#[derive(Clone, Debug)]
pub struct SimHandle {
    grid: SharedGrid,
    stop: Arc<AtomicBool>,
}

impl SimHandle {
    pub(crate) fn new(grid: SharedGrid, stop: Arc<AtomicBool>) -> Self {
        Self { grid, stop }
    }

    /// Move `agent` one cell, under the same rules as autonomous agents.
    ///
    /// # Errors
    /// Any [`MoveError`][fg_mobility::MoveError]; `UnknownAgent` for an id
    /// this simulation never registered.
    pub fn request_move(&self, agent: AgentId, direction: Direction) -> MoveResult<MoveOutcome> {
        fg_mobility::request_move(&self.grid, agent, direction)
    }

    pub fn snapshot(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    /// `true` once the driver has detected convergence.
    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}
