//! Simulation observer trait for progress reporting and data collection.

use std::time::Duration;

use fg_agent::AgentSnapshot;
use fg_grid::GridSnapshot;

use crate::{Convergence, TaskExit};

/// Callbacks invoked by [`Simulation::run`][crate::Simulation::run] from the
/// driver thread.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Snapshots are copies taken under the grid
/// lock; agents keep moving while a callback runs.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl SimObserver for Printer {
///     fn on_poll(&mut self, elapsed: Duration, snapshot: &GridSnapshot) {
///         println!("{elapsed:?}: {} agents alive", snapshot.live_agents());
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once after the agent threads are spawned.
    fn on_start(&mut self, _snapshot: &GridSnapshot) {}

    /// Called on every detection pass, before the convergence check.
    fn on_poll(&mut self, _elapsed: Duration, _snapshot: &GridSnapshot) {}

    /// Called when an agent thread reports that it has stopped.
    fn on_agent_exit(&mut self, _exit: &TaskExit) {}

    /// Called once with the final per-agent statistics.
    fn on_converged(&mut self, _outcome: &Convergence, _agents: &[AgentSnapshot]) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
