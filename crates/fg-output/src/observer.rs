//! `StatsObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use std::time::Duration;

use fg_agent::AgentSnapshot;
use fg_grid::GridSnapshot;
use fg_sim::{Convergence, ExitReason, SimObserver, TaskExit};

use crate::row::{AgentSnapshotRow, AgentStatsRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that records per-pass agent snapshots and final
/// statistics to any [`OutputWriter`].
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct StatsObserver<W: OutputWriter> {
    writer:         W,
    /// Write snapshot rows on every n-th pass; 0 disables them.
    snapshot_every: u64,
    polls:          u64,
    exits:          Vec<TaskExit>,
    last_error:     Option<OutputError>,
}

impl<W: OutputWriter> StatsObserver<W> {
    /// Record a snapshot on every detection pass.
    pub fn new(writer: W) -> Self {
        Self::with_interval(writer, 1)
    }

    /// Record a snapshot on every `every`-th detection pass (0 = never).
    pub fn with_interval(writer: W, every: u64) -> Self {
        Self {
            writer,
            snapshot_every: every,
            polls:          0,
            exits:          Vec::new(),
            last_error:     None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn exit_reason(&self, agent: &AgentSnapshot) -> Option<ExitReason> {
        self.exits.iter().find(|e| e.agent == agent.id).map(|e| e.reason)
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for StatsObserver<W> {
    fn on_poll(&mut self, elapsed: Duration, snapshot: &GridSnapshot) {
        let poll = self.polls;
        self.polls += 1;
        if self.snapshot_every == 0 || !poll.is_multiple_of(self.snapshot_every) {
            return;
        }
        let rows: Vec<AgentSnapshotRow> = snapshot
            .agents
            .iter()
            .map(|a| AgentSnapshotRow {
                poll,
                elapsed_ms:    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                agent_id:      a.id.0,
                row:           a.position.row,
                col:           a.position.col,
                alive:         a.alive,
                found_food:    a.found_food,
                valid_moves:   a.valid_moves,
                invalid_moves: a.invalid_moves,
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_agent_exit(&mut self, exit: &TaskExit) {
        self.exits.push(*exit);
    }

    fn on_converged(&mut self, outcome: &Convergence, agents: &[AgentSnapshot]) {
        let outcome = match outcome {
            Convergence::FoundFood { .. } => "found_food",
            Convergence::AllStopped => "all_stopped",
        };
        let rows: Vec<AgentStatsRow> = agents
            .iter()
            .map(|a| AgentStatsRow {
                agent_id:      a.id.0,
                tag:           a.tag.clone(),
                control:       a.control.as_str(),
                row:           a.position.row,
                col:           a.position.col,
                alive:         a.alive,
                found_food:    a.found_food,
                valid_moves:   a.valid_moves,
                invalid_moves: a.invalid_moves,
                exit_reason:   self.exit_reason(a).map_or("", ExitReason::as_str),
                outcome,
            })
            .collect();

        let result = self.writer.write_stats(&rows);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
