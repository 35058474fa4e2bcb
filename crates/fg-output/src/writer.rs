//! The `OutputWriter` trait implemented by backend writers.

use crate::{AgentSnapshotRow, AgentStatsRow, OutputResult};

/// A sink for simulation output.
///
/// Errors never reach the simulation: [`StatsObserver`][crate::StatsObserver]
/// keeps the first one for [`take_error`][crate::StatsObserver::take_error].
pub trait OutputWriter {
    /// Write one detection pass worth of agent rows.
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()>;

    /// Write the final per-agent statistics.
    fn write_stats(&mut self, rows: &[AgentStatsRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
