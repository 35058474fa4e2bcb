//! `fg-output`: simulation output writers for rust_forage.
//!
//! | Backend | Files created                                   |
//! |---------|-------------------------------------------------|
//! | CSV     | `agent_snapshots.csv`, `agent_stats.csv`        |
//!
//! Backends implement [`OutputWriter`] and are driven by [`StatsObserver`],
//! which implements `fg_sim::SimObserver`: every detection pass becomes one
//! batch of snapshot rows, and convergence writes one final statistics row
//! per agent.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fg_output::{CsvWriter, StatsObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = StatsObserver::new(writer);
//! let report = sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::StatsObserver;
pub use row::{AgentSnapshotRow, AgentStatsRow};
pub use writer::OutputWriter;
