//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `agent_snapshots.csv`
//! - `agent_stats.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, AgentStatsRow, OutputResult};

fn flag(b: bool) -> String {
    (b as u8).to_string()
}

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    stats:     Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record([
            "poll", "elapsed_ms", "agent_id", "row", "col", "alive", "found_food", "valid_moves", "invalid_moves",
        ])?;

        let mut stats = Writer::from_path(dir.join("agent_stats.csv"))?;
        stats.write_record([
            "agent_id", "tag", "control", "row", "col", "alive", "found_food", "valid_moves", "invalid_moves",
            "exit_reason", "outcome",
        ])?;

        Ok(Self { snapshots, stats, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.poll.to_string(),
                row.elapsed_ms.to_string(),
                row.agent_id.to_string(),
                row.row.to_string(),
                row.col.to_string(),
                flag(row.alive),
                flag(row.found_food),
                row.valid_moves.to_string(),
                row.invalid_moves.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_stats(&mut self, rows: &[AgentStatsRow]) -> OutputResult<()> {
        for row in rows {
            self.stats.write_record(&[
                row.agent_id.to_string(),
                row.tag.clone(),
                row.control.to_owned(),
                row.row.to_string(),
                row.col.to_string(),
                flag(row.alive),
                flag(row.found_food),
                row.valid_moves.to_string(),
                row.invalid_moves.to_string(),
                row.exit_reason.to_owned(),
                row.outcome.to_owned(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.stats.flush()?;
        Ok(())
    }
}
