//! Integration tests for fg-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{AgentSnapshotRow, AgentStatsRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn headers(dir: &TempDir, file: &str) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    fn records(dir: &TempDir, file: &str) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    fn snap_row(agent_id: u32, poll: u64) -> AgentSnapshotRow {
        AgentSnapshotRow {
            poll,
            elapsed_ms:    poll * 400,
            agent_id,
            row:           agent_id as i32,
            col:           2,
            alive:         true,
            found_food:    false,
            valid_moves:   poll,
            invalid_moves: 0,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("agent_snapshots.csv").exists());
        assert!(dir.path().join("agent_stats.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(headers(&dir, "agent_snapshots.csv"), [
            "poll", "elapsed_ms", "agent_id", "row", "col", "alive", "found_food", "valid_moves", "invalid_moves",
        ]);
        assert_eq!(headers(&dir, "agent_stats.csv"), [
            "agent_id", "tag", "control", "row", "col", "alive", "found_food", "valid_moves", "invalid_moves",
            "exit_reason", "outcome",
        ]);
    }

    #[test]
    fn csv_snapshot_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(0, 3), snap_row(1, 3)]).unwrap();
        w.finish().unwrap();

        let rows = records(&dir, "agent_snapshots.csv");
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "3");    // poll
        assert_eq!(&rows[0][1], "1200"); // elapsed_ms
        assert_eq!(&rows[1][2], "1");    // agent_id
        assert_eq!(&rows[1][3], "1");    // row
        assert_eq!(&rows[1][5], "1");    // alive
        assert_eq!(&rows[1][6], "0");    // found_food
    }

    #[test]
    fn csv_stats_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let row = AgentStatsRow {
            agent_id:      2,
            tag:           "R3".into(),
            control:       "autonomous",
            row:           1,
            col:           2,
            alive:         true,
            found_food:    true,
            valid_moves:   7,
            invalid_moves: 3,
            exit_reason:   "found_food",
            outcome:       "found_food",
        };
        w.write_stats(std::slice::from_ref(&row)).unwrap();
        w.finish().unwrap();

        let rows = records(&dir, "agent_stats.csv");
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].iter().collect::<Vec<_>>(),
            ["2", "R3", "autonomous", "1", "2", "1", "1", "7", "3", "found_food", "found_food"]
        );
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_missing_dir_errors() {
        let dir = tmp();
        assert!(CsvWriter::new(&dir.path().join("no/such/dir")).is_err());
    }
}

#[cfg(test)]
mod observer_tests {
    use fg_behavior::ScriptedPolicy;
    use fg_core::{AgentId, Direction, Position, SimConfig};
    use std::time::Duration;

    use fg_sim::{SimBuilder, SimObserver};
    use tempfile::TempDir;

    use crate::{
        AgentSnapshotRow, AgentStatsRow, CsvWriter, OutputError, OutputResult, OutputWriter,
        StatsObserver,
    };

    fn config() -> SimConfig {
        SimConfig {
            grid_size:        4,
            seed:             Some(3),
            pause_min_ms:     1,
            pause_jitter_ms:  0,
            poll_interval_ms: 5,
            join_timeout_ms:  1_000,
            move_budget:      500,
        }
    }

    /// Fails every write; counts calls.
    #[derive(Default)]
    struct Broken {
        calls: usize,
    }

    impl OutputWriter for Broken {
        fn write_snapshots(&mut self, _rows: &[AgentSnapshotRow]) -> OutputResult<()> {
            self.calls += 1;
            Err(OutputError::Io(std::io::Error::other("first")))
        }

        fn write_stats(&mut self, _rows: &[AgentStatsRow]) -> OutputResult<()> {
            self.calls += 1;
            Err(OutputError::Io(std::io::Error::other("second")))
        }

        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    /// Keeps every snapshot row it is given.
    #[derive(Default)]
    struct Capture {
        snapshots: Vec<AgentSnapshotRow>,
    }

    impl OutputWriter for Capture {
        fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
            self.snapshots.extend_from_slice(rows);
            Ok(())
        }

        fn write_stats(&mut self, _rows: &[AgentStatsRow]) -> OutputResult<()> {
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn oversized_elapsed_saturates() {
        let sim = SimBuilder::new(config(), ScriptedPolicy::new())
            .agent("R1", Position::new(0, 0))
            .build()
            .unwrap();
        let snapshot = sim.grid().snapshot();

        let mut obs = StatsObserver::new(Capture::default());
        obs.on_poll(Duration::from_millis(1_200), &snapshot);
        obs.on_poll(Duration::MAX, &snapshot);

        let rows = obs.into_writer().snapshots;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].elapsed_ms, 1_200);
        assert_eq!(rows[1].elapsed_ms, u64::MAX);
    }

    #[test]
    fn integration_csv() {
        let policy = ScriptedPolicy::new().with_script(
            AgentId(0),
            [Direction::Right, Direction::Right, Direction::Up, Direction::Up],
        );
        let sim = SimBuilder::new(config(), policy)
            .food_at(Position::new(1, 2))
            .agent("R1", Position::new(3, 0))
            .agent("R2", Position::new(0, 3))
            .build()
            .unwrap();

        let dir: TempDir = tempfile::tempdir().unwrap();
        let mut obs = StatsObserver::new(CsvWriter::new(dir.path()).unwrap());
        let report = sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        let mut rdr = csv::Reader::from_path(dir.path().join("agent_stats.csv")).unwrap();
        let stats: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(stats.len(), 2);
        assert_eq!(&stats[0][1], "R1");
        assert_eq!(&stats[0][6], "1");          // found_food
        assert_eq!(&stats[0][9], "found_food"); // exit_reason
        assert_eq!(&stats[1][9], "stuck");
        assert_eq!(&stats[1][10], "found_food");

        // Each detection pass writes one row per agent.
        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        let snaps = rdr.records().count();
        assert!(snaps >= 2 && snaps % 2 == 0, "got {snaps} snapshot rows");
        assert_eq!(report.agents.len(), 2);
    }

    #[test]
    fn snapshots_can_be_disabled() {
        let sim = SimBuilder::new(config(), ScriptedPolicy::new())
            .agent("R1", Position::new(0, 0))
            .build()
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut obs = StatsObserver::with_interval(CsvWriter::new(dir.path()).unwrap(), 0);
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        assert_eq!(rdr.records().count(), 0);
        let mut rdr = csv::Reader::from_path(dir.path().join("agent_stats.csv")).unwrap();
        assert_eq!(rdr.records().count(), 1);
    }

    #[test]
    fn first_error_is_kept() {
        let sim = SimBuilder::new(config(), ScriptedPolicy::new())
            .agent("R1", Position::new(0, 0))
            .build()
            .unwrap();
        let mut obs = StatsObserver::new(Broken::default());
        sim.run(&mut obs).unwrap();

        match obs.take_error() {
            Some(OutputError::Io(e)) => assert_eq!(e.to_string(), "first"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(obs.take_error().is_none());
        assert!(obs.into_writer().calls >= 2);
    }
}
