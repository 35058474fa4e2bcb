//! Plain data row types written by output backends.

/// One agent's state as seen by one detection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSnapshotRow {
    /// 0-based index of the detection pass.
    pub poll:          u64,
    pub elapsed_ms:    u64,
    pub agent_id:      u32,
    pub row:           i32,
    pub col:           i32,
    pub alive:         bool,
    pub found_food:    bool,
    pub valid_moves:   u64,
    pub invalid_moves: u64,
}

/// One agent's final statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentStatsRow {
    pub agent_id:      u32,
    pub tag:           String,
    /// `"autonomous"` or `"manual"`.
    pub control:       &'static str,
    pub row:           i32,
    pub col:           i32,
    pub alive:         bool,
    pub found_food:    bool,
    pub valid_moves:   u64,
    pub invalid_moves: u64,
    /// Why the agent's thread stopped; empty for manual agents and for
    /// threads that never reported.
    pub exit_reason:   &'static str,
    /// Run outcome, the same on every row: `"found_food"` or `"all_stopped"`.
    pub outcome:       &'static str,
}
