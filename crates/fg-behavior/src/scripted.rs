//! Deterministic replay of fixed direction lists.

use fg_core::{AgentId, AgentRng, Direction};
use fg_grid::SharedGrid;
use fg_mobility::{request_move, MoveOutcome};
use parking_lot::Mutex;

use crate::{DecisionPolicy, PolicyError, PolicyResult};

/// Plays back one direction per turn from a per-agent script.
///
/// A refused step is still consumed: the next turn continues with the next
/// direction.  Agents without a script, or whose script has run out, get
/// [`PolicyError::ScriptExhausted`].
#[derive(Debug, Default)]
pub struct ScriptedPolicy {
    scripts: Vec<Vec<Direction>>,
    cursors: Mutex<Vec<usize>>,
}

impl ScriptedPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the script for `agent`, replacing any earlier one.
    pub fn with_script(mut self, agent: AgentId, directions: impl IntoIterator<Item = Direction>) -> Self {
        let idx = agent.index();
        if self.scripts.len() <= idx {
            self.scripts.resize_with(idx + 1, Vec::new);
            self.cursors.get_mut().resize(idx + 1, 0);
        }
        self.scripts[idx] = directions.into_iter().collect();
        self.cursors.get_mut()[idx] = 0;
        self
    }

    /// Steps not yet played for `agent`.
    pub fn remaining(&self, agent: AgentId) -> usize {
        let idx = agent.index();
        let played = self.cursors.lock().get(idx).copied().unwrap_or(0);
        self.scripts.get(idx).map_or(0, |s| s.len().saturating_sub(played))
    }

    fn next_direction(&self, agent: AgentId) -> Option<Direction> {
        let idx = agent.index();
        let mut cursors = self.cursors.lock();
        let cursor = cursors.get_mut(idx)?;
        let direction = *self.scripts[idx].get(*cursor)?;
        *cursor += 1;
        Some(direction)
    }
}

impl DecisionPolicy for ScriptedPolicy {
    fn decide_and_move(
        &self,
        agent: AgentId,
        grid:  &SharedGrid,
        _rng:  &mut AgentRng,
    ) -> PolicyResult<MoveOutcome> {
        let direction = self
            .next_direction(agent)
            .ok_or(PolicyError::ScriptExhausted(agent))?;
        Ok(request_move(grid, agent, direction)?)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
