//! The per-agent state record.

use fg_core::{AgentId, Position};

/// Who drives an agent's moves.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentControl {
    /// A simulation thread runs the decision policy for this agent.
    #[default]
    Autonomous,
    /// Moves arrive from outside through the command surface.
    Manual,
}

impl AgentControl {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentControl::Autonomous => "autonomous",
            AgentControl::Manual     => "manual",
        }
    }
}

/// Identity, position, and lifecycle flags of one agent.
///
/// `alive` only ever goes `true → false` and `found_food` only ever goes
/// `false → true`; the move counters only grow.  The mutators below enforce
/// this so no caller can resurrect an agent or un-find food.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentState {
    pub id:        AgentId,
    /// Short display tag used by renderers and reports (e.g. `"R1"`).
    pub tag:       String,
    pub control:   AgentControl,
    position:      Position,
    alive:         bool,
    found_food:    bool,
    valid_moves:   u64,
    invalid_moves: u64,
}

impl AgentState {
    pub fn new(id: AgentId, tag: impl Into<String>, position: Position, control: AgentControl) -> Self {
        Self {
            id,
            tag: tag.into(),
            control,
            position,
            alive:         true,
            found_food:    false,
            valid_moves:   0,
            invalid_moves: 0,
        }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn has_found_food(&self) -> bool {
        self.found_food
    }

    #[inline]
    pub fn valid_moves(&self) -> u64 {
        self.valid_moves
    }

    #[inline]
    pub fn invalid_moves(&self) -> u64 {
        self.invalid_moves
    }

    /// `true` while the agent can still take part: alive and not yet fed.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.alive && !self.found_food
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    pub fn mark_found_food(&mut self) {
        self.found_food = true;
    }

    pub fn record_valid_move(&mut self) {
        self.valid_moves += 1;
    }

    pub fn record_invalid_move(&mut self) {
        self.invalid_moves += 1;
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id:            self.id,
            tag:           self.tag.clone(),
            control:       self.control,
            position:      self.position,
            alive:         self.alive,
            found_food:    self.found_food,
            valid_moves:   self.valid_moves,
            invalid_moves: self.invalid_moves,
        }
    }
}

/// A read-only copy of an [`AgentState`] taken under the grid lock.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentSnapshot {
    pub id:            AgentId,
    pub tag:           String,
    pub control:       AgentControl,
    pub position:      Position,
    pub alive:         bool,
    pub found_food:    bool,
    pub valid_moves:   u64,
    pub invalid_moves: u64,
}

impl std::fmt::Display for AgentSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | Pos:{} | Valid:{} Invalid:{} | Alive:{} | Found:{}",
            self.tag, self.position, self.valid_moves, self.invalid_moves, self.alive, self.found_food
        )
    }
}
