//! Agent storage: `AgentStore` (records) and `AgentRngs` (per-agent RNG).
//!
//! # Why two structs?
//!
//! Agent records are shared state: they sit inside the grid behind its lock
//! so the detection loop and snapshots see them consistently.  Per-agent RNGs
//! are the opposite: each one is moved into its agent's thread and never
//! touched by anyone else.  Keeping them apart lets the simulation hand out
//! the RNGs by value without taking the grid lock.

use fg_core::{AgentId, AgentRng, Position};

use crate::{AgentControl, AgentSnapshot, AgentState};

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, indexed by `AgentId`.
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Consume the container, yielding `(AgentId, AgentRng)` pairs in
    /// ascending id order so each RNG can be moved into its own thread.
    pub fn into_agents(self) -> impl Iterator<Item = (AgentId, AgentRng)> {
        self.inner
            .into_iter()
            .enumerate()
            .map(|(i, rng)| (AgentId(i as u32), rng))
    }
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Every agent registered with one grid, indexed by `AgentId`.
///
/// Ids are dense and assigned in registration order, so `AgentId(i)` is
/// always `records[i]`.  Agents are never removed: a dead agent keeps its
/// record (and its final statistics) until the run ends.
#[derive(Debug, Default)]
pub struct AgentStore {
    records: Vec<AgentState>,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new agent and return its id.
    pub fn push(&mut self, tag: impl Into<String>, position: Position, control: AgentControl) -> AgentId {
        let id = AgentId(self.records.len() as u32);
        self.records.push(AgentState::new(id, tag, position, control));
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn get(&self, agent: AgentId) -> Option<&AgentState> {
        self.records.get(agent.index())
    }

    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> Option<&mut AgentState> {
        self.records.get_mut(agent.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentState> {
        self.records.iter()
    }

    /// First agent (lowest id) that has found the food, if any.
    pub fn food_finder(&self) -> Option<AgentId> {
        self.records.iter().find(|a| a.has_found_food()).map(|a| a.id)
    }

    pub fn snapshots(&self) -> Vec<AgentSnapshot> {
        self.records.iter().map(AgentState::snapshot).collect()
    }
}
