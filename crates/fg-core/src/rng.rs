//! Deterministic per-agent and grid-level RNG wrappers.
//!
//! # Seeding
//!
//! Each agent thread owns its own `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//! Agents never share RNG state, so direction shuffles and pause jitter need
//! no synchronisation.  Thread interleaving is still up to the OS scheduler;
//! a fixed seed makes each agent's own choice sequence reproducible, not the
//! whole run.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::{AgentId, Position};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.
///
/// Moved into the agent's thread at spawn time; the type is `Send` but not
/// meant to be shared.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.0);
    }

    /// A pause length in `[min_ms, min_ms + jitter_ms]`.
    #[inline]
    pub fn pause_ms(&mut self, min_ms: u64, jitter_ms: u64) -> u64 {
        if jitter_ms == 0 {
            return min_ms;
        }
        min_ms + self.0.gen_range(0..=jitter_ms)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Grid-level RNG for random placement of food, obstacles and agents.
///
/// Owned by the grid and only used while the grid lock is held.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// A uniformly random cell of a `size` × `size` grid.
    ///
    /// # Panics
    /// Panics if `size <= 0`.
    #[inline]
    pub fn position(&mut self, size: i32) -> Position {
        Position::new(self.0.gen_range(0..size), self.0.gen_range(0..size))
    }
}
