//! The `Grid`: every piece of mutable simulation state in one place.

use fg_agent::{AgentControl, AgentState, AgentStore};
use fg_core::{AgentId, Position, SimRng};
use tracing::debug;

use crate::{GridError, GridResult, GridSnapshot, Obstacle};

#[cfg(feature = "fx-hash")]
type CellMap<V> = rustc_hash::FxHashMap<Position, V>;
#[cfg(not(feature = "fx-hash"))]
type CellMap<V> = std::collections::HashMap<Position, V>;

/// Sample budget for [`Grid::random_empty_position`] and
/// [`Grid::place_obstacles_random`].
pub const EMPTY_CELL_ATTEMPTS: usize = 500;

/// Sample budget for [`Grid::place_food_random`].
pub const FOOD_ATTEMPTS: usize = 100;

/// A square `size` × `size` grid with its occupants.
///
/// The grid owns:
///
/// - the occupancy map `Position → AgentId` (at most one agent per cell),
/// - the obstacle map `Position → Obstacle`,
/// - at most one food cell,
/// - every agent's record ([`AgentStore`]), so agent flags and counters are
///   read and written under the same lock as the cells,
/// - a [`SimRng`] for random placement.
///
/// Only live agents appear in the occupancy map.  Obstacles and food never
/// share a cell; an agent and the food share one only inside the move step
/// that finds it.
pub struct Grid {
    size:      i32,
    occupancy: CellMap<AgentId>,
    obstacles: CellMap<Obstacle>,
    food:      Option<Position>,
    agents:    AgentStore,
    rng:       SimRng,
}

impl Grid {
    /// Create an empty grid.
    ///
    /// # Errors
    /// [`GridError::InvalidSize`] if `size <= 0`.
    pub fn new(size: i32, rng: SimRng) -> GridResult<Self> {
        if size <= 0 {
            return Err(GridError::InvalidSize(size));
        }
        Ok(Self {
            size,
            occupancy: CellMap::default(),
            obstacles: CellMap::default(),
            food:      None,
            agents:    AgentStore::new(),
            rng,
        })
    }

    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn is_within_bounds(&self, pos: Position) -> bool {
        (0..self.size).contains(&pos.row) && (0..self.size).contains(&pos.col)
    }

    /// `true` iff `pos` is in bounds and holds no agent, no obstacle and no
    /// food.
    pub fn is_cell_empty(&self, pos: Position) -> bool {
        self.is_within_bounds(pos)
            && !self.occupancy.contains_key(&pos)
            && !self.obstacles.contains_key(&pos)
            && self.food != Some(pos)
    }

    #[inline]
    pub fn agent_at(&self, pos: Position) -> Option<AgentId> {
        self.occupancy.get(&pos).copied()
    }

    #[inline]
    pub fn obstacle_at(&self, pos: Position) -> Option<Obstacle> {
        self.obstacles.get(&pos).copied()
    }

    #[inline]
    pub fn has_food_at(&self, pos: Position) -> bool {
        self.food == Some(pos)
    }

    #[inline]
    pub fn food_position(&self) -> Option<Position> {
        self.food
    }

    #[inline]
    pub fn agent(&self, agent: AgentId) -> Option<&AgentState> {
        self.agents.get(agent)
    }

    #[inline]
    pub fn agent_mut(&mut self, agent: AgentId) -> Option<&mut AgentState> {
        self.agents.get_mut(agent)
    }

    #[inline]
    pub fn agents(&self) -> &AgentStore {
        &self.agents
    }

    /// All obstacles, sorted by position.
    pub fn obstacles(&self) -> Vec<(Position, Obstacle)> {
        let mut v: Vec<(Position, Obstacle)> = self.obstacles.iter().map(|(&p, &o)| (p, o)).collect();
        v.sort_by_key(|&(p, _)| p);
        v
    }

    // ── Agents ────────────────────────────────────────────────────────────

    /// Register a new agent at `position`.
    ///
    /// # Errors
    /// [`GridError::OutOfBounds`] or [`GridError::CellOccupied`] if the cell
    /// cannot take an agent.  Nothing is registered on error.
    pub fn place_agent(
        &mut self,
        tag:      impl Into<String>,
        position: Position,
        control:  AgentControl,
    ) -> GridResult<AgentId> {
        if !self.is_within_bounds(position) {
            return Err(GridError::OutOfBounds(position));
        }
        if !self.is_cell_empty(position) {
            return Err(GridError::CellOccupied(position));
        }
        let id = self.agents.push(tag, position, control);
        self.occupancy.insert(position, id);
        debug!(agent = id.0, %position, "agent placed");
        Ok(id)
    }

    /// Relocate `agent`'s occupancy record to `new_pos`.
    ///
    /// The caller validates legality first, within the same lock.  This only
    /// asserts what must never happen.
    ///
    /// # Panics
    /// If `new_pos` is out of bounds, holds a different agent, or `agent` is
    /// unknown.  Each indicates a broken locking discipline.
    pub fn move_agent(&mut self, agent: AgentId, new_pos: Position) {
        assert!(
            self.is_within_bounds(new_pos),
            "move_agent: {new_pos} is out of bounds for {agent}"
        );
        if let Some(other) = self.occupancy.get(&new_pos) {
            assert_eq!(
                *other, agent,
                "double occupancy: {agent} moved onto {new_pos} held by {other}"
            );
        }
        let state = self
            .agents
            .get_mut(agent)
            .unwrap_or_else(|| panic!("move_agent: unknown {agent}"));
        let old = state.position();
        if self.occupancy.get(&old) == Some(&agent) {
            self.occupancy.remove(&old);
        }
        state.set_position(new_pos);
        self.occupancy.insert(new_pos, agent);
    }

    /// Drop `agent`'s occupancy record.  The agent record itself stays in
    /// the store (with its last position) for reporting.
    pub fn remove_agent(&mut self, agent: AgentId) {
        if let Some(pos) = self.agents.get(agent).map(AgentState::position)
            && self.occupancy.get(&pos) == Some(&agent)
        {
            self.occupancy.remove(&pos);
        }
    }

    // ── Obstacles ─────────────────────────────────────────────────────────

    /// Put `obstacle` on `pos`.
    ///
    /// # Errors
    /// Out of bounds, or the cell already holds an agent, obstacle, or food.
    pub fn add_obstacle(&mut self, pos: Position, obstacle: Obstacle) -> GridResult<()> {
        if !self.is_within_bounds(pos) {
            return Err(GridError::OutOfBounds(pos));
        }
        if !self.is_cell_empty(pos) {
            return Err(GridError::CellOccupied(pos));
        }
        self.obstacles.insert(pos, obstacle);
        Ok(())
    }

    pub fn remove_obstacle_at(&mut self, pos: Position) -> Option<Obstacle> {
        self.obstacles.remove(&pos)
    }

    /// Place up to `count` copies of `obstacle` on random free cells.
    ///
    /// Samples at most [`EMPTY_CELL_ATTEMPTS`] cells in total and returns how
    /// many were actually placed, which is less than `count` on a crowded
    /// grid.
    pub fn place_obstacles_random(&mut self, obstacle: Obstacle, count: usize) -> usize {
        let mut placed = 0;
        let mut attempts = 0;
        while placed < count && attempts < EMPTY_CELL_ATTEMPTS {
            let p = self.rng.position(self.size);
            if self.is_cell_empty(p) {
                self.obstacles.insert(p, obstacle);
                placed += 1;
            }
            attempts += 1;
        }
        if placed < count {
            debug!(?obstacle, requested = count, placed, "ran out of placement attempts");
        }
        placed
    }

    // ── Food ──────────────────────────────────────────────────────────────

    /// Put the food on `pos`, replacing any previous food cell.
    ///
    /// # Errors
    /// Out of bounds, or the cell holds an agent or an obstacle.
    pub fn place_food(&mut self, pos: Position) -> GridResult<()> {
        if !self.is_within_bounds(pos) {
            return Err(GridError::OutOfBounds(pos));
        }
        if self.occupancy.contains_key(&pos) || self.obstacles.contains_key(&pos) {
            return Err(GridError::CellOccupied(pos));
        }
        self.food = Some(pos);
        Ok(())
    }

    /// Put the food on a random cell without agent or obstacle.
    ///
    /// # Errors
    /// [`GridError::NoFreeCell`] if [`FOOD_ATTEMPTS`] samples all hit a taken
    /// cell.  The food is left unplaced rather than dropped onto an obstacle.
    pub fn place_food_random(&mut self) -> GridResult<Position> {
        for _ in 0..FOOD_ATTEMPTS {
            let p = self.rng.position(self.size);
            if !self.occupancy.contains_key(&p) && !self.obstacles.contains_key(&p) {
                self.food = Some(p);
                return Ok(p);
            }
        }
        Err(GridError::NoFreeCell("food"))
    }

    pub fn remove_food(&mut self) {
        self.food = None;
    }

    // ── Sampling ──────────────────────────────────────────────────────────

    /// Sample up to [`EMPTY_CELL_ATTEMPTS`] random cells for one that
    /// satisfies [`is_cell_empty`](Self::is_cell_empty).
    ///
    /// Soft failure: if the budget runs out, the last sampled position is
    /// returned even though it is not empty.  Callers must re-check (e.g. via
    /// [`place_agent`](Self::place_agent), which rejects occupied cells).
    pub fn random_empty_position(&mut self) -> Position {
        let mut p = self.rng.position(self.size);
        for _ in 1..EMPTY_CELL_ATTEMPTS {
            if self.is_cell_empty(p) {
                return p;
            }
            p = self.rng.position(self.size);
        }
        p
    }

    // ── Snapshots and invariants ──────────────────────────────────────────

    /// A consistent read-only copy of the whole grid.
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            size:      self.size,
            obstacles: self.obstacles(),
            food:      self.food,
            agents:    self.agents.snapshots(),
        }
    }

    /// Verify the cross-structure invariants.
    ///
    /// - every occupancy entry names a live agent whose position matches,
    /// - every live agent has an occupancy entry at its position,
    /// - no occupied cell holds an obstacle,
    /// - the food is in bounds and not on an obstacle or an agent,
    /// - every obstacle is in bounds.
    pub fn check_invariants(&self) -> GridResult<()> {
        for (&pos, &id) in &self.occupancy {
            let Some(state) = self.agents.get(id) else {
                return Err(GridError::Invariant(format!("{pos} held by unknown {id}")));
            };
            if !state.is_alive() {
                return Err(GridError::Invariant(format!("{pos} held by dead {id}")));
            }
            if state.position() != pos {
                return Err(GridError::Invariant(format!(
                    "{id} recorded at {} but occupies {pos}",
                    state.position()
                )));
            }
            if self.obstacles.contains_key(&pos) {
                return Err(GridError::Invariant(format!("{id} shares {pos} with an obstacle")));
            }
        }
        for state in self.agents.iter().filter(|a| a.is_alive()) {
            if self.occupancy.get(&state.position()) != Some(&state.id) {
                return Err(GridError::Invariant(format!(
                    "live {} missing from occupancy at {}",
                    state.id,
                    state.position()
                )));
            }
        }
        if let Some(food) = self.food {
            if !self.is_within_bounds(food) {
                return Err(GridError::Invariant(format!("food out of bounds at {food}")));
            }
            if self.obstacles.contains_key(&food) {
                return Err(GridError::Invariant(format!("food shares {food} with an obstacle")));
            }
            if let Some(id) = self.agent_at(food) {
                return Err(GridError::Invariant(format!("food under {id} at {food}")));
            }
        }
        if let Some(&pos) = self.obstacles.keys().find(|&&p| !self.is_within_bounds(p)) {
            return Err(GridError::Invariant(format!("obstacle out of bounds at {pos}")));
        }
        Ok(())
    }
}
