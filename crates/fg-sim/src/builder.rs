//! Fluent builder for constructing a [`Simulation`].

use fg_agent::{AgentControl, AgentRngs};
use fg_behavior::DecisionPolicy;
use fg_core::{Position, SimConfig, SimRng};
use fg_grid::{Grid, Obstacle, SharedGrid};
use tracing::{debug, warn};

use crate::{SimError, SimResult, Simulation};

struct AgentSpec {
    tag:      String,
    position: Option<Position>,
    control:  AgentControl,
}

/// Fluent builder for [`Simulation<P>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: grid size, seed, pacing, …
/// - `P: DecisionPolicy`: how autonomous agents choose moves
///
/// # Optional inputs (have defaults)
///
/// | Method                    | Default                              |
/// |---------------------------|--------------------------------------|
/// | `.obstacle(pos, kind)`    | no fixed obstacles                   |
/// | `.random_obstacles(k, n)` | no random obstacles                  |
/// | `.food_at(pos)`           | food on a random free cell           |
/// | `.agent(tag, pos)` etc.   | no agents (the run stops at once)    |
///
/// # Placement order
///
/// Fixed obstacles, then fixed food, then agents in the order they were
/// added (so `AgentId`s follow declaration order), then random obstacles,
/// then random food.  Random placement never lands on an occupied cell.
///
/// # Example
///
/// ```rust,ignore
/// let sim = SimBuilder::new(SimConfig::default(), RandomNoRepeat)
///     .random_obstacles(Obstacle::Bomb, 1)
///     .random_obstacles(Obstacle::Rock, 2)
///     .random_agents(3)
///     .build()?;
/// let report = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<P: DecisionPolicy> {
    config:           SimConfig,
    policy:           P,
    obstacles:        Vec<(Position, Obstacle)>,
    random_obstacles: Vec<(Obstacle, usize)>,
    food:             Option<Position>,
    agents:           Vec<AgentSpec>,
}

impl<P: DecisionPolicy> SimBuilder<P> {
    pub fn new(config: SimConfig, policy: P) -> Self {
        Self {
            config,
            policy,
            obstacles:        Vec::new(),
            random_obstacles: Vec::new(),
            food:             None,
            agents:           Vec::new(),
        }
    }

    /// Put `kind` on a fixed cell.
    pub fn obstacle(mut self, pos: Position, kind: Obstacle) -> Self {
        self.obstacles.push((pos, kind));
        self
    }

    /// Scatter `count` obstacles of `kind` over free cells.
    pub fn random_obstacles(mut self, kind: Obstacle, count: usize) -> Self {
        self.random_obstacles.push((kind, count));
        self
    }

    /// Put the food on a fixed cell instead of a random one.
    pub fn food_at(mut self, pos: Position) -> Self {
        self.food = Some(pos);
        self
    }

    /// An autonomous agent on a fixed cell.
    pub fn agent(self, tag: impl Into<String>, pos: Position) -> Self {
        self.agent_with(tag, Some(pos), AgentControl::Autonomous)
    }

    /// An autonomous agent on a random free cell.
    pub fn random_agent(self, tag: impl Into<String>) -> Self {
        self.agent_with(tag, None, AgentControl::Autonomous)
    }

    /// `count` autonomous agents on random cells, tagged `R<n>` by their
    /// 1-based position in the agent list.
    pub fn random_agents(mut self, count: usize) -> Self {
        for _ in 0..count {
            let tag = format!("R{}", self.agents.len() + 1);
            self = self.random_agent(tag);
        }
        self
    }

    /// An agent with explicit control mode.  `position: None` picks a random
    /// free cell.  Manual agents get no thread; drive them through
    /// [`SimHandle::request_move`][crate::SimHandle::request_move].
    pub fn agent_with(mut self, tag: impl Into<String>, position: Option<Position>, control: AgentControl) -> Self {
        self.agents.push(AgentSpec { tag: tag.into(), position, control });
        self
    }

    /// Validate inputs, populate the grid, and return a ready-to-run
    /// [`Simulation`].
    ///
    /// # Errors
    /// Invalid configuration, a scenario with more occupants than cells, or
    /// a fixed placement on an unavailable cell.
    pub fn build(self) -> SimResult<Simulation<P>> {
        self.config.validate()?;

        let random_obstacles: usize = self.random_obstacles.iter().map(|&(_, n)| n).sum();
        let needed = self.obstacles.len() + random_obstacles + self.agents.len() + 1;
        let available = self.config.cell_count();
        if needed > available {
            return Err(SimError::GridTooSmall { needed, available });
        }

        let seed = self.config.resolve_seed();
        let mut grid = Grid::new(self.config.grid_size, SimRng::new(seed))?;

        // ── Fixed placements ──────────────────────────────────────────────
        for &(pos, kind) in &self.obstacles {
            grid.add_obstacle(pos, kind)?;
        }
        if let Some(pos) = self.food {
            grid.place_food(pos)?;
        }

        // ── Agents, in declaration order ──────────────────────────────────
        for spec in self.agents {
            let position = spec.position.unwrap_or_else(|| grid.random_empty_position());
            grid.place_agent(spec.tag, position, spec.control)?;
        }

        // ── Random placements ─────────────────────────────────────────────
        for &(kind, count) in &self.random_obstacles {
            let placed = grid.place_obstacles_random(kind, count);
            if placed < count {
                warn!(%kind, requested = count, placed, "could not place every obstacle");
            }
        }
        if self.food.is_none() {
            grid.place_food_random()?;
        }

        let rngs = AgentRngs::new(grid.agents().len(), seed);
        debug!(seed, size = grid.size(), agents = rngs.len(), "simulation built");
        Ok(Simulation::new(self.config, seed, SharedGrid::new(grid), self.policy, rngs))
    }
}
