//! Read-only copies of grid state for renderers, observers and reports.

use fg_agent::AgentSnapshot;
use fg_core::{AgentId, Position};

use crate::Obstacle;

/// Everything a renderer needs, copied under the grid lock.
///
/// Obstacles are sorted by position and agents by id, so two snapshots of
/// identical grids compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSnapshot {
    pub size:      i32,
    pub obstacles: Vec<(Position, Obstacle)>,
    pub food:      Option<Position>,
    pub agents:    Vec<AgentSnapshot>,
}

/// What a renderer should draw in one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Empty,
    Food,
    Agent(AgentId),
    Obstacle(Obstacle),
}

impl GridSnapshot {
    pub fn agent(&self, agent: AgentId) -> Option<&AgentSnapshot> {
        self.agents.get(agent.index())
    }

    pub fn obstacle_at(&self, pos: Position) -> Option<Obstacle> {
        self.obstacles
            .binary_search_by_key(&pos, |&(p, _)| p)
            .ok()
            .map(|i| self.obstacles[i].1)
    }

    /// The live agent standing on `pos`, if any.
    pub fn agent_at(&self, pos: Position) -> Option<AgentId> {
        self.agents
            .iter()
            .find(|a| a.alive && a.position == pos)
            .map(|a| a.id)
    }

    /// The occupant to draw at `pos`: food first, then a live agent, then an
    /// obstacle.
    pub fn cell(&self, pos: Position) -> CellView {
        if self.food == Some(pos) {
            CellView::Food
        } else if let Some(id) = self.agent_at(pos) {
            CellView::Agent(id)
        } else if let Some(o) = self.obstacle_at(pos) {
            CellView::Obstacle(o)
        } else {
            CellView::Empty
        }
    }

    pub fn live_agents(&self) -> usize {
        self.agents.iter().filter(|a| a.alive).count()
    }

    pub fn food_finder(&self) -> Option<AgentId> {
        self.agents.iter().find(|a| a.found_food).map(|a| a.id)
    }
}
