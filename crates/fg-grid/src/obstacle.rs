//! Grid-resident hazards and what they do to an agent that steps on them.

use fg_core::{AgentId, Position};
use tracing::{debug, info};

use crate::Grid;

/// A stateless hazard.  New kinds extend this enum and [`Obstacle::interact`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Obstacle {
    /// Lethal, fires once.
    Bomb,
    /// Pushes the agent back where it came from.  Permanent.
    Rock,
}

/// Result of one [`Obstacle::interact`] call.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Interaction {
    /// The agent died and the bomb is gone.
    Exploded,
    /// The agent was moved back to its previous cell.
    PushedBack,
    /// The previous cell was unavailable; the agent stays on the rock.
    Held,
}

impl Obstacle {
    /// Apply this obstacle to `agent`, which has just been committed onto the
    /// obstacle's cell from `previous`.
    ///
    /// Must be called with the grid lock held, as part of the same step that
    /// moved the agent.  Exactly one interaction happens per move: a rock
    /// push-back never triggers whatever sits on the previous cell.
    pub fn interact(self, grid: &mut Grid, agent: AgentId, previous: Position) -> Interaction {
        match self {
            Obstacle::Bomb => {
                let Some(state) = grid.agent_mut(agent) else {
                    return Interaction::Held;
                };
                state.kill();
                let cell = state.position();
                grid.remove_agent(agent);
                grid.remove_obstacle_at(cell);
                info!(agent = agent.0, %cell, "bomb exploded");
                Interaction::Exploded
            }
            Obstacle::Rock => {
                if grid.is_within_bounds(previous) && grid.is_cell_empty(previous) {
                    grid.move_agent(agent, previous);
                    debug!(agent = agent.0, to = %previous, "pushed back by rock");
                    Interaction::PushedBack
                } else {
                    Interaction::Held
                }
            }
        }
    }

    /// One-character label for text renderers.
    pub fn label(self) -> char {
        match self {
            Obstacle::Bomb => 'B',
            Obstacle::Rock => 'R',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Obstacle::Bomb => "bomb",
            Obstacle::Rock => "rock",
        }
    }
}

impl std::fmt::Display for Obstacle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
