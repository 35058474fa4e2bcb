//! One-cell moves and their consequences.

use fg_agent::AgentState;
use fg_core::{AgentId, Direction, Position};
use fg_grid::{Grid, Interaction, SharedGrid};
use tracing::{info, trace};

use crate::{MoveError, MoveResult};

/// What happened to an agent whose move was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The agent now stands on the target cell.
    Moved(Position),
    /// The agent stepped onto the food and ate it.
    FoundFood(Position),
    /// A rock at `rock` sent the agent back to `back_to`.
    PushedBack { rock: Position, back_to: Position },
    /// A rock could not push the agent back; it stays on the rock's cell.
    HeldOnRock(Position),
    /// A bomb at this cell killed the agent.
    Exploded(Position),
}

impl MoveOutcome {
    /// Where the agent ended up (its last position if it died).
    pub fn position(self) -> Position {
        match self {
            MoveOutcome::Moved(p)
            | MoveOutcome::FoundFood(p)
            | MoveOutcome::HeldOnRock(p)
            | MoveOutcome::Exploded(p) => p,
            MoveOutcome::PushedBack { back_to, .. } => back_to,
        }
    }

    /// `false` only for [`MoveOutcome::Exploded`].
    pub fn survived(self) -> bool {
        !matches!(self, MoveOutcome::Exploded(_))
    }
}

/// Move `agent` one cell in `direction` on an already locked grid.
///
/// Checks run in order: bounds, occupancy, liveness.  A refused attempt
/// increments the agent's invalid-move counter and changes nothing else.
/// An accepted attempt increments the valid-move counter unless a bomb
/// killed the agent.
///
/// Callers must hold the grid lock for the whole call; use
/// [`request_move`] when holding a [`SharedGrid`].
///
/// # Errors
/// [`MoveError::OutOfBounds`], [`MoveError::CellOccupied`],
/// [`MoveError::AgentDead`], or [`MoveError::UnknownAgent`] for an id the
/// grid has never seen (no counter is touched in that case).
pub fn attempt_move(grid: &mut Grid, agent: AgentId, direction: Direction) -> MoveResult<MoveOutcome> {
    let Some(state) = grid.agent(agent) else {
        return Err(MoveError::UnknownAgent(agent));
    };
    let previous = state.position();
    let alive = state.is_alive();
    let target = previous.step(direction);

    let refusal = if !grid.is_within_bounds(target) {
        Some(MoveError::OutOfBounds(target))
    } else if grid.agent_at(target).is_some_and(|other| other != agent) {
        Some(MoveError::CellOccupied(target))
    } else if !alive {
        Some(MoveError::AgentDead(agent))
    } else {
        None
    };
    if let Some(err) = refusal {
        update(grid, agent, AgentState::record_invalid_move);
        trace!(agent = agent.0, %direction, %err, "move refused");
        return Err(err);
    }

    // Commit point: from here on the move has happened.
    grid.move_agent(agent, target);

    let interaction = grid
        .obstacle_at(target)
        .map(|obstacle| obstacle.interact(grid, agent, previous));
    if interaction == Some(Interaction::Exploded) {
        return Ok(MoveOutcome::Exploded(target));
    }

    let here = grid.agent(agent).map_or(target, AgentState::position);
    let found = grid.has_food_at(here);
    if found {
        grid.remove_food();
        update(grid, agent, AgentState::mark_found_food);
        info!(agent = agent.0, cell = %here, "food found");
    }
    update(grid, agent, AgentState::record_valid_move);

    let outcome = match interaction {
        _ if found => MoveOutcome::FoundFood(here),
        Some(Interaction::PushedBack) => MoveOutcome::PushedBack { rock: target, back_to: here },
        Some(Interaction::Held) => MoveOutcome::HeldOnRock(here),
        _ => MoveOutcome::Moved(here),
    };
    trace!(agent = agent.0, %direction, ?outcome, "move accepted");
    Ok(outcome)
}

/// Take the grid lock and perform one [`attempt_move`].
///
/// This is the command surface for manually driven agents and the building
/// block of every decision policy.
pub fn request_move(grid: &SharedGrid, agent: AgentId, direction: Direction) -> MoveResult<MoveOutcome> {
    grid.with(|g| attempt_move(g, agent, direction))
}

fn update(grid: &mut Grid, agent: AgentId, f: impl FnOnce(&mut AgentState)) {
    if let Some(state) = grid.agent_mut(agent) {
        f(state);
    }
}
