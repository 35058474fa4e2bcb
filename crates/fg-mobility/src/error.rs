use fg_core::{AgentId, Position};
use thiserror::Error;

/// Why a move attempt was refused.  Every variant except `UnknownAgent`
/// counts as one invalid move for the agent.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("out of bounds: {0}")]
    OutOfBounds(Position),

    #[error("cell occupied by another agent at {0}")]
    CellOccupied(Position),

    #[error("agent {0} is not alive")]
    AgentDead(AgentId),

    #[error("agent {0} is not registered with this grid")]
    UnknownAgent(AgentId),
}

pub type MoveResult<T> = Result<T, MoveError>;
