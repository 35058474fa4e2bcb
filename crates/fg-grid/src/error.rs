use fg_core::{AgentId, Position};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid size must be positive, got {0}")]
    InvalidSize(i32),

    #[error("position {0} is out of bounds")]
    OutOfBounds(Position),

    #[error("cell {0} is not empty")]
    CellOccupied(Position),

    #[error("agent {0} is not registered with this grid")]
    UnknownAgent(AgentId),

    #[error("no free cell found for {0}")]
    NoFreeCell(&'static str),

    #[error("grid invariant violated: {0}")]
    Invariant(String),
}

pub type GridResult<T> = Result<T, GridError>;
