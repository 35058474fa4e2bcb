use fg_core::AgentId;
use fg_mobility::MoveError;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    /// Every direction was tried once this turn and all were refused.
    #[error("{0} has no valid move")]
    NoValidMove(AgentId),

    /// A scripted agent has replayed its whole direction list.
    #[error("script for {0} is exhausted")]
    ScriptExhausted(AgentId),

    /// A single move was refused and the policy does not retry.
    #[error(transparent)]
    Move(#[from] MoveError),
}

pub type PolicyResult<T> = Result<T, PolicyError>;
