use fg_core::FgError;
use fg_grid::GridError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] FgError),

    #[error("scenario needs {needed} cells but the grid has only {available}")]
    GridTooSmall { needed: usize, available: usize },

    #[error("grid setup failed: {0}")]
    Grid(#[from] GridError),

    #[error("failed to spawn thread for agent {tag}: {source}")]
    Spawn {
        tag:    String,
        #[source]
        source: std::io::Error,
    },
}

pub type SimResult<T> = Result<T, SimError>;
