//! Framework error type.
//!
//! Sub-crates define their own error enums (`GridError`, `MoveError`, …) and
//! wrap `FgError` as one variant where they need configuration failures.

use thiserror::Error;

/// The top-level error type for `fg-core` and a common base for sub-crates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FgError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown direction: {0:?}")]
    UnknownDirection(String),
}

/// Shorthand result type for all `fg-*` crates.
pub type FgResult<T> = Result<T, FgError>;
