//! `fg-core`: foundational types for the `rust_forage` grid simulation.
//!
//! This crate is a dependency of every other `fg-*` crate.  It has no `fg-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`                                             |
//! | [`position`]    | `Position`, `Direction`                               |
//! | [`config`]      | `SimConfig`                                           |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (grid placement)     |
//! | [`error`]       | `FgError`, `FgResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod position;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::{FgError, FgResult};
pub use ids::AgentId;
pub use position::{Direction, Position};
pub use rng::{AgentRng, SimRng};
