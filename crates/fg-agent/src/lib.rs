//! `fg-agent`: per-agent state for the `rust_forage` simulation.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`state`]   | `AgentState`, `AgentControl`, `AgentSnapshot`                |
//! | [`store`]   | `AgentStore` (records indexed by `AgentId`), `AgentRngs`     |
//!
//! Agent records are pure data.  They live inside the grid (see `fg-grid`)
//! so every read and write goes through the grid lock; agents never hold
//! references to one another.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `serde`    | Derives `Serialize`/`Deserialize` on all public types.     |

pub mod state;
pub mod store;


pub use state::{AgentControl, AgentSnapshot, AgentState};
pub use store::{AgentRngs, AgentStore};
