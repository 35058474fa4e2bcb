//! `fg-grid`: the shared grid and its lock.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`grid`]     | `Grid`: occupancy, obstacles, food, agent records, placement |
//! | [`obstacle`] | `Obstacle` (`Bomb`, `Rock`) and `Interaction`                 |
//! | [`shared`]   | `SharedGrid`: the one `Mutex` every thread goes through      |
//! | [`snapshot`] | `GridSnapshot`, `CellView`: read-only copies for renderers   |
//! | [`error`]    | `GridError`, `GridResult<T>`                                  |
//!
//! # Locking discipline
//!
//! `Grid` itself is a plain single-threaded value; all of its methods take
//! `&self`/`&mut self`.  Concurrency lives entirely in [`SharedGrid`], which
//! wraps the grid in one `parking_lot::Mutex`.  A caller that needs several
//! grid operations to be indivisible (a move attempt, a snapshot) takes the
//! lock once and performs them all on the guarded `&mut Grid`.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                    |
//! |-----------|-----------------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for the per-cell maps.          |
//! | `serde`   | `Serialize`/`Deserialize` on `Obstacle` and snapshots.    |

pub mod error;
pub mod grid;
pub mod obstacle;
pub mod shared;
pub mod snapshot;


pub use error::{GridError, GridResult};
pub use grid::{Grid, EMPTY_CELL_ATTEMPTS, FOOD_ATTEMPTS};
pub use obstacle::{Interaction, Obstacle};
pub use shared::SharedGrid;
pub use snapshot::{CellView, GridSnapshot};
