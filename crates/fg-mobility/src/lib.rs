//! `fg-mobility`: agent movement, the unit of atomicity.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`movement`]| `attempt_move`, `request_move`, `MoveOutcome`                |
//! | [`error`]   | `MoveError`, `MoveResult<T>`                                 |
//!
//! # Movement model
//!
//! One attempt moves one agent by one cell:
//!
//! 1. Compute the target cell from the direction.
//! 2. Refuse if the target is off the grid, held by another live agent, or
//!    the mover is dead; count an invalid move.
//! 3. Commit the occupancy change.
//! 4. Let an obstacle on the target act once (bomb kills, rock pushes back).
//! 5. If the agent survived and stands on the food, it eats it.
//! 6. Count a valid move if the agent survived.
//!
//! [`attempt_move`] runs all of this on an already locked `&mut Grid`;
//! [`request_move`] takes the lock itself.  Either way the whole sequence is
//! one critical section, so no other agent can observe or interleave with a
//! half-applied move.

pub mod error;
pub mod movement;


pub use error::{MoveError, MoveResult};
pub use movement::{attempt_move, request_move, MoveOutcome};
