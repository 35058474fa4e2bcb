//! `fg-sim`: the simulation driver for rust_forage.
//!
//! # Run loop
//!
//! ```text
//! build:  grid populated, one AgentRng per agent
//! run:
//!   ① spawn one OS thread per autonomous agent
//!        loop: stop flag? dead? fed? budget? → exit
//!              policy.decide_and_move()        (one lock per attempt)
//!              pause pause_min_ms + rand(0..=pause_jitter_ms)
//!   ② detection loop, every poll_interval_ms or on an exit report
//!        any agent found food          → Converged(FoundFood)
//!        all agents dead or exited     → Converged(AllStopped)
//!   ③ raise stop flag, wait ≤ join_timeout_ms, warn about stragglers
//!   ④ report final per-agent statistics
//! ```
//!
//! Agents never wait on each other except for the grid lock, and the lock
//! is never held across a pause, so the run cannot deadlock.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fg_behavior::RandomNoRepeat;
//! use fg_core::SimConfig;
//! use fg_grid::Obstacle;
//! use fg_sim::{NoopObserver, SimBuilder};
//!
//! let report = SimBuilder::new(SimConfig::default(), RandomNoRepeat)
//!     .random_obstacles(Obstacle::Bomb, 1)
//!     .random_obstacles(Obstacle::Rock, 2)
//!     .random_agents(3)
//!     .build()?
//!     .run(&mut NoopObserver)?;
//! println!("{}", report.outcome);
//! ```

pub mod builder;
pub mod error;
pub mod handle;
pub mod observer;
pub mod sim;
pub mod task;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use handle::SimHandle;
pub use observer::{NoopObserver, SimObserver};
pub use sim::{assess, Convergence, RunState, SimReport, Simulation};
pub use task::{ExitReason, TaskExit};
