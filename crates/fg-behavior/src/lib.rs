//! `fg-behavior`: how an agent picks its next move.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`policy`]   | `DecisionPolicy` trait                                        |
//! | [`random`]   | `RandomNoRepeat`: shuffled directions, each tried once       |
//! | [`scripted`] | `ScriptedPolicy`: replays a fixed direction list per agent   |
//! | [`error`]    | `PolicyError`, `PolicyResult<T>`                              |
//!
//! # Design notes
//!
//! A policy never touches grid state directly.  Every move it makes goes
//! through [`fg_mobility::request_move`], so each attempt is its own critical
//! section and other agents may move between two attempts of one turn.
//! Policies are shared by every agent thread behind an `Arc`, which is why
//! the trait requires `Send + Sync`; per-agent randomness comes in through
//! the caller's [`fg_core::AgentRng`].

pub mod error;
pub mod policy;
pub mod random;
pub mod scripted;


pub use error::{PolicyError, PolicyResult};
pub use policy::DecisionPolicy;
pub use random::RandomNoRepeat;
pub use scripted::ScriptedPolicy;
