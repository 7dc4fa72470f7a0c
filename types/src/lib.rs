//! Common types for the stonks round engine.
//!
//! Shared by the execution layer (which owns the round state machine) and by hosts that relay
//! player input and render the published events. Nothing in this crate performs I/O or keeps
//! time; it only names things.

pub mod api;
mod error;
pub mod game;

pub use api::{Commission, LeaderboardEntry, OutboundEvent, RoleAssignment};
pub use error::Error;
pub use game::*;
