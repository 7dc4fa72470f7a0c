//! Round domain types.
//!
//! Defines participants, roles, actions, configuration and constants used by the execution layer
//! and hosts.

mod action;
mod config;
mod constants;
mod participant;
mod role;

pub use action::*;
pub use config::*;
pub use constants::*;
pub use participant::*;
pub use role::*;
