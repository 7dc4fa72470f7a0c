//! Stonks round engine.
//!
//! This crate contains the deterministic round state machine a host drives: role rotation
//! ([`roles`]), the live round record ([`round`]), tick evaluation ([`tick`]), input routing
//! ([`input`]), resolution and scoring ([`settle`]), the cross-round aggregate ([`session`]) and
//! the lifecycle controller that owns every timer ([`RoundController`]).
//!
//! ## Determinism requirements
//! - Do not read wall-clock time inside the engine; hosts pass `now_ms` in.
//! - Follow-up timers are scheduled from the deadline that fired, never from call time.
//! - Do not let hash-based iteration order influence outputs.
//!
//! ## Minimal host loop (example)
//! ```rust,ignore
//! use stonks_execution::{RoundController, RoundEngine};
//! use stonks_types::{ActionKind, Participant, StonksConfig};
//!
//! let mut engine = RoundController::new(StonksConfig::default())?;
//! engine.start_session(roster, now_ms())?;
//! loop {
//!     // 1) Sleep until `engine.next_deadline_ms()` or until player input arrives.
//!     // 2) Feed input with `engine.submit_action(&id, ActionKind::Raise, now_ms())`,
//!     //    or fire timers with `engine.tick(now_ms())`.
//!     // 3) Relay `engine.drain_events()` to players.
//! }
//! ```

pub mod controller;
pub mod engine;
pub mod input;
pub mod roles;
pub mod round;
pub mod round_scheduler;
pub mod session;
pub mod settle;
pub mod tick;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;


pub use controller::RoundController;
pub use engine::{Dispatch, ModeTable, RoundEngine};
pub use roles::{assign_roles, seat_offsets};
pub use round::RoundState;
pub use round_scheduler::{Due, PhaseConfig, RoundScheduler, TickTimer, Timer, Transition};
pub use session::GameSession;
pub use settle::{settle_cashout, settle_crash, Settlement};
