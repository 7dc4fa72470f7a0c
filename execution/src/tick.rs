//! Tick evaluation.
//!
//! A tick never moves either line; growth only comes from accepted input. Each tick either
//! detects the crash or republishes the current pair for rendering.

use crate::round::RoundState;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickVerdict {
    /// The crash line has caught the rising line; resolve and stop ticking.
    Crash,
    Publish { rise_value: f64, crash_value: f64 },
}

pub fn evaluate(round: &RoundState) -> TickVerdict {
    if round.has_crossed() {
        TickVerdict::Crash
    } else {
        TickVerdict::Publish {
            rise_value: round.rise_value(),
            crash_value: round.crash_value(),
        }
    }
}
