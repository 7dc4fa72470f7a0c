use serde::{Deserialize, Serialize};

use super::{
    DEFAULT_BASELINE_VALUE, DEFAULT_CRASH_BONUS, DEFAULT_CRASH_INCREMENT, DEFAULT_GAME_OVER_MS,
    DEFAULT_PREP_MS, DEFAULT_PUMP_INCREMENT, DEFAULT_RESOLUTION_DISPLAY_MS,
    DEFAULT_RESULTS_DISPLAY_MS, DEFAULT_TICK_MS, DEFAULT_TOTAL_ROUNDS,
};
use crate::Error;

/// Tunables for one session. Every field can be overridden by the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StonksConfig {
    pub total_rounds: u32,
    pub tick_ms: u64,
    pub baseline_value: f64,
    pub pump_increment: f64,
    pub crash_increment: f64,
    pub crash_bonus: u64,
    pub prep_ms: u64,
    pub resolution_display_ms: u64,
    pub results_display_ms: u64,
    pub game_over_ms: u64,
}

impl Default for StonksConfig {
    fn default() -> Self {
        Self {
            total_rounds: DEFAULT_TOTAL_ROUNDS,
            tick_ms: DEFAULT_TICK_MS,
            baseline_value: DEFAULT_BASELINE_VALUE,
            pump_increment: DEFAULT_PUMP_INCREMENT,
            crash_increment: DEFAULT_CRASH_INCREMENT,
            crash_bonus: DEFAULT_CRASH_BONUS,
            prep_ms: DEFAULT_PREP_MS,
            resolution_display_ms: DEFAULT_RESOLUTION_DISPLAY_MS,
            results_display_ms: DEFAULT_RESULTS_DISPLAY_MS,
            game_over_ms: DEFAULT_GAME_OVER_MS,
        }
    }
}

impl StonksConfig {
    /// Reject configurations the engine cannot run.
    ///
    /// Display delays may be zero; the tick period may not, since the tick loop would never
    /// make progress.
    pub fn validate(&self) -> Result<(), Error> {
        if self.total_rounds == 0 {
            return Err(Error::InvalidConfig("total_rounds must be greater than zero"));
        }
        if self.tick_ms == 0 {
            return Err(Error::InvalidConfig("tick_ms must be greater than zero"));
        }
        if !is_positive(self.baseline_value) {
            return Err(Error::InvalidConfig("baseline_value must be finite and positive"));
        }
        if !is_positive(self.pump_increment) {
            return Err(Error::InvalidConfig("pump_increment must be finite and positive"));
        }
        if !is_positive(self.crash_increment) {
            return Err(Error::InvalidConfig("crash_increment must be finite and positive"));
        }
        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
