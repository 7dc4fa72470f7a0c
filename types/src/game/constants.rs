/// Title announced when a session opens.
pub const GAME_TITLE: &str = "Stonks or Bronks";

/// Mode key hosts register the engine under.
pub const GAME_MODE: &str = "stonks";

/// One raiser, one realizer, one crasher.
pub const MIN_PARTICIPANTS: usize = 3;

/// Maximum display name length accepted from a host roster
pub const MAX_NAME_LENGTH: usize = 32;

/// Share of cashout profit paid to the raiser, in percent.
pub const COMMISSION_PERCENT: u64 = 10;

/// Rounds per session
pub const DEFAULT_TOTAL_ROUNDS: u32 = 9;

/// Tick period in milliseconds
pub const DEFAULT_TICK_MS: u64 = 100;

/// Value the rising line starts from every round
pub const DEFAULT_BASELINE_VALUE: f64 = 10.0;

/// Added to the rising line per accepted RAISE
pub const DEFAULT_PUMP_INCREMENT: f64 = 2.0;

/// Added to the crash line per accepted CRASH
pub const DEFAULT_CRASH_INCREMENT: f64 = 2.5;

/// Paid to the crasher when the crash line catches the rising line
pub const DEFAULT_CRASH_BONUS: u64 = 500;

/// Role announcement before the round goes live
pub const DEFAULT_PREP_MS: u64 = 4_000;

/// Resolution banner before round results are published
pub const DEFAULT_RESOLUTION_DISPLAY_MS: u64 = 4_000;

/// Round results before the next round (or game over)
pub const DEFAULT_RESULTS_DISPLAY_MS: u64 = 6_000;

/// Final standings before participants are told to reset
pub const DEFAULT_GAME_OVER_MS: u64 = 10_000;
