//! Owned, cancelable timers for the round lifecycle.
//!
//! The lifecycle has two kinds of scheduled work:
//! 1. **Transitions** - one-shot delays between phases (prep, resolution display, results
//!    display, game over). At most one is armed at a time.
//! 2. **Ticks** - a fixed-period interval that only runs while a round is live.
//!
//! ## Deterministic Clock
//!
//! All timing is expressed in host-supplied milliseconds. Nothing here reads the wall clock;
//! a host passes `now_ms` in and asks [`RoundScheduler::next_due`] which timer fires next.
//! Follow-up work is scheduled relative to the deadline that fired, not to when the host got
//! around to calling, so the same inputs always produce the same schedule.
//!
//! ## Cancellation
//!
//! Both slots are owned by the scheduler. Cancelling clears the slot, so a canceled timer has
//! nothing left that could fire against a later phase.
//!
//! ```rust,ignore
//! use stonks_execution::round_scheduler::{Due, PhaseConfig, RoundScheduler, Transition};
//!
//! let mut scheduler = RoundScheduler::new(PhaseConfig::new(4_000, 4_000, 6_000, 10_000), 100);
//! scheduler.schedule(Transition::GoLive, 0);
//! assert_eq!(scheduler.next_due(4_000), Some(Due::Transition(Transition::GoLive, 4_000)));
//! scheduler.start_ticks(4_000);
//! assert_eq!(scheduler.next_due(4_100), Some(Due::Tick(4_100)));
//! ```

use stonks_types::StonksConfig;

/// Delays between lifecycle phases, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseConfig {
    /// Role announcement before the round goes live.
    pub prep_ms: u64,
    /// Resolution banner before round results are published.
    pub resolution_display_ms: u64,
    /// Round results before the next round starts.
    pub results_display_ms: u64,
    /// Final standings before the reset signal.
    pub game_over_ms: u64,
}

impl PhaseConfig {
    pub fn new(
        prep_ms: u64,
        resolution_display_ms: u64,
        results_display_ms: u64,
        game_over_ms: u64,
    ) -> Self {
        Self {
            prep_ms,
            resolution_display_ms,
            results_display_ms,
            game_over_ms,
        }
    }

    /// Delay between the moment a transition is scheduled and the moment it fires.
    pub fn delay_for(&self, transition: Transition) -> u64 {
        match transition {
            Transition::GoLive => self.prep_ms,
            Transition::PublishResults => self.resolution_display_ms,
            Transition::AdvanceRound => self.results_display_ms,
            Transition::Reset => self.game_over_ms,
        }
    }
}

impl From<&StonksConfig> for PhaseConfig {
    fn from(config: &StonksConfig) -> Self {
        Self {
            prep_ms: config.prep_ms,
            resolution_display_ms: config.resolution_display_ms,
            results_display_ms: config.results_display_ms,
            game_over_ms: config.game_over_ms,
        }
    }
}

/// Delayed lifecycle step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// PREP -> LIVE.
    GoLive,
    /// RESOLVED -> publish ranked round results.
    PublishResults,
    /// Results shown -> next round PREP, or GAME_OVER after the last round.
    AdvanceRound,
    /// GAME_OVER -> reset signal, session destroyed.
    Reset,
}

/// Work that is due at a given deadline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Due {
    Tick(u64),
    Transition(Transition, u64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Armed {
    transition: Transition,
    deadline_ms: u64,
}

/// Single-slot one-shot timer.
#[derive(Clone, Debug, Default)]
pub struct Timer {
    armed: Option<Armed>,
}

impl Timer {
    /// Arm the slot, returning whatever it replaced.
    pub fn arm(&mut self, transition: Transition, deadline_ms: u64) -> Option<Transition> {
        self.armed
            .replace(Armed {
                transition,
                deadline_ms,
            })
            .map(|armed| armed.transition)
    }

    pub fn cancel(&mut self) -> Option<Transition> {
        self.armed.take().map(|armed| armed.transition)
    }

    pub fn pending(&self) -> Option<Transition> {
        self.armed.map(|armed| armed.transition)
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.armed.map(|armed| armed.deadline_ms)
    }

    /// Disarm and return the transition if its deadline has passed.
    pub fn take_due(&mut self, now_ms: u64) -> Option<(Transition, u64)> {
        match self.armed {
            Some(armed) if now_ms >= armed.deadline_ms => {
                self.armed = None;
                Some((armed.transition, armed.deadline_ms))
            }
            _ => None,
        }
    }
}

/// Fixed-period interval.
#[derive(Clone, Debug)]
pub struct TickTimer {
    period_ms: u64,
    next_at_ms: Option<u64>,
}

impl TickTimer {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            next_at_ms: None,
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Start (or restart) the interval; the first tick lands one period after `now_ms`.
    pub fn start(&mut self, now_ms: u64) {
        self.next_at_ms = Some(now_ms.saturating_add(self.period_ms));
    }

    pub fn cancel(&mut self) -> bool {
        self.next_at_ms.take().is_some()
    }

    pub fn is_running(&self) -> bool {
        self.next_at_ms.is_some()
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.next_at_ms
    }

    /// Consume one due tick and schedule the following one.
    pub fn take_due(&mut self, now_ms: u64) -> Option<u64> {
        match self.next_at_ms {
            Some(at) if now_ms >= at => {
                // A saturated clock has no next tick.
                let next = at.saturating_add(self.period_ms);
                self.next_at_ms = (next > at).then_some(next);
                Some(at)
            }
            _ => None,
        }
    }
}

/// Both timer slots of one lifecycle controller.
#[derive(Clone, Debug)]
pub struct RoundScheduler {
    config: PhaseConfig,
    lifecycle: Timer,
    ticks: TickTimer,
}

impl RoundScheduler {
    pub fn new(config: PhaseConfig, tick_ms: u64) -> Self {
        Self {
            config,
            lifecycle: Timer::default(),
            ticks: TickTimer::new(tick_ms),
        }
    }

    pub fn config(&self) -> &PhaseConfig {
        &self.config
    }

    /// Arm `transition` relative to `now_ms`, replacing any pending transition.
    pub fn schedule(&mut self, transition: Transition, now_ms: u64) -> u64 {
        let deadline_ms = now_ms.saturating_add(self.config.delay_for(transition));
        self.lifecycle.arm(transition, deadline_ms);
        deadline_ms
    }

    pub fn pending_transition(&self) -> Option<Transition> {
        self.lifecycle.pending()
    }

    /// Restart the tick interval. Any leftover interval from an earlier round is dropped first.
    pub fn start_ticks(&mut self, now_ms: u64) {
        self.ticks.cancel();
        self.ticks.start(now_ms);
    }

    pub fn stop_ticks(&mut self) -> bool {
        self.ticks.cancel()
    }

    pub fn ticking(&self) -> bool {
        self.ticks.is_running()
    }

    pub fn cancel_all(&mut self) {
        self.lifecycle.cancel();
        self.ticks.cancel();
    }

    /// Earliest armed deadline, if anything is scheduled.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        match (self.lifecycle.deadline_ms(), self.ticks.deadline_ms()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Pop the earliest work due at or before `now_ms`.
    ///
    /// Ticks win ties so input already applied is evaluated before a phase moves on.
    pub fn next_due(&mut self, now_ms: u64) -> Option<Due> {
        let tick_at = self.ticks.deadline_ms().filter(|at| *at <= now_ms);
        let transition_at = self.lifecycle.deadline_ms().filter(|at| *at <= now_ms);
        match (tick_at, transition_at) {
            (Some(tick), Some(transition)) if transition < tick => self
                .lifecycle
                .take_due(now_ms)
                .map(|(t, at)| Due::Transition(t, at)),
            (Some(_), _) => self.ticks.take_due(now_ms).map(Due::Tick),
            (None, Some(_)) => self
                .lifecycle
                .take_due(now_ms)
                .map(|(t, at)| Due::Transition(t, at)),
            (None, None) => None,
        }
    }
}
