//! Canonical record of the round in progress.
//!
//! Only the input router (value growth) and the lifecycle controller (phase changes) mutate a
//! [`RoundState`]; everything else reads it. Mutators are crate-private so hosts cannot bypass
//! phase gating.

use stonks_types::{Outcome, RoleTriple, RoundPhase};

#[derive(Clone, Debug, PartialEq)]
pub struct RoundState {
    round: u32,
    roles: RoleTriple,
    rise_value: f64,
    crash_value: f64,
    phase: RoundPhase,
    outcome: Option<Outcome>,
    realized: bool,
}

impl RoundState {
    pub(crate) fn new(round: u32, roles: RoleTriple, baseline_value: f64) -> Self {
        Self {
            round,
            roles,
            rise_value: baseline_value,
            crash_value: 0.0,
            phase: RoundPhase::Prep,
            outcome: None,
            realized: false,
        }
    }

    /// 1-based round index.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn roles(&self) -> &RoleTriple {
        &self.roles
    }

    pub fn rise_value(&self) -> f64 {
        self.rise_value
    }

    pub fn crash_value(&self) -> f64 {
        self.crash_value
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_live(&self) -> bool {
        self.phase == RoundPhase::Live
    }

    /// Whether the realizer's cashout has been accepted this round.
    pub fn realized(&self) -> bool {
        self.realized
    }

    /// The crash line has caught the rising line.
    pub fn has_crossed(&self) -> bool {
        self.crash_value >= self.rise_value
    }

    pub(crate) fn go_live(&mut self) {
        debug_assert_eq!(self.phase, RoundPhase::Prep);
        self.phase = RoundPhase::Live;
    }

    pub(crate) fn raise(&mut self, by: f64) {
        debug_assert!(self.is_live());
        self.rise_value += by;
    }

    pub(crate) fn push_crash(&mut self, by: f64) {
        debug_assert!(self.is_live());
        self.crash_value += by;
    }

    pub(crate) fn mark_realized(&mut self) {
        self.realized = true;
    }

    pub(crate) fn resolve(&mut self, outcome: Outcome) {
        debug_assert!(self.outcome.is_none());
        self.phase = RoundPhase::Resolved;
        self.outcome = Some(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stonks_types::ParticipantId;

    fn roles() -> RoleTriple {
        RoleTriple::new(
            ParticipantId::from("a"),
            ParticipantId::from("b"),
            ParticipantId::from("c"),
            Vec::new(),
        )
    }

    #[test]
    fn test_new_round_starts_in_prep_at_baseline() {
        let round = RoundState::new(1, roles(), 10.0);
        assert_eq!(round.phase(), RoundPhase::Prep);
        assert_eq!(round.rise_value(), 10.0);
        assert_eq!(round.crash_value(), 0.0);
        assert_eq!(round.outcome(), None);
        assert!(!round.realized());
        assert!(!round.has_crossed());
    }

    #[test]
    fn test_crossing_is_inclusive() {
        let mut round = RoundState::new(1, roles(), 10.0);
        round.go_live();
        round.push_crash(7.5);
        assert!(!round.has_crossed());
        round.push_crash(2.5);
        assert!(round.has_crossed());
    }

    #[test]
    fn test_resolve_sets_phase_and_outcome() {
        let mut round = RoundState::new(2, roles(), 10.0);
        round.go_live();
        round.resolve(Outcome::CashedOut);
        assert_eq!(round.phase(), RoundPhase::Resolved);
        assert_eq!(round.outcome(), Some(Outcome::CashedOut));
        assert!(!round.is_live());
    }
}
