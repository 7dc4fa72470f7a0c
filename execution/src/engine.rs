//! Capability interface hosts compose round engines through.
//!
//! A host keeps its own dispatch and registers engines in a [`ModeTable`] keyed by game mode.
//! Traffic for a mode with no registered engine comes back as [`Dispatch::Unhandled`] so the
//! host can fall through to whatever it already does.

use std::collections::BTreeMap;

use stonks_types::{
    ActionKind, ActionOutcome, Error, OutboundEvent, Participant, ParticipantId, RoleTriple,
    GAME_TITLE,
};

use crate::controller::RoundController;

pub trait RoundEngine {
    fn title(&self) -> &str;

    fn start_session(&mut self, roster: Vec<Participant>, now_ms: u64) -> Result<(), Error>;

    fn start_round(
        &mut self,
        participants: &[ParticipantId],
        round: u32,
        now_ms: u64,
    ) -> Result<RoleTriple, Error>;

    fn submit_action(
        &mut self,
        participant: &ParticipantId,
        action: ActionKind,
        now_ms: u64,
    ) -> ActionOutcome;

    /// Fire every timer due at or before `now_ms`.
    fn tick(&mut self, now_ms: u64);

    fn next_deadline_ms(&self) -> Option<u64>;

    fn drain_events(&mut self) -> Vec<OutboundEvent>;

    fn is_active(&self) -> bool;
}

impl RoundEngine for RoundController {
    fn title(&self) -> &str {
        GAME_TITLE
    }

    fn start_session(&mut self, roster: Vec<Participant>, now_ms: u64) -> Result<(), Error> {
        RoundController::start_session(self, roster, now_ms)
    }

    fn start_round(
        &mut self,
        participants: &[ParticipantId],
        round: u32,
        now_ms: u64,
    ) -> Result<RoleTriple, Error> {
        RoundController::start_round(self, participants, round, now_ms)
    }

    fn submit_action(
        &mut self,
        participant: &ParticipantId,
        action: ActionKind,
        now_ms: u64,
    ) -> ActionOutcome {
        RoundController::submit_action(self, participant, action, now_ms)
    }

    fn tick(&mut self, now_ms: u64) {
        self.advance(now_ms);
    }

    fn next_deadline_ms(&self) -> Option<u64> {
        RoundController::next_deadline_ms(self)
    }

    fn drain_events(&mut self) -> Vec<OutboundEvent> {
        RoundController::drain_events(self)
    }

    fn is_active(&self) -> bool {
        RoundController::is_active(self)
    }
}

/// Whether a registered engine took the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatch<T> {
    Handled(T),
    Unhandled,
}

impl<T> Dispatch<T> {
    pub fn handled(self) -> Option<T> {
        match self {
            Dispatch::Handled(value) => Some(value),
            Dispatch::Unhandled => None,
        }
    }
}

/// Round engines registered by game mode.
#[derive(Default)]
pub struct ModeTable {
    engines: BTreeMap<String, Box<dyn RoundEngine>>,
}

impl ModeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `engine` under `mode`, returning the engine it replaced.
    pub fn register(
        &mut self,
        mode: impl Into<String>,
        engine: Box<dyn RoundEngine>,
    ) -> Option<Box<dyn RoundEngine>> {
        self.engines.insert(mode.into(), engine)
    }

    pub fn contains(&self, mode: &str) -> bool {
        self.engines.contains_key(mode)
    }

    pub fn modes(&self) -> impl Iterator<Item = &str> {
        self.engines.keys().map(String::as_str)
    }

    pub fn get(&self, mode: &str) -> Option<&dyn RoundEngine> {
        self.engines.get(mode).map(|engine| engine.as_ref())
    }

    pub fn get_mut(&mut self, mode: &str) -> Option<&mut (dyn RoundEngine + 'static)> {
        self.engines.get_mut(mode).map(|engine| engine.as_mut())
    }

    pub fn start_session(
        &mut self,
        mode: &str,
        roster: Vec<Participant>,
        now_ms: u64,
    ) -> Dispatch<Result<(), Error>> {
        match self.get_mut(mode) {
            Some(engine) => Dispatch::Handled(engine.start_session(roster, now_ms)),
            None => Dispatch::Unhandled,
        }
    }

    pub fn submit_action(
        &mut self,
        mode: &str,
        participant: &ParticipantId,
        action: ActionKind,
        now_ms: u64,
    ) -> Dispatch<ActionOutcome> {
        match self.get_mut(mode) {
            Some(engine) => Dispatch::Handled(engine.submit_action(participant, action, now_ms)),
            None => Dispatch::Unhandled,
        }
    }

    /// Advance every registered engine.
    pub fn tick(&mut self, now_ms: u64) {
        for engine in self.engines.values_mut() {
            engine.tick(now_ms);
        }
    }

    /// Earliest deadline across all engines.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.engines
            .values()
            .filter_map(|engine| engine.next_deadline_ms())
            .min()
    }

    /// Pending events from every engine, tagged with the mode that produced them.
    pub fn drain_events(&mut self) -> Vec<(String, OutboundEvent)> {
        let mut events = Vec::new();
        for (mode, engine) in &mut self.engines {
            events.extend(engine.drain_events().into_iter().map(|event| (mode.clone(), event)));
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stonks_types::{StonksConfig, GAME_MODE};

    fn roster(count: usize) -> Vec<Participant> {
        (0..count)
            .map(|i| Participant::new(format!("p{i}"), format!("Player {i}")))
            .collect()
    }

    fn table() -> ModeTable {
        let mut table = ModeTable::new();
        let controller = RoundController::new(StonksConfig::default()).unwrap();
        assert!(table.register(GAME_MODE, Box::new(controller)).is_none());
        table
    }

    #[test]
    fn test_unregistered_mode_is_unhandled() {
        let mut table = table();
        assert_eq!(
            table.start_session("trivia", roster(3), 0),
            Dispatch::Unhandled
        );
        assert_eq!(
            table.submit_action("trivia", &"p0".into(), ActionKind::Raise, 0),
            Dispatch::Unhandled
        );
        assert!(!table.get(GAME_MODE).unwrap().is_active());
    }

    #[test]
    fn test_registered_mode_dispatches() {
        let mut table = table();
        assert_eq!(table.modes().collect::<Vec<_>>(), vec![GAME_MODE]);
        assert_eq!(table.get(GAME_MODE).unwrap().title(), GAME_TITLE);

        let started = table.start_session(GAME_MODE, roster(3), 0).handled();
        assert_eq!(started, Some(Ok(())));
        assert_eq!(table.next_deadline_ms(), Some(4_000));

        table.tick(4_000);
        let events = table.drain_events();
        let kinds: Vec<_> = events.iter().map(|(_, e)| e.kind()).collect();
        assert_eq!(kinds, vec!["session_started", "round_prep", "go"]);
        assert!(events.iter().all(|(mode, _)| mode == GAME_MODE));

        let outcome = table.submit_action(GAME_MODE, &"p0".into(), ActionKind::Raise, 4_010);
        assert_eq!(outcome, Dispatch::Handled(ActionOutcome::Applied));
    }

    #[test]
    fn test_start_round_through_trait() {
        let mut table = table();
        let engine = table.get_mut(GAME_MODE).unwrap();
        engine.start_session(roster(4), 0).unwrap();
        let ids: Vec<ParticipantId> = roster(4).into_iter().map(|p| p.id).collect();
        assert_eq!(
            engine.start_round(&ids, 2, 100),
            Err(Error::RoundInProgress { round: 1 })
        );

        engine.tick(4_000);
        engine.submit_action(&ids[1], ActionKind::Realize, 4_010);
        let roles = engine.start_round(&ids, 2, 4_020).unwrap();
        assert_eq!(roles.raiser(), &ids[1]);
        assert_eq!(roles.realizer(), &ids[2]);
        assert_eq!(roles.crasher(), &ids[3]);
        assert_eq!(engine.next_deadline_ms(), Some(8_020));
    }

    #[test]
    fn test_insufficient_participants_surfaces_to_host() {
        let mut table = table();
        let result = table.start_session(GAME_MODE, roster(2), 0).handled();
        assert_eq!(
            result,
            Some(Err(Error::InsufficientParticipants {
                count: 2,
                required: 3
            }))
        );
        assert!(!table.get(GAME_MODE).unwrap().is_active());
        assert_eq!(table.next_deadline_ms(), None);
        assert!(table.drain_events().is_empty());
    }
}
