//! Round lifecycle controller.
//!
//! Drives a session through `PREP -> LIVE -> RESOLVED -> (next PREP | GAME_OVER)` and owns
//! every timer that moves it along. All mutation happens on the caller's thread: the host
//! feeds in the current time (`advance`) and player input (`submit_action`), then drains the
//! published events.
//!
//! ## Single resolution per round
//! A round resolves either when a tick observes the crash line at or above the rising line, or
//! when the realizer cashes out. Both paths stop the tick interval before settling, and a
//! resolved round rejects further input, so a stale crash check can never run against a round
//! that already cashed out.

use stonks_types::{
    ActionKind, ActionOutcome, DiscardReason, Error, OutboundEvent, Outcome, Participant,
    ParticipantId, RoleAssignment, RoleTriple, RoundPhase, StonksConfig, GAME_TITLE,
};
use tracing::{debug, info, warn};

use crate::input::{self, Effect};
use crate::roles::assign_roles;
use crate::round::RoundState;
use crate::round_scheduler::{Due, PhaseConfig, RoundScheduler, Transition};
use crate::session::GameSession;
use crate::settle::{settle_cashout, settle_crash};
use crate::tick::{self, TickVerdict};

pub struct RoundController {
    config: StonksConfig,
    scheduler: RoundScheduler,
    session: Option<GameSession>,
    outbox: Vec<OutboundEvent>,
}

impl RoundController {
    pub fn new(config: StonksConfig) -> Result<Self, Error> {
        config.validate()?;
        let scheduler = RoundScheduler::new(PhaseConfig::from(&config), config.tick_ms);
        Ok(Self {
            config,
            scheduler,
            session: None,
            outbox: Vec::new(),
        })
    }

    pub fn config(&self) -> &StonksConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.session.as_ref().and_then(GameSession::round)
    }

    pub fn phase(&self) -> Option<RoundPhase> {
        self.round().map(RoundState::phase)
    }

    /// A session exists (including while final standings are displayed).
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_game_over(&self) -> bool {
        self.session.as_ref().is_some_and(GameSession::is_finished)
    }

    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.scheduler.next_deadline_ms()
    }

    pub fn drain_events(&mut self) -> Vec<OutboundEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Open a session over `roster` and announce round 1.
    ///
    /// Fails without creating any round state if the roster cannot form a role triple.
    pub fn start_session(&mut self, roster: Vec<Participant>, now_ms: u64) -> Result<(), Error> {
        if self.session.is_some() {
            return Err(Error::SessionInProgress);
        }
        let session = GameSession::new(roster, self.config.total_rounds)?;
        info!(
            participants = session.roster().len(),
            total_rounds = session.total_rounds(),
            "session started"
        );
        self.outbox.push(OutboundEvent::SessionStarted {
            title: GAME_TITLE.to_string(),
            total_rounds: session.total_rounds(),
            participants: session.leaderboard(),
        });
        let participants = session.participant_ids();
        self.session = Some(session);
        self.start_round(&participants, 1, now_ms).map(|_| ())
    }

    /// Enter PREP for `round` with `participants` in seat order.
    ///
    /// Cancels anything still scheduled from the previous phase, resets both lines and
    /// announces the new roles. The round goes live after the prep delay.
    ///
    /// Once a session has a round, the next one may only start after it resolved and must be
    /// numbered one higher. A finished session accepts no further rounds.
    pub fn start_round(
        &mut self,
        participants: &[ParticipantId],
        round: u32,
        now_ms: u64,
    ) -> Result<RoleTriple, Error> {
        let session = self.session.as_mut().ok_or(Error::NoSession)?;
        if round == 0 || round > session.total_rounds() {
            return Err(Error::InvalidRound {
                round,
                total: session.total_rounds(),
            });
        }
        if let Some(unknown) = participants.iter().find(|id| session.participant(id).is_none()) {
            return Err(Error::UnknownParticipant(unknown.clone()));
        }
        if session.is_finished() {
            return Err(Error::SessionFinished);
        }
        if let Some(current) = session.round() {
            if current.phase() != RoundPhase::Resolved {
                return Err(Error::RoundInProgress {
                    round: current.round(),
                });
            }
            let expected = current.round().saturating_add(1);
            if round != expected {
                return Err(Error::RoundOutOfOrder { round, expected });
            }
        }
        let roles = assign_roles(participants, round)?;

        self.scheduler.cancel_all();
        session.set_round(RoundState::new(
            round,
            roles.clone(),
            self.config.baseline_value,
        ));
        self.outbox.push(OutboundEvent::RoundPrep {
            round,
            total_rounds: session.total_rounds(),
            roles: roles
                .assignments()
                .map(|(id, role)| RoleAssignment {
                    participant_id: id.clone(),
                    role,
                })
                .collect(),
            raiser_name: session.name_of(roles.raiser()).to_string(),
            realizer_name: session.name_of(roles.realizer()).to_string(),
            crasher_name: session.name_of(roles.crasher()).to_string(),
        });
        let live_at = self.scheduler.schedule(Transition::GoLive, now_ms);
        info!(
            round,
            raiser = %roles.raiser(),
            realizer = %roles.realizer(),
            crasher = %roles.crasher(),
            live_at,
            "round prep"
        );
        Ok(roles)
    }

    /// Fire every timer due at or before `now_ms`, in deadline order.
    pub fn advance(&mut self, now_ms: u64) {
        while let Some(due) = self.scheduler.next_due(now_ms) {
            match due {
                Due::Tick(at) => self.on_tick(at),
                Due::Transition(transition, at) => self.on_transition(transition, at),
            }
        }
    }

    /// Route one player action.
    ///
    /// Timers due at or before `now_ms` fire first, so a tick scheduled before this input
    /// arrived evaluates the lines as they were.
    pub fn submit_action(
        &mut self,
        participant: &ParticipantId,
        action: ActionKind,
        now_ms: u64,
    ) -> ActionOutcome {
        self.advance(now_ms);

        let Some(round) = self.session.as_mut().and_then(GameSession::round_mut) else {
            debug!(participant = %participant, action = action.as_str(), "no round; input discarded");
            return ActionOutcome::Discarded(DiscardReason::NotLive);
        };
        match input::route(round, &self.config, participant, action) {
            Ok(Effect::Realized { rise_value }) => {
                debug!(participant = %participant, rise_value, "cashout accepted");
                self.resolve(Outcome::CashedOut, now_ms);
                ActionOutcome::Applied
            }
            Ok(effect) => {
                debug!(participant = %participant, ?effect, "input applied");
                ActionOutcome::Applied
            }
            Err(reason) => {
                debug!(
                    participant = %participant,
                    action = action.as_str(),
                    reason = reason.as_str(),
                    "input discarded"
                );
                ActionOutcome::Discarded(reason)
            }
        }
    }

    fn on_tick(&mut self, at: u64) {
        let Some(round) = self.round() else {
            warn!(at, "tick without a round");
            self.scheduler.stop_ticks();
            return;
        };
        debug_assert!(round.is_live());
        match tick::evaluate(round) {
            TickVerdict::Crash => self.resolve(Outcome::Crashed, at),
            TickVerdict::Publish {
                rise_value,
                crash_value,
            } => {
                let round = round.round();
                self.outbox.push(OutboundEvent::Tick {
                    round,
                    rise_value,
                    crash_value,
                });
            }
        }
    }

    fn on_transition(&mut self, transition: Transition, at: u64) {
        match transition {
            Transition::GoLive => self.go_live(at),
            Transition::PublishResults => self.publish_results(at),
            Transition::AdvanceRound => self.advance_round(at),
            Transition::Reset => self.reset(),
        }
    }

    fn go_live(&mut self, at: u64) {
        let Some(round) = self.session.as_mut().and_then(GameSession::round_mut) else {
            return;
        };
        round.go_live();
        let round = round.round();
        self.scheduler.start_ticks(at);
        self.outbox.push(OutboundEvent::Go { round });
        info!(round, at, "round live");
    }

    /// Settle the live round. Only called from a tick (crash) or an accepted cashout.
    fn resolve(&mut self, outcome: Outcome, at: u64) {
        self.scheduler.stop_ticks();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(round) = session.round_mut() else {
            return;
        };
        let settlement = match outcome {
            Outcome::Crashed => settle_crash(round.roles(), self.config.crash_bonus),
            Outcome::CashedOut => settle_cashout(round.roles(), round.rise_value()),
        };
        round.resolve(outcome);
        let round_index = round.round();
        let (rise_value, crash_value) = (round.rise_value(), round.crash_value());
        session.apply(&settlement);

        info!(
            round = round_index,
            outcome = outcome.as_str(),
            participant = %settlement.beneficiary,
            amount = settlement.amount,
            rise_value,
            crash_value,
            "round resolved"
        );
        self.outbox.push(OutboundEvent::Resolution {
            round: round_index,
            outcome,
            participant_id: settlement.beneficiary,
            amount: settlement.amount,
            commission: settlement.commission,
            leaderboard: session.leaderboard(),
        });
        self.scheduler.schedule(Transition::PublishResults, at);
    }

    fn publish_results(&mut self, at: u64) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let round = session.round().map(RoundState::round).unwrap_or_default();
        self.outbox.push(OutboundEvent::RoundResults {
            round,
            leaderboard: session.leaderboard(),
        });
        self.scheduler.schedule(Transition::AdvanceRound, at);
    }

    fn advance_round(&mut self, at: u64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let played = session.round().map(RoundState::round).unwrap_or_default();
        if played < session.total_rounds() {
            let participants = session.participant_ids();
            if let Err(err) = self.start_round(&participants, played + 1, at) {
                warn!(?err, round = played + 1, "failed to start next round");
            }
            return;
        }

        session.finish();
        let leaderboard = session.leaderboard();
        let crashes = session
            .outcomes()
            .iter()
            .filter(|outcome| **outcome == Outcome::Crashed)
            .count();
        info!(
            rounds = played,
            crashes,
            cashouts = session.outcomes().len() - crashes,
            winner = leaderboard.first().map(|entry| entry.name.as_str()).unwrap_or_default(),
            "game over"
        );
        self.outbox.push(OutboundEvent::GameOver { leaderboard });
        self.scheduler.schedule(Transition::Reset, at);
    }

    fn reset(&mut self) {
        self.scheduler.cancel_all();
        self.session = None;
        self.outbox.push(OutboundEvent::Reset);
        info!("session ended");
    }
}
