//! Events published by the round engine.
//!
//! Hosts relay these to player devices and the shared screen. They serialize as JSON objects
//! tagged by `type` with camelCase fields.

use serde::{Deserialize, Serialize};

use crate::game::{Outcome, Participant, ParticipantId, Role};

/// One row of a ranked standings list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub participant_id: ParticipantId,
    pub name: String,
    pub score: u64,
}

impl From<&Participant> for LeaderboardEntry {
    fn from(participant: &Participant) -> Self {
        Self {
            participant_id: participant.id.clone(),
            name: participant.name.clone(),
            score: participant.score,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    pub participant_id: ParticipantId,
    pub role: Role,
}

/// Raiser's cut of a cashout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commission {
    pub participant_id: ParticipantId,
    pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum OutboundEvent {
    /// Scores were reset and round 1 is about to be announced.
    SessionStarted {
        title: String,
        total_rounds: u32,
        participants: Vec<LeaderboardEntry>,
    },
    /// Roles for the coming round. Input is not accepted yet.
    RoundPrep {
        round: u32,
        total_rounds: u32,
        roles: Vec<RoleAssignment>,
        raiser_name: String,
        realizer_name: String,
        crasher_name: String,
    },
    /// The round is live.
    Go { round: u32 },
    /// Current pair of lines, once per tick while live.
    Tick {
        round: u32,
        rise_value: f64,
        crash_value: f64,
    },
    /// The round ended. `amount` is the crash bonus or the cashout profit paid to
    /// `participant_id`.
    Resolution {
        round: u32,
        outcome: Outcome,
        participant_id: ParticipantId,
        amount: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        commission: Option<Commission>,
        leaderboard: Vec<LeaderboardEntry>,
    },
    RoundResults {
        round: u32,
        leaderboard: Vec<LeaderboardEntry>,
    },
    GameOver { leaderboard: Vec<LeaderboardEntry> },
    /// Participants should return to the lobby; the session is gone.
    Reset,
}

impl OutboundEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundEvent::SessionStarted { .. } => "session_started",
            OutboundEvent::RoundPrep { .. } => "round_prep",
            OutboundEvent::Go { .. } => "go",
            OutboundEvent::Tick { .. } => "tick",
            OutboundEvent::Resolution { .. } => "resolution",
            OutboundEvent::RoundResults { .. } => "round_results",
            OutboundEvent::GameOver { .. } => "game_over",
            OutboundEvent::Reset => "reset",
        }
    }
}
