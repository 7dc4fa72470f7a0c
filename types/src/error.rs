use thiserror::Error as ThisError;

use crate::game::ParticipantId;

/// Failures surfaced to the host action that caused them.
///
/// Player input never produces one of these: mismatched or stale actions are discarded
/// (see [`crate::DiscardReason`]).
#[derive(Clone, Debug, ThisError, PartialEq, Eq)]
pub enum Error {
    #[error("insufficient participants (count={count}, required={required})")]
    InsufficientParticipants { count: usize, required: usize },
    #[error("duplicate participant: {0}")]
    DuplicateParticipant(ParticipantId),
    #[error("unknown participant: {0}")]
    UnknownParticipant(ParticipantId),
    #[error("round out of range (round={round}, total={total})")]
    InvalidRound { round: u32, total: u32 },
    #[error("round still in progress (round={round})")]
    RoundInProgress { round: u32 },
    #[error("round out of order (round={round}, expected={expected})")]
    RoundOutOfOrder { round: u32, expected: u32 },
    #[error("no session in progress")]
    NoSession,
    #[error("session already in progress")]
    SessionInProgress,
    #[error("session already finished")]
    SessionFinished,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}
