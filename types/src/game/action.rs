use serde::{Deserialize, Serialize};

use super::Role;

/// Input a participant can submit while a round is live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    Raise,
    Crash,
    Realize,
}

impl ActionKind {
    /// The only role allowed to submit this action.
    pub const fn required_role(self) -> Role {
        match self {
            ActionKind::Raise => Role::Raiser,
            ActionKind::Crash => Role::Crasher,
            ActionKind::Realize => Role::Realizer,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Raise => "RAISE",
            ActionKind::Crash => "CRASH",
            ActionKind::Realize => "REALIZE",
        }
    }
}

/// Why an action was dropped. Never reported back to the sender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscardReason {
    /// No round is live (no session, still in prep, or already resolved).
    NotLive,
    /// The sender's role for this round does not permit the action.
    RoleMismatch,
    /// The realizer already cashed out this round.
    AlreadyRealized,
    /// The sender is not part of the current round.
    UnknownParticipant,
}

impl DiscardReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscardReason::NotLive => "not_live",
            DiscardReason::RoleMismatch => "role_mismatch",
            DiscardReason::AlreadyRealized => "already_realized",
            DiscardReason::UnknownParticipant => "unknown_participant",
        }
    }
}

/// Result of submitting an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    Discarded(DiscardReason),
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }
}
