use serde::{Deserialize, Serialize};

use super::{ActionKind, ParticipantId};

/// Role a participant holds for one round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Drives the rising line.
    Raiser,
    /// Drives the crash line.
    Crasher,
    /// May end the round early and lock in the rising line as profit.
    Realizer,
    Spectator,
}

impl Role {
    /// Roles that act during a round, in rotation order.
    pub const ACTIVE: [Role; 3] = [Role::Raiser, Role::Realizer, Role::Crasher];

    /// The single action this role may submit.
    pub const fn permitted_action(self) -> Option<ActionKind> {
        match self {
            Role::Raiser => Some(ActionKind::Raise),
            Role::Crasher => Some(ActionKind::Crash),
            Role::Realizer => Some(ActionKind::Realize),
            Role::Spectator => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Raiser => "RAISER",
            Role::Crasher => "CRASHER",
            Role::Realizer => "REALIZER",
            Role::Spectator => "SPECTATOR",
        }
    }
}

/// Role assignment for one round.
///
/// Built by the role assigner, which guarantees the three active holders are distinct and
/// that every other participant is a spectator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleTriple {
    raiser: ParticipantId,
    realizer: ParticipantId,
    crasher: ParticipantId,
    spectators: Vec<ParticipantId>,
}

impl RoleTriple {
    pub fn new(
        raiser: ParticipantId,
        realizer: ParticipantId,
        crasher: ParticipantId,
        spectators: Vec<ParticipantId>,
    ) -> Self {
        Self {
            raiser,
            realizer,
            crasher,
            spectators,
        }
    }

    pub fn raiser(&self) -> &ParticipantId {
        &self.raiser
    }

    pub fn realizer(&self) -> &ParticipantId {
        &self.realizer
    }

    pub fn crasher(&self) -> &ParticipantId {
        &self.crasher
    }

    pub fn spectators(&self) -> &[ParticipantId] {
        &self.spectators
    }

    /// Holder of an active role. Spectator is not a single seat, so it yields `None`.
    pub fn holder(&self, role: Role) -> Option<&ParticipantId> {
        match role {
            Role::Raiser => Some(&self.raiser),
            Role::Realizer => Some(&self.realizer),
            Role::Crasher => Some(&self.crasher),
            Role::Spectator => None,
        }
    }

    /// Role of `participant`, or `None` if they are not part of this round.
    pub fn role_of(&self, participant: &ParticipantId) -> Option<Role> {
        if *participant == self.raiser {
            Some(Role::Raiser)
        } else if *participant == self.realizer {
            Some(Role::Realizer)
        } else if *participant == self.crasher {
            Some(Role::Crasher)
        } else if self.spectators.contains(participant) {
            Some(Role::Spectator)
        } else {
            None
        }
    }

    /// Every participant paired with their role, active seats first.
    pub fn assignments(&self) -> impl Iterator<Item = (&ParticipantId, Role)> + '_ {
        Role::ACTIVE
            .into_iter()
            .filter_map(|role| self.holder(role).map(|id| (id, role)))
            .chain(self.spectators.iter().map(|id| (id, Role::Spectator)))
    }

    /// Number of participants covered by this assignment.
    pub fn participant_count(&self) -> usize {
        Role::ACTIVE.len() + self.spectators.len()
    }
}

/// Lifecycle phase of a single round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundPhase {
    Prep,
    Live,
    Resolved,
}

impl RoundPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::Prep => "prep",
            RoundPhase::Live => "live",
            RoundPhase::Resolved => "resolved",
        }
    }
}

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Crashed,
    CashedOut,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Crashed => "CRASHED",
            Outcome::CashedOut => "CASHED_OUT",
        }
    }
}
