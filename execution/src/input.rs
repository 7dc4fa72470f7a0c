//! Input routing.
//!
//! An action is applied only while the round is live and only when the sender's role permits
//! it. Everything else is expected traffic (late taps, wrong buttons, repeated sells) and is
//! dropped with a [`DiscardReason`] the host may log but never returns to the sender.

use stonks_types::{ActionKind, DiscardReason, ParticipantId, StonksConfig};

use crate::round::RoundState;

/// What an accepted action did to the round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    Raised { rise_value: f64 },
    Pushed { crash_value: f64 },
    /// The realizer cashed out; the caller must resolve the round now.
    Realized { rise_value: f64 },
}

/// Validate and apply `action` from `participant` against the live round.
pub fn route(
    round: &mut RoundState,
    config: &StonksConfig,
    participant: &ParticipantId,
    action: ActionKind,
) -> Result<Effect, DiscardReason> {
    let role = round
        .roles()
        .role_of(participant)
        .ok_or(DiscardReason::UnknownParticipant)?;
    if role.permitted_action() != Some(action) {
        return Err(DiscardReason::RoleMismatch);
    }
    if action == ActionKind::Realize && round.realized() {
        return Err(DiscardReason::AlreadyRealized);
    }
    if !round.is_live() {
        return Err(DiscardReason::NotLive);
    }

    let effect = match action {
        ActionKind::Raise => {
            round.raise(config.pump_increment);
            Effect::Raised {
                rise_value: round.rise_value(),
            }
        }
        ActionKind::Crash => {
            round.push_crash(config.crash_increment);
            Effect::Pushed {
                crash_value: round.crash_value(),
            }
        }
        ActionKind::Realize => {
            round.mark_realized();
            Effect::Realized {
                rise_value: round.rise_value(),
            }
        }
    };
    Ok(effect)
}
