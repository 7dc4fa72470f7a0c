use serde::{Deserialize, Serialize};
use stonks_types::{ActionKind, Error, OutboundEvent, ParticipantId};

#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum InboundMessage {
    Join {
        player_id: ParticipantId,
        name: String,
    },
    Leave {
        player_id: ParticipantId,
    },
    Start {
        mode: String,
    },
    Action {
        player_id: ParticipantId,
        action: ActionKind,
    },
}

/// Host replies that are not engine events.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostResponse {
    Error { code: String, message: String },
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum OutboundLine {
    Event(OutboundEvent),
    Response(HostResponse),
}

pub fn error_response(code: &str, message: impl Into<String>) -> OutboundLine {
    OutboundLine::Response(HostResponse::Error {
        code: code.to_string(),
        message: message.into(),
    })
}

pub fn engine_error_response(err: &Error) -> OutboundLine {
    let code = match err {
        Error::InsufficientParticipants { .. } => "INSUFFICIENT_PARTICIPANTS",
        Error::DuplicateParticipant(_) => "DUPLICATE_PARTICIPANT",
        Error::UnknownParticipant(_) => "UNKNOWN_PARTICIPANT",
        Error::InvalidRound { .. } => "INVALID_ROUND",
        Error::RoundInProgress { .. } => "ROUND_IN_PROGRESS",
        Error::RoundOutOfOrder { .. } => "ROUND_OUT_OF_ORDER",
        Error::NoSession => "NO_SESSION",
        Error::SessionInProgress => "SESSION_IN_PROGRESS",
        Error::SessionFinished => "SESSION_FINISHED",
        Error::InvalidConfig(_) => "INVALID_CONFIG",
    };
    error_response(code, err.to_string())
}
