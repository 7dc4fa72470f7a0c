//! Role rotation.
//!
//! Participants form a fixed ring in roster order. For round `r` (1-based) over `n` seats the
//! raiser sits at `(r - 1) mod n`, the realizer at `r mod n` and the crasher at `(r + 1) mod n`.
//! The three offsets are pairwise distinct whenever `n >= 3`, and over any `n` consecutive rounds
//! every seat holds each active role exactly once.

use std::collections::BTreeSet;

use stonks_types::{Error, ParticipantId, RoleTriple, MIN_PARTICIPANTS};

/// Ring offsets `(raiser, realizer, crasher)` for `round` over `count` seats.
///
/// `count` must be non-zero.
pub fn seat_offsets(round: u32, count: usize) -> (usize, usize, usize) {
    let base = (round as usize % count + count - 1) % count;
    (base, (base + 1) % count, (base + 2) % count)
}

/// Assign the role triple for `round`.
pub fn assign_roles(participants: &[ParticipantId], round: u32) -> Result<RoleTriple, Error> {
    let count = participants.len();
    if count < MIN_PARTICIPANTS {
        return Err(Error::InsufficientParticipants {
            count,
            required: MIN_PARTICIPANTS,
        });
    }
    if round == 0 {
        return Err(Error::InvalidRound { round, total: 0 });
    }
    let mut seen = BTreeSet::new();
    for participant in participants {
        if !seen.insert(participant) {
            return Err(Error::DuplicateParticipant(participant.clone()));
        }
    }

    let (raiser, realizer, crasher) = seat_offsets(round, count);
    let spectators = participants
        .iter()
        .enumerate()
        .filter(|(seat, _)| ![raiser, realizer, crasher].contains(seat))
        .map(|(_, id)| id.clone())
        .collect();

    Ok(RoleTriple::new(
        participants[raiser].clone(),
        participants[realizer].clone(),
        participants[crasher].clone(),
        spectators,
    ))
}
