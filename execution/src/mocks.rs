//! Roster and config builders for tests.

use stonks_types::{Participant, ParticipantId, StonksConfig};

/// `count` participants with ids `p0..` and names `Player 0..`, in seat order.
pub fn create_roster(count: usize) -> Vec<Participant> {
    (0..count)
        .map(|i| Participant::new(format!("p{i}"), format!("Player {i}")))
        .collect()
}

pub fn participant_ids(roster: &[Participant]) -> Vec<ParticipantId> {
    roster.iter().map(|p| p.id.clone()).collect()
}

/// Default tunables with short, distinct delays so timelines are easy to read in tests.
pub fn create_config(total_rounds: u32) -> StonksConfig {
    StonksConfig {
        total_rounds,
        tick_ms: 100,
        prep_ms: 1_000,
        resolution_display_ms: 2_000,
        results_display_ms: 3_000,
        game_over_ms: 5_000,
        ..StonksConfig::default()
    }
}
