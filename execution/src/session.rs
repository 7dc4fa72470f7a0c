//! Cross-round aggregate for one play session.

use std::collections::BTreeSet;

use stonks_types::{Error, LeaderboardEntry, Outcome, Participant, ParticipantId, MIN_PARTICIPANTS};
use tracing::warn;

use crate::round::RoundState;
use crate::settle::Settlement;

#[derive(Clone, Debug)]
pub struct GameSession {
    total_rounds: u32,
    roster: Vec<Participant>,
    round: Option<RoundState>,
    outcomes: Vec<Outcome>,
    finished: bool,
}

impl GameSession {
    /// Open a session over `roster` (in seat order). Scores start from zero.
    pub fn new(mut roster: Vec<Participant>, total_rounds: u32) -> Result<Self, Error> {
        if roster.len() < MIN_PARTICIPANTS {
            return Err(Error::InsufficientParticipants {
                count: roster.len(),
                required: MIN_PARTICIPANTS,
            });
        }
        let mut seen = BTreeSet::new();
        for participant in &roster {
            if !seen.insert(&participant.id) {
                return Err(Error::DuplicateParticipant(participant.id.clone()));
            }
        }
        for participant in &mut roster {
            participant.score = 0;
        }
        Ok(Self {
            total_rounds,
            roster,
            round: None,
            outcomes: Vec::new(),
            finished: false,
        })
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn roster(&self) -> &[Participant] {
        &self.roster
    }

    pub fn participant_ids(&self) -> Vec<ParticipantId> {
        self.roster.iter().map(|p| p.id.clone()).collect()
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.roster.iter().find(|p| p.id == *id)
    }

    pub fn name_of(&self, id: &ParticipantId) -> &str {
        self.participant(id).map(|p| p.name.as_str()).unwrap_or_default()
    }

    pub fn score_of(&self, id: &ParticipantId) -> Option<u64> {
        self.participant(id).map(|p| p.score)
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub(crate) fn round_mut(&mut self) -> Option<&mut RoundState> {
        self.round.as_mut()
    }

    pub(crate) fn set_round(&mut self, round: RoundState) {
        self.round = Some(round);
    }

    /// Outcome of every resolved round so far, in order.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn finish(&mut self) {
        self.finished = true;
    }

    /// Credit every score delta in `settlement`.
    pub(crate) fn apply(&mut self, settlement: &Settlement) {
        for (id, amount) in settlement.credits() {
            match self.roster.iter_mut().find(|p| p.id == *id) {
                Some(participant) => participant.credit(amount),
                None => warn!(participant = %id, amount, "settlement for participant not in roster"),
            }
        }
        self.outcomes.push(settlement.outcome);
    }

    /// Standings by score, highest first. Ties keep seat order.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut ranked: Vec<&Participant> = self.roster.iter().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.into_iter().map(LeaderboardEntry::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settle::{settle_cashout, settle_crash};
    use stonks_types::RoleTriple;

    fn roster(count: usize) -> Vec<Participant> {
        (0..count)
            .map(|i| Participant::new(format!("p{i}"), format!("Player {i}")))
            .collect()
    }

    fn roles() -> RoleTriple {
        RoleTriple::new("p0".into(), "p1".into(), "p2".into(), vec!["p3".into()])
    }

    #[test]
    fn test_rejects_small_roster() {
        let err = GameSession::new(roster(2), 9).unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientParticipants {
                count: 2,
                required: 3
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_roster_entries() {
        let mut players = roster(3);
        players.push(Participant::new("p1", "Impostor"));
        assert_eq!(
            GameSession::new(players, 9).unwrap_err(),
            Error::DuplicateParticipant("p1".into())
        );
    }

    #[test]
    fn test_scores_reset_on_open() {
        let mut players = roster(3);
        players[1].score = 900;
        let session = GameSession::new(players, 9).unwrap();
        assert!(session.roster().iter().all(|p| p.score == 0));
        assert!(session.round().is_none());
    }

    #[test]
    fn test_apply_credits_and_records_outcome() {
        let mut session = GameSession::new(roster(4), 9).unwrap();
        session.apply(&settle_cashout(&roles(), 23.0));
        session.apply(&settle_crash(&roles(), 500));

        assert_eq!(session.score_of(&"p0".into()), Some(2));
        assert_eq!(session.score_of(&"p1".into()), Some(23));
        assert_eq!(session.score_of(&"p2".into()), Some(500));
        assert_eq!(session.score_of(&"p3".into()), Some(0));
        assert_eq!(session.outcomes(), &[Outcome::CashedOut, Outcome::Crashed]);
    }

    #[test]
    fn test_leaderboard_is_stable_for_ties() {
        let mut session = GameSession::new(roster(4), 9).unwrap();
        session.apply(&settle_cashout(&roles(), 20.0));

        let order: Vec<_> = session
            .leaderboard()
            .into_iter()
            .map(|entry| (entry.participant_id.as_str().to_string(), entry.score))
            .collect();
        assert_eq!(
            order,
            vec![
                ("p1".to_string(), 20),
                ("p0".to_string(), 2),
                ("p2".to_string(), 0),
                ("p3".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_name_lookup() {
        let session = GameSession::new(roster(3), 9).unwrap();
        assert_eq!(session.name_of(&"p2".into()), "Player 2");
        assert_eq!(session.name_of(&"nobody".into()), "");
    }
}
