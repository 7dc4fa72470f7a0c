//! Round resolution and scoring.
//!
//! Exactly one of two outcomes ends a round:
//! - **Crash**: the crasher earns the configured bonus. Nobody else scores.
//! - **Cashout**: the realizer earns `floor(rise_value)` as profit and the raiser earns
//!   `floor(profit * 10%)` as commission. The crasher scores nothing.
//!
//! Profit is floored before the commission is taken, so the commission is always the floor of
//! a whole number's tenth.

use stonks_types::{Commission, Outcome, ParticipantId, RoleTriple, COMMISSION_PERCENT};

/// Score deltas produced by one resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub outcome: Outcome,
    /// Crasher on a crash, realizer on a cashout.
    pub beneficiary: ParticipantId,
    pub amount: u64,
    pub commission: Option<Commission>,
}

impl Settlement {
    /// Every `(participant, delta)` pair to credit.
    pub fn credits(&self) -> impl Iterator<Item = (&ParticipantId, u64)> + '_ {
        std::iter::once((&self.beneficiary, self.amount)).chain(
            self.commission
                .iter()
                .map(|commission| (&commission.participant_id, commission.amount)),
        )
    }
}

/// Whole-unit profit locked in by a cashout at `rise_value`.
pub fn profit(rise_value: f64) -> u64 {
    // Float-to-int casts saturate; the rising line never goes below its positive baseline.
    rise_value.floor() as u64
}

pub fn commission(profit: u64) -> u64 {
    (u128::from(profit) * u128::from(COMMISSION_PERCENT) / 100) as u64
}

pub fn settle_crash(roles: &RoleTriple, crash_bonus: u64) -> Settlement {
    Settlement {
        outcome: Outcome::Crashed,
        beneficiary: roles.crasher().clone(),
        amount: crash_bonus,
        commission: None,
    }
}

pub fn settle_cashout(roles: &RoleTriple, rise_value: f64) -> Settlement {
    let profit = profit(rise_value);
    Settlement {
        outcome: Outcome::CashedOut,
        beneficiary: roles.realizer().clone(),
        amount: profit,
        commission: Some(Commission {
            participant_id: roles.raiser().clone(),
            amount: commission(profit),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles() -> RoleTriple {
        RoleTriple::new(
            ParticipantId::from("raiser"),
            ParticipantId::from("realizer"),
            ParticipantId::from("crasher"),
            Vec::new(),
        )
    }

    #[test]
    fn test_crash_pays_crasher_only() {
        let settlement = settle_crash(&roles(), 500);
        assert_eq!(settlement.outcome, Outcome::Crashed);
        assert_eq!(settlement.beneficiary, ParticipantId::from("crasher"));
        assert_eq!(settlement.amount, 500);
        assert_eq!(settlement.commission, None);
        assert_eq!(settlement.credits().count(), 1);
    }

    #[test]
    fn test_cashout_pays_realizer_and_raiser() {
        let settlement = settle_cashout(&roles(), 23.0);
        assert_eq!(settlement.outcome, Outcome::CashedOut);
        assert_eq!(settlement.beneficiary, ParticipantId::from("realizer"));
        assert_eq!(settlement.amount, 23);
        assert_eq!(
            settlement.commission,
            Some(Commission {
                participant_id: ParticipantId::from("raiser"),
                amount: 2,
            })
        );
        let credits: Vec<_> = settlement
            .credits()
            .map(|(id, amount)| (id.as_str().to_string(), amount))
            .collect();
        assert_eq!(
            credits,
            vec![("realizer".to_string(), 23), ("raiser".to_string(), 2)]
        );
    }

    #[test]
    fn test_profit_floors_fractional_values() {
        assert_eq!(profit(10.0), 10);
        assert_eq!(profit(12.5), 12);
        assert_eq!(profit(29.999), 29);
    }

    #[test]
    fn test_commission_floors_after_profit() {
        assert_eq!(commission(profit(19.9)), 1);
        assert_eq!(commission(9), 0);
        assert_eq!(commission(10), 1);
        assert_eq!(commission(70), 7);
        assert_eq!(commission(u64::MAX), u64::MAX / 10);
    }
}
