//! Cumulative fund state and the revenue aggregator that folds cycles into it

use super::cashflows::CycleResult;
use crate::cycle::{Cycle, CycleKind};
use crate::error::CycleError;
use crate::Money;
use serde::{Deserialize, Serialize};

/// Running totals of a fund over its accepted cycles
///
/// Totals only ever grow; they always equal the sums over `results`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundState {
    /// Sum of committed capital
    pub cumulative_invested: Money,

    /// Sum of withdrawn capital
    pub cumulative_withdrawn: Money,

    pub cumulative_commission: Money,
    pub cumulative_carry: Money,

    results: Vec<CycleResult>,
}

/// Totals recomputed from scratch over a result sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub invested: Money,
    pub withdrawn: Money,
    pub commission: Money,
    pub carry: Money,
}

impl FundState {
    /// Empty state with no accepted cycles
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepted results in acceptance order
    pub fn results(&self) -> &[CycleResult] {
        &self.results
    }

    /// Accepted cycles in acceptance order
    pub fn accepted_cycles(&self) -> impl Iterator<Item = &Cycle> {
        self.results.iter().map(|r| &r.cycle)
    }

    pub fn last_cycle(&self) -> Option<&Cycle> {
        self.results.last().map(|r| &r.cycle)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Commission plus carry earned so far
    pub fn cumulative_revenue(&self) -> Money {
        self.cumulative_commission + self.cumulative_carry
    }

    /// Capital still deployed in the fund
    pub fn net_invested(&self) -> Money {
        self.cumulative_invested - self.cumulative_withdrawn
    }

    /// Earliest accepted month for an investor, if any
    pub fn first_month_for(&self, investor: &str) -> Option<u32> {
        self.accepted_cycles()
            .filter(|c| c.investor == investor)
            .map(|c| c.month)
            .min()
    }

    /// Capital an investor still has deployed: commitments less withdrawals
    pub fn net_invested_for(&self, investor: &str) -> Money {
        self.accepted_cycles()
            .filter(|c| c.investor == investor)
            .map(|c| match c.kind {
                CycleKind::Commitment => c.invested_amount,
                CycleKind::Withdrawal => -c.invested_amount,
            })
            .sum()
    }

    /// Committed intake already accepted for `month`
    pub fn intake_for_month(&self, month: u32) -> Money {
        self.accepted_cycles()
            .filter(|c| c.month == month && c.kind == CycleKind::Commitment)
            .map(|c| c.invested_amount)
            .sum()
    }

    /// Append a result, keeping totals in step
    ///
    /// Fails without modifying the state if the cycle does not come strictly
    /// after the last accepted index, or goes back in time.
    pub fn append_in_place(&mut self, result: CycleResult) -> Result<(), CycleError> {
        if let Some(last) = self.last_cycle() {
            if result.cycle.index <= last.index || result.cycle.month < last.month {
                return Err(CycleError::OutOfOrderCycle {
                    index: result.cycle.index,
                    month: result.cycle.month,
                    last_index: last.index,
                    last_month: last.month,
                });
            }
        }

        match result.cycle.kind {
            CycleKind::Commitment => self.cumulative_invested += result.cycle.invested_amount,
            CycleKind::Withdrawal => self.cumulative_withdrawn += result.cycle.invested_amount,
        }
        self.cumulative_commission += result.commission;
        self.cumulative_carry += result.carry;
        self.results.push(result);
        Ok(())
    }

    /// Recompute totals from the accepted results
    pub fn recompute_totals(&self) -> Totals {
        self.results.iter().fold(Totals::default(), |mut acc, r| {
            match r.cycle.kind {
                CycleKind::Commitment => acc.invested += r.cycle.invested_amount,
                CycleKind::Withdrawal => acc.withdrawn += r.cycle.invested_amount,
            }
            acc.commission += r.commission;
            acc.carry += r.carry;
            acc
        })
    }

    /// Whether the running totals equal the recomputed sums
    pub fn verify_totals(&self) -> bool {
        let totals = self.recompute_totals();
        totals.invested == self.cumulative_invested
            && totals.withdrawn == self.cumulative_withdrawn
            && totals.commission == self.cumulative_commission
            && totals.carry == self.cumulative_carry
    }
}

/// Fold one result into a state, returning the new state
///
/// The input state is left untouched, so a failed append has no effect.
pub fn append(result: CycleResult, state: &FundState) -> Result<FundState, CycleError> {
    let mut next = state.clone();
    next.append_in_place(result)?;
    Ok(next)
}

/// Reduce an ordered result sequence from the empty state
pub fn replay<'a, I>(results: I) -> Result<FundState, CycleError>
where
    I: IntoIterator<Item = &'a CycleResult>,
{
    let mut state = FundState::new();
    for result in results {
        state.append_in_place(result.clone())?;
    }
    Ok(state)
}

impl Totals {
    pub fn revenue(&self) -> Money {
        self.commission + self.carry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brackets::BracketTable;
    use crate::projection::compute_cycle;
    use rust_decimal_macros::dec;

    fn result(index: u32, month: u32, amount: Money) -> CycleResult {
        let cycle = Cycle::commitment(index, "alpha", month, amount, dec!(0.02));
        compute_cycle(&cycle, &BracketTable::default_pilot()).unwrap()
    }

    #[test]
    fn test_append_accumulates_totals() {
        let state = FundState::new();
        let state = append(result(0, 1, dec!(100000)), &state).unwrap();
        let state = append(result(1, 2, dec!(300000)), &state).unwrap();

        assert_eq!(state.len(), 2);
        assert_eq!(state.cumulative_invested, dec!(400000));
        assert_eq!(state.cumulative_commission, dec!(8000));
        assert_eq!(state.cumulative_carry, dec!(55000));
        assert_eq!(state.cumulative_revenue(), dec!(63000));
        assert!(state.verify_totals());
    }

    #[test]
    fn test_append_leaves_input_untouched() {
        let state = append(result(0, 1, dec!(100000)), &FundState::new()).unwrap();
        let next = append(result(1, 1, dec!(50000)), &state).unwrap();

        assert_eq!(state.len(), 1);
        assert_eq!(next.len(), 2);
    }

    #[test]
    fn test_rejects_index_not_after_last() {
        let state = append(result(3, 1, dec!(100000)), &FundState::new()).unwrap();

        let same = append(result(3, 2, dec!(1000)), &state);
        assert!(matches!(same, Err(CycleError::OutOfOrderCycle { index: 3, .. })));

        let earlier = append(result(2, 2, dec!(1000)), &state);
        assert!(matches!(earlier, Err(CycleError::OutOfOrderCycle { last_index: 3, .. })));

        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_rejects_month_going_backwards() {
        let state = append(result(0, 5, dec!(100000)), &FundState::new()).unwrap();
        let err = append(result(1, 4, dec!(1000)), &state).unwrap_err();
        assert!(matches!(err, CycleError::OutOfOrderCycle { month: 4, last_month: 5, .. }));
    }

    #[test]
    fn test_replay_is_deterministic() {
        let results: Vec<_> = (0..12)
            .map(|i| result(i, i + 1, Money::from(25_000 * (i + 1))))
            .collect();

        let first = replay(&results).unwrap();
        let second = replay(&results).unwrap();

        assert_eq!(first, second);
        assert!(first.verify_totals());
        assert_eq!(first.results(), results.as_slice());
    }

    #[test]
    fn test_totals_match_after_every_append() {
        let mut state = FundState::new();
        for i in 0..10u32 {
            state = append(result(i, i, Money::from(60_000 * i + 1)), &state).unwrap();
            assert!(state.verify_totals());
            let totals = state.recompute_totals();
            assert_eq!(totals.revenue(), state.cumulative_revenue());
        }
    }

    #[test]
    fn test_withdrawals_tracked_separately() {
        let table = BracketTable::default_pilot();
        let deposit = compute_cycle(
            &Cycle::commitment(0, "alpha", 1, dec!(100000), dec!(0.01)),
            &table,
        )
        .unwrap();
        let exit = compute_cycle(
            &Cycle::withdrawal(1, "alpha", 9, dec!(40000), dec!(0.01)),
            &table,
        )
        .unwrap();

        let state = replay([&deposit, &exit]).unwrap();
        assert_eq!(state.cumulative_invested, dec!(100000));
        assert_eq!(state.cumulative_withdrawn, dec!(40000));
        assert_eq!(state.net_invested(), dec!(60000));
        assert_eq!(state.first_month_for("alpha"), Some(1));
        assert_eq!(state.net_invested_for("alpha"), dec!(60000));
        assert_eq!(state.net_invested_for("beta"), dec!(0));
        assert_eq!(state.first_month_for("beta"), None);
        assert!(state.verify_totals());
    }

    #[test]
    fn test_intake_for_month() {
        let state = replay(&[
            result(0, 1, dec!(100000)),
            result(1, 1, dec!(50000)),
            result(2, 2, dec!(70000)),
        ])
        .unwrap();
        assert_eq!(state.intake_for_month(1), dec!(150000));
        assert_eq!(state.intake_for_month(2), dec!(70000));
        assert_eq!(state.intake_for_month(3), dec!(0));
    }
}
