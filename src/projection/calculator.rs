//! Per-cycle commission and carry calculation

use super::cashflows::CycleResult;
use crate::brackets::BracketTable;
use crate::cycle::Cycle;
use crate::error::CycleError;
use crate::Money;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Decimal places of the smallest currency unit
pub const CURRENCY_DECIMALS: u32 = 2;

/// Round a money amount to cents, half to even
pub fn round_money(amount: Decimal) -> Money {
    amount.round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::MidpointNearestEven)
}

/// Compute commission and carry for one cycle
///
/// Commission and carry are computed independently from the invested amount;
/// each product is rounded once.
pub fn compute_cycle(cycle: &Cycle, table: &BracketTable) -> Result<CycleResult, CycleError> {
    if cycle.invested_amount < Decimal::ZERO {
        return Err(CycleError::InvalidCycle {
            index: cycle.index,
            reason: format!("invested amount {} is negative", cycle.invested_amount),
        });
    }
    if cycle.commission_rate < Decimal::ZERO || cycle.commission_rate > dec!(1) {
        return Err(CycleError::InvalidCycle {
            index: cycle.index,
            reason: format!("commission rate {} is outside [0, 1]", cycle.commission_rate),
        });
    }

    let carry_rate = table.rate_for(cycle.invested_amount)?;
    let commission = round_money(cycle.invested_amount * cycle.commission_rate);
    let carry = round_money(cycle.invested_amount * carry_rate);

    Ok(CycleResult {
        cycle: cycle.clone(),
        carry_rate,
        commission,
        carry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brackets::Bracket;

    fn cycle(amount: Money, rate: Decimal) -> Cycle {
        Cycle::commitment(0, "alpha", 1, amount, rate)
    }

    #[test]
    fn test_growth_bracket_example() {
        let table = BracketTable::default_pilot();
        let result = compute_cycle(&cycle(dec!(300000), dec!(0.02)), &table).unwrap();

        assert_eq!(result.commission, dec!(6000));
        assert_eq!(result.carry, dec!(45000));
        assert_eq!(result.carry_rate, dec!(0.15));
        assert_eq!(result.total(), dec!(51000));
    }

    #[test]
    fn test_rounds_half_to_even_once() {
        assert_eq!(round_money(dec!(10.005)), dec!(10.00));
        assert_eq!(round_money(dec!(10.015)), dec!(10.02));
        assert_eq!(round_money(dec!(10.0051)), dec!(10.01));

        // 100.25 * 0.10 = 10.025 rounds down to the even cent
        let table = BracketTable::default_pilot();
        let result = compute_cycle(&cycle(dec!(100.25), dec!(0.3)), &table).unwrap();
        assert_eq!(result.carry, dec!(10.02));
        // 100.25 * 0.3 = 30.075 rounds up to the even cent
        assert_eq!(result.commission, dec!(30.08));
    }

    #[test]
    fn test_zero_investment() {
        let table = BracketTable::default_pilot();
        let result = compute_cycle(&cycle(dec!(0), dec!(0.02)), &table).unwrap();
        assert!(result.commission.is_zero());
        assert!(result.carry.is_zero());
    }

    #[test]
    fn test_invalid_cycles() {
        let table = BracketTable::default_pilot();

        let negative = compute_cycle(&cycle(dec!(-1), dec!(0.02)), &table);
        assert!(matches!(negative, Err(CycleError::InvalidCycle { .. })));

        let above_one = compute_cycle(&cycle(dec!(1000), dec!(1.01)), &table);
        assert!(matches!(above_one, Err(CycleError::InvalidCycle { .. })));

        let below_zero = compute_cycle(&cycle(dec!(1000), dec!(-0.01)), &table);
        assert!(matches!(below_zero, Err(CycleError::InvalidCycle { .. })));
    }

    #[test]
    fn test_amount_above_ceiling() {
        let table = BracketTable::new(vec![
            Bracket::new(dec!(0), Some(dec!(250000)), dec!(0.10)),
            Bracket::new(dec!(250000), Some(dec!(2000000)), dec!(0.15)),
        ])
        .unwrap();
        let err = compute_cycle(&cycle(dec!(2500000), dec!(0.01)), &table).unwrap_err();
        assert!(matches!(err, CycleError::Bracket(_)));
    }

    #[test]
    fn test_monotonic_in_invested_amount() {
        let table = BracketTable::default_pilot();
        assert!(table.is_progressive());

        let mut previous = compute_cycle(&cycle(dec!(0), dec!(0.02)), &table).unwrap();
        let mut amount = dec!(0);
        while amount < dec!(1000000) {
            amount += dec!(4999.99);
            let current = compute_cycle(&cycle(amount, dec!(0.02)), &table).unwrap();
            assert!(current.commission >= previous.commission);
            assert!(current.carry >= previous.carry, "carry dropped at {}", amount);
            previous = current;
        }
    }
}
