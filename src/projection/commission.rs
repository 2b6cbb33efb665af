//! Flat commission what-if over an accepted history

use super::calculator::round_money;
use super::state::FundState;
use crate::{Fraction, Money};
use rust_decimal_macros::dec;
use serde::Serialize;

/// Standard flat commission rate
pub const STANDARD_COMMISSION_RATE: Fraction = dec!(0.01);

/// Premium flat commission rate
pub const PREMIUM_COMMISSION_RATE: Fraction = dec!(0.02);

/// Commission the history would have earned at one flat rate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommissionScenario {
    pub rate: Fraction,
    pub commission: Money,

    /// Difference to the commission actually charged
    pub delta_vs_actual: Money,
}

/// Recompute commission for every accepted cycle at each rate in `rates`
///
/// Each cycle is rounded on its own, the same way the calculator rounds.
pub fn compare_commission(state: &FundState, rates: &[Fraction]) -> Vec<CommissionScenario> {
    rates
        .iter()
        .map(|&rate| {
            let commission: Money = state
                .accepted_cycles()
                .map(|c| round_money(c.invested_amount * rate))
                .sum();
            CommissionScenario {
                rate,
                commission,
                delta_vs_actual: commission - state.cumulative_commission,
            }
        })
        .collect()
}

/// Standard (1%) versus premium (2%) comparison
pub fn standard_vs_premium(state: &FundState) -> Vec<CommissionScenario> {
    compare_commission(state, &[STANDARD_COMMISSION_RATE, PREMIUM_COMMISSION_RATE])
}
