//! Capacity and eligibility checks for proposed cycles

use super::state::FundState;
use crate::cycle::{Cycle, CycleKind};
use crate::error::Rejection;
use crate::Money;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Intake limits applied to every proposed cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityPolicy {
    /// Maximum capital accepted in a single month
    pub max_monthly_intake: Money,

    /// Months an investor must stay committed before withdrawing
    pub min_commitment_months: u32,

    /// Smallest accepted commitment
    pub min_investment: Option<Money>,
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        Self {
            max_monthly_intake: dec!(2000000),
            min_commitment_months: 6,
            min_investment: Some(dec!(10000)),
        }
    }
}

/// Marker returned when a proposed cycle passes every check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted;

/// Decide whether `proposed` may be applied to `state`
///
/// Checks run in order: monthly capacity, commitment span and deployed
/// capital for withdrawals, then minimum investment for commitments. `state`
/// is only read.
pub fn admit(
    proposed: &Cycle,
    state: &FundState,
    policy: &CapacityPolicy,
) -> Result<Accepted, Rejection> {
    let limit = policy.max_monthly_intake;

    if proposed.invested_amount > limit {
        return Err(Rejection::CapacityExceeded {
            index: proposed.index,
            requested: proposed.invested_amount,
            available: limit,
            limit,
        });
    }

    if proposed.kind == CycleKind::Commitment {
        let available = (limit - state.intake_for_month(proposed.month)).max(Decimal::ZERO);
        if proposed.invested_amount > available {
            return Err(Rejection::CapacityExceeded {
                index: proposed.index,
                requested: proposed.invested_amount,
                available,
                limit,
            });
        }
    }

    if proposed.kind.is_withdrawal() {
        let span_months = commitment_span(proposed, state);
        if span_months < policy.min_commitment_months {
            return Err(Rejection::InsufficientCommitment {
                investor: proposed.investor.clone(),
                span_months,
                required_months: policy.min_commitment_months,
            });
        }

        let available = state.net_invested_for(&proposed.investor);
        if proposed.invested_amount > available {
            return Err(Rejection::WithdrawalExceedsCommitted {
                investor: proposed.investor.clone(),
                requested: proposed.invested_amount,
                available,
            });
        }
    }

    if let (CycleKind::Commitment, Some(minimum)) = (proposed.kind, policy.min_investment) {
        if proposed.invested_amount < minimum {
            return Err(Rejection::BelowMinimumInvestment {
                index: proposed.index,
                amount: proposed.invested_amount,
                minimum,
            });
        }
    }

    Ok(Accepted)
}

/// Months from the investor's earliest accepted cycle to the proposed month
fn commitment_span(proposed: &Cycle, state: &FundState) -> u32 {
    state
        .first_month_for(&proposed.investor)
        .map_or(0, |first| proposed.month.saturating_sub(first))
}
