//! Cycle result and revenue summary structures

use crate::cycle::{Cycle, CycleKind};
use crate::{Fraction, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fees earned on one accepted cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleResult {
    pub cycle: Cycle,

    /// Carry rate of the bracket the invested amount resolved to
    pub carry_rate: Fraction,

    pub commission: Money,
    pub carry: Money,
}

impl CycleResult {
    /// Commission plus carry
    pub fn total(&self) -> Money {
        self.commission + self.carry
    }
}

/// A single row of the cumulative revenue series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub index: u32,
    pub month: u32,
    pub investor: String,
    pub kind: CycleKind,
    pub invested_amount: Money,
    pub carry_rate: Fraction,
    pub commission: Money,
    pub carry: Money,
    pub cycle_revenue: Money,
    pub cumulative_revenue: Money,
}

/// Per-cycle revenue series with running totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundSummary {
    pub rows: Vec<SummaryRow>,
    pub total_invested: Money,
    pub total_withdrawn: Money,
    pub total_commission: Money,
    pub total_carry: Money,
    pub total_revenue: Money,
}

impl FundSummary {
    /// Build the series from results in acceptance order
    pub fn from_results(results: &[CycleResult]) -> Self {
        let mut summary = Self::default();
        let mut cumulative = Decimal::ZERO;

        for result in results {
            cumulative += result.total();
            match result.cycle.kind {
                CycleKind::Commitment => summary.total_invested += result.cycle.invested_amount,
                CycleKind::Withdrawal => summary.total_withdrawn += result.cycle.invested_amount,
            }
            summary.total_commission += result.commission;
            summary.total_carry += result.carry;

            summary.rows.push(SummaryRow {
                index: result.cycle.index,
                month: result.cycle.month,
                investor: result.cycle.investor.clone(),
                kind: result.cycle.kind,
                invested_amount: result.cycle.invested_amount,
                carry_rate: result.carry_rate,
                commission: result.commission,
                carry: result.carry,
                cycle_revenue: result.total(),
                cumulative_revenue: cumulative,
            });
        }

        summary.total_revenue = cumulative;
        summary
    }
}
