//! Compounding carry projection for a single investment

use super::calculator::round_money;
use crate::brackets::BracketTable;
use crate::error::ProjectionError;
use crate::{Fraction, Money};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Default annual return assumed for carry projections
pub const DEFAULT_ANNUAL_RETURN: Fraction = dec!(0.12);

/// Default number of projection years
pub const DEFAULT_PROJECTION_YEARS: u32 = 4;

/// Yearly carry earned on a compounding investment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarryProjection {
    pub investment: Money,
    pub carry_rate: Fraction,

    /// Carry for years 1..=n
    pub yearly_carry: Vec<Money>,

    pub total_carry: Money,

    /// Annualized growth of total carry relative to the investment
    pub growth_rate: f64,
}

/// Project carry over `years` with the investment compounding at `annual_return`
///
/// Year `y` earns `investment * (1 + annual_return)^y * carry_rate`, where
/// the carry rate comes from the bracket of the initial investment.
pub fn project_carry_returns(
    table: &BracketTable,
    investment: Money,
    years: u32,
    annual_return: Fraction,
) -> Result<CarryProjection, ProjectionError> {
    if years == 0 || investment <= Decimal::ZERO {
        return Err(ProjectionError::InsufficientData(format!(
            "need a positive investment and at least one year (got {} over {} years)",
            investment, years
        )));
    }

    let carry_rate = table
        .rate_for(investment)
        .map_err(|e| ProjectionError::InsufficientData(e.to_string()))?;

    let growth = Decimal::ONE + annual_return;
    let mut compound = Decimal::ONE;
    let mut total_carry = Decimal::ZERO;
    let mut yearly_carry = Vec::new();
    for year in 1..=years {
        let overflow = ProjectionError::Overflow { year };
        compound = compound.checked_mul(growth).ok_or(overflow.clone())?;
        let carry = investment
            .checked_mul(compound)
            .and_then(|grown| grown.checked_mul(carry_rate))
            .map(round_money)
            .ok_or(overflow.clone())?;
        total_carry = total_carry.checked_add(carry).ok_or(overflow)?;
        yearly_carry.push(carry);
    }

    let ratio = (total_carry / investment).to_f64().unwrap_or(0.0);
    let growth_rate = ratio.powf(1.0 / years as f64) - 1.0;

    Ok(CarryProjection {
        investment,
        carry_rate,
        yearly_carry,
        total_carry,
        growth_rate,
    })
}
