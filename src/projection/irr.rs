//! Internal Rate of Return (IRR) projection over a fund's cycle history
//!
//! Cash flows are placed on monthly periods counted from the first cycle.
//! Committed capital is an outflow in its month, withdrawals and realized
//! fees are inflows, and capital still deployed comes back at the horizon.

use super::cashflows::CycleResult;
use crate::cycle::CycleKind;
use crate::error::ProjectionError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// Relative convergence tolerance on the monthly rate
pub const IRR_TOLERANCE: f64 = 1e-6;

/// Absolute floor added to the rate tolerance so a root at zero can converge
const IRR_ABS_FLOOR: f64 = 1e-12;

/// Largest |NPV| accepted as a root, relative to the gross cash flow
const NPV_TOLERANCE: f64 = 1e-6;

/// Default iteration budget for each solver stage
pub const MAX_IRR_ITERATIONS: u32 = 1000;

/// Longest supported projection horizon (100 years)
pub const MAX_HORIZON_MONTHS: u32 = 1200;

/// Periodic rate search range
const RATE_FLOOR: f64 = -0.99;
const RATE_CEILING: f64 = 10.0;

/// Projected return of a cycle history
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IrrProjection {
    /// Periodic (monthly) IRR
    pub monthly_rate: f64,

    /// Monthly rate compounded over 12 months
    pub annual_rate: f64,

    /// Monthly rate compounded over the whole horizon
    pub horizon_return: f64,

    /// Solver iterations spent
    pub iterations: u32,
}

/// Annualized IRR of the cycle history over `horizon_months`
pub fn project_irr(results: &[CycleResult], horizon_months: u32) -> Result<f64, ProjectionError> {
    project_irr_detail(results, horizon_months, MAX_IRR_ITERATIONS).map(|p| p.annual_rate)
}

/// Full IRR projection with an explicit iteration budget
pub fn project_irr_detail(
    results: &[CycleResult],
    horizon_months: u32,
    max_iterations: u32,
) -> Result<IrrProjection, ProjectionError> {
    let cashflows = build_cashflows(results, horizon_months)?;
    let (monthly_rate, iterations) = solve_irr(&cashflows, max_iterations)?;

    log::debug!(
        "IRR over {} months converged to {:.8} monthly after {} iterations",
        horizon_months,
        monthly_rate,
        iterations
    );

    Ok(IrrProjection {
        monthly_rate,
        annual_rate: (1.0 + monthly_rate).powi(12) - 1.0,
        horizon_return: (1.0 + monthly_rate).powi(horizon_months as i32) - 1.0,
        iterations,
    })
}

/// Signed monthly cash flows, index 0 = first cycle's month, last = horizon
pub fn build_cashflows(
    results: &[CycleResult],
    horizon_months: u32,
) -> Result<Vec<f64>, ProjectionError> {
    if results.len() < 2 {
        return Err(ProjectionError::InsufficientData(format!(
            "{} cycle(s); at least 2 are needed",
            results.len()
        )));
    }

    let start = results.iter().map(|r| r.cycle.month).min().unwrap_or(0);
    let last_offset = results
        .iter()
        .map(|r| r.cycle.month - start)
        .max()
        .unwrap_or(0);
    if horizon_months == 0
        || horizon_months < last_offset
        || horizon_months > MAX_HORIZON_MONTHS
    {
        return Err(ProjectionError::InvalidHorizon {
            horizon_months,
            last_offset,
        });
    }

    let mut flows = vec![Decimal::ZERO; horizon_months as usize + 1];
    let mut deployed = Decimal::ZERO;

    for result in results {
        let t = (result.cycle.month - start) as usize;
        match result.cycle.kind {
            CycleKind::Commitment => {
                flows[t] -= result.cycle.invested_amount;
                deployed += result.cycle.invested_amount;
            }
            CycleKind::Withdrawal => {
                flows[t] += result.cycle.invested_amount;
                deployed -= result.cycle.invested_amount;
            }
        }
        flows[t] += result.total();
    }
    flows[horizon_months as usize] += deployed.max(Decimal::ZERO);

    if flows.iter().all(Decimal::is_zero) {
        return Err(ProjectionError::InsufficientData(
            "all cash flows are zero".to_string(),
        ));
    }

    Ok(flows.iter().map(|cf| cf.to_f64().unwrap_or(0.0)).collect())
}

/// Solve for the periodic rate where NPV is zero
///
/// Newton-Raphson first, bisection over the search range as the fallback.
/// Returns the rate and the iterations spent.
pub fn solve_irr(cashflows: &[f64], max_iterations: u32) -> Result<(f64, u32), ProjectionError> {
    let has_positive = cashflows.iter().any(|&cf| cf > 0.0);
    let has_negative = cashflows.iter().any(|&cf| cf < 0.0);
    if !has_positive || !has_negative {
        // No sign change, so NPV never crosses zero
        return Err(ProjectionError::NoConvergence { iterations: 0 });
    }

    let scale: f64 = cashflows.iter().map(|cf| cf.abs()).sum();
    let mut rate = 0.01;
    for iteration in 1..=max_iterations {
        let (value, derivative) = npv_and_derivative(cashflows, rate);
        if derivative.abs() < 1e-20 || !derivative.is_finite() {
            break;
        }

        let step = rate - value / derivative;
        if !(RATE_FLOOR..=RATE_CEILING).contains(&step) {
            // Out of range, let bisection decide
            break;
        }
        if converged(rate, step) && npv(cashflows, step).abs() <= NPV_TOLERANCE * scale {
            return Ok((step, iteration));
        }
        rate = step;
    }

    log::debug!("Newton iteration did not settle, falling back to bisection");
    solve_irr_bisection(cashflows, max_iterations)
}

fn converged(old: f64, new: f64) -> bool {
    (new - old).abs() <= IRR_TOLERANCE * new.abs() + IRR_ABS_FLOOR
}

fn solve_irr_bisection(cashflows: &[f64], max_iterations: u32) -> Result<(f64, u32), ProjectionError> {
    let mut low = RATE_FLOOR;
    let mut high = RATE_CEILING;
    let mut npv_low = npv(cashflows, low);

    if npv_low * npv(cashflows, high) > 0.0 {
        return Err(ProjectionError::NoConvergence { iterations: 0 });
    }

    for iteration in 1..=max_iterations {
        let mid = (low + high) / 2.0;
        let npv_mid = npv(cashflows, mid);

        if npv_mid == 0.0 || converged(low, high) {
            return Ok((mid, iteration));
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    Err(ProjectionError::NoConvergence {
        iterations: max_iterations,
    })
}

/// NPV of periodic cash flows at a periodic rate
pub fn npv(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut value = 0.0;
    let mut derivative = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        value += cf / (1.0 + rate).powi(t as i32);
        if t > 0 {
            derivative -= (t as f64) * cf / (1.0 + rate).powi(t as i32 + 1);
        }
    }

    (value, derivative)
}
