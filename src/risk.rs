//! Concentration and liquidity risk assessment of a fund's committed capital

use crate::cycle::{CycleKind, Liquidity};
use crate::projection::FundState;
use crate::Money;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Limits the risk score is measured against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskLimits {
    /// Largest share of AUM a single commitment should hold
    pub max_concentration: f64,

    /// Smallest share of AUM that should be highly liquid
    pub min_liquidity: f64,

    /// AUM at which the size component saturates
    pub size_reference: f64,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_concentration: 0.40,
            min_liquidity: 0.20,
            size_reference: 10_000_000.0,
        }
    }
}

const CONCENTRATION_WEIGHT: f64 = 0.4;
const LIQUIDITY_WEIGHT: f64 = 0.3;
const SIZE_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskStatus {
    NoPortfolio,
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskStatus {
    fn from_score(score: f64) -> Self {
        if score < 0.3 {
            RiskStatus::Low
        } else if score < 0.6 {
            RiskStatus::Moderate
        } else if score < 0.8 {
            RiskStatus::High
        } else {
            RiskStatus::Critical
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskStatus::NoPortfolio => "No Portfolio",
            RiskStatus::Low => "Low Risk",
            RiskStatus::Moderate => "Moderate Risk",
            RiskStatus::High => "High Risk",
            RiskStatus::Critical => "Critical Risk",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub total_aum: Money,
    pub concentration: f64,
    pub liquidity_ratio: f64,
    pub score: f64,
    pub status: RiskStatus,
    pub recommendations: Vec<String>,
}

/// Score the committed capital of `state` against `limits`
///
/// Only commitments count toward AUM; withdrawals are ignored here.
pub fn assess(state: &FundState, limits: &RiskLimits) -> RiskAssessment {
    let commitments: Vec<_> = state
        .accepted_cycles()
        .filter(|c| c.kind == CycleKind::Commitment)
        .collect();
    let total_aum: Money = commitments.iter().map(|c| c.invested_amount).sum();

    if total_aum <= Decimal::ZERO {
        return RiskAssessment {
            total_aum,
            concentration: 0.0,
            liquidity_ratio: 0.0,
            score: 0.0,
            status: RiskStatus::NoPortfolio,
            recommendations: vec![
                "Build initial portfolio with diversified investments".to_string(),
            ],
        };
    }

    let largest = commitments
        .iter()
        .map(|c| c.invested_amount)
        .max()
        .unwrap_or(Decimal::ZERO);
    let liquid: Money = commitments
        .iter()
        .filter(|c| c.liquidity == Liquidity::High)
        .map(|c| c.invested_amount)
        .sum();

    let aum = total_aum.to_f64().unwrap_or(0.0);
    let concentration = (largest / total_aum).to_f64().unwrap_or(0.0);
    let liquidity_ratio = (liquid / total_aum).to_f64().unwrap_or(0.0);

    let concentration_risk = (concentration / limits.max_concentration).min(1.0);
    let liquidity_risk = ((limits.min_liquidity - liquidity_ratio) / limits.min_liquidity).max(0.0);
    let size_risk = (aum / limits.size_reference).min(1.0) * 0.5;

    let score = (concentration_risk * CONCENTRATION_WEIGHT
        + liquidity_risk * LIQUIDITY_WEIGHT
        + size_risk * SIZE_WEIGHT)
        .min(1.0);

    let mut recommendations = Vec::new();
    if concentration > limits.max_concentration {
        recommendations.push("Reduce portfolio concentration - consider diversification".to_string());
    }
    if liquidity_ratio < limits.min_liquidity {
        recommendations.push("Increase liquidity buffer - add more liquid investments".to_string());
    }
    if score > 0.7 {
        recommendations.push("Consider reducing overall portfolio risk".to_string());
    }
    if recommendations.is_empty() {
        recommendations.push("Portfolio risk profile is within acceptable parameters".to_string());
    }

    RiskAssessment {
        total_aum,
        concentration,
        liquidity_ratio,
        score,
        status: RiskStatus::from_score(score),
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FundConfig;
    use crate::cycle::Cycle;
    use crate::projection::FundEngine;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_fund() {
        let assessment = assess(&FundState::new(), &RiskLimits::default());
        assert_eq!(assessment.status, RiskStatus::NoPortfolio);
        assert_eq!(assessment.status.to_string(), "No Portfolio");
    }

    #[test]
    fn test_diversified_liquid_fund_is_low_risk() {
        let engine = FundEngine::new(FundConfig::default_pilot());
        let cycles: Vec<_> = (0..5)
            .map(|i| {
                Cycle::commitment(i, format!("investor-{}", i), i + 1, dec!(100000), dec!(0.02))
                    .with_liquidity(Liquidity::High)
            })
            .collect();
        let outcome = engine.run(&cycles);

        let assessment = assess(&outcome.state, &RiskLimits::default());
        assert_eq!(assessment.total_aum, dec!(500000));
        assert_relative_eq!(assessment.concentration, 0.2);
        assert_relative_eq!(assessment.liquidity_ratio, 1.0);
        // 0.4 * 0.5 + 0 + 0.3 * 0.025
        assert_relative_eq!(assessment.score, 0.2075, epsilon = 1e-12);
        assert_eq!(assessment.status, RiskStatus::Low);
        assert_eq!(assessment.recommendations.len(), 1);
    }

    #[test]
    fn test_concentrated_illiquid_fund() {
        let engine = FundEngine::new(FundConfig::default_pilot());
        let outcome = engine.run(&[
            Cycle::commitment(0, "alpha", 1, dec!(900000), dec!(0.02)).with_liquidity(Liquidity::Low),
            Cycle::commitment(1, "beta", 2, dec!(100000), dec!(0.02)),
        ]);

        let assessment = assess(&outcome.state, &RiskLimits::default());
        assert_relative_eq!(assessment.concentration, 0.9);
        assert_relative_eq!(assessment.liquidity_ratio, 0.0);
        // 0.4 * 1 + 0.3 * 1 + 0.3 * 0.05
        assert_relative_eq!(assessment.score, 0.715, epsilon = 1e-12);
        assert_eq!(assessment.status, RiskStatus::High);
        assert_eq!(assessment.recommendations.len(), 3);
    }
}
