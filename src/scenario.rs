//! Scenario runner for batches of independent funds
//!
//! Each fund gets its own `FundState`; funds never share mutable state, so
//! they are processed in parallel.

use crate::config::FundConfig;
use crate::cycle::Cycle;
use crate::error::ProjectionError;
use crate::projection::{FundEngine, RunOutcome};
use rayon::prelude::*;

/// One fund's cycle stream to process
#[derive(Debug, Clone)]
pub struct FundInput {
    pub name: String,
    pub cycles: Vec<Cycle>,
}

/// Result of processing one fund
#[derive(Debug, Clone)]
pub struct FundOutcome {
    pub name: String,
    pub outcome: RunOutcome,
    pub irr: Result<f64, ProjectionError>,
}

/// Runs many funds against shared read-only configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(FundConfig::from_csv()?, 48);
/// let outcomes = runner.run_funds(&funds);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    engine: FundEngine,
    horizon_months: u32,
}

impl ScenarioRunner {
    /// Create a runner projecting IRR over `horizon_months`
    pub fn new(config: FundConfig, horizon_months: u32) -> Self {
        Self {
            engine: FundEngine::new(config),
            horizon_months,
        }
    }

    /// Run a single fund
    pub fn run(&self, fund: &FundInput) -> FundOutcome {
        let outcome = self.engine.run(&fund.cycles);
        let irr = self.engine.project_irr(&outcome.state, self.horizon_months);
        FundOutcome {
            name: fund.name.clone(),
            outcome,
            irr,
        }
    }

    /// Run every fund in parallel, preserving input order
    pub fn run_funds(&self, funds: &[FundInput]) -> Vec<FundOutcome> {
        funds.par_iter().map(|fund| self.run(fund)).collect()
    }

    /// Run the same stream under several configurations
    pub fn run_configs(cycles: &[Cycle], configs: &[FundConfig], horizon_months: u32) -> Vec<FundOutcome> {
        configs
            .par_iter()
            .enumerate()
            .map(|(i, config)| {
                let runner = ScenarioRunner::new(config.clone(), horizon_months);
                runner.run(&FundInput {
                    name: format!("config-{}", i),
                    cycles: cycles.to_vec(),
                })
            })
            .collect()
    }
}
