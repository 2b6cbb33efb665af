//! Fund engine: admission, fee calculation and aggregation over a cycle stream

use super::calculator::compute_cycle;
use super::capacity::admit;
use super::cashflows::FundSummary;
use super::irr::{project_irr_detail, IrrProjection, MAX_IRR_ITERATIONS};
use super::state::FundState;
use crate::config::FundConfig;
use crate::cycle::Cycle;
use crate::error::{EngineError, ProjectionError};
use log::{debug, info, warn};
use serde::Serialize;

/// A cycle the engine refused, with the reason
#[derive(Debug, Clone, Serialize)]
pub struct RejectedCycle {
    pub cycle: Cycle,
    pub reason: String,
}

/// Result of folding a whole cycle stream
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub state: FundState,
    pub rejected: Vec<RejectedCycle>,
}

impl RunOutcome {
    pub fn summary(&self) -> FundSummary {
        FundSummary::from_results(self.state.results())
    }
}

/// Main fund engine
///
/// Holds only read-only configuration; every fund run threads its own
/// `FundState` through the calls.
#[derive(Debug, Clone)]
pub struct FundEngine {
    config: FundConfig,
    max_irr_iterations: u32,
}

impl FundEngine {
    /// Create a new engine with the given configuration
    pub fn new(config: FundConfig) -> Self {
        Self {
            config,
            max_irr_iterations: MAX_IRR_ITERATIONS,
        }
    }

    /// Bound the IRR solver's iteration budget
    pub fn with_max_irr_iterations(mut self, max_iterations: u32) -> Self {
        self.max_irr_iterations = max_iterations;
        self
    }

    pub fn config(&self) -> &FundConfig {
        &self.config
    }

    /// Admit a cycle, compute its fees and append it to a copy of `state`
    ///
    /// On any error `state` is unchanged and the caller may resubmit an
    /// adjusted cycle.
    pub fn admit_and_apply(&self, cycle: &Cycle, state: &FundState) -> Result<FundState, EngineError> {
        let mut next = state.clone();
        self.apply_in_place(cycle, &mut next)?;
        Ok(next)
    }

    fn apply_in_place(&self, cycle: &Cycle, state: &mut FundState) -> Result<(), EngineError> {
        admit(cycle, state, &self.config.capacity)?;
        let result = compute_cycle(cycle, &self.config.brackets)?;
        debug!(
            "Cycle {} ({}, month {}): commission {} carry {} at rate {}",
            cycle.index, cycle.investor, cycle.month, result.commission, result.carry, result.carry_rate
        );
        state.append_in_place(result)?;
        Ok(())
    }

    /// Fold a time-ordered stream, collecting rejected cycles instead of stopping
    pub fn run(&self, cycles: &[Cycle]) -> RunOutcome {
        let mut state = FundState::new();
        let mut rejected = Vec::new();

        for cycle in cycles {
            // A failed apply leaves the state untouched, so the in-place path
            // is safe for a stream we own.
            if let Err(err) = self.apply_in_place(cycle, &mut state) {
                warn!("Cycle {} rejected: {}", cycle.index, err);
                rejected.push(RejectedCycle {
                    cycle: cycle.clone(),
                    reason: err.to_string(),
                });
            }
        }

        info!(
            "Processed {} cycles: {} accepted, {} rejected, revenue {}",
            cycles.len(),
            state.len(),
            rejected.len(),
            state.cumulative_revenue()
        );

        RunOutcome { state, rejected }
    }

    /// Annualized IRR of the fund's accepted history
    pub fn project_irr(&self, state: &FundState, horizon_months: u32) -> Result<f64, ProjectionError> {
        self.project_irr_detail(state, horizon_months)
            .map(|p| p.annual_rate)
    }

    pub fn project_irr_detail(
        &self,
        state: &FundState,
        horizon_months: u32,
    ) -> Result<IrrProjection, ProjectionError> {
        project_irr_detail(state.results(), horizon_months, self.max_irr_iterations)
    }
}
