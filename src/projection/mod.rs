//! Fee calculation, admission, aggregation and return projection

mod state;
mod engine;
mod cashflows;
mod calculator;
mod capacity;
mod commission;
mod growth;
pub mod irr;

pub use state::{append, replay, FundState, Totals};
pub use engine::{FundEngine, RejectedCycle, RunOutcome};
pub use cashflows::{CycleResult, FundSummary, SummaryRow};
pub use calculator::{compute_cycle, round_money, CURRENCY_DECIMALS};
pub use capacity::{admit, Accepted, CapacityPolicy};
pub use commission::{
    compare_commission, standard_vs_premium, CommissionScenario, PREMIUM_COMMISSION_RATE,
    STANDARD_COMMISSION_RATE,
};
pub use growth::{
    project_carry_returns, CarryProjection, DEFAULT_ANNUAL_RETURN, DEFAULT_PROJECTION_YEARS,
};
pub use irr::{project_irr, project_irr_detail, IrrProjection};
