//! Fund Carry - Tiered commission and carry engine for monthly investment cycles
//!
//! This library provides:
//! - Carry bracket tables keyed by investment size
//! - Per-cycle commission and carry calculation with exact decimal money
//! - Capacity and commitment checks before a cycle is accepted
//! - Cumulative revenue aggregation with replayable fund state
//! - IRR projection, compounding carry projections and risk assessment

pub mod error;
pub mod config;
pub mod brackets;
pub mod cycle;
pub mod projection;
pub mod risk;
pub mod report;
pub mod scenario;

/// Money amounts, rounded to cents by the calculator
pub type Money = rust_decimal::Decimal;

/// Rates expressed as fractions (0.15 = 15%)
pub type Fraction = rust_decimal::Decimal;

// Re-export commonly used types
pub use brackets::{Bracket, BracketTable};
pub use config::FundConfig;
pub use cycle::{Cycle, CycleKind, Liquidity};
pub use error::{BracketError, ConfigError, CycleError, EngineError, ProjectionError, Rejection};
pub use projection::{CapacityPolicy, CycleResult, FundEngine, FundState, FundSummary};
pub use scenario::ScenarioRunner;
