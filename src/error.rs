//! Error types for bracket resolution, cycle processing, admission and projection

use crate::Money;
use thiserror::Error;

/// Errors raised while building or querying a bracket table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BracketError {
    #[error("Invalid bracket table: {0}")]
    InvalidBracketTable(String),

    #[error("No bracket covers amount {0}")]
    OutOfRangeAmount(Money),
}

/// Errors raised while computing or appending a single cycle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CycleError {
    #[error("Invalid cycle {index}: {reason}")]
    InvalidCycle { index: u32, reason: String },

    #[error("Cycle {index} (month {month}) is out of order; last accepted cycle is {last_index} (month {last_month})")]
    OutOfOrderCycle {
        index: u32,
        month: u32,
        last_index: u32,
        last_month: u32,
    },

    #[error(transparent)]
    Bracket(#[from] BracketError),
}

/// Reasons the capacity guard refuses a proposed cycle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Cycle {index} exceeds monthly capacity: requested {requested}, available {available} of {limit}")]
    CapacityExceeded {
        index: u32,
        requested: Money,
        available: Money,
        limit: Money,
    },

    #[error("Investor {investor} has committed for {span_months} months; withdrawals need at least {required_months}")]
    InsufficientCommitment {
        investor: String,
        span_months: u32,
        required_months: u32,
    },

    #[error("Investor {investor} withdraws {requested} but only {available} is deployed")]
    WithdrawalExceedsCommitted {
        investor: String,
        requested: Money,
        available: Money,
    },

    #[error("Cycle {index} invests {amount}, below the minimum investment of {minimum}")]
    BelowMinimumInvestment {
        index: u32,
        amount: Money,
        minimum: Money,
    },
}

/// Errors raised by the IRR projector and growth projections
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("IRR search did not converge after {iterations} iterations")]
    NoConvergence { iterations: u32 },

    #[error("Insufficient data for projection: {0}")]
    InsufficientData(String),

    #[error("Horizon of {horizon_months} months is invalid; cycles span {last_offset} months")]
    InvalidHorizon { horizon_months: u32, last_offset: u32 },

    #[error("Projection exceeds the representable money range in year {year}")]
    Overflow { year: u32 },
}

/// Any failure of the admit-and-apply path
///
/// The caller's `FundState` is unchanged whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Cycle rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Cycle(#[from] CycleError),
}

/// Errors raised while loading configuration or cycle streams
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue { field: String, value: String },

    #[error("Missing setting: {0}")]
    MissingSetting(String),

    #[error(transparent)]
    Bracket(#[from] BracketError),
}
