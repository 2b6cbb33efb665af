//! Monthly investment cycle data structures

use crate::{Fraction, Money};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a cycle's capital movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleKind {
    /// New capital committed to the fund
    Commitment,
    /// Withdrawal or reduction of previously committed capital
    Withdrawal,
}

impl CycleKind {
    pub fn is_withdrawal(&self) -> bool {
        matches!(self, CycleKind::Withdrawal)
    }
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            CycleKind::Commitment => "commitment",
            CycleKind::Withdrawal => "withdrawal",
        })
    }
}

/// Liquidity class of the underlying investment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Liquidity {
    High,
    #[default]
    Medium,
    Low,
}

/// One monthly investment proposal or accepted cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    /// Position in the fund's cycle sequence
    pub index: u32,

    /// Investor the capital belongs to
    pub investor: String,

    /// Ordinal month of the cycle
    pub month: u32,

    /// Capital moved in this cycle
    pub invested_amount: Money,

    /// Flat commission rate charged on the invested amount
    pub commission_rate: Fraction,

    pub kind: CycleKind,

    #[serde(default)]
    pub liquidity: Liquidity,
}

impl Cycle {
    /// Create a commitment cycle with medium liquidity
    pub fn commitment(
        index: u32,
        investor: impl Into<String>,
        month: u32,
        invested_amount: Money,
        commission_rate: Fraction,
    ) -> Self {
        Self {
            index,
            investor: investor.into(),
            month,
            invested_amount,
            commission_rate,
            kind: CycleKind::Commitment,
            liquidity: Liquidity::default(),
        }
    }

    /// Create a withdrawal cycle with medium liquidity
    pub fn withdrawal(
        index: u32,
        investor: impl Into<String>,
        month: u32,
        amount: Money,
        commission_rate: Fraction,
    ) -> Self {
        Self {
            kind: CycleKind::Withdrawal,
            ..Self::commitment(index, investor, month, amount, commission_rate)
        }
    }

    pub fn with_liquidity(mut self, liquidity: Liquidity) -> Self {
        self.liquidity = liquidity;
        self
    }
}
