//! Tiered carry brackets keyed by investment size

use crate::error::BracketError;
use crate::{Fraction, Money};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One investment-size tier: `[lower_bound, upper_bound)` mapped to a carry rate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    /// Inclusive lower bound
    pub lower_bound: Money,

    /// Exclusive upper bound (None = unbounded top tier)
    pub upper_bound: Option<Money>,

    /// Carry rate applied to the whole invested amount
    pub carry_rate: Fraction,

    /// Display name of the tier
    pub name: Option<String>,
}

impl Bracket {
    pub fn new(lower_bound: Money, upper_bound: Option<Money>, carry_rate: Fraction) -> Self {
        Self {
            lower_bound,
            upper_bound,
            carry_rate,
            name: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether `amount` falls inside this bracket
    pub fn contains(&self, amount: Money) -> bool {
        amount >= self.lower_bound && self.upper_bound.map_or(true, |upper| amount < upper)
    }
}

/// Ordered, contiguous bracket table
///
/// Can only be obtained through [`BracketTable::new`], so every instance
/// starts at zero, has no gaps or overlaps, and at most its last bracket is
/// unbounded. A bounded last bracket acts as a ceiling on investable amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketTable {
    brackets: Vec<Bracket>,
}

impl BracketTable {
    /// Validate and build a table from brackets sorted by lower bound
    pub fn new(brackets: Vec<Bracket>) -> Result<Self, BracketError> {
        let invalid = |msg: String| Err(BracketError::InvalidBracketTable(msg));

        let Some(first) = brackets.first() else {
            return invalid("table has no brackets".to_string());
        };
        if !first.lower_bound.is_zero() {
            return invalid(format!(
                "first bracket starts at {} instead of 0",
                first.lower_bound
            ));
        }

        for (i, bracket) in brackets.iter().enumerate() {
            if bracket.carry_rate < Decimal::ZERO || bracket.carry_rate > dec!(1) {
                return invalid(format!(
                    "bracket {} has carry rate {} outside [0, 1]",
                    i, bracket.carry_rate
                ));
            }

            match bracket.upper_bound {
                Some(upper) if upper <= bracket.lower_bound => {
                    return invalid(format!(
                        "bracket {} is empty: [{}, {})",
                        i, bracket.lower_bound, upper
                    ));
                }
                Some(upper) => {
                    if let Some(next) = brackets.get(i + 1) {
                        if next.lower_bound != upper {
                            return invalid(format!(
                                "bracket {} ends at {} but bracket {} starts at {}",
                                i,
                                upper,
                                i + 1,
                                next.lower_bound
                            ));
                        }
                    }
                }
                None if i + 1 != brackets.len() => {
                    return invalid(format!("unbounded bracket {} is not the last bracket", i));
                }
                None => {}
            }
        }

        Ok(Self { brackets })
    }

    /// Pilot tiers: up to $250K at 10%, up to $500K at 15%, 20% above
    pub fn default_pilot() -> Self {
        Self {
            brackets: vec![
                Bracket::new(dec!(0), Some(dec!(250000)), dec!(0.10)).named("Entry Tier"),
                Bracket::new(dec!(250000), Some(dec!(500000)), dec!(0.15)).named("Growth Tier"),
                Bracket::new(dec!(500000), None, dec!(0.20)).named("Premium Tier"),
            ],
        }
    }

    /// Bracket whose range contains `amount`
    pub fn bracket_for(&self, amount: Money) -> Result<&Bracket, BracketError> {
        if amount < Decimal::ZERO {
            return Err(BracketError::OutOfRangeAmount(amount));
        }
        // Sorted and contiguous, so the last bracket starting at or below the
        // amount is the only candidate.
        let idx = self
            .brackets
            .partition_point(|b| b.lower_bound <= amount)
            .saturating_sub(1);
        self.brackets
            .get(idx)
            .filter(|b| b.contains(amount))
            .ok_or(BracketError::OutOfRangeAmount(amount))
    }

    /// Carry rate for an investment of `amount`
    pub fn rate_for(&self, amount: Money) -> Result<Fraction, BracketError> {
        self.bracket_for(amount).map(|b| b.carry_rate)
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    /// Explicit ceiling, if the top bracket is bounded
    pub fn ceiling(&self) -> Option<Money> {
        self.brackets.last().and_then(|b| b.upper_bound)
    }

    /// Whether carry rates never decrease from one bracket to the next
    pub fn is_progressive(&self) -> bool {
        self.brackets
            .windows(2)
            .all(|pair| pair[0].carry_rate <= pair[1].carry_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capped_table() -> BracketTable {
        BracketTable::new(vec![
            Bracket::new(dec!(0), Some(dec!(250000)), dec!(0.10)),
            Bracket::new(dec!(250000), Some(dec!(500000)), dec!(0.15)),
            Bracket::new(dec!(500000), Some(dec!(2000000)), dec!(0.20)),
        ])
        .expect("valid table")
    }

    #[test]
    fn test_pilot_rates() {
        let table = BracketTable::default_pilot();

        assert_eq!(table.rate_for(dec!(0)).unwrap(), dec!(0.10));
        assert_eq!(table.rate_for(dec!(72500)).unwrap(), dec!(0.10));
        assert_eq!(table.rate_for(dec!(249999.99)).unwrap(), dec!(0.10));
        assert_eq!(table.rate_for(dec!(250000)).unwrap(), dec!(0.15));
        assert_eq!(table.rate_for(dec!(300000)).unwrap(), dec!(0.15));
        assert_eq!(table.rate_for(dec!(500000)).unwrap(), dec!(0.20));
        assert_eq!(table.rate_for(dec!(50000000)).unwrap(), dec!(0.20));
    }

    #[test]
    fn test_pilot_table_passes_validation() {
        let pilot = BracketTable::default_pilot();
        let rebuilt = BracketTable::new(pilot.brackets().to_vec()).unwrap();
        assert_eq!(rebuilt, pilot);
        assert!(pilot.is_progressive());
        assert_eq!(pilot.ceiling(), None);
    }

    #[test]
    fn test_rate_is_total_and_unique() {
        let table = BracketTable::default_pilot();
        let mut amount = dec!(0);
        while amount < dec!(1200000) {
            let matches = table
                .brackets()
                .iter()
                .filter(|b| b.contains(amount))
                .count();
            assert_eq!(matches, 1, "amount {} matched {} brackets", amount, matches);
            assert!(table.rate_for(amount).is_ok());
            amount += dec!(12345.67);
        }
    }

    #[test]
    fn test_bracket_names() {
        let table = BracketTable::default_pilot();
        let bracket = table.bracket_for(dec!(400000)).unwrap();
        assert_eq!(bracket.name.as_deref(), Some("Growth Tier"));
    }

    #[test]
    fn test_ceiling_is_out_of_range() {
        let table = capped_table();
        assert_eq!(table.ceiling(), Some(dec!(2000000)));
        assert_eq!(table.rate_for(dec!(1999999.99)).unwrap(), dec!(0.20));
        assert_eq!(
            table.rate_for(dec!(2000000)),
            Err(BracketError::OutOfRangeAmount(dec!(2000000)))
        );
    }

    #[test]
    fn test_negative_amount_is_out_of_range() {
        let table = BracketTable::default_pilot();
        assert!(matches!(
            table.rate_for(dec!(-1)),
            Err(BracketError::OutOfRangeAmount(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_tables() {
        let gap = BracketTable::new(vec![
            Bracket::new(dec!(0), Some(dec!(250000)), dec!(0.10)),
            Bracket::new(dec!(251000), None, dec!(0.15)),
        ]);
        assert!(matches!(gap, Err(BracketError::InvalidBracketTable(_))));

        let overlap = BracketTable::new(vec![
            Bracket::new(dec!(0), Some(dec!(250000)), dec!(0.10)),
            Bracket::new(dec!(200000), None, dec!(0.15)),
        ]);
        assert!(matches!(overlap, Err(BracketError::InvalidBracketTable(_))));

        let unsorted = BracketTable::new(vec![
            Bracket::new(dec!(250000), None, dec!(0.15)),
            Bracket::new(dec!(0), Some(dec!(250000)), dec!(0.10)),
        ]);
        assert!(matches!(unsorted, Err(BracketError::InvalidBracketTable(_))));

        let unbounded_middle = BracketTable::new(vec![
            Bracket::new(dec!(0), None, dec!(0.10)),
            Bracket::new(dec!(250000), None, dec!(0.15)),
        ]);
        assert!(matches!(unbounded_middle, Err(BracketError::InvalidBracketTable(_))));

        let empty_range = BracketTable::new(vec![
            Bracket::new(dec!(0), Some(dec!(0)), dec!(0.10)),
            Bracket::new(dec!(0), None, dec!(0.15)),
        ]);
        assert!(matches!(empty_range, Err(BracketError::InvalidBracketTable(_))));

        let bad_rate = BracketTable::new(vec![Bracket::new(dec!(0), None, dec!(1.5))]);
        assert!(matches!(bad_rate, Err(BracketError::InvalidBracketTable(_))));

        assert!(matches!(
            BracketTable::new(Vec::new()),
            Err(BracketError::InvalidBracketTable(_))
        ));
    }
}
