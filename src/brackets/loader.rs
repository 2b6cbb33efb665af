//! Load carry brackets from carry_brackets.csv

use super::{Bracket, BracketTable};
use crate::config::parse_decimal;
use crate::error::ConfigError;
use csv::Reader;
use std::fs::File;
use std::path::Path;

/// File name of the bracket table inside a config directory
pub const BRACKETS_FILE: &str = "carry_brackets.csv";

/// Raw CSV row matching carry_brackets.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    lower_bound: String,
    #[serde(default)]
    upper_bound: String,
    carry_rate: String,
    #[serde(default)]
    name: String,
}

impl CsvRow {
    fn into_bracket(self) -> Result<Bracket, ConfigError> {
        let lower = parse_decimal("lower_bound", &self.lower_bound)?;
        let upper = match self.upper_bound.trim() {
            "" | "inf" | "Inf" => None,
            value => Some(parse_decimal("upper_bound", value)?),
        };
        let rate = parse_decimal("carry_rate", &self.carry_rate)?;

        let bracket = Bracket::new(lower, upper, rate);
        Ok(match self.name.trim() {
            "" => bracket,
            name => bracket.named(name),
        })
    }
}

/// Load and validate a bracket table from a CSV file
pub fn load_brackets<P: AsRef<Path>>(path: P) -> Result<BracketTable, ConfigError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_brackets_from_reader(file)
}

/// Load a bracket table from any reader (e.g., string buffer)
pub fn load_brackets_from_reader<R: std::io::Read>(reader: R) -> Result<BracketTable, ConfigError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut brackets = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        brackets.push(row.into_bracket()?);
    }

    Ok(BracketTable::new(brackets)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_from_reader() {
        let csv = "lower_bound,upper_bound,carry_rate,name\n\
                   0,250000,0.10,Entry Tier\n\
                   250000,500000,0.15,Growth Tier\n\
                   500000,,0.20,Premium Tier\n";
        let table = load_brackets_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(table, BracketTable::default_pilot());
        assert_eq!(table.rate_for(dec!(300000)).unwrap(), dec!(0.15));
    }

    #[test]
    fn test_gap_in_file_is_rejected() {
        let csv = "lower_bound,upper_bound,carry_rate,name\n\
                   0,250000,0.10,\n\
                   251000,,0.15,\n";
        let err = load_brackets_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ConfigError::Bracket(_)));
    }

    #[test]
    fn test_bad_number_is_reported() {
        let csv = "lower_bound,upper_bound,carry_rate,name\n0,,ten percent,\n";
        let err = load_brackets_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "carry_rate"));
    }

    #[test]
    fn test_load_default_file() {
        let table = load_brackets("data/fund/carry_brackets.csv").expect("Failed to load brackets");
        assert_eq!(table.brackets().len(), 3);
        assert_eq!(table.rate_for(dec!(600000)).unwrap(), dec!(0.20));
    }
}
