//! Load proposed cycle streams from CSV

use super::{Cycle, CycleKind, Liquidity};
use crate::config::parse_decimal;
use crate::error::ConfigError;
use csv::Reader;
use std::fs::File;
use std::path::Path;

/// Raw CSV row matching the cycle stream columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    index: u32,
    investor: String,
    month: u32,
    invested_amount: String,
    commission_rate: String,
    kind: String,
    #[serde(default)]
    liquidity: String,
}

impl CsvRow {
    fn into_cycle(self) -> Result<Cycle, ConfigError> {
        let kind = match self.kind.trim().to_ascii_lowercase().as_str() {
            "commitment" | "c" => CycleKind::Commitment,
            "withdrawal" | "w" => CycleKind::Withdrawal,
            _ => {
                return Err(ConfigError::InvalidValue {
                    field: "kind".to_string(),
                    value: self.kind.clone(),
                })
            }
        };

        let liquidity = match self.liquidity.trim().to_ascii_lowercase().as_str() {
            "high" => Liquidity::High,
            "" | "medium" => Liquidity::Medium,
            "low" => Liquidity::Low,
            _ => {
                return Err(ConfigError::InvalidValue {
                    field: "liquidity".to_string(),
                    value: self.liquidity.clone(),
                })
            }
        };

        Ok(Cycle {
            index: self.index,
            investor: self.investor,
            month: self.month,
            invested_amount: parse_decimal("invested_amount", &self.invested_amount)?,
            commission_rate: parse_decimal("commission_rate", &self.commission_rate)?,
            kind,
            liquidity,
        })
    }
}

/// Load all cycles from a CSV file, in file order
pub fn load_cycles<P: AsRef<Path>>(path: P) -> Result<Vec<Cycle>, ConfigError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_cycles_from_reader(file)
}

/// Load cycles from any reader (e.g., string buffer, stdin)
pub fn load_cycles_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Cycle>, ConfigError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut cycles = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        cycles.push(row.into_cycle()?);
    }

    Ok(cycles)
}
