//! Fund configuration: bracket table plus capacity policy
//!
//! Loads from CSV files in a config directory (data/fund/ by default), with
//! built-in pilot values when no files are given.

use crate::brackets::{load_brackets, BracketTable, loader::BRACKETS_FILE};
use crate::error::ConfigError;
use crate::projection::CapacityPolicy;
use csv::Reader;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

/// Default path to the fund config directory
pub const DEFAULT_CONFIG_PATH: &str = "data/fund";

/// File name of the capacity policy inside a config directory
pub const CAPACITY_FILE: &str = "capacity_policy.csv";

/// Read-only configuration for a fund run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundConfig {
    pub brackets: BracketTable,
    pub capacity: CapacityPolicy,
}

impl FundConfig {
    /// Pilot configuration: 10/15/20% tiers, $2M monthly intake, 6 month commitment
    pub fn default_pilot() -> Self {
        Self {
            brackets: BracketTable::default_pilot(),
            capacity: CapacityPolicy::default(),
        }
    }

    /// Load configuration from the default directory
    pub fn from_csv() -> Result<Self, ConfigError> {
        Self::from_csv_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self, ConfigError> {
        let brackets = load_brackets(path.join(BRACKETS_FILE))?;
        let capacity = load_capacity_policy(path.join(CAPACITY_FILE))?;
        log::info!(
            "Loaded {} carry brackets and capacity policy from {}",
            brackets.brackets().len(),
            path.display()
        );
        Ok(Self { brackets, capacity })
    }

    /// Apply MAX_MONTHLY_INTAKE / MIN_COMMITMENT_MONTHS / MIN_INVESTMENT overrides
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("MAX_MONTHLY_INTAKE") {
            self.capacity.max_monthly_intake = parse_decimal("MAX_MONTHLY_INTAKE", &value)?;
        }
        if let Some(value) = lookup("MIN_COMMITMENT_MONTHS") {
            self.capacity.min_commitment_months = parse_u32("MIN_COMMITMENT_MONTHS", &value)?;
        }
        if let Some(value) = lookup("MIN_INVESTMENT") {
            self.capacity.min_investment = match value.trim() {
                "" | "none" => None,
                v => Some(parse_decimal("MIN_INVESTMENT", v)?),
            };
        }
        Ok(self)
    }
}

impl Default for FundConfig {
    fn default() -> Self {
        Self::default_pilot()
    }
}

/// Parse a decimal setting, reporting the field name on failure
pub fn parse_decimal(field: &str, value: &str) -> Result<Decimal, ConfigError> {
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn parse_u32(field: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Load the capacity policy from a `key,value` CSV file
pub fn load_capacity_policy<P: AsRef<Path>>(path: P) -> Result<CapacityPolicy, ConfigError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_capacity_policy_from_reader(file)
}

/// Load the capacity policy from any reader
pub fn load_capacity_policy_from_reader<R: std::io::Read>(reader: R) -> Result<CapacityPolicy, ConfigError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut settings = HashMap::new();

    for result in csv_reader.records() {
        let record = result?;
        let key = record.get(0).unwrap_or_default().trim().to_string();
        let value = record.get(1).unwrap_or_default().trim().to_string();
        settings.insert(key, value);
    }

    let required = |key: &str| {
        settings
            .get(key)
            .ok_or_else(|| ConfigError::MissingSetting(key.to_string()))
    };

    let max_monthly_intake = parse_decimal("max_monthly_intake", required("max_monthly_intake")?)?;
    let min_commitment_months = parse_u32("min_commitment_months", required("min_commitment_months")?)?;
    let min_investment = match settings.get("min_investment").map(|v| v.as_str()) {
        None | Some("") => None,
        Some(v) => Some(parse_decimal("min_investment", v)?),
    };

    Ok(CapacityPolicy {
        max_monthly_intake,
        min_commitment_months,
        min_investment,
    })
}
