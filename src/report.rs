//! Run reports: revenue series, IRR, commission comparison and risk in one value
//!
//! Serialized as JSON for API consumers or written as CSV rows.

use crate::cycle::CycleKind;
use crate::projection::{
    standard_vs_premium, CommissionScenario, FundSummary, IrrProjection, RejectedCycle, RunOutcome,
};
use crate::risk::{assess, RiskAssessment, RiskLimits};
use crate::{Fraction, Money};
use chrono::{Months, NaiveDate};
use serde::Serialize;
use std::io::Write;

/// Maps ordinal cycle months to calendar months
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCalendar {
    /// Calendar date of ordinal month 1
    first_month: NaiveDate,
}

impl MonthCalendar {
    pub fn new(first_month: NaiveDate) -> Self {
        Self { first_month }
    }

    /// Calendar date of an ordinal month
    pub fn date_of(&self, month: u32) -> Option<NaiveDate> {
        if month == 0 {
            self.first_month.checked_sub_months(Months::new(1))
        } else {
            self.first_month.checked_add_months(Months::new(month - 1))
        }
    }

    /// "YYYY-MM" label, or "M<n>" when the date is out of range
    pub fn label(&self, month: u32) -> String {
        self.date_of(month)
            .map(|d| d.format("%Y-%m").to_string())
            .unwrap_or_else(|| format!("M{}", month))
    }
}

/// CSV row of the revenue series
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub index: u32,
    pub month: u32,
    pub period: String,
    pub investor: String,
    pub kind: CycleKind,
    pub invested_amount: Money,
    pub carry_rate: Fraction,
    pub commission: Money,
    pub carry: Money,
    pub cycle_revenue: Money,
    pub cumulative_revenue: Money,
}

/// Everything a consumer needs to display one fund run
#[derive(Debug, Clone, Serialize)]
pub struct FundReport {
    pub summary: FundSummary,
    pub periods: Vec<String>,
    pub rejected: Vec<RejectedCycle>,
    pub horizon_months: u32,
    pub irr: Option<IrrProjection>,
    pub irr_error: Option<String>,
    pub commission_scenarios: Vec<CommissionScenario>,
    pub risk: RiskAssessment,
}

impl FundReport {
    /// Assemble a report from a run outcome and its IRR projection result
    pub fn build<E: std::fmt::Display>(
        outcome: &RunOutcome,
        irr: Result<IrrProjection, E>,
        horizon_months: u32,
        calendar: Option<&MonthCalendar>,
    ) -> Self {
        let summary = outcome.summary();
        let periods = summary
            .rows
            .iter()
            .map(|row| period_label(calendar, row.month))
            .collect();
        let (irr, irr_error) = match irr {
            Ok(projection) => (Some(projection), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Self {
            summary,
            periods,
            rejected: outcome.rejected.clone(),
            horizon_months,
            irr,
            irr_error,
            commission_scenarios: standard_vs_premium(&outcome.state),
            risk: assess(&outcome.state, &RiskLimits::default()),
        }
    }

    /// Flatten the revenue series into CSV rows
    pub fn rows(&self) -> Vec<ReportRow> {
        self.summary
            .rows
            .iter()
            .zip(&self.periods)
            .map(|(row, period)| ReportRow {
                index: row.index,
                month: row.month,
                period: period.clone(),
                investor: row.investor.clone(),
                kind: row.kind,
                invested_amount: row.invested_amount,
                carry_rate: row.carry_rate,
                commission: row.commission,
                carry: row.carry,
                cycle_revenue: row.cycle_revenue,
                cumulative_revenue: row.cumulative_revenue,
            })
            .collect()
    }

    /// Write the revenue series as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in self.rows() {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn period_label(calendar: Option<&MonthCalendar>, month: u32) -> String {
    match calendar {
        Some(calendar) => calendar.label(month),
        None => format!("M{}", month),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FundConfig;
    use crate::cycle::Cycle;
    use crate::projection::FundEngine;
    use rust_decimal_macros::dec;

    fn outcome() -> (FundEngine, RunOutcome) {
        let engine = FundEngine::new(FundConfig::default_pilot());
        let outcome = engine.run(&[
            Cycle::commitment(0, "alpha", 1, dec!(72500), dec!(0.02)),
            Cycle::commitment(1, "alpha", 4, dec!(125000), dec!(0.02)),
            Cycle::commitment(2, "beta", 7, dec!(187500), dec!(0.01)),
        ]);
        (engine, outcome)
    }

    #[test]
    fn test_calendar_labels() {
        let calendar = MonthCalendar::new(NaiveDate::from_ymd_opt(2024, 11, 1).unwrap());
        assert_eq!(calendar.label(1), "2024-11");
        assert_eq!(calendar.label(3), "2025-01");
        assert_eq!(calendar.label(0), "2024-10");
    }

    #[test]
    fn test_report_rows_and_csv() {
        let (engine, outcome) = outcome();
        let calendar = MonthCalendar::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let irr = engine.project_irr_detail(&outcome.state, 48);
        let report = FundReport::build(&outcome, irr, 48, Some(&calendar));

        assert!(report.irr.is_some());
        assert_eq!(report.periods, vec!["2025-01", "2025-04", "2025-07"]);
        assert_eq!(report.commission_scenarios.len(), 2);

        let rows = report.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].kind, CycleKind::Commitment);
        assert_eq!(format!("{:<11}|", CycleKind::Withdrawal), "withdrawal |");
        assert_eq!(rows[2].cumulative_revenue, outcome.state.cumulative_revenue());

        let mut buffer = Vec::new();
        report.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("index,month,period,investor,kind"));
        assert!(lines.next().unwrap().contains(",commitment,"));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_irr_error_is_reported() {
        let engine = FundEngine::new(FundConfig::default_pilot());
        let outcome = engine.run(&[Cycle::commitment(0, "alpha", 1, dec!(72500), dec!(0.02))]);
        let irr = engine.project_irr_detail(&outcome.state, 12);
        let report = FundReport::build(&outcome, irr, 12, None);

        assert!(report.irr.is_none());
        assert!(report.irr_error.unwrap().contains("Insufficient data"));
        assert_eq!(report.periods, vec!["M1"]);
    }

    #[test]
    fn test_json_output() {
        let (engine, outcome) = outcome();
        let report = FundReport::build(&outcome, engine.project_irr_detail(&outcome.state, 48), 48, None);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"commission_scenarios\""));
        assert!(json.contains("\"horizon_months\": 48"));
    }
}
