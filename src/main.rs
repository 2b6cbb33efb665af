//! Fund Carry CLI
//!
//! Runs a cycle stream through the carry engine and reports revenue and IRR

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fund_carry::config::{FundConfig, DEFAULT_CONFIG_PATH};
use fund_carry::cycle::load_cycles;
use fund_carry::projection::{
    project_carry_returns, FundEngine, DEFAULT_ANNUAL_RETURN, DEFAULT_PROJECTION_YEARS,
};
use fund_carry::report::{FundReport, MonthCalendar};
use rust_decimal::Decimal;
use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Default IRR horizon: four years of monthly periods
const DEFAULT_HORIZON_MONTHS: u32 = 48;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Directory holding carry_brackets.csv and capacity_policy.csv
    #[arg(short, long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a cycle stream and report revenue, IRR and risk
    Run {
        /// CSV file of proposed cycles
        #[arg(long)]
        cycles: PathBuf,

        /// IRR horizon in months from the first cycle
        #[arg(long)]
        horizon: Option<u32>,

        /// Calendar date of ordinal month 1 (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        /// Write the revenue series to a CSV file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show the carry bracket table and capacity policy
    Brackets,
    /// Project compounding carry for a single investment
    Growth {
        #[arg(long)]
        investment: Decimal,

        #[arg(long, default_value_t = DEFAULT_PROJECTION_YEARS)]
        years: u32,

        #[arg(long, default_value_t = DEFAULT_ANNUAL_RETURN)]
        annual_return: Decimal,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config_dir.as_deref())?;

    match cli.command {
        Commands::Run {
            cycles,
            horizon,
            start,
            json,
            output,
        } => run(config, &cycles, horizon, start, json, output.as_deref()),
        Commands::Brackets => {
            show_brackets(&config);
            Ok(())
        }
        Commands::Growth {
            investment,
            years,
            annual_return,
        } => growth(&config, investment, years, annual_return),
    }
}

fn load_config(dir: Option<&Path>) -> Result<FundConfig> {
    let config = match dir {
        Some(dir) => FundConfig::from_csv_path(dir)
            .with_context(|| format!("Failed to load fund config from {}", dir.display()))?,
        None if Path::new(DEFAULT_CONFIG_PATH).is_dir() => FundConfig::from_csv()
            .with_context(|| format!("Failed to load fund config from {}", DEFAULT_CONFIG_PATH))?,
        None => {
            log::info!("No config directory found, using pilot defaults");
            FundConfig::default_pilot()
        }
    };
    config
        .with_overrides(|key| env::var(key).ok())
        .context("Invalid configuration override in environment")
}

fn run(
    config: FundConfig,
    cycles_path: &Path,
    horizon: Option<u32>,
    start: Option<NaiveDate>,
    json: bool,
    output: Option<&Path>,
) -> Result<()> {
    let horizon_months = match horizon {
        Some(h) => h,
        None => env::var("HORIZON_MONTHS")
            .ok()
            .map(|s| s.parse::<u32>())
            .transpose()
            .context("HORIZON_MONTHS must be a whole number of months")?
            .unwrap_or(DEFAULT_HORIZON_MONTHS),
    };

    let cycles = load_cycles(cycles_path)
        .with_context(|| format!("Failed to load cycles from {}", cycles_path.display()))?;
    log::info!("Loaded {} cycles from {}", cycles.len(), cycles_path.display());

    let engine = FundEngine::new(config);
    let outcome = engine.run(&cycles);
    let irr = engine.project_irr_detail(&outcome.state, horizon_months);
    let calendar = start.map(MonthCalendar::new);
    let report = FundReport::build(&outcome, irr, horizon_months, calendar.as_ref());

    if let Some(path) = output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        report.write_csv(file)?;
        log::info!("Revenue series written to {}", path.display());
    }

    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &FundReport) {
    println!("Fund Carry Report");
    println!("=================\n");

    println!(
        "{:>5} {:>8} {:<20} {:<11} {:>14} {:>6} {:>12} {:>12} {:>14}",
        "Cycle", "Period", "Investor", "Kind", "Invested", "Carry", "Commission", "CarryRev", "Cumulative"
    );
    println!("{}", "-".repeat(110));
    for row in report.rows() {
        println!(
            "{:>5} {:>8} {:<20} {:<11} {:>14.2} {:>5}% {:>12.2} {:>12.2} {:>14.2}",
            row.index,
            row.period,
            row.investor,
            row.kind,
            row.invested_amount,
            (row.carry_rate * Decimal::ONE_HUNDRED).normalize(),
            row.commission,
            row.carry,
            row.cumulative_revenue,
        );
    }

    let summary = &report.summary;
    println!("\nSummary:");
    println!("  Total Invested:   ${:.2}", summary.total_invested);
    println!("  Total Withdrawn:  ${:.2}", summary.total_withdrawn);
    println!("  Total Commission: ${:.2}", summary.total_commission);
    println!("  Total Carry:      ${:.2}", summary.total_carry);
    println!("  Total Revenue:    ${:.2}", summary.total_revenue);

    match (&report.irr, &report.irr_error) {
        (Some(irr), _) => println!(
            "  Projected IRR:    {:.2}% annual, {:.2}% over {} months",
            irr.annual_rate * 100.0,
            irr.horizon_return * 100.0,
            report.horizon_months
        ),
        (None, Some(err)) => println!("  Projected IRR:    unavailable ({})", err),
        (None, None) => {}
    }

    println!("\nCommission comparison:");
    for scenario in &report.commission_scenarios {
        println!(
            "  {:>4}% flat: ${:.2} ({:+.2} vs charged)",
            (scenario.rate * Decimal::ONE_HUNDRED).normalize(),
            scenario.commission,
            scenario.delta_vs_actual
        );
    }

    println!(
        "\nRisk: {} (score {:.3}, concentration {:.1}%, liquidity {:.1}%)",
        report.risk.status,
        report.risk.score,
        report.risk.concentration * 100.0,
        report.risk.liquidity_ratio * 100.0
    );
    for recommendation in &report.risk.recommendations {
        println!("  - {}", recommendation);
    }

    if !report.rejected.is_empty() {
        println!("\nRejected cycles:");
        for rejected in &report.rejected {
            println!("  Cycle {:>3}: {}", rejected.cycle.index, rejected.reason);
        }
    }
}

fn show_brackets(config: &FundConfig) {
    println!("Carry brackets:");
    for bracket in config.brackets.brackets() {
        let upper = bracket
            .upper_bound
            .map_or_else(|| "and above".to_string(), |u| format!("to ${}", u));
        println!(
            "  ${} {:<16} {:>5}%  {}",
            bracket.lower_bound,
            upper,
            (bracket.carry_rate * Decimal::ONE_HUNDRED).normalize(),
            bracket.name.as_deref().unwrap_or("")
        );
    }

    let capacity = &config.capacity;
    println!("\nCapacity policy:");
    println!("  Max monthly intake:    ${}", capacity.max_monthly_intake);
    println!("  Min commitment months: {}", capacity.min_commitment_months);
    match capacity.min_investment {
        Some(min) => println!("  Min investment:        ${}", min),
        None => println!("  Min investment:        none"),
    }
}

fn growth(config: &FundConfig, investment: Decimal, years: u32, annual_return: Decimal) -> Result<()> {
    let projection = project_carry_returns(&config.brackets, investment, years, annual_return)?;

    println!(
        "Investment ${:.2} at {}% carry, {}% annual return",
        projection.investment,
        (projection.carry_rate * Decimal::ONE_HUNDRED).normalize(),
        (annual_return * Decimal::ONE_HUNDRED).normalize()
    );
    for (year, carry) in projection.yearly_carry.iter().enumerate() {
        println!("  Year {:>2}: ${:.2}", year + 1, carry);
    }
    println!("  Total:   ${:.2}", projection.total_carry);
    println!("  Growth:  {:.2}% per year", projection.growth_rate * 100.0);
    Ok(())
}
