//! Command-line parsing for the programmatic revenue reporter.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dw", version, about = "Programmatic revenue reporter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a CSV, filter it, and print metrics + health alerts.
    Report(ReportArgs),
    /// Validate a CSV and print the verdict only.
    Validate(ValidateArgs),
    /// Generate a synthetic sample CSV.
    Sample(SampleArgs),
}

/// Options for the full report run.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Input CSV with one row per (date, source).
    #[arg(long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Use generated sample data instead of a CSV file.
    #[arg(long)]
    pub sample: bool,

    /// Random seed for sample generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Start of the date range (inclusive, YYYY-MM-DD).
    ///
    /// Supplying only one of --from/--to disables date filtering; sources
    /// are still applied.
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// End of the date range (inclusive, YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Source to include (repeatable). Defaults to every source present.
    #[arg(long = "source", value_name = "NAME")]
    pub sources: Vec<String>,

    /// Show the top-N sources by revenue.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Export the filtered dataset to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the computed report (metrics + alerts) to JSON.
    #[arg(long = "export-report", value_name = "JSON")]
    pub export_report: Option<PathBuf>,
}

/// Options for validation only.
#[derive(Debug, Parser)]
pub struct ValidateArgs {
    /// Input CSV to validate.
    #[arg(long, value_name = "CSV")]
    pub input: PathBuf,
}

/// Options for sample generation.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,

    /// First sample date.
    #[arg(long, default_value = "2024-01-01")]
    pub start: NaiveDate,

    /// Last sample date.
    #[arg(long, default_value = "2024-01-31")]
    pub end: NaiveDate,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
