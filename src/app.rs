//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads or generates the dataset
//! - runs the validate -> filter -> aggregate -> alert pipeline
//! - prints the report
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, ReportArgs, SampleArgs, ValidateArgs};
use crate::data::{SampleConfig, generate_sample};
use crate::domain::{FilterSelection, Record};
use crate::error::AppError;
use crate::io::{ReportFile, load_dataset, write_dataset_csv, write_report_json};

pub mod pipeline;

/// Entry point for the `dw` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Validate(args) => handle_validate(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let dataset = load_or_generate(&args)?;
    let selection = selection_from_args(&args);

    let run = pipeline::run_report(&dataset, &selection, args.top)?;

    // Alerts lead the report so a degraded source is the first thing seen.
    print!("{}", crate::report::format_alerts(&run.alerts));
    println!();
    print!("{}", crate::report::format_run_summary(&run.filtered, &run.global));
    print!("{}", crate::report::format_source_table(&run.by_source));
    println!();
    print!("{}", crate::report::format_top_sources(&run.top_sources));

    if let Some(path) = &args.export {
        write_dataset_csv(path, &run.filtered)?;
    }
    if let Some(path) = &args.export_report {
        let report = ReportFile::new(&run.by_source, &run.global, &run.alerts);
        write_report_json(path, &report)?;
    }

    Ok(())
}

fn handle_validate(args: ValidateArgs) -> Result<(), AppError> {
    let dataset = load_dataset(&args.input)?;
    println!("Data valid: {} rows.", dataset.len());
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        start: args.start,
        end: args.end,
        seed: args.seed,
    };
    let records = generate_sample(&config)?;
    write_dataset_csv(&args.out, &records)?;
    println!("Wrote {} rows to '{}'.", records.len(), args.out.display());
    Ok(())
}

fn load_or_generate(args: &ReportArgs) -> Result<Vec<Record>, AppError> {
    if let Some(path) = &args.input {
        return load_dataset(path);
    }
    if args.sample {
        let config = SampleConfig {
            seed: args.seed,
            ..SampleConfig::default()
        };
        return generate_sample(&config);
    }
    Err(AppError::new(2, "Provide --input <CSV> or --sample."))
}

/// Build the explicit filter selection from CLI flags.
///
/// One-sided date flags are a malformed range: date filtering is dropped and
/// only the source selection applies (defined fallback, not an error).
pub fn selection_from_args(args: &ReportArgs) -> FilterSelection {
    let mut date_bounds = Vec::new();
    if let Some(from) = args.from {
        date_bounds.push(from);
    }
    if let Some(to) = args.to {
        date_bounds.push(to);
    }

    let sources = if args.sources.is_empty() {
        None
    } else {
        Some(args.sources.iter().cloned().collect())
    };

    FilterSelection {
        date_bounds,
        sources,
    }
}
