//! CLI entry point for the vehicle imputation pipeline.

use anyhow::{Result, anyhow};
use clap::Parser;
use polars::prelude::*;
use std::path::PathBuf;
use tracing::{error, info};
use vehicle_processing::pipeline::{target_null_counts, validate_columns};
use vehicle_processing::{
    DEFAULT_DATA_PATH, ImputationConfig, ImputationPipeline, ImputationReport, VehicleDataset,
    load_vehicles_csv,
};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Fill missing values in the vehicle sales dataset",
    long_about = "Fills model_year, odometer, cylinders, paint_color and is_4wd using \
                  grouped median/mode fallbacks.\n\n\
                  EXAMPLES:\n  \
                  # Impute the default dataset and print a summary\n  \
                  vehicle-processing\n\n  \
                  # Print the JSON report for another dataset\n  \
                  vehicle-processing -i data/vehicles_us.csv --json\n\n  \
                  # Preview missing counts without imputing\n  \
                  vehicle-processing --dry-run"
)]
struct Args {
    /// Path to the CSV file to process
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    input: PathBuf,

    /// Show missing-value counts without imputing
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Category written into missing paint colors
    #[arg(long, default_value = "unknown")]
    unknown_paint_color: String,

    /// Value written into missing four-wheel-drive flags (0 or 1)
    #[arg(long, default_value = "0")]
    default_4wd: f64,

    /// Output the JSON report to stdout instead of a human-readable summary
    ///
    /// Disables all logs; useful for piping: `... --json | jq .steps`
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = ImputationConfig::builder()
        .data_path(&args.input)
        .unknown_paint_color(&args.unknown_paint_color)
        .default_is_4wd(args.default_4wd)
        .build()?;

    if args.dry_run {
        let data = load_vehicles_csv(&config.data_path, config.infer_schema_length)?;
        return run_dry_run(&args, &data);
    }

    let quiet = args.quiet || args.json;
    let pipeline = ImputationPipeline::builder()
        .config(config.clone())
        .on_progress(move |update| {
            if !quiet {
                info!(
                    "[{:.0}%] {}: {}",
                    update.progress * 100.0,
                    update.stage.display_name(),
                    update.message
                );
            }
        })
        .build()?;

    let data = load_vehicles_csv(&config.data_path, config.infer_schema_length)?;
    let dataset = match VehicleDataset::with_pipeline(data, &pipeline) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("Imputation failed: {}", e);
            return Err(anyhow!("Imputation failed: {}", e));
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(dataset.report())?);
    } else {
        print_summary(dataset.report());
    }

    Ok(())
}

/// Print missing-value counts and the planned fill rules.
///
/// Uses `println!` on purpose: the preview is the command's output, not a log.
fn run_dry_run(args: &Args, data: &DataFrame) -> Result<()> {
    println!("\n{}", "=".repeat(60));
    println!("DRY RUN - Missing values in {}", args.input.display());
    println!("{}\n", "=".repeat(60));

    println!("  Rows: {}", data.height());
    println!("  Columns: {}", data.width());
    println!();

    if let Err(e) = validate_columns(data) {
        println!("  ERROR: {}", e);
        println!("  Available columns: {:?}", data.get_column_names());
        return Err(e.into());
    }

    println!("{:<14} {:>10} {:>10}", "Column", "Missing", "Missing %");
    println!("{}", "-".repeat(36));
    for (column, missing) in target_null_counts(data)? {
        let pct = if data.height() == 0 {
            0.0
        } else {
            missing as f64 / data.height() as f64 * 100.0
        };
        println!("{:<14} {:>10} {:>9.1}%", column, missing, pct);
    }
    println!();

    println!("PLANNED RULES");
    println!("{}", "-".repeat(36));
    println!("  1. model_year  <- median by (model)");
    println!("  2. odometer    <- median by (model, model_year, condition, days_listed), then global median");
    println!("  3. cylinders   <- mode by (model, model_year, fuel), then global mode");
    println!("  4. paint_color <- \"{}\"", args.unknown_paint_color);
    println!("  5. is_4wd      <- {}", args.default_4wd);
    println!();

    Ok(())
}

fn print_summary(report: &ImputationReport) {
    println!("\n{}", "=".repeat(60));
    println!("IMPUTATION SUMMARY ({} rows, {}ms)", report.rows, report.duration_ms);
    println!("{}", "=".repeat(60));

    for step in &report.steps {
        println!("  - {}", step.describe());
    }
    println!();

    println!("{:<14} {:>8} {:>8}", "Column", "Before", "After");
    println!("{}", "-".repeat(32));
    for column in &report.columns {
        println!(
            "{:<14} {:>8} {:>8}",
            column.column, column.nulls_before, column.nulls_after
        );
    }

    if !report.warnings.is_empty() {
        println!();
        println!("WARNINGS");
        for warning in &report.warnings {
            println!("  ! {}", warning);
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["vehicle-processing"]).unwrap();
        assert_eq!(args.input, PathBuf::from(DEFAULT_DATA_PATH));
        assert!(!args.json);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_args_reject_export_flags() {
        for flag in ["--emit-report", "--output=results", "--output-name=cars"] {
            assert!(Args::try_parse_from(["vehicle-processing", flag]).is_err(), "{}", flag);
        }
    }
}
