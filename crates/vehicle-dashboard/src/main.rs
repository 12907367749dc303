//! Render the vehicle sales dashboard as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use vehicle_dashboard::{DashboardState, commands};
use vehicle_processing::{DEFAULT_DATA_PATH, ImputationConfig, VehicleDataset};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Render the vehicle sales dashboard as Plotly JSON",
    long_about = "Prepares the vehicle dataset, applies the sidebar and panel options given \
                  as flags, and writes the rendered dashboard view as JSON.\n\n\
                  EXAMPLES:\n  \
                  # Every panel expanded with the ggplot2 template\n  \
                  vehicle-dashboard --expand-all --template ggplot2\n\n  \
                  # One scatter plot colored by paint color\n  \
                  vehicle-dashboard -p scatter_price_odometer --color paint_color --pretty"
)]
struct Args {
    /// Path to the CSV file to explore
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    input: PathBuf,

    /// Plot template (plotly, ggplot2, seaborn, simple_white, none)
    #[arg(short, long, default_value = "plotly")]
    template: String,

    /// Print counts on histogram bars
    #[arg(long)]
    bar_text: bool,

    /// Field used to color scatter plots
    #[arg(short, long, default_value = "price")]
    color: String,

    /// Expand every chart panel
    #[arg(long)]
    expand_all: bool,

    /// Expand one panel (repeatable)
    #[arg(short, long = "panel")]
    panels: Vec<String>,

    /// Page to render (plots, correlations, contact)
    #[arg(long, default_value = "plots")]
    page: String,

    /// Write the view to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

/// Initialize the tracing subscriber.
///
/// Logs go to stderr so stdout carries only the JSON view.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet);

    let config = ImputationConfig::builder().data_path(&args.input).build()?;
    let dataset = VehicleDataset::prepare(&config)
        .with_context(|| format!("Failed to prepare {}", args.input.display()))?;
    info!("Prepared {} rows from {}", dataset.len(), args.input.display());

    let state = DashboardState::new(dataset);
    apply_args(&state, &args)?;

    let view = commands::render_dashboard(&state)?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&view)?
    } else {
        serde_json::to_string(&view)?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!("Dashboard view saved: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Apply the flags as widget interactions.
fn apply_args(state: &DashboardState, args: &Args) -> Result<()> {
    commands::set_template(state, &args.template)?;
    commands::set_show_bar_text(state, args.bar_text);
    commands::set_color_field(state, &args.color)?;

    if args.expand_all {
        commands::expand_all_panels(state);
    }
    for panel in &args.panels {
        commands::set_panel_expanded(state, panel, true)?;
    }

    commands::navigate(state, &args.page)?;
    Ok(())
}
