use analytics::{AnalyticsEngine, AnalyticsSettings};
use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{Config, ReportFormat, load_config};
use core_types::InvalidTradePolicy;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod input;
mod render;

/// The main entry point for the Trade Insights application.
fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the variables may come from the shell.
    dotenvy::dotenv().ok();

    // Logs go to stderr so that `--format json` output stays pipeable.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => handle_analyze(args),
        Commands::Bands(args) => handle_bands(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Performance analytics for day-trading sessions.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a trade export and print the performance report.
    Analyze(AnalyzeArgs),
    /// Print the effective time-of-day category bands.
    Bands(BandsArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// The trade file to analyse (.json or .csv).
    #[arg(long, short)]
    input: PathBuf,

    /// A TOML configuration file.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Overrides the configured output format.
    #[arg(long, short, value_enum)]
    format: Option<ReportFormat>,

    /// Leave out trades with an invalid timestamp instead of failing.
    #[arg(long)]
    skip_invalid: bool,
}

#[derive(Parser)]
struct BandsArgs {
    /// A TOML configuration file.
    #[arg(long, short)]
    config: Option<PathBuf>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    load_config(path).context("Failed to load configuration")
}

fn handle_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = load(args.config.as_deref())?;
    let policy = if args.skip_invalid {
        InvalidTradePolicy::Skip
    } else {
        config.analysis.invalid_trade_policy()
    };

    let raw_trades = input::load_trades(&args.input, config.input.csv_delimiter)?;

    let engine = AnalyticsEngine::new(AnalyticsSettings {
        categories: config.analysis.categories,
        daily_risk_free_rate: config.analysis.daily_risk_free_rate,
    })?;
    let report = engine
        .analyze_raw(&raw_trades, policy)
        .with_context(|| format!("Failed to analyse {}", args.input.display()))?;
    for skipped in &report.rejected {
        tracing::warn!("{skipped}");
    }

    match args.format.unwrap_or(config.output.format) {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Table => render::print_report(&report),
    }
    Ok(())
}

fn handle_bands(args: BandsArgs) -> anyhow::Result<()> {
    let config = load(args.config.as_deref())?;
    let engine = AnalyticsEngine::new(AnalyticsSettings {
        categories: config.analysis.categories,
        daily_risk_free_rate: config.analysis.daily_risk_free_rate,
    })?;
    println!("{}", render::bands_table(engine.categories()));
    Ok(())
}
