//! WaterWise trainer CLI.
//!
//! Deterministic offline trainer producing a calibrated water-safety
//! classifier artifact.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use waterwise_trainer::{Dataset, GbdtParams, HyperGrid, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "waterwise-train")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train the WaterWise water safety classifier", long_about = None)]
struct Args {
    /// Input CSV dataset path (header row, lab-export column names accepted)
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for the artifact and its hash
    #[arg(short, long, default_value = "models")]
    output: PathBuf,

    /// Number of boosting trees
    #[arg(long, default_value = "50")]
    trees: usize,

    /// Stratified cross-validation folds for the grid search
    #[arg(long, default_value = "5")]
    folds: usize,

    /// Fraction of rows held out for threshold calibration
    #[arg(long, default_value = "0.2")]
    test_fraction: f64,

    /// Random seed for splitting, balancing, and subsampling
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("WaterWise trainer v{}", env!("CARGO_PKG_VERSION"));

    info!("Loading dataset from: {}", args.input.display());
    let dataset = Dataset::from_csv(&args.input).context("Failed to load dataset")?;

    let (safe, unsafe_count) = dataset.class_counts();
    info!(
        "Prepared {} rows ({} read, {} dropped): {} Safe / {} Unsafe",
        dataset.len(),
        dataset.rows_read,
        dataset.rows_dropped,
        safe,
        unsafe_count
    );

    let config = PipelineConfig {
        test_fraction: args.test_fraction,
        folds: args.folds,
        seed: args.seed,
        base: GbdtParams {
            num_trees: args.trees,
            seed: args.seed,
            ..GbdtParams::default()
        },
        grid: HyperGrid::default(),
    };

    info!("Training configuration:");
    info!("  Trees: {}", config.base.num_trees);
    info!("  Folds: {}", config.folds);
    info!("  Test fraction: {}", config.test_fraction);
    info!("  Seed: {}", config.seed);

    info!("Starting training...");
    let outcome = waterwise_trainer::train_pipeline(&dataset, &config)?;

    info!("Training complete!");
    info!("  Trees: {}", outcome.artifact.model.trees.len());
    info!("  CV Safe-class recall: {:.3}", outcome.cv_score);
    info!("  Threshold: {}", outcome.artifact.threshold);

    std::fs::create_dir_all(&args.output).context("Failed to create output directory")?;

    let artifact_path = args.output.join("artifact.json");
    outcome
        .artifact
        .save(&artifact_path)
        .context("Failed to write artifact")?;

    let report_path = args.output.join("calibration.json");
    let report = serde_json::to_string_pretty(&outcome.calibration)
        .context("Failed to serialize calibration report")?;
    std::fs::write(&report_path, report).context("Failed to write calibration report")?;

    info!("Saved calibrated artifact to {}", artifact_path.display());
    info!("Saved calibration report to {}", report_path.display());

    Ok(())
}
