//! WaterWise prediction CLI.
//!
//! Classifies a single water sample from command-line parameters and
//! prints a structured JSON verdict. On any failure a single
//! `{"error": ...}` object is printed and the process exits non-zero.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use waterwise_core::{decide, Sample, TrainedArtifact, Verdict};

#[derive(Parser, Debug)]
#[command(name = "waterwise-predict")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Predict water safety from measured parameters", long_about = None)]
struct Args {
    /// pH level of the water
    #[arg(long = "ph")]
    ph: f64,

    /// Turbidity of the water (NTU)
    #[arg(long)]
    turbidity: f64,

    /// Temperature of the water (Celsius)
    #[arg(long)]
    temperature: f64,

    /// Electrical conductivity of the water (uS/cm)
    #[arg(long)]
    conductivity: f64,

    /// Dissolved oxygen level (mg/L)
    #[arg(long)]
    dissolved_oxygen: f64,

    /// Salinity of the water (ppt)
    #[arg(long)]
    salinity: f64,

    /// Total dissolved solids (mg/L)
    #[arg(long)]
    total_dissolved_solids: f64,

    /// Hardness of the water (mg/L as CaCO3)
    #[arg(long)]
    hardness: f64,

    /// Alkalinity of the water (mg/L as CaCO3)
    #[arg(long)]
    alkalinity: f64,

    /// Chlorine level (mg/L)
    #[arg(long)]
    chlorine: f64,

    /// Total coliforms count (CFU/100 mL)
    #[arg(long)]
    total_coliforms: f64,

    /// E. coli count (CFU/100 mL)
    #[arg(long)]
    e_coli: f64,

    /// Path to the trained model artifact
    #[arg(long, default_value = "models/artifact.json")]
    model: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn run(args: &Args) -> Result<Verdict> {
    let sample = Sample {
        ph: args.ph,
        turbidity: args.turbidity,
        temperature: args.temperature,
        conductivity: args.conductivity,
        dissolved_oxygen: args.dissolved_oxygen,
        salinity: args.salinity,
        total_dissolved_solids: args.total_dissolved_solids,
        hardness: args.hardness,
        alkalinity: args.alkalinity,
        chlorine: args.chlorine,
        total_coliforms: args.total_coliforms,
        e_coli: args.e_coli,
    };

    let artifact = TrainedArtifact::load(&args.model)
        .with_context(|| format!("failed to load model from {}", args.model.display()))?;

    let verdict = decide(&artifact, &sample).context("classification failed")?;
    Ok(verdict)
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

fn main() -> ExitCode {
    // Argument errors follow the same JSON contract as runtime failures;
    // --help and --version keep their usual plain-text output.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err)
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) =>
        {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            println!("{}", error_json(&err.to_string()));
            return ExitCode::FAILURE;
        }
    };

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    // Logs go to stderr so stdout stays a single JSON object.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        // A pre-set subscriber only affects log routing, never the verdict.
        tracing::warn!("tracing subscriber already set");
    }

    match run(&args) {
        Ok(verdict) => {
            let json = serde_json::to_string_pretty(&verdict)
                .unwrap_or_else(|e| format!("{{\"error\": \"output serialization failed: {e}\"}}"));
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("{}", error_json(&format!("{err:#}")));
            ExitCode::FAILURE
        }
    }
}
