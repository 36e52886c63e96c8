//! Offline backwash simulation
//!
//! Runs the prediction engine once from the command line, without the HTTP
//! service. Useful for tuning thresholds against a recorded curve file.
//!
//! # Usage
//! ```bash
//! ./simulate --turbidity 1.2 --fouling moderate --steps 30 --seed 7
//! ./simulate --curves plant_day.json --format text
//! ```
//!
//! A curve file is a JSON object with any of `turbidity_curve`, `ph_curve`
//! and `temperature_curve`.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use uf_backwash::physics_engine::{self, RandNoise};
use uf_backwash::types::{CurveSet, FoulingStatus, ParameterSet, PredictionResult};
use uf_backwash::validation::{self, MAX_TIME_STEPS};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Parser, Debug)]
#[command(name = "simulate")]
#[command(about = "Run one UF backwash simulation and print the result")]
#[command(version)]
struct Args {
    /// Feed turbidity (NTU)
    #[arg(long, default_value_t = 0.5)]
    turbidity: f64,

    /// Feed pH
    #[arg(long, default_value_t = 7.0)]
    ph: f64,

    /// Feed temperature (°C)
    #[arg(long, default_value_t = 25.0)]
    temperature: f64,

    /// Feed flow rate (GPM)
    #[arg(long, default_value_t = 20.0)]
    flow_rate: f64,

    /// Inlet pressure (PSIG)
    #[arg(long, default_value_t = 40.0)]
    inlet_pressure: f64,

    /// Membrane fouling status (clean, mild, moderate, severe, critical)
    #[arg(long, default_value = "clean")]
    fouling: String,

    /// Simulation horizon in steps
    #[arg(long, default_value_t = 20)]
    steps: i64,

    /// Backwash trigger threshold (PSIG). Ignored with --curves.
    #[arg(long, default_value_t = 7.0)]
    threshold: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with water-quality curves; selects the curve-driven engine
    #[arg(long, value_name = "FILE")]
    curves: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

fn load_curves(path: &Path) -> Result<CurveSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read curve file {}", path.display()))?;
    let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&text)
        .with_context(|| format!("Curve file {} is not a JSON object", path.display()))?;
    Ok(validation::parse_curves(&raw)?)
}

fn print_text(result: &PredictionResult) {
    println!("Pressure trajectory ({} steps):", result.pressure_data.len());
    for (step, pressure) in result.pressure_data.iter().enumerate() {
        let marker = if result.backwash_points.iter().any(|e| e.time_step == step) {
            "  <- backwash"
        } else {
            ""
        };
        println!("  {step:>3}  {pressure:>6.2} PSIG{marker}");
    }

    println!();
    println!("Backwash events: {}", result.backwash_count());
    for event in &result.backwash_points {
        println!(
            "  step {:>3}: {:.2} PSIG, intensity {:.1}, {} s",
            event.time_step, event.pressure, event.intensity, event.duration
        );
    }

    println!();
    if let Some(peak) = result.peak_pressure() {
        println!("Peak pressure:    {peak:.2} PSIG");
    }
    println!("Fouling rate:     {:.3}", result.fouling_rate);
    println!("Efficiency:       {:.3}", result.efficiency);
    println!("Confidence score: {:.2}", result.confidence_score);

    println!();
    println!("Recommendations:");
    for rec in &result.recommendations {
        println!("  - {rec}");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let parameters = ParameterSet {
        turbidity: args.turbidity,
        ph: args.ph,
        temperature: args.temperature,
        flow_rate: args.flow_rate,
        inlet_pressure: args.inlet_pressure,
    };
    validation::validate_parameter_set(&parameters)?;
    let fouling: FoulingStatus = validation::validate_fouling_status(&args.fouling)?;
    let time_steps = validation::validate_time_steps(args.steps, MAX_TIME_STEPS)?;

    let mut noise = match args.seed {
        Some(seed) => RandNoise::seeded(seed),
        None => RandNoise::from_entropy(),
    };

    let result = match &args.curves {
        Some(path) => {
            let curves = load_curves(path)?;
            physics_engine::run_with_curves(&parameters, &curves, &fouling, time_steps, &mut noise)
        }
        None => {
            let threshold = validation::validate_pressure_threshold(args.threshold)?;
            physics_engine::run_basic(&parameters, &fouling, time_steps, threshold, &mut noise)
        }
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print_text(&result),
    }

    Ok(())
}
