//! beam-rs command line
//!
//! # Usage
//!
//! ```bash
//! # Reference scenarios A and B
//! beam-rs reference
//!
//! # One beam line, file values overridden by flags
//! beam-rs run --config line.toml --sigma 1 --derive-transmission --csv leg2.csv
//! ```
//!
//! Log level comes from `RUST_LOG` (default `info`, which shows the
//! aperture report).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use beam_rs::config::ScenarioFile;
use beam_rs::error::BeamResult;
use beam_rs::models::magnetic_to_electric_ratio;
use beam_rs::output::export::{export_trajectory_csv, CsvConfig, CsvMetadata};
use beam_rs::pipeline::{run_batch, ScenarioOutcome, ScenarioSpec};

/// Space-charge envelope of an ion beam through drift → aperture → drift
#[derive(Parser, Debug)]
#[command(name = "beam-rs", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one beam line
    Run(RunArgs),
    /// Run reference scenarios A (open aperture) and B (1σ cut)
    Reference,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// TOML scenario file (reference values when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// First drift length [m]
    #[arg(long)]
    leg1: Option<f64>,

    /// Knife-edge position in σ
    #[arg(long)]
    sigma: Option<f64>,

    /// Second drift length [m]
    #[arg(long)]
    leg2: Option<f64>,

    /// Current fraction after the aperture
    #[arg(long, conflicts_with = "derive_transmission")]
    transmission: Option<f64>,

    /// Use the Gaussian fraction inside the cut as transmission
    #[arg(long)]
    derive_transmission: bool,

    /// Write the second drift's envelope to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Rows kept in the CSV file
    #[arg(long, default_value_t = 1000)]
    csv_points: usize,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run(args),
        Command::Reference => reference(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(args: RunArgs) -> BeamResult<()> {
    let mut file = match &args.config {
        Some(path) => ScenarioFile::from_path(path)?,
        None => ScenarioFile::default(),
    };

    let line = &mut file.scenario;
    if let Some(leg1) = args.leg1 {
        line.leg1_length_m = leg1;
    }
    if let Some(sigma) = args.sigma {
        line.aperture_sigma = sigma;
    }
    if let Some(leg2) = args.leg2 {
        line.leg2_length_m = leg2;
    }
    if let Some(fraction) = args.transmission {
        line.transmission = Some(fraction);
        line.derive_transmission = false;
    }
    if args.derive_transmission {
        line.transmission = None;
        line.derive_transmission = true;
    }

    let spec = file.to_spec()?;
    print_beam(&spec)?;

    let outcome = spec.run()?;
    print_outcome("Beam line", &outcome);

    if let Some(path) = &args.csv {
        let csv = CsvConfig::default()
            .with_metadata(CsvMetadata::from_trajectory(&outcome.leg2))
            .n_points(args.csv_points);
        export_trajectory_csv(&outcome.leg2, spec.params.config.axial_velocity(), path, Some(&csv))?;
        println!("Envelope written to {}", path.display());
    }

    Ok(())
}

fn reference() -> BeamResult<()> {
    let specs = [ScenarioSpec::reference_a(), ScenarioSpec::reference_b()];
    print_beam(&specs[0])?;

    for (name, result) in ["Scenario A", "Scenario B"].iter().zip(run_batch(&specs)) {
        print_outcome(name, &result?);
    }
    Ok(())
}

fn print_beam(spec: &ScenarioSpec) -> BeamResult<()> {
    let config = &spec.params.config;
    println!("Beam: {}", config);
    println!(
        "Magnetic / electric force ratio: {:.3e}",
        magnetic_to_electric_ratio(config, spec.params.initial_radius)?
    );
    Ok(())
}

fn print_outcome(name: &str, outcome: &ScenarioOutcome) {
    println!("{}:", name);
    println!("  after leg 1: {:.4} mm", outcome.leg1.final_radius() * 1.0e3);
    println!("  {}", outcome.cut);
    println!("  transmission: {}", outcome.transmission);
    println!("  final radius: {:.4} mm", outcome.final_radius_mm());
}
