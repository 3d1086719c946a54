//! Example: Reference beam line study
//!
//! Argon 1+ at 3 keV and 1 μA, 3 mm initial radius.
//!
//! ## Structure
//!
//! **Phase 1 - Reference lines**
//! - A: 2 m drift, open aperture, 3 m drift at full current
//! - B: 2 m drift, 1σ cut, 3 m drift at 68.2 % of the current
//!
//! **Phase 2 - Aperture sweep**
//! - Cut from 0.5σ to 3σ with the transmission derived from the cut
//!
//! **Phase 3 - Solver comparison**
//! - RK4 against forward Euler on the 2 m drift
//!
//! Run with `cargo run --example reference_scenarios --features parallel`.

use std::time::Instant;

use beam_rs::{
    models::ApertureSpec,
    physics::BeamParameters,
    pipeline::{run_batch, ScenarioSpec, TransmissionPolicy},
    solver::{DriftSegment, EulerSolver, RK4Solver, Scenario, Solver, SolverConfiguration},
};

/// Prints a titled section banner to stdout.
fn print_section(title: &str) {
    println!("\n═══════════════════════════════════════════════════════");
    println!("  {title}");
    println!("═══════════════════════════════════════════════════════\n");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let params = BeamParameters::reference();

    // =========================================================================
    // Phase 1 - Reference lines
    // =========================================================================

    print_section("Reference lines");

    for (name, spec) in [("A", ScenarioSpec::reference_a()), ("B", ScenarioSpec::reference_b())] {
        let outcome = spec.run()?;
        println!(
            "{name}: {} | transmission {} | final radius {:.3} mm",
            outcome.cut,
            outcome.transmission,
            outcome.final_radius_mm()
        );
    }

    // =========================================================================
    // Phase 2 - Aperture sweep
    // =========================================================================

    print_section("Aperture sweep (transmission from cut)");

    let sigmas = [0.5, 1.0, 1.5, 2.0, 2.5, 3.0];
    let specs = sigmas
        .iter()
        .map(|&sigma| {
            Ok(ScenarioSpec::new(
                params,
                2.0,
                ApertureSpec::new(sigma)?,
                3.0,
                TransmissionPolicy::FromAperture,
            ))
        })
        .collect::<Result<Vec<_>, beam_rs::error::BeamError>>()?;

    let start = Instant::now();
    let outcomes = run_batch(&specs);
    let elapsed = start.elapsed().as_secs_f64();

    println!("{:>6} {:>14} {:>14} {:>16}", "σ", "aperture (mm)", "transmission", "final (mm)");
    for (sigma, outcome) in sigmas.iter().zip(outcomes) {
        let outcome = outcome?;
        println!(
            "{:>6.1} {:>14.3} {:>14.4} {:>16.3}",
            sigma,
            outcome.cut.aperture_radius_mm(),
            outcome.transmission,
            outcome.final_radius_mm()
        );
    }
    println!("\n{} lines in {:.2} s", sigmas.len(), elapsed);

    // =========================================================================
    // Phase 3 - Solver comparison
    // =========================================================================

    print_section("RK4 vs Euler, 2 m drift");

    let segment = DriftSegment::full_current(params.initial_radius, 2.0)?;
    let configuration = SolverConfiguration::default();
    let solvers: [&dyn Solver; 2] = [&RK4Solver, &EulerSolver];

    let mut radii = Vec::new();
    for solver in solvers {
        let scenario = Scenario::drift(&params.config, &segment)?;
        let start = Instant::now();
        let trajectory = solver.solve(&scenario, &configuration)?;
        println!(
            "{:<18} {:.6} mm  ({} steps, {:.3} ms)",
            solver.name(),
            trajectory.final_radius() * 1.0e3,
            trajectory.steps,
            start.elapsed().as_secs_f64() * 1.0e3
        );
        radii.push(trajectory.final_radius());
    }
    println!("Relative gap: {:.2e}", (radii[0] - radii[1]).abs() / radii[0]);

    Ok(())
}
