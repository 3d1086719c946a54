//! Runge-Kutta 4 (RK4) numerical solver
//!
//! # Mathematical Background
//!
//! The envelope equation `r'' = a(r)` is integrated as the first-order
//! system y = (r, v), dy/dt = f(y) = (v, a(r)), with the classical scheme:
//!
//! ```text
//! k₁ = f(yₙ)
//! k₂ = f(yₙ + dt/2 · k₁)
//! k₃ = f(yₙ + dt/2 · k₂)
//! k₄ = f(yₙ + dt · k₃)
//!
//! yₙ₊₁ = yₙ + dt/6 · (k₁ + 2k₂ + 2k₃ + k₄)
//! ```
//!
//! Position and velocity advance together: the radius slope of each stage is
//! that stage's velocity estimate, the velocity slope is the force at that
//! stage's radius estimate.
//!
//! # Characteristics
//!
//! - **Order**: Fourth-order accurate (global error ~ O(dt⁴))
//! - **Complexity**: 4 force evaluations per step
//! - **Memory**: stages live on the stack; only the trajectory is allocated
//! - **Determinism**: fixed step, no adaptive control. Identical inputs give
//!   bit-identical trajectories.
//!
//! # Example
//!
//! ```rust
//! use beam_rs::physics::BeamConfig;
//! use beam_rs::solver::{DriftSegment, RK4Solver, Scenario, Solver, SolverConfiguration};
//!
//! let scenario = Scenario::drift(
//!     &BeamConfig::reference(),
//!     &DriftSegment::full_current(3.0e-3, 2.0).unwrap(),
//! ).unwrap();
//!
//! let trajectory = RK4Solver::new().solve(&scenario, &SolverConfiguration::default()).unwrap();
//! assert_eq!(trajectory.steps, 1668);
//! ```

use crate::error::BeamResult;
use crate::solver::{evaluate, validate_state, Recorder, Scenario, Solver, SolverConfiguration, Trajectory};

// =================================================================================================
// RK4 Solver
// =================================================================================================

/// Classical fourth-order Runge-Kutta solver
///
/// # Algorithm
///
/// 1. Start with initial state y₀
/// 2. For each time step n = 0, 1, 2, ..., N-1:
///    - **Stage 1**: k₁ = f(yₙ), slope at the beginning of the interval
///    - **Stage 2**: k₂ = f(yₙ + dt/2·k₁), midpoint slope from k₁
///    - **Stage 3**: k₃ = f(yₙ + dt/2·k₂), midpoint slope from k₂
///    - **Stage 4**: k₄ = f(yₙ + dt·k₃), end slope from k₃
///    - **Update**: yₙ₊₁ = yₙ + dt/6·(k₁ + 2k₂ + 2k₃ + k₄)
/// 3. Return the trajectory
///
/// # Error Analysis
///
/// - **Local truncation error**: O(dt⁵) per step
/// - **Global error**: O(dt⁴) after T/dt steps
///
/// Halving dt reduces the error by a factor of 16.
#[derive(Debug, Clone, Copy, Default)]
pub struct RK4Solver;

impl RK4Solver {
    /// Create a new RK4 solver
    ///
    /// # Example
    ///
    /// ```rust
    /// use beam_rs::solver::{RK4Solver, Solver};
    ///
    /// let solver = RK4Solver::new();
    /// assert_eq!(solver.name(), "Runge Kutta (RK4)");
    /// ```
    pub fn new() -> Self {
        Self
    }
}

impl Solver for RK4Solver {
    fn solve(&self, scenario: &Scenario, config: &SolverConfiguration) -> BeamResult<Trajectory> {
        // ====== Step 1: Validation ======

        scenario.validate()?;
        let (time_steps, dt) = config.plan(scenario.total_time)?;

        let model = scenario.model.as_ref();
        let mut state = scenario.initial_state;
        validate_state(&state, 0)?;
        evaluate(model, &state, 0)?;

        // ====== Step 2: Setup ======

        let half_dt = dt / 2.0;
        let sixth_dt = dt / 6.0;
        let mut recorder = Recorder::new(state, time_steps, dt, config.sample_stride);

        // ====== Step 3: Time Integration ======

        for step in 0..time_steps {
            let k1 = evaluate(model, &state, step)?;
            let k2 = evaluate(model, &(state + k1 * half_dt), step)?;
            let k3 = evaluate(model, &(state + k2 * half_dt), step)?;
            let k4 = evaluate(model, &(state + k3 * dt), step)?;

            // Simpson weights 1-2-2-1
            state = state + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * sixth_dt;

            validate_state(&state, step + 1)?;
            recorder.record(step + 1, state);
        }

        // ====== Step 4: Build Result ======

        let mut trajectory = recorder.finish("Runge-Kutta 4", scenario.get_model_name())?;
        trajectory.add_metadata("function evaluations", &(4 * time_steps).to_string());

        Ok(trajectory)
    }

    fn name(&self) -> &'static str {
        "Runge Kutta (RK4)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BeamError;
    use crate::physics::{BeamConfig, BeamState, PhysicalModel};
    use crate::solver::DriftSegment;
    use approx::assert_relative_eq;

    // ====== Mock Models for Testing ======

    /// r'' = g, exact: r(t) = r₀ + g t² / 2
    struct ConstantAcceleration {
        acceleration: f64,
    }

    impl PhysicalModel for ConstantAcceleration {
        fn derivative(&self, state: &BeamState) -> BeamResult<BeamState> {
            Ok(BeamState::new(state.radial_velocity(), self.acceleration))
        }

        fn name(&self) -> &str {
            "Constant Acceleration"
        }
    }

    /// r'' = -ω² r, exact: r(t) = cos(ωt)
    struct HarmonicOscillator {
        omega: f64,
    }

    impl PhysicalModel for HarmonicOscillator {
        fn derivative(&self, state: &BeamState) -> BeamResult<BeamState> {
            Ok(BeamState::new(
                state.radial_velocity(),
                -self.omega * self.omega * state.radius(),
            ))
        }

        fn name(&self) -> &str {
            "Harmonic Oscillator"
        }
    }

    /// r'' = -g: pulls the radius through zero
    struct Collapse;

    impl PhysicalModel for Collapse {
        fn derivative(&self, state: &BeamState) -> BeamResult<BeamState> {
            crate::models::space_charge::check_radius(state.radius())?;
            Ok(BeamState::new(state.radial_velocity(), -10.0))
        }

        fn name(&self) -> &str {
            "Collapse"
        }
    }

    // ====== Solver creation tests ======

    #[test]
    fn test_rk4_solver_default() {
        let solver = RK4Solver::default();
        assert_eq!(solver.name(), "Runge Kutta (RK4)");
    }

    // ====== Numerical accuracy tests ======

    #[test]
    fn test_rk4_constant_acceleration_is_exact() {
        let scenario = Scenario::new(
            Box::new(ConstantAcceleration { acceleration: 2.0 }),
            BeamState::at_rest(1.0),
            3.0,
        );
        let config = SolverConfiguration::fixed_count(30);
        let trajectory = RK4Solver::new().solve(&scenario, &config).unwrap();

        assert_eq!(trajectory.len(), 31);
        assert_relative_eq!(trajectory.final_radius(), 1.0 + 0.5 * 2.0 * 9.0, max_relative = 1e-12);
        assert_relative_eq!(trajectory.final_state().radial_velocity(), 6.0, max_relative = 1e-12);
    }

    #[test]
    fn test_rk4_harmonic_oscillator() {
        let omega = 1.0;
        let total_time = 2.0 * std::f64::consts::PI;
        let scenario = Scenario::new(
            Box::new(HarmonicOscillator { omega }),
            BeamState::at_rest(1.0),
            total_time,
        );
        let config = SolverConfiguration::fixed_count(1000);
        let trajectory = RK4Solver::new().solve(&scenario, &config).unwrap();

        // One full period: back to the start
        assert!((trajectory.final_radius() - 1.0).abs() < 1e-8);
        assert!(trajectory.final_state().radial_velocity().abs() < 1e-8);
    }

    #[test]
    fn test_rk4_crosses_zero_position() {
        // Half a period: cos goes from 1 to -1 through 0
        let scenario = Scenario::new(
            Box::new(HarmonicOscillator { omega: 1.0 }),
            BeamState::at_rest(1.0),
            std::f64::consts::PI,
        );
        let trajectory = RK4Solver::new()
            .solve(&scenario, &SolverConfiguration::fixed_count(500))
            .unwrap();

        assert!(trajectory.radii().iter().any(|&r| r < 0.0));
        assert!((trajectory.final_radius() + 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_rk4_convergence() {
        let omega: f64 = 1.0;
        let total_time: f64 = 5.0;
        let exact = (omega * total_time).cos();

        let errors: Vec<f64> = [50, 100, 200, 400]
            .iter()
            .map(|&steps| {
                let scenario = Scenario::new(
                    Box::new(HarmonicOscillator { omega }),
                    BeamState::at_rest(1.0),
                    total_time,
                );
                let trajectory = RK4Solver::new()
                    .solve(&scenario, &SolverConfiguration::fixed_count(steps))
                    .unwrap();
                (trajectory.final_radius() - exact).abs()
            })
            .collect();

        // error(dt/2) ≈ error(dt) / 16
        for i in 0..errors.len() - 1 {
            let ratio = errors[i] / errors[i + 1];
            assert!(
                ratio > 12.0 && ratio < 20.0,
                "Convergence ratio {} is not fourth-order at step {}",
                ratio,
                i
            );
        }
    }

    // ====== Trajectory layout ======

    #[test]
    fn test_rk4_time_points_inclusive() {
        let config = BeamConfig::reference();
        let segment = DriftSegment::full_current(3.0e-3, 0.6).unwrap();
        let scenario = Scenario::drift(&config, &segment).unwrap();
        let trajectory = RK4Solver::new()
            .solve(&scenario, &SolverConfiguration::default())
            .unwrap();

        assert_eq!(trajectory.len(), trajectory.steps + 1);
        assert_eq!(trajectory.time_points[0], 0.0);
        assert_relative_eq!(
            trajectory.final_time(),
            trajectory.steps as f64 * 1.0e-8,
            max_relative = 1e-12
        );
        assert_eq!(trajectory.get_metadata("solver"), Some("Runge-Kutta 4"));
    }

    #[test]
    fn test_rk4_sampling_stride() {
        let scenario = Scenario::new(
            Box::new(ConstantAcceleration { acceleration: 1.0 }),
            BeamState::at_rest(1.0),
            1.0,
        );
        let full = RK4Solver::new()
            .solve(&scenario, &SolverConfiguration::fixed_count(100))
            .unwrap();
        let sparse = RK4Solver::new()
            .solve(&scenario, &SolverConfiguration::fixed_count(100).with_sample_stride(30))
            .unwrap();

        // 0, 30, 60, 90, 100
        assert_eq!(sparse.len(), 5);
        assert_eq!(sparse.final_radius(), full.final_radius());
    }

    #[test]
    fn test_rk4_is_deterministic() {
        let config = BeamConfig::reference();
        let segment = DriftSegment::new(3.0e-3, 1.0, 0.7).unwrap();

        let run = || {
            let scenario = Scenario::drift(&config, &segment).unwrap();
            RK4Solver::new()
                .solve(&scenario, &SolverConfiguration::default())
                .unwrap()
                .radii()
        };

        let first = run();
        let second = run();
        assert_eq!(first.len(), second.len());
        assert!(first.iter().zip(&second).all(|(a, b)| a.to_bits() == b.to_bits()));
    }

    // ====== Failure modes ======

    #[test]
    fn test_rk4_reports_singularity() {
        let scenario = Scenario::new(Box::new(Collapse), BeamState::at_rest(1.0), 2.0);
        let result = RK4Solver::new().solve(&scenario, &SolverConfiguration::fixed_count(100));
        assert!(matches!(result, Err(BeamError::Singularity { .. })));
    }

    #[test]
    fn test_rk4_rejects_singular_initial_state() {
        let scenario = Scenario::new(Box::new(Collapse), BeamState::at_rest(0.0), 1.0);
        let result = RK4Solver::new().solve(&scenario, &SolverConfiguration::fixed_count(10));
        assert!(matches!(result, Err(BeamError::Singularity { step: 0, .. })));
    }
}
