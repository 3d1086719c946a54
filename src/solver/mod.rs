//! Numerical solvers
//!
//! This module integrates the envelope equation provided by a physical model.
//!
//! # The Architecture (WHAT vs HOW)
//!
//! 1. **Scenario** (`Scenario`) - WHAT to solve
//!    - Physical model (equations)
//!    - Initial state and integration time
//!
//! 2. **Configuration** (`SolverConfiguration`) - HOW to solve
//!    - Step policy (fixed dt or fixed step count)
//!    - Step budget and trajectory sampling
//!
//! 3. **Solver** (`Solver` trait) - The numerical method
//!    - `RK4Solver`: classical fourth-order Runge-Kutta (default)
//!    - `EulerSolver`: forward Euler, reference for convergence studies
//!
//! # Envelope integration
//!
//! [`integrate`] is the entry point for one space-charge drift: it validates
//! the segment, builds the scenario (beam at rest radially, transit time
//! L / v_b) and runs RK4 with the configured step policy.
//!
//! ```rust
//! use beam_rs::physics::BeamConfig;
//! use beam_rs::solver::{integrate, SolverConfiguration};
//!
//! let config = BeamConfig::reference();
//! let trajectory = integrate(3.0e-3, 0.5, 1.0, &config, &SolverConfiguration::default()).unwrap();
//!
//! assert_eq!(trajectory.initial_state().radius(), 3.0e-3);
//! assert!(trajectory.final_radius() > 3.0e-3);
//! ```
//!
//! # Transit time
//!
//! The axial velocity is treated as constant, so a drift of length L lasts
//! L / v_b. This holds while the radial excursion stays small next to L.
//!
//! # Sequential by construction
//!
//! Step n+1 depends on step n; a single trajectory is never split across
//! threads. Independent scenarios can run in parallel (see
//! [`crate::pipeline::run_batch`]).
//!
//! # Error Handling
//!
//! Common errors:
//! - Invalid configuration (non-positive dt, zero steps, budget exceeded)
//! - Invalid segment (non-positive radius or length, transmission outside (0, 1])
//! - Radius reaching zero during integration (singular force)
//! - Non-finite values in the state

// =================================================================================================
// Module Declarations
// =================================================================================================
mod methods;
mod scenario;
mod segment;
mod traits;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use traits::{
    Solver, SolverConfiguration, StepPolicy, Trajectory, DEFAULT_MAX_STEPS, DEFAULT_TIME_STEP,
};

pub use scenario::Scenario;
pub use segment::DriftSegment;

pub use methods::{EulerSolver, RK4Solver};

use crate::error::{BeamError, BeamResult};
use crate::physics::{BeamConfig, BeamState, PhysicalModel};

// =================================================================================================
// Envelope integration
// =================================================================================================

/// Integrate one drift with RK4
///
/// # Arguments
///
/// * `initial_radius` - beam radius at the drift entrance \[m\]
/// * `drift_length` - drift length \[m\]
/// * `transmission_fraction` - share of the original current, in (0, 1]
/// * `config` - beam configuration
/// * `solver_config` - step policy and limits
///
/// # Errors
///
/// Domain errors are reported before any step is taken.
pub fn integrate(
    initial_radius: f64,
    drift_length: f64,
    transmission_fraction: f64,
    config: &BeamConfig,
    solver_config: &SolverConfiguration,
) -> BeamResult<Trajectory> {
    let segment = DriftSegment::new(initial_radius, drift_length, transmission_fraction)?;
    integrate_segment(&segment, config, solver_config)
}

/// Integrate a validated drift segment with RK4
pub fn integrate_segment(
    segment: &DriftSegment,
    config: &BeamConfig,
    solver_config: &SolverConfiguration,
) -> BeamResult<Trajectory> {
    let scenario = Scenario::drift(config, segment)?;
    let mut trajectory = RK4Solver::new().solve(&scenario, solver_config)?;

    trajectory.add_metadata("drift length", &segment.length.to_string());
    trajectory.add_metadata("transmission", &segment.transmission.to_string());

    log::debug!(
        "Drift of {} m at T = {}: {} steps of {:e} s, r {:.4e} -> {:.4e} m",
        segment.length,
        segment.transmission,
        trajectory.steps,
        trajectory.dt,
        segment.initial_radius,
        trajectory.final_radius()
    );

    Ok(trajectory)
}

// =================================================================================================
// Helper Functions
// =================================================================================================

/// Evaluate the model at a (stage) state
///
/// A domain rejection during integration is a singularity at `step` when the
/// stage state is finite (the radius collapsed), and a non-finite state
/// otherwise.
#[inline]
pub(crate) fn evaluate(model: &dyn PhysicalModel, state: &BeamState, step: usize) -> BeamResult<BeamState> {
    model.derivative(state).map_err(|error| match error {
        BeamError::Domain { .. } if !state.is_finite() => BeamError::NonFinite {
            step,
            quantity: "stage state",
        },
        BeamError::Domain { .. } => BeamError::Singularity {
            step,
            radius: state.radius(),
        },
        other => other,
    })
}

/// Validate a state after a step
///
/// Checks for NaN or Inf values only. Where the state is defined is the
/// model's call: a negative position is valid for an oscillator, while the
/// space-charge force rejects r <= 0 at every stage (see [`evaluate`]).
pub(crate) fn validate_state(state: &BeamState, step: usize) -> BeamResult<()> {
    if !state.radius().is_finite() {
        return Err(BeamError::NonFinite { step, quantity: "radius" });
    }
    if !state.radial_velocity().is_finite() {
        return Err(BeamError::NonFinite { step, quantity: "radial velocity" });
    }
    Ok(())
}

/// Trajectory storage honouring the sampling stride
pub(crate) struct Recorder {
    stride: usize,
    steps: usize,
    dt: f64,
    time_points: Vec<f64>,
    states: Vec<BeamState>,
}

impl Recorder {
    pub(crate) fn new(initial: BeamState, steps: usize, dt: f64, stride: usize) -> Self {
        // Capacity for every sample, no reallocation while stepping
        let capacity = steps / stride + 2;
        let mut time_points = Vec::with_capacity(capacity);
        let mut states = Vec::with_capacity(capacity);
        time_points.push(0.0);
        states.push(initial);

        Self {
            stride,
            steps,
            dt,
            time_points,
            states,
        }
    }

    /// Store the state reached after `completed` steps
    #[inline]
    pub(crate) fn record(&mut self, completed: usize, state: BeamState) {
        if completed % self.stride == 0 || completed == self.steps {
            // t = n·dt from the index, not by accumulation
            self.time_points.push(completed as f64 * self.dt);
            self.states.push(state);
        }
    }

    pub(crate) fn finish(self, solver: &str, model: &str) -> BeamResult<Trajectory> {
        let mut trajectory = Trajectory::new(self.time_points, self.states, self.dt, self.steps)?;
        trajectory.add_metadata("solver", solver);
        trajectory.add_metadata("model", model);
        trajectory.add_metadata("time steps", &self.steps.to_string());
        trajectory.add_metadata("dt", &self.dt.to_string());
        Ok(trajectory)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
