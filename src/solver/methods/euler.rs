//! Forward Euler numerical solver
//!
//! # Mathematical Background
//!
//! The simplest explicit scheme for `dy/dt = f(y)`:
//!
//! ```text
//! y_{n+1} = y_n + dt * f(y_n)
//! ```
//!
//! # Characteristics
//!
//! - **Order**: First-order accurate (error ~ O(dt))
//! - **Complexity**: 1 force evaluation per step
//! - **Memory**: O(1) besides the stored trajectory
//!
//! # When to Use
//!
//! - Convergence comparisons against [`RK4Solver`](super::RK4Solver)
//! - Quick exploratory estimates
//!
//! Beam line results are always computed with RK4.

use crate::error::BeamResult;
use crate::solver::{evaluate, validate_state, Recorder, Scenario, Solver, SolverConfiguration, Trajectory};

// =================================================================================================
// Forward Euler Solver
// =================================================================================================

/// Forward Euler time-stepping solver
///
/// # Algorithm
///
/// 1. Start with initial state y_0
/// 2. For each time step n = 0, 1, ..., N-1:
///    - Compute derivative: f_n = f(y_n)
///    - Update state: y_{n+1} = y_n + dt * f_n
/// 3. Return the trajectory
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerSolver;

impl EulerSolver {
    /// Create a new Forward Euler solver
    ///
    /// # Example
    ///
    /// ```rust
    /// use beam_rs::solver::{EulerSolver, Solver};
    ///
    /// assert_eq!(EulerSolver::new().name(), "Forward Euler");
    /// ```
    pub fn new() -> Self {
        Self
    }
}

impl Solver for EulerSolver {
    fn solve(&self, scenario: &Scenario, config: &SolverConfiguration) -> BeamResult<Trajectory> {
        scenario.validate()?;
        let (time_steps, dt) = config.plan(scenario.total_time)?;

        let model = scenario.model.as_ref();
        let mut state = scenario.initial_state;
        validate_state(&state, 0)?;

        let mut recorder = Recorder::new(state, time_steps, dt, config.sample_stride);

        for step in 0..time_steps {
            let slope = evaluate(model, &state, step)?;
            state = state + slope * dt;

            validate_state(&state, step + 1)?;
            recorder.record(step + 1, state);
        }

        recorder.finish("Forward Euler", scenario.get_model_name())
    }

    fn name(&self) -> &'static str {
        "Forward Euler"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
