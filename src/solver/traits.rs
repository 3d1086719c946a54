//! Numerical solver traits and types
//!
//! - `Solver`: trait every integration method implements
//! - `StepPolicy`: how the time step is chosen for a drift
//! - `SolverConfiguration`: step policy plus run limits
//! - `Trajectory`: the integrated envelope

use std::collections::HashMap;

use crate::error::{BeamError, BeamResult};
use crate::physics::BeamState;
use crate::solver::Scenario;

/// Reference time step \[s\]
pub const DEFAULT_TIME_STEP: f64 = 1.0e-8;

/// Default cap on the number of steps of one integration
///
/// At the reference time step this is half a second of transit.
pub const DEFAULT_MAX_STEPS: usize = 50_000_000;

// =================================================================================================
// Step policy
// =================================================================================================

/// How the fixed time step of an integration is chosen
///
/// # Examples
///
/// ```rust
/// use beam_rs::solver::StepPolicy;
///
/// // Reference behaviour: dt = 1e-8 s, N = round(t / dt)
/// let (steps, dt) = StepPolicy::default().resolve(1.0e-5).unwrap();
/// assert_eq!(steps, 1000);
/// assert_eq!(dt, 1.0e-8);
///
/// // Fixed number of steps: dt = t / N
/// let (steps, dt) = StepPolicy::FixedCount { steps: 200 }.resolve(1.0e-5).unwrap();
/// assert_eq!(steps, 200);
/// assert!((dt - 5.0e-8).abs() < 1e-20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepPolicy {
    /// Constant dt; the step count is `round(total_time / dt)`, at least 1
    FixedStep { dt: f64 },

    /// Constant step count; dt = total_time / steps
    FixedCount { steps: usize },
}

impl StepPolicy {
    /// Get name identifier
    pub fn name(&self) -> &str {
        match self {
            StepPolicy::FixedStep { .. } => "FixedStep",
            StepPolicy::FixedCount { .. } => "FixedCount",
        }
    }

    /// Validate that parameters are meaningful
    pub fn validate(&self) -> BeamResult<()> {
        match self {
            StepPolicy::FixedStep { dt } => {
                if !dt.is_finite() || *dt <= 0.0 {
                    return Err(BeamError::domain("dt", *dt, "time step must be positive"));
                }
                Ok(())
            }
            StepPolicy::FixedCount { steps } => {
                if *steps == 0 {
                    return Err(BeamError::Configuration(
                        "Step count must be greater than 0".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Number of steps and step size for a run of `total_time` seconds
    pub fn resolve(&self, total_time: f64) -> BeamResult<(usize, f64)> {
        self.validate()?;
        if !total_time.is_finite() || total_time <= 0.0 {
            return Err(BeamError::domain("total_time", total_time, "must be positive"));
        }

        match *self {
            StepPolicy::FixedStep { dt } => {
                let steps = (total_time / dt).round().max(1.0);
                if steps >= usize::MAX as f64 {
                    return Err(BeamError::StepBudgetExceeded {
                        required: usize::MAX,
                        budget: usize::MAX,
                    });
                }
                Ok((steps as usize, dt))
            }
            StepPolicy::FixedCount { steps } => Ok((steps, total_time / steps as f64)),
        }
    }
}

impl Default for StepPolicy {
    fn default() -> Self {
        StepPolicy::FixedStep { dt: DEFAULT_TIME_STEP }
    }
}

// =================================================================================================
// Solver configuration
// =================================================================================================

/// Configuration for numerical solver
///
/// # Example
///
/// ```rust
/// use beam_rs::solver::SolverConfiguration;
///
/// let config = SolverConfiguration::fixed_step(1.0e-9)
///     .with_max_steps(10_000_000)
///     .with_sample_stride(100);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfiguration {
    /// Time step selection
    pub step: StepPolicy,

    /// Refuse runs needing more steps than this
    pub max_steps: Option<usize>,

    /// Keep every n-th state in the trajectory (the last one is always kept)
    pub sample_stride: usize,
}

impl SolverConfiguration {
    /// Create a new configuration with a given step policy
    pub fn new(step: StepPolicy) -> Self {
        Self {
            step,
            max_steps: Some(DEFAULT_MAX_STEPS),
            sample_stride: 1,
        }
    }

    /// Constant time step dt \[s\]
    pub fn fixed_step(dt: f64) -> Self {
        Self::new(StepPolicy::FixedStep { dt })
    }

    /// Constant number of steps per segment
    pub fn fixed_count(steps: usize) -> Self {
        Self::new(StepPolicy::FixedCount { steps })
    }

    /// Builder pattern: set step budget
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Builder pattern: remove step budget
    pub fn unbounded(mut self) -> Self {
        self.max_steps = None;
        self
    }

    /// Builder pattern: set sampling stride
    pub fn with_sample_stride(mut self, stride: usize) -> Self {
        self.sample_stride = stride;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> BeamResult<()> {
        self.step.validate()?;
        if self.sample_stride == 0 {
            return Err(BeamError::Configuration(
                "Sample stride must be at least 1".to_string(),
            ));
        }
        if self.max_steps == Some(0) {
            return Err(BeamError::Configuration(
                "Step budget must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the step count and size, enforcing the budget
    pub fn plan(&self, total_time: f64) -> BeamResult<(usize, f64)> {
        self.validate()?;
        let (steps, dt) = self.step.resolve(total_time)?;

        if let Some(budget) = self.max_steps
            && steps > budget
        {
            return Err(BeamError::StepBudgetExceeded { required: steps, budget });
        }

        Ok((steps, dt))
    }
}

impl Default for SolverConfiguration {
    fn default() -> Self {
        Self::new(StepPolicy::default())
    }
}

// =================================================================================================
// Trajectory
// =================================================================================================

/// Integrated beam envelope
///
/// Time points and states from t = 0 to the last step, both ends included.
#[derive(Clone, Debug)]
pub struct Trajectory {
    /// Sample times \[s\]
    pub time_points: Vec<f64>,

    /// Beam state at each sample
    pub states: Vec<BeamState>,

    /// Step size used \[s\]
    pub dt: f64,

    /// Number of integration steps
    pub steps: usize,

    /// Free-form run information (solver, model, ...)
    pub metadata: HashMap<String, String>,
}

impl Trajectory {
    /// Create a trajectory from its samples
    ///
    /// # Errors
    ///
    /// [`BeamError::Configuration`] when `states` is empty or its length
    /// differs from `time_points`.
    pub fn new(time_points: Vec<f64>, states: Vec<BeamState>, dt: f64, steps: usize) -> BeamResult<Self> {
        if states.is_empty() {
            return Err(BeamError::Configuration(
                "A trajectory needs at least one sample".to_string(),
            ));
        }
        if time_points.len() != states.len() {
            return Err(BeamError::Configuration(format!(
                "{} time points for {} states",
                time_points.len(),
                states.len()
            )));
        }

        Ok(Self {
            time_points,
            states,
            dt,
            steps,
            metadata: HashMap::new(),
        })
    }

    /// Number of stored samples
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn initial_state(&self) -> &BeamState {
        &self.states[0]
    }

    pub fn final_state(&self) -> &BeamState {
        &self.states[self.states.len() - 1]
    }

    /// Beam radius at the end of the drift \[m\]
    pub fn final_radius(&self) -> f64 {
        self.final_state().radius()
    }

    /// Time at the end of the drift \[s\]
    pub fn final_time(&self) -> f64 {
        self.time_points[self.time_points.len() - 1]
    }

    /// Radius at every sample \[m\]
    pub fn radii(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.radius()).collect()
    }

    /// Radial velocity at every sample \[m/s\]
    pub fn radial_velocities(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.radial_velocity()).collect()
    }

    /// Axial position z = v_b·t at every sample \[m\]
    pub fn axial_positions(&self, axial_velocity: f64) -> Vec<f64> {
        self.time_points.iter().map(|t| t * axial_velocity).collect()
    }

    /// Add metadata
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Get metadata
    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

// =================================================================================================
// Solver trait
// =================================================================================================

/// Trait for numerical integration methods
///
/// Solvers are stateless and can be reused for any number of scenarios.
pub trait Solver: Send + Sync {
    /// Integrate the scenario's model from its initial state over its duration
    ///
    /// # Errors
    ///
    /// Configuration and domain errors are returned before any step is taken.
    /// A singular or non-finite state during integration aborts the run.
    fn solve(&self, scenario: &Scenario, config: &SolverConfiguration) -> BeamResult<Trajectory>;

    /// Name of the method
    fn name(&self) -> &'static str;
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_step_rounds() {
        let policy = StepPolicy::FixedStep { dt: 1.0e-8 };
        let (steps, dt) = policy.resolve(2.0 / 119_912.09).unwrap();
        assert_eq!(steps, 1668);
        assert_eq!(dt, 1.0e-8);
    }

    #[test]
    fn test_fixed_step_at_least_one_step() {
        let (steps, _) = StepPolicy::FixedStep { dt: 1.0 }.resolve(0.1).unwrap();
        assert_eq!(steps, 1);
    }

    #[test]
    fn test_invalid_policies() {
        assert!(StepPolicy::FixedStep { dt: 0.0 }.validate().is_err());
        assert!(StepPolicy::FixedStep { dt: f64::NAN }.validate().is_err());
        assert!(StepPolicy::FixedCount { steps: 0 }.validate().is_err());
        assert!(StepPolicy::default().resolve(-1.0).is_err());
    }

    #[test]
    fn test_budget_enforced() {
        let config = SolverConfiguration::fixed_step(1.0e-8).with_max_steps(1000);
        assert!(config.plan(1.0e-5).is_ok());

        match config.plan(1.0e-4) {
            Err(BeamError::StepBudgetExceeded { required, budget }) => {
                assert_eq!(required, 10_000);
                assert_eq!(budget, 1000);
            }
            other => panic!("expected budget error, got {:?}", other),
        }

        assert!(config.unbounded().plan(1.0e-4).is_ok());
    }

    #[test]
    fn test_zero_stride_rejected() {
        let config = SolverConfiguration::default().with_sample_stride(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_trajectory_accessors() {
        let states = vec![BeamState::at_rest(1.0), BeamState::new(2.0, 1.0)];
        let mut trajectory = Trajectory::new(vec![0.0, 0.5], states, 0.5, 1).unwrap();
        trajectory.add_metadata("solver", "test");

        assert_eq!(trajectory.len(), 2);
        assert_eq!(trajectory.final_radius(), 2.0);
        assert_eq!(trajectory.final_time(), 0.5);
        assert_eq!(trajectory.radii(), vec![1.0, 2.0]);
        assert_eq!(trajectory.radial_velocities(), vec![0.0, 1.0]);
        assert_eq!(trajectory.axial_positions(4.0), vec![0.0, 2.0]);
        assert_eq!(trajectory.get_metadata("solver"), Some("test"));
    }

    #[test]
    fn test_trajectory_rejects_bad_samples() {
        let empty = Trajectory::new(Vec::new(), Vec::new(), 0.1, 0);
        assert!(matches!(empty, Err(BeamError::Configuration(_))));

        let mismatched = Trajectory::new(vec![0.0, 0.1], vec![BeamState::at_rest(1.0)], 0.1, 1);
        assert!(matches!(mismatched, Err(BeamError::Configuration(_))));
    }
}
