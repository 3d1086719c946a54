//! Simulation scenario definition
//!
//! A scenario combines a physical model with an initial state and a duration.

use crate::error::{BeamError, BeamResult};
use crate::models::SpaceChargeForce;
use crate::physics::{BeamConfig, BeamState, PhysicalModel};
use crate::solver::DriftSegment;

/// Simulation scenario
///
/// Defines a specific case to integrate:
/// - Physical model (equations)
/// - Initial state
/// - Total time
///
/// The same scenario can be solved with different numerical methods.
///
/// # Examples
///
/// ```rust
/// use beam_rs::physics::BeamConfig;
/// use beam_rs::solver::{DriftSegment, RK4Solver, Scenario, Solver, SolverConfiguration};
///
/// let config = BeamConfig::reference();
/// let segment = DriftSegment::full_current(3.0e-3, 0.1).unwrap();
/// let scenario = Scenario::drift(&config, &segment).unwrap();
///
/// let trajectory = RK4Solver::new().solve(&scenario, &SolverConfiguration::default()).unwrap();
/// assert!(trajectory.final_radius() > 3.0e-3);
/// ```
pub struct Scenario {
    /// Physical model (equations)
    pub model: Box<dyn PhysicalModel>,

    /// State at t = 0
    pub initial_state: BeamState,

    /// Integration time \[s\]
    pub total_time: f64,
}

impl Scenario {
    /// Create a scenario
    pub fn new(model: Box<dyn PhysicalModel>, initial_state: BeamState, total_time: f64) -> Self {
        Self {
            model,
            initial_state,
            total_time,
        }
    }

    /// Space-charge drift: beam enters at rest radially, transit time L / v_b
    pub fn drift(config: &BeamConfig, segment: &DriftSegment) -> BeamResult<Self> {
        let model = SpaceChargeForce::new(*config, segment.transmission)?;
        Ok(Self::new(
            Box::new(model),
            BeamState::at_rest(segment.initial_radius),
            config.transit_time(segment.length),
        ))
    }

    /// Verifying scenario content
    pub fn validate(&self) -> BeamResult<()> {
        if !self.initial_state.is_finite() {
            return Err(BeamError::NonFinite { step: 0, quantity: "initial state" });
        }
        if !self.total_time.is_finite() || self.total_time <= 0.0 {
            return Err(BeamError::domain("total_time", self.total_time, "must be positive"));
        }
        Ok(())
    }

    /// Get model name
    pub fn get_model_name(&self) -> &str {
        self.model.name()
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.get_model_name())
            .field("initial state", &self.initial_state)
            .field("total time", &self.total_time)
            .finish()
    }
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct MockModel;

    impl PhysicalModel for MockModel {
        fn derivative(&self, state: &BeamState) -> BeamResult<BeamState> {
            Ok(*state)
        }

        fn name(&self) -> &str {
            "MockModel"
        }
    }

    #[test]
    fn test_scenario_creation() {
        let scenario = Scenario::new(Box::new(MockModel), BeamState::at_rest(1.0), 2.0);
        assert_eq!(scenario.get_model_name(), "MockModel");
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn test_invalid_duration() {
        let scenario = Scenario::new(Box::new(MockModel), BeamState::at_rest(1.0), 0.0);
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_drift_scenario() {
        let config = BeamConfig::reference();
        let segment = DriftSegment::new(0.003, 2.0, 0.5).unwrap();
        let scenario = Scenario::drift(&config, &segment).unwrap();

        assert_eq!(scenario.initial_state, BeamState::at_rest(0.003));
        assert_eq!(scenario.total_time, 2.0 / config.axial_velocity());
        assert_eq!(scenario.get_model_name(), "Space-charge envelope");
    }
}
