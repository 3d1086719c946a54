//! Drift → aperture → drift beam line
//!
//! The composition is fixed:
//!
//! 1. drift over `leg1_length` at full current, starting at rest radially
//! 2. knife-edge cut of the final radius at `aperture` σ
//! 3. drift over `leg2_length` from the cut radius at the post-cut
//!    transmission
//!
//! The transmission only applies to the second leg. How it is chosen is a
//! [`TransmissionPolicy`]: either the caller supplies it, or it follows from
//! the Gaussian fraction inside the cut.
//!
//! # Example
//!
//! ```rust
//! use beam_rs::physics::BeamParameters;
//! use beam_rs::pipeline::run_scenario;
//!
//! let params = BeamParameters::reference();
//! let radius = run_scenario(&params, 0.5, 1.0, 0.5, 0.682).unwrap();
//! assert!(radius > 1.0e-3);
//! ```

use crate::error::{BeamError, BeamResult};
use crate::models::space_charge::check_transmission;
use crate::models::{ApertureCut, ApertureSpec};
use crate::physics::BeamParameters;
use crate::solver::{integrate_segment, DriftSegment, SolverConfiguration, Trajectory};

/// Relative gap between a supplied transmission and the Gaussian fraction
/// above which the run logs a warning
const TRANSMISSION_MISMATCH: f64 = 0.01;

// =================================================================================================
// Transmission policy
// =================================================================================================

/// Current fraction used for the drift after the aperture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransmissionPolicy {
    /// Caller-supplied fraction in (0, 1]
    Explicit(f64),

    /// Gaussian fraction inside the cut, erf(s / √2); 1.0 for an open aperture
    FromAperture,
}

impl TransmissionPolicy {
    pub fn validate(&self) -> BeamResult<()> {
        match self {
            TransmissionPolicy::Explicit(fraction) => check_transmission(*fraction),
            TransmissionPolicy::FromAperture => Ok(()),
        }
    }

    /// Fraction to use after `cut`
    pub fn resolve(&self, cut: &ApertureCut) -> BeamResult<f64> {
        let gaussian = cut.gaussian_transmission();

        match *self {
            TransmissionPolicy::Explicit(fraction) => {
                check_transmission(fraction)?;
                if (fraction - gaussian).abs() > TRANSMISSION_MISMATCH * gaussian {
                    log::warn!(
                        "Transmission {} after a {:.2}σ cut differs from the Gaussian fraction {:.4}",
                        fraction,
                        cut.effective_sigma,
                        gaussian
                    );
                }
                Ok(fraction)
            }
            TransmissionPolicy::FromAperture => {
                // erf underflows to 0 only for cuts far below the axis scale
                check_transmission(gaussian)?;
                Ok(gaussian)
            }
        }
    }
}

impl Default for TransmissionPolicy {
    fn default() -> Self {
        TransmissionPolicy::Explicit(1.0)
    }
}

// =================================================================================================
// Scenario
// =================================================================================================

/// Complete description of one beam line evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSpec {
    /// Beam and initial radius
    pub params: BeamParameters,
    /// First drift length \[m\]
    pub leg1_length: f64,
    /// Knife-edge position
    pub aperture: ApertureSpec,
    /// Second drift length \[m\]
    pub leg2_length: f64,
    /// Current fraction of the second drift
    pub leg2_transmission: TransmissionPolicy,
    /// Integration policy shared by both drifts
    pub solver: SolverConfiguration,
}

impl ScenarioSpec {
    pub fn new(
        params: BeamParameters,
        leg1_length: f64,
        aperture: ApertureSpec,
        leg2_length: f64,
        leg2_transmission: TransmissionPolicy,
    ) -> Self {
        Self {
            params,
            leg1_length,
            aperture,
            leg2_length,
            leg2_transmission,
            solver: SolverConfiguration::default(),
        }
    }

    /// Builder pattern: set integration policy
    pub fn with_solver(mut self, solver: SolverConfiguration) -> Self {
        self.solver = solver;
        self
    }

    /// Reference scenario A: 2 m, open aperture, 3 m at full current
    pub fn reference_a() -> Self {
        Self::new(
            BeamParameters::reference(),
            2.0,
            ApertureSpec::open(),
            3.0,
            TransmissionPolicy::Explicit(1.0),
        )
    }

    /// Reference scenario B: 2 m, 1σ cut, 3 m at 68.2 % of the current
    pub fn reference_b() -> Self {
        Self {
            aperture: ApertureSpec { sigma_multiple: 1.0 },
            leg2_transmission: TransmissionPolicy::Explicit(0.682),
            ..Self::reference_a()
        }
    }

    /// Check every input before any integration
    pub fn validate(&self) -> BeamResult<()> {
        for (name, length) in [("leg1_length", self.leg1_length), ("leg2_length", self.leg2_length)] {
            if !length.is_finite() || length <= 0.0 {
                return Err(BeamError::domain(name, length, "must be positive"));
            }
        }
        self.leg2_transmission.validate()?;
        // Step budget of both legs, so a too-long second leg fails before the first runs
        let config = &self.params.config;
        self.solver.plan(config.transit_time(self.leg1_length))?;
        self.solver.plan(config.transit_time(self.leg2_length))?;
        Ok(())
    }

    /// Run drift → aperture → drift
    pub fn run(&self) -> BeamResult<ScenarioOutcome> {
        self.validate()?;
        let config = &self.params.config;

        let first = DriftSegment::full_current(self.params.initial_radius, self.leg1_length)?;
        let leg1 = integrate_segment(&first, config, &self.solver)?;

        let cut = self.aperture.apply_to(&leg1)?;
        let transmission = self.leg2_transmission.resolve(&cut)?;

        let second = DriftSegment::new(cut.new_radius, self.leg2_length, transmission)?;
        let leg2 = integrate_segment(&second, config, &self.solver)?;

        log::debug!(
            "Beam line {} m + {} m: final radius {:.4} mm",
            self.leg1_length,
            self.leg2_length,
            leg2.final_radius() * 1.0e3
        );

        Ok(ScenarioOutcome {
            leg1,
            cut,
            transmission,
            leg2,
        })
    }
}

/// Result of a beam line evaluation
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    /// Envelope of the first drift
    pub leg1: Trajectory,
    /// Aperture cut at the end of the first drift
    pub cut: ApertureCut,
    /// Transmission applied to the second drift
    pub transmission: f64,
    /// Envelope of the second drift
    pub leg2: Trajectory,
}

impl ScenarioOutcome {
    /// Beam radius at the end of the line \[m\]
    pub fn final_radius(&self) -> f64 {
        self.leg2.final_radius()
    }

    pub fn final_radius_mm(&self) -> f64 {
        self.final_radius() * 1.0e3
    }
}

// =================================================================================================
// Entry points
// =================================================================================================

/// Final radius \[m\] of drift → aperture → drift with an explicit transmission
///
/// Uses the default integration policy (RK4, dt = 1e-8 s).
pub fn run_scenario(
    params: &BeamParameters,
    leg1_length: f64,
    aperture_sigma: f64,
    leg2_length: f64,
    leg2_transmission: f64,
) -> BeamResult<f64> {
    let spec = ScenarioSpec::new(
        *params,
        leg1_length,
        ApertureSpec::new(aperture_sigma)?,
        leg2_length,
        TransmissionPolicy::Explicit(leg2_transmission),
    );
    Ok(spec.run()?.final_radius())
}

/// Evaluate independent scenarios
///
/// Results come back in input order. With the `parallel` feature the
/// scenarios are spread over the rayon pool, each one still integrated
/// sequentially.
pub fn run_batch(specs: &[ScenarioSpec]) -> Vec<BeamResult<ScenarioOutcome>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        specs.par_iter().map(ScenarioSpec::run).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        specs.iter().map(ScenarioSpec::run).collect()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::gaussian_transmission;
    use approx::assert_relative_eq;

    // ====== Transmission policy ======

    #[test]
    fn test_explicit_transmission_passes_through() {
        let cut = ApertureSpec::new(1.0).unwrap().apply(0.009).unwrap();
        let fraction = TransmissionPolicy::Explicit(0.5).resolve(&cut).unwrap();
        assert_eq!(fraction, 0.5);
    }

    #[test]
    fn test_transmission_from_aperture() {
        let one_sigma = ApertureSpec::new(1.0).unwrap().apply(0.009).unwrap();
        assert_relative_eq!(
            TransmissionPolicy::FromAperture.resolve(&one_sigma).unwrap(),
            gaussian_transmission(1.0)
        );

        let open = ApertureSpec::new(4.0).unwrap().apply(0.009).unwrap();
        assert_eq!(TransmissionPolicy::FromAperture.resolve(&open).unwrap(), 1.0);
    }

    #[test]
    fn test_invalid_explicit_transmission() {
        assert!(TransmissionPolicy::Explicit(0.0).validate().unwrap_err().is_domain());
        assert!(TransmissionPolicy::Explicit(1.5).validate().unwrap_err().is_domain());
        assert!(TransmissionPolicy::FromAperture.validate().is_ok());
    }

    // ====== Scenario validation ======

    #[test]
    fn test_invalid_legs_rejected() {
        let mut spec = ScenarioSpec::reference_a();
        spec.leg1_length = 0.0;
        assert!(spec.run().unwrap_err().is_domain());

        let mut spec = ScenarioSpec::reference_a();
        spec.leg2_length = -1.0;
        assert!(spec.run().unwrap_err().is_domain());

        assert!(run_scenario(&BeamParameters::reference(), 2.0, 0.0, 3.0, 1.0)
            .unwrap_err()
            .is_domain());
        assert!(run_scenario(&BeamParameters::reference(), 2.0, 1.0, 3.0, 1.2)
            .unwrap_err()
            .is_domain());
    }

    #[test]
    fn test_budget_checked_for_both_legs() {
        // leg 1 alone fits (~834 steps); leg 2 does not
        let spec = ScenarioSpec::new(
            BeamParameters::reference(),
            1.0,
            ApertureSpec::open(),
            100.0,
            TransmissionPolicy::default(),
        )
        .with_solver(SolverConfiguration::default().with_max_steps(10_000));

        assert!(matches!(spec.run(), Err(BeamError::StepBudgetExceeded { .. })));
    }

    // ====== Composition ======

    #[test]
    fn test_open_aperture_is_continuation_of_radius() {
        let outcome = ScenarioSpec::reference_a()
            .with_solver(SolverConfiguration::fixed_count(400))
            .run()
            .unwrap();

        assert_eq!(outcome.cut.new_radius, outcome.leg1.final_radius());
        assert_eq!(outcome.leg2.initial_state().radius(), outcome.leg1.final_radius());
        assert_eq!(outcome.leg2.initial_state().radial_velocity(), 0.0);
        assert_eq!(outcome.transmission, 1.0);
    }

    #[test]
    fn test_cut_shrinks_second_leg_start() {
        let outcome = ScenarioSpec::reference_b()
            .with_solver(SolverConfiguration::fixed_count(400))
            .run()
            .unwrap();

        assert_relative_eq!(
            outcome.cut.new_radius,
            outcome.leg1.final_radius() / 3.0,
            max_relative = 1e-12
        );
        assert_eq!(outcome.transmission, 0.682);
        assert_eq!(outcome.final_radius(), outcome.leg2.final_radius());
    }

    #[test]
    fn test_batch_preserves_order() {
        let solver = SolverConfiguration::fixed_count(200);
        let specs = vec![
            ScenarioSpec::reference_a().with_solver(solver.clone()),
            ScenarioSpec { leg1_length: 0.0, ..ScenarioSpec::reference_a() },
            ScenarioSpec::reference_b().with_solver(solver),
        ];

        let results = run_batch(&specs);
        assert_eq!(results.len(), 3);
        assert!(results[1].is_err());

        let a = results[0].as_ref().unwrap().final_radius();
        let b = results[2].as_ref().unwrap().final_radius();
        assert!(a > b);
    }
}
