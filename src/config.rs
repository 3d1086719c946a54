//! Scenario files
//!
//! A TOML document with three optional sections. Every field has a default,
//! an empty file describes reference scenario A.
//!
//! ```toml
//! [beam]
//! mass = 39.948            # hydrogen-atom masses
//! charge_state = 1.0       # elementary charges
//! energy_ev = 3000.0
//! current_a = 1.0e-6
//! initial_radius_mm = 3.0
//!
//! [integration]
//! dt = 1.0e-8              # or: steps = 5000
//! max_steps = 50000000
//! sample_stride = 1
//!
//! [scenario]
//! leg1_length_m = 2.0
//! aperture_sigma = 1.0
//! leg2_length_m = 3.0
//! transmission = 0.682     # or: derive_transmission = true
//! ```
//!
//! Units in the file are the laboratory ones above; conversion to SI
//! happens in [`ScenarioFile::to_spec`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BeamError, BeamResult};
use crate::models::ApertureSpec;
use crate::physics::{BeamConfig, BeamParameters, PhysicalConstants};
use crate::pipeline::{ScenarioSpec, TransmissionPolicy};
use crate::solver::{SolverConfiguration, StepPolicy, DEFAULT_MAX_STEPS, DEFAULT_TIME_STEP};

/// Top-level scenario file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    #[serde(default)]
    pub beam: BeamSection,
    #[serde(default)]
    pub integration: IntegrationSection,
    #[serde(default)]
    pub scenario: LineSection,
}

/// Ion species, energy, current and initial radius
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BeamSection {
    /// Ion mass in hydrogen-atom masses
    #[serde(default = "default_mass")]
    pub mass: f64,
    #[serde(default = "default_charge_state")]
    pub charge_state: f64,
    #[serde(default = "default_energy_ev")]
    pub energy_ev: f64,
    #[serde(default = "default_current")]
    pub current_a: f64,
    #[serde(default = "default_initial_radius_mm")]
    pub initial_radius_mm: f64,
}

fn default_mass() -> f64 {
    39.948
}
fn default_charge_state() -> f64 {
    1.0
}
fn default_energy_ev() -> f64 {
    3_000.0
}
fn default_current() -> f64 {
    1.0e-6
}
fn default_initial_radius_mm() -> f64 {
    3.0
}

impl Default for BeamSection {
    fn default() -> Self {
        BeamSection {
            mass: default_mass(),
            charge_state: default_charge_state(),
            energy_ev: default_energy_ev(),
            current_a: default_current(),
            initial_radius_mm: default_initial_radius_mm(),
        }
    }
}

/// Step policy and run limits
///
/// `dt` and `steps` are exclusive; with neither, dt = 1e-8 s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntegrationSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<usize>,
    /// 0 disables the budget
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default = "default_sample_stride")]
    pub sample_stride: usize,
}

fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}
fn default_sample_stride() -> usize {
    1
}

impl Default for IntegrationSection {
    fn default() -> Self {
        IntegrationSection {
            dt: None,
            steps: None,
            max_steps: default_max_steps(),
            sample_stride: default_sample_stride(),
        }
    }
}

/// Drift → aperture → drift geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineSection {
    #[serde(default = "default_leg1")]
    pub leg1_length_m: f64,
    #[serde(default = "default_aperture_sigma")]
    pub aperture_sigma: f64,
    #[serde(default = "default_leg2")]
    pub leg2_length_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission: Option<f64>,
    #[serde(default)]
    pub derive_transmission: bool,
}

fn default_leg1() -> f64 {
    2.0
}
fn default_aperture_sigma() -> f64 {
    3.0
}
fn default_leg2() -> f64 {
    3.0
}

impl Default for LineSection {
    fn default() -> Self {
        LineSection {
            leg1_length_m: default_leg1(),
            aperture_sigma: default_aperture_sigma(),
            leg2_length_m: default_leg2(),
            transmission: None,
            derive_transmission: false,
        }
    }
}

impl ScenarioFile {
    /// Load from a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> BeamResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        contents.parse()
    }

    /// Beam configuration and initial radius in SI units
    pub fn beam_parameters(&self) -> BeamResult<BeamParameters> {
        let beam = &self.beam;
        let config = BeamConfig::from_lab_units(
            beam.mass,
            beam.charge_state,
            beam.energy_ev,
            beam.current_a,
            PhysicalConstants::SI,
        )?;
        BeamParameters::new(config, beam.initial_radius_mm * 1.0e-3)
    }

    pub fn solver_configuration(&self) -> BeamResult<SolverConfiguration> {
        let integration = &self.integration;
        let step = match (integration.dt, integration.steps) {
            (Some(_), Some(_)) => {
                return Err(BeamError::Configuration(
                    "integration.dt and integration.steps are exclusive".to_string(),
                ));
            }
            (Some(dt), None) => StepPolicy::FixedStep { dt },
            (None, Some(steps)) => StepPolicy::FixedCount { steps },
            (None, None) => StepPolicy::FixedStep { dt: DEFAULT_TIME_STEP },
        };

        let mut configuration =
            SolverConfiguration::new(step).with_sample_stride(integration.sample_stride);
        configuration = match integration.max_steps {
            0 => configuration.unbounded(),
            budget => configuration.with_max_steps(budget),
        };
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn transmission_policy(&self) -> BeamResult<TransmissionPolicy> {
        let line = &self.scenario;
        match (line.transmission, line.derive_transmission) {
            (Some(_), true) => Err(BeamError::Configuration(
                "scenario.transmission and scenario.derive_transmission are exclusive".to_string(),
            )),
            (Some(fraction), false) => Ok(TransmissionPolicy::Explicit(fraction)),
            (None, true) => Ok(TransmissionPolicy::FromAperture),
            (None, false) => Ok(TransmissionPolicy::default()),
        }
    }

    /// Runtime scenario
    pub fn to_spec(&self) -> BeamResult<ScenarioSpec> {
        let spec = ScenarioSpec::new(
            self.beam_parameters()?,
            self.scenario.leg1_length_m,
            ApertureSpec::new(self.scenario.aperture_sigma)?,
            self.scenario.leg2_length_m,
            self.transmission_policy()?,
        )
        .with_solver(self.solver_configuration()?);

        spec.validate()?;
        Ok(spec)
    }
}

impl std::str::FromStr for ScenarioFile {
    type Err = BeamError;

    fn from_str(contents: &str) -> BeamResult<Self> {
        Ok(toml::from_str(contents)?)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    #[test]
    fn test_empty_file_is_reference() {
        let file: ScenarioFile = "".parse().unwrap();
        let spec = file.to_spec().unwrap();
        let reference = ScenarioSpec::reference_a();

        assert_relative_eq!(
            spec.params.config.axial_velocity(),
            reference.params.config.axial_velocity(),
            max_relative = 1e-12
        );
        assert_relative_eq!(spec.params.initial_radius, 3.0e-3, max_relative = 1e-12);
        assert_eq!(spec.leg1_length, 2.0);
        assert_eq!(spec.leg2_length, 3.0);
        assert_eq!(spec.aperture, ApertureSpec::open());
        assert_eq!(spec.leg2_transmission, TransmissionPolicy::Explicit(1.0));
        assert_eq!(spec.solver, SolverConfiguration::default());
    }

    #[test]
    fn test_full_file() {
        let file: ScenarioFile = r#"
            [beam]
            mass = 4.0
            energy_ev = 10000.0
            initial_radius_mm = 1.5

            [integration]
            steps = 2000
            max_steps = 0
            sample_stride = 10

            [scenario]
            leg1_length_m = 1.0
            aperture_sigma = 1.0
            leg2_length_m = 0.5
            derive_transmission = true
        "#
        .parse()
        .unwrap();

        let spec = file.to_spec().unwrap();
        assert_relative_eq!(spec.params.initial_radius, 1.5e-3, max_relative = 1e-12);
        assert_eq!(spec.leg2_transmission, TransmissionPolicy::FromAperture);
        assert_eq!(spec.solver.step, StepPolicy::FixedCount { steps: 2000 });
        assert_eq!(spec.solver.max_steps, None);
        assert_eq!(spec.solver.sample_stride, 10);
        assert_eq!(file.beam.charge_state, 1.0);
    }

    #[test]
    fn test_exclusive_fields() {
        let file: ScenarioFile = "[integration]\ndt = 1e-9\nsteps = 10\n".parse().unwrap();
        assert!(matches!(file.to_spec(), Err(BeamError::Configuration(_))));

        let file: ScenarioFile = "[scenario]\ntransmission = 0.5\nderive_transmission = true\n"
            .parse()
            .unwrap();
        assert!(matches!(file.to_spec(), Err(BeamError::Configuration(_))));
    }

    #[test]
    fn test_invalid_values() {
        let file: ScenarioFile = "[beam]\nmass = 0.0\n".parse().unwrap();
        assert!(matches!(file.to_spec(), Err(BeamError::Configuration(_))));

        let file: ScenarioFile = "[scenario]\naperture_sigma = -1.0\n".parse().unwrap();
        assert!(file.to_spec().unwrap_err().is_domain());

        let file: ScenarioFile = "[scenario]\ntransmission = 2.0\n".parse().unwrap();
        assert!(file.to_spec().unwrap_err().is_domain());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("[beam]\nmass = \"heavy\"\n".parse::<ScenarioFile>(), Err(BeamError::Parse(_))));
        assert!(matches!("[beam]\nspin = 1\n".parse::<ScenarioFile>(), Err(BeamError::Parse(_))));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scenario]\naperture_sigma = 1.0\ntransmission = 0.682").unwrap();

        let loaded = ScenarioFile::from_path(file.path()).unwrap();
        assert_eq!(loaded.scenario.transmission, Some(0.682));
        assert_eq!(loaded.to_spec().unwrap().leg2_transmission, TransmissionPolicy::Explicit(0.682));

        assert!(matches!(
            ScenarioFile::from_path("/nonexistent/beam.toml"),
            Err(BeamError::Io(_))
        ));
    }
}
