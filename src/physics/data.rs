//! Beam configuration data
//!
//! [`BeamConfig`] is the immutable per-scenario description of the ion beam.
//! Derived quantities (axial velocity, space-charge force scale) are computed
//! once at construction and shared read-only by every force evaluation.

use std::f64::consts::PI;
use std::fmt;

use crate::error::{BeamError, BeamResult};
use crate::physics::constants::PhysicalConstants;

/// Ion species, energy and current of a beam
///
/// # Example
///
/// ```rust
/// use beam_rs::physics::BeamConfig;
///
/// let config = BeamConfig::reference();
/// assert!((config.axial_velocity() - 119_912.0).abs() < 10.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamConfig {
    /// Ion mass \[kg\]
    mass: f64,
    /// Ion charge magnitude \[C\]
    charge: f64,
    /// Kinetic energy \[J\]
    energy: f64,
    /// Beam current \[A\]
    current: f64,
    /// Constants the config was built with
    constants: PhysicalConstants,

    // ==================== Derived ====================
    /// v_b = sqrt(2E/m) \[m/s\]
    axial_velocity: f64,
    /// q·I / (2π·ε₀·v_b·m) \[m²/s²\]
    force_scale: f64,
}

impl BeamConfig {
    /// Create a configuration from SI quantities
    ///
    /// # Arguments
    ///
    /// * `mass` - Ion mass \[kg\]
    /// * `charge` - Ion charge \[C\]; only the magnitude matters
    /// * `energy` - Kinetic energy \[J\]
    /// * `current` - Beam current \[A\]
    ///
    /// # Errors
    ///
    /// [`BeamError::Configuration`] when any quantity is zero, negative
    /// (charge excepted) or not finite.
    pub fn new(mass: f64, charge: f64, energy: f64, current: f64) -> BeamResult<Self> {
        Self::with_constants(mass, charge, energy, current, PhysicalConstants::SI)
    }

    /// Same as [`BeamConfig::new`] with explicit constants
    pub fn with_constants(
        mass: f64,
        charge: f64,
        energy: f64,
        current: f64,
        constants: PhysicalConstants,
    ) -> BeamResult<Self> {
        let charge = charge.abs();

        for (name, value) in [
            ("mass", mass),
            ("charge", charge),
            ("energy", energy),
            ("current", current),
            ("permittivity", constants.permittivity),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(BeamError::Configuration(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }

        Ok(Self::derive(mass, charge, energy, current, constants))
    }

    /// Compute the derived quantities; inputs must already be valid
    fn derive(mass: f64, charge: f64, energy: f64, current: f64, constants: PhysicalConstants) -> Self {
        let axial_velocity = (2.0 * energy / mass).sqrt();
        let force_scale = charge * current / (2.0 * PI * constants.permittivity * axial_velocity * mass);

        Self {
            mass,
            charge,
            energy,
            current,
            constants,
            axial_velocity,
            force_scale,
        }
    }

    /// Create from laboratory units
    ///
    /// * `mass_units` - mass in multiples of `constants.mass_unit`
    /// * `charge_state` - charge in elementary charges
    /// * `energy_ev` - kinetic energy \[eV\]
    /// * `current` - beam current \[A\]
    pub fn from_lab_units(
        mass_units: f64,
        charge_state: f64,
        energy_ev: f64,
        current: f64,
        constants: PhysicalConstants,
    ) -> BeamResult<Self> {
        Self::with_constants(
            constants.mass_to_kg(mass_units),
            charge_state * constants.elementary_charge,
            constants.ev_to_joule(energy_ev),
            current,
            constants,
        )
    }

    /// Reference argon beam: 39.948 m_H, 1+, 3 keV, 1 μA
    ///
    /// Same values as `from_lab_units(39.948, 1.0, 3000.0, 1e-6, SI)`. The
    /// inputs are positive constants, so validation cannot fail and is skipped.
    pub fn reference() -> Self {
        let constants = PhysicalConstants::SI;
        Self::derive(
            constants.mass_to_kg(39.948),
            constants.elementary_charge,
            constants.ev_to_joule(3_000.0),
            1.0e-6,
            constants,
        )
    }

    /// Ion mass \[kg\]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Ion charge magnitude \[C\]
    pub fn charge(&self) -> f64 {
        self.charge
    }

    /// Kinetic energy \[J\]
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Beam current \[A\]
    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    /// Axial velocity v_b = sqrt(2E/m) \[m/s\]
    pub fn axial_velocity(&self) -> f64 {
        self.axial_velocity
    }

    /// Space-charge force scale q·I / (2π·ε₀·v_b·m) \[m²/s²\]
    ///
    /// Radial acceleration at radius r with full current is `force_scale / r`.
    pub fn force_scale(&self) -> f64 {
        self.force_scale
    }

    /// Transit time through a drift of `length` metres, t = L / v_b
    ///
    /// Treats the axial velocity as constant, which holds while radial
    /// excursions stay small compared to the drift length.
    pub fn transit_time(&self, length: f64) -> f64 {
        length / self.axial_velocity
    }
}

impl fmt::Display for BeamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m = {:.4e} kg, q = {:.4e} C, E = {:.1} eV, I = {:.3e} A, v_b = {:.1} m/s",
            self.mass,
            self.charge,
            self.energy / self.constants.elementary_charge,
            self.current,
            self.axial_velocity
        )
    }
}

/// Beam configuration plus the initial beam-edge radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamParameters {
    pub config: BeamConfig,
    /// Initial beam radius \[m\]
    pub initial_radius: f64,
}

impl BeamParameters {
    pub fn new(config: BeamConfig, initial_radius: f64) -> BeamResult<Self> {
        if !initial_radius.is_finite() || initial_radius <= 0.0 {
            return Err(BeamError::domain(
                "initial_radius",
                initial_radius,
                "must be positive",
            ));
        }
        Ok(Self { config, initial_radius })
    }

    /// Reference beam with a 3 mm initial radius
    pub fn reference() -> Self {
        Self {
            config: BeamConfig::reference(),
            initial_radius: 3.0e-3,
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_velocity() {
        let config = BeamConfig::reference();
        // 3 keV argon: v_b ≈ 119 907 m/s
        assert_relative_eq!(config.axial_velocity(), 119_907.0, max_relative = 1e-3);
    }

    #[test]
    fn test_reference_matches_lab_units() {
        let built = BeamConfig::from_lab_units(39.948, 1.0, 3_000.0, 1.0e-6, PhysicalConstants::SI)
            .unwrap();
        assert_eq!(built, BeamConfig::reference());
    }

    #[test]
    fn test_reference_passes_validation() {
        let reference = BeamConfig::reference();
        let validated = BeamConfig::with_constants(
            reference.mass(),
            reference.charge(),
            reference.energy(),
            reference.current(),
            *reference.constants(),
        )
        .unwrap();
        assert_eq!(validated, reference);
    }

    #[test]
    fn test_negative_charge_uses_magnitude() {
        let config = BeamConfig::new(1.0e-26, -1.6e-19, 1.0e-16, 1.0e-6).unwrap();
        assert!(config.charge() > 0.0);
        assert!(config.force_scale() > 0.0);
    }

    #[test]
    fn test_zero_mass_rejected() {
        let result = BeamConfig::new(0.0, 1.6e-19, 1.0e-16, 1.0e-6);
        assert!(matches!(result, Err(BeamError::Configuration(_))));
    }

    #[test]
    fn test_zero_charge_rejected() {
        let result = BeamConfig::new(1.0e-26, 0.0, 1.0e-16, 1.0e-6);
        assert!(matches!(result, Err(BeamError::Configuration(_))));
    }

    #[test]
    fn test_nan_current_rejected() {
        let result = BeamConfig::new(1.0e-26, 1.6e-19, 1.0e-16, f64::NAN);
        assert!(result.is_err());
    }

    #[test]
    fn test_transit_time() {
        let config = BeamConfig::reference();
        assert_relative_eq!(
            config.transit_time(2.0),
            2.0 / config.axial_velocity()
        );
    }

    #[test]
    fn test_invalid_initial_radius() {
        let result = BeamParameters::new(BeamConfig::reference(), 0.0);
        assert!(result.unwrap_err().is_domain());
    }
}
