//! Space-charge force model
//!
//! Radial electrostatic self-force of a uniform-density, infinitely long,
//! azimuthally symmetric ion beam. Gauss's law on a cylinder of radius r
//! enclosing the line charge λ = I / v_b gives
//!
//! ```text
//! E_r(r) = I / (2π ε₀ v_b r)
//! a(r)   = q T I / (2π ε₀ r v_b m)
//! ```
//!
//! where T ∈ (0, 1] is the transmission fraction, the share of the original
//! current still in the beam (reduced after an aperture cut).
//!
//! Only the enclosed current and the edge radius enter the field at the edge,
//! so the force is the same for any radial density profile with that edge.
//!
//! # Magnetic force
//!
//! The beam current also produces an azimuthal field B = μ₀ I / (2π r) that
//! pinches the beam with force q v_b B. Its ratio to the electric force is
//! v_b² μ₀ ε₀ = (v_b / c)², about 1.6e-7 for a 3 keV argon beam, so the
//! model carries no magnetic term. [`magnetic_to_electric_ratio`] exists to
//! check that bound for a given configuration.

use std::f64::consts::PI;

use crate::error::{BeamError, BeamResult};
use crate::physics::{BeamConfig, BeamState, PhysicalModel};

/// Radial space-charge acceleration at the beam edge \[m/s²\]
///
/// # Errors
///
/// [`BeamError::Domain`] if `radius <= 0` (the field is singular on the
/// axis) or `transmission_fraction` is outside (0, 1].
///
/// # Example
///
/// ```rust
/// use beam_rs::models::force_per_mass;
/// use beam_rs::physics::BeamConfig;
///
/// let config = BeamConfig::reference();
/// let near = force_per_mass(1.0e-3, 1.0, &config).unwrap();
/// let far = force_per_mass(2.0e-3, 1.0, &config).unwrap();
/// assert!((near / far - 2.0).abs() < 1e-12);
/// ```
#[inline]
pub fn force_per_mass(radius: f64, transmission_fraction: f64, config: &BeamConfig) -> BeamResult<f64> {
    check_radius(radius)?;
    check_transmission(transmission_fraction)?;
    Ok(transmission_fraction * config.force_scale() / radius)
}

pub(crate) fn check_radius(radius: f64) -> BeamResult<()> {
    if radius.is_nan() || radius <= 0.0 {
        return Err(BeamError::domain("radius", radius, "must be strictly positive"));
    }
    if radius.is_infinite() {
        return Err(BeamError::domain("radius", radius, "must be finite"));
    }
    Ok(())
}

pub(crate) fn check_transmission(transmission_fraction: f64) -> BeamResult<()> {
    if !(transmission_fraction > 0.0 && transmission_fraction <= 1.0) {
        return Err(BeamError::domain(
            "transmission_fraction",
            transmission_fraction,
            "must lie in (0, 1]",
        ));
    }
    Ok(())
}

/// Ratio of the magnetic pinch force to the electric space-charge force
///
/// Both forces are evaluated from their own field at `radius`:
/// F_E = q I / (2π ε₀ v_b r) and F_B = q v_b μ₀ I / (2π r).
/// The radius cancels, the result equals (v_b / c)².
pub fn magnetic_to_electric_ratio(config: &BeamConfig, radius: f64) -> BeamResult<f64> {
    check_radius(radius)?;

    let constants = config.constants();
    let velocity = config.axial_velocity();
    let line_current = config.charge() * config.current() / (2.0 * PI * radius);

    let electric = line_current / (constants.permittivity * velocity);
    let magnetic = line_current * velocity * constants.permeability;

    Ok(magnetic / electric)
}

// =================================================================================================
// Envelope model
// =================================================================================================

/// Space-charge envelope model `r'' = a(r)`
///
/// Binds a [`BeamConfig`] and a transmission fraction for one drift segment.
#[derive(Debug, Clone, Copy)]
pub struct SpaceChargeForce {
    config: BeamConfig,
    transmission: f64,
}

impl SpaceChargeForce {
    /// Create the model for one segment
    ///
    /// # Errors
    ///
    /// [`BeamError::Domain`] if `transmission` is outside (0, 1].
    pub fn new(config: BeamConfig, transmission: f64) -> BeamResult<Self> {
        check_transmission(transmission)?;
        Ok(Self { config, transmission })
    }

    pub fn config(&self) -> &BeamConfig {
        &self.config
    }

    pub fn transmission(&self) -> f64 {
        self.transmission
    }

    /// Radial acceleration at `radius` \[m/s²\]
    #[inline]
    pub fn acceleration(&self, radius: f64) -> BeamResult<f64> {
        check_radius(radius)?;
        Ok(self.transmission * self.config.force_scale() / radius)
    }
}

impl PhysicalModel for SpaceChargeForce {
    #[inline]
    fn derivative(&self, state: &BeamState) -> BeamResult<BeamState> {
        let acceleration = self.acceleration(state.radius())?;
        Ok(BeamState::new(state.radial_velocity(), acceleration))
    }

    fn name(&self) -> &str {
        "Space-charge envelope"
    }

    fn description(&self) -> Option<&str> {
        Some(
            "Uniform infinite cylinder, electric self-field only. \
             Current scaled by the segment transmission fraction.",
        )
    }
}

// =================================================================================================
// Tests
// =================================================================================================
