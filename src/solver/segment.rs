//! Drift segment definition

use crate::error::{BeamError, BeamResult};
use crate::models::space_charge::{check_radius, check_transmission};

/// One field-free drift
///
/// Initial beam radius, drift length and the fraction of the original beam
/// current still present. The beam enters with no radial velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftSegment {
    /// Beam radius at the segment entrance \[m\]
    pub initial_radius: f64,
    /// Drift length \[m\]
    pub length: f64,
    /// Transmission fraction, in (0, 1]
    pub transmission: f64,
}

impl DriftSegment {
    /// # Errors
    ///
    /// [`BeamError::Domain`] for a non-positive radius or length, or a
    /// transmission outside (0, 1].
    pub fn new(initial_radius: f64, length: f64, transmission: f64) -> BeamResult<Self> {
        check_radius(initial_radius)?;
        if !length.is_finite() || length <= 0.0 {
            return Err(BeamError::domain("drift_length", length, "must be positive"));
        }
        check_transmission(transmission)?;

        Ok(Self {
            initial_radius,
            length,
            transmission,
        })
    }

    /// Drift at full beam current
    pub fn full_current(initial_radius: f64, length: f64) -> BeamResult<Self> {
        Self::new(initial_radius, length, 1.0)
    }
}
