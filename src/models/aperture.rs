//! Knife-edge aperture
//!
//! The radial profile at the aperture plane is taken to be a Gaussian
//! centred on the axis whose 3σ point is the beam edge handed in:
//!
//! ```text
//! σ = r_edge / 3
//! r_cut = s · σ          for 0 < s < 3
//! r_cut = r_edge         for s ≥ 3 (nothing left to cut)
//! ```
//!
//! The cut radius becomes the initial radius of the next drift. The force
//! law downstream only needs the tube radius and its current, so the result
//! does not depend on the assumed shape of the profile inside the tube.
//!
//! The aperture does not decide the current that survives the cut. The
//! Gaussian fraction inside the cut is reported in
//! [`ApertureCut::gaussian_transmission`]; whether it is used for the next
//! segment is the caller's choice (see [`crate::pipeline::TransmissionPolicy`]).

use statrs::function::erf::erf;
use std::f64::consts::SQRT_2;
use std::fmt;

use crate::error::{BeamError, BeamResult};
use crate::models::space_charge::check_radius;
use crate::solver::Trajectory;

/// Number of standard deviations between the axis and the beam edge
pub const EDGE_SIGMA: f64 = 3.0;

/// Fraction of a Gaussian profile within ±s·σ, erf(s / √2)
///
/// Gives 1.0 from [`EDGE_SIGMA`] on, where the beam edge is by definition.
///
/// ```rust
/// use beam_rs::models::gaussian_transmission;
/// assert!((gaussian_transmission(1.0) - 0.6827).abs() < 1e-4);
/// assert_eq!(gaussian_transmission(5.0), 1.0);
/// ```
pub fn gaussian_transmission(sigma_multiple: f64) -> f64 {
    if sigma_multiple >= EDGE_SIGMA {
        1.0
    } else if sigma_multiple <= 0.0 {
        0.0
    } else {
        erf(sigma_multiple / SQRT_2)
    }
}

/// Requested cut position in units of the profile's σ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApertureSpec {
    pub(crate) sigma_multiple: f64,
}

impl ApertureSpec {
    /// # Errors
    ///
    /// [`BeamError::Domain`] when `sigma_multiple` is not strictly positive
    /// (a cut at or below the axis leaves no beam).
    pub fn new(sigma_multiple: f64) -> BeamResult<Self> {
        if sigma_multiple.is_nan() || sigma_multiple <= 0.0 {
            return Err(BeamError::domain(
                "sigma_multiple",
                sigma_multiple,
                "must be strictly positive",
            ));
        }
        Ok(Self { sigma_multiple })
    }

    /// Aperture wide open (3σ), a geometric no-op
    pub fn open() -> Self {
        Self { sigma_multiple: EDGE_SIGMA }
    }

    /// Requested multiple, before clamping
    pub fn sigma_multiple(&self) -> f64 {
        self.sigma_multiple
    }

    /// Cut a beam whose edge radius is `radius` \[m\]
    pub fn apply(&self, radius: f64) -> BeamResult<ApertureCut> {
        check_radius(radius)?;

        let sigma = radius / EDGE_SIGMA;
        let (new_radius, effective) = if self.sigma_multiple >= EDGE_SIGMA {
            (radius, EDGE_SIGMA)
        } else {
            (self.sigma_multiple * sigma, self.sigma_multiple)
        };

        let cut = ApertureCut {
            incoming_radius: radius,
            new_radius,
            sigma,
            requested_sigma: self.sigma_multiple,
            effective_sigma: effective,
        };

        log::info!("{}", cut.report());
        Ok(cut)
    }

    /// Cut the beam at the end of a drift
    pub fn apply_to(&self, trajectory: &Trajectory) -> BeamResult<ApertureCut> {
        self.apply(trajectory.final_radius())
    }
}

impl Default for ApertureSpec {
    fn default() -> Self {
        Self::open()
    }
}

/// Outcome of a knife-edge cut
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApertureCut {
    /// Beam edge before the cut \[m\]
    pub incoming_radius: f64,
    /// Beam edge after the cut, also the physical aperture radius \[m\]
    pub new_radius: f64,
    /// σ of the assumed Gaussian profile \[m\]
    pub sigma: f64,
    /// Multiple asked for
    pub requested_sigma: f64,
    /// Multiple applied after clamping to [`EDGE_SIGMA`]
    pub effective_sigma: f64,
}

impl ApertureCut {
    /// Whether the request exceeded the beam edge
    pub fn is_clamped(&self) -> bool {
        self.requested_sigma > EDGE_SIGMA
    }

    /// Aperture radius in millimetres
    pub fn aperture_radius_mm(&self) -> f64 {
        self.new_radius * 1.0e3
    }

    /// Gaussian fraction of the beam passing the cut
    pub fn gaussian_transmission(&self) -> f64 {
        gaussian_transmission(self.effective_sigma)
    }

    /// Human-readable aperture report
    pub fn report(&self) -> String {
        format!(
            "Knife edge at {:.2}σ (σ = {:.3} mm): aperture radius {:.3} mm",
            self.effective_sigma,
            self.sigma * 1.0e3,
            self.aperture_radius_mm()
        )
    }
}

impl fmt::Display for ApertureCut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report())
    }
}

/// Knife-edge cut of a beam of edge `radius` at `sigma_request` σ
pub fn apply_knife_edge(radius: f64, sigma_request: f64) -> BeamResult<ApertureCut> {
    ApertureSpec::new(sigma_request)?.apply(radius)
}

// =================================================================================================
// Tests
// =================================================================================================
