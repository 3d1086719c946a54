//! Physical models traits and types
//!
//! This module defines the core API for envelope models:
//! - `BeamState`: radius and radial velocity of the beam edge
//! - `PhysicalModel`: trait for all models driving the envelope

use nalgebra::Vector2;
use std::fmt;

use crate::error::BeamResult;

// =================================================================================================
// Beam State
// =================================================================================================

/// State of the beam edge at one time sample
///
/// Stored as the first-order system `(r, v)`: radius \[m\] and radial
/// velocity \[m/s\]. The same type carries derivatives `(dr/dt, dv/dt)`
/// returned by [`PhysicalModel::derivative`], so the solvers can combine
/// stage slopes with the arithmetic operators.
///
/// # Example
/// ```
/// use beam_rs::physics::BeamState;
///
/// let state = BeamState::at_rest(3.0e-3);
/// let moved = state + BeamState::new(1.0, 0.0) * 1.0e-3;
/// assert!((moved.radius() - 4.0e-3).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamState {
    values: Vector2<f64>,
}

impl BeamState {
    pub fn new(radius: f64, radial_velocity: f64) -> Self {
        Self {
            values: Vector2::new(radius, radial_velocity),
        }
    }

    /// Beam edge at `radius` with no radial motion
    pub fn at_rest(radius: f64) -> Self {
        Self::new(radius, 0.0)
    }

    /// Radius \[m\] (or dr/dt for a derivative)
    #[inline]
    pub fn radius(&self) -> f64 {
        self.values.x
    }

    /// Radial velocity \[m/s\] (or dv/dt for a derivative)
    #[inline]
    pub fn radial_velocity(&self) -> f64 {
        self.values.y
    }

    /// Both components finite
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|x| x.is_finite())
    }

    pub fn as_vector(&self) -> &Vector2<f64> {
        &self.values
    }
}

impl From<Vector2<f64>> for BeamState {
    fn from(values: Vector2<f64>) -> Self {
        Self { values }
    }
}

// Operator overloading for numerical operations

impl std::ops::Add for BeamState {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self { values: self.values + rhs.values }
    }
}

impl std::ops::Mul<f64> for BeamState {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self::Output {
        Self { values: self.values * scalar }
    }
}

impl fmt::Display for BeamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "r = {:.6e} m, v_r = {:.6e} m/s",
            self.radius(),
            self.radial_velocity()
        )
    }
}

// ==================================================================================================
// Physical Model Trait
// =================================================================================================

/// Trait for envelope models
///
/// # Responsibility
/// Computes the right-hand side of the envelope equation at a given state.
/// Does NOT integrate it (that's the Solver's job).
///
/// The model provides the "physics" (equations), the Solver provides
/// the "numerics" (method to solve them).
pub trait PhysicalModel: Send + Sync {
    /// Right-hand side of the first-order system
    ///
    /// For `r'' = a(r)` rewritten as `(r, v)`, returns `(v, a(r))`.
    ///
    /// # Errors
    ///
    /// Models reject states outside their domain (e.g. a singular force at
    /// `r <= 0`) instead of returning NaN or infinity.
    fn derivative(&self, state: &BeamState) -> BeamResult<BeamState>;

    /// Name of the model (used to display and logging)
    fn name(&self) -> &str;

    /// Description of the model (option)
    fn description(&self) -> Option<&str> {
        None
    }
}
