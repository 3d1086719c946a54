//! Physical models for the beam line
//!
//! # Available Models
//!
//! ## [`SpaceChargeForce`] - envelope expansion in a drift
//!
//! Implements [`PhysicalModel`](crate::physics::PhysicalModel): the radial
//! electrostatic self-force of the beam, scaled by the fraction of current
//! still transmitted. The solver integrates it, the model only evaluates
//! `r'' = a(r)`.
//!
//! ## [`ApertureSpec`] - knife-edge aperture
//!
//! An instantaneous cut of the beam radius at a multiple of σ = r / 3.
//! Not a differential model: it maps an incoming radius to a new one.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod aperture;
pub mod space_charge;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use aperture::{apply_knife_edge, gaussian_transmission, ApertureCut, ApertureSpec, EDGE_SIGMA};
pub use space_charge::{force_per_mass, magnetic_to_electric_ratio, SpaceChargeForce};
