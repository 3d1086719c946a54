//! Physical models
//!
//! This module provides the data and traits every envelope model shares.
//!
//! # Core Concepts
//!
//! - **Physical constants**: ε₀, μ₀, e and the ion mass unit as an explicit value
//! - **Beam configuration**: ion mass, charge, energy and current, with the
//!   derived axial velocity and space-charge force scale
//! - **Beam state**: radius and radial velocity of the beam edge
//! - **Physical model**: computes `(dr/dt, dv/dt)` at a given state
//!
//! # Architecture
//!
//! Physical models are **separate from numerical solvers**:
//! - The model provides the **equations** (physics)
//! - The solver provides the **method** to solve them (numerics)
//!
//! # Example
//!
//! ```rust
//! use beam_rs::physics::{BeamConfig, BeamState, PhysicalModel};
//! use beam_rs::models::SpaceChargeForce;
//!
//! let model = SpaceChargeForce::new(BeamConfig::reference(), 1.0).unwrap();
//! let slope = model.derivative(&BeamState::at_rest(3.0e-3)).unwrap();
//!
//! // At rest: dr/dt = 0, dv/dt > 0 (repulsive)
//! assert_eq!(slope.radius(), 0.0);
//! assert!(slope.radial_velocity() > 0.0);
//! ```

pub mod constants;
pub mod data;
pub mod traits;

pub use constants::PhysicalConstants;
pub use data::{BeamConfig, BeamParameters};
pub use traits::{BeamState, PhysicalModel};
