//! beam-rs: Space-Charge Envelope Simulation
//!
//! Follows the radius of a continuous ion beam through field-free drifts
//! and knife-edge apertures, under its own electrostatic repulsion.
//!
//! # Architecture
//!
//! beam-rs is built on two core principles:
//!
//! 1. **Separation of Physics and Numerics**
//!    - Physical models define equations (what to solve)
//!    - Numerical solvers provide methods (how to solve)
//!
//! 2. **Explicit configuration**
//!    - Physical constants and beam parameters are immutable values passed
//!      to every computation; there is no global state
//!    - Invalid inputs are rejected before any integration starts
//!
//! # Quick Start
//!
//! ```rust
//! use beam_rs::prelude::*;
//!
//! # fn main() -> BeamResult<()> {
//! // 1. Beam: argon 1+, 3 keV, 1 μA, 3 mm radius
//! let params = BeamParameters::reference();
//!
//! // 2. One drift of 0.5 m at full current
//! let trajectory = integrate(
//!     params.initial_radius,
//!     0.5,
//!     1.0,
//!     &params.config,
//!     &SolverConfiguration::default(),
//! )?;
//!
//! // 3. Cut at 1σ, continue with 68.2 % of the current
//! let cut = apply_knife_edge(trajectory.final_radius(), 1.0)?;
//! let radius = run_scenario(&params, 0.5, 1.0, 0.5, 0.682)?;
//!
//! println!("{}", cut);
//! println!("Final radius: {:.3} mm", radius * 1.0e3);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`physics`]: Constants, beam configuration, state and model trait
//! - [`models`]: Space-charge force and knife-edge aperture
//! - [`solver`]: Numerical solvers (RK4, Euler)
//! - [`pipeline`]: Drift → aperture → drift composition
//! - [`config`]: TOML scenario files
//! - [`output`]: Trajectory export

// Core modules
pub mod error;
pub mod physics;

pub mod models;
pub mod solver;

pub mod config;
pub mod output;
pub mod pipeline;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use beam_rs::prelude::*;
    //! ```
    pub use crate::error::{BeamError, BeamResult};
    pub use crate::models::{apply_knife_edge, force_per_mass, ApertureSpec, SpaceChargeForce};
    pub use crate::physics::{BeamConfig, BeamParameters, BeamState, PhysicalModel};
    pub use crate::pipeline::{run_scenario, ScenarioSpec, TransmissionPolicy};
    pub use crate::solver::{
        integrate, EulerSolver, RK4Solver, Scenario, Solver, SolverConfiguration, Trajectory,
    };
}
