//! Numerical methods for the envelope equation
//!
//! Concrete implementations of the [`Solver`](crate::solver::Solver) trait.
//!
//! # Available Methods
//!
//! - **[`RK4Solver`]**: Classical fourth-order Runge-Kutta
//!   - Order: Fourth-order O(dt⁴)
//!   - Cost: 4 force evaluations per step
//!   - Use: every drift of the beam line
//!
//! - **[`EulerSolver`]**: Forward Euler method
//!   - Order: First-order O(dt)
//!   - Cost: 1 force evaluation per step
//!   - Use: convergence comparisons and quick estimates
//!
//! Both are fixed-step. There is no adaptive step control.
//!
//! # Example
//!
//! ```rust
//! use beam_rs::physics::BeamConfig;
//! use beam_rs::solver::{DriftSegment, EulerSolver, RK4Solver, Scenario, Solver, SolverConfiguration};
//!
//! let config = BeamConfig::reference();
//! let segment = DriftSegment::full_current(3.0e-3, 1.0).unwrap();
//! let scenario = Scenario::drift(&config, &segment).unwrap();
//! let configuration = SolverConfiguration::default();
//!
//! let rk4 = RK4Solver::new().solve(&scenario, &configuration).unwrap();
//! let euler = EulerSolver::new().solve(&scenario, &configuration).unwrap();
//!
//! let gap = (rk4.final_radius() - euler.final_radius()).abs();
//! assert!(gap / rk4.final_radius() < 1e-2);
//! ```
//!
//! Each solver is stateless and can be reused for any number of scenarios.

mod euler;
mod rk4;

// Re-exports for convenience
pub use euler::EulerSolver;
pub use rk4::RK4Solver;
