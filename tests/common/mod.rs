//! Common utilities for integration tests

#![allow(dead_code)]

pub mod mock_models;
pub mod test_helpers;

// Re-export commonly used items; each test crate uses a subset
#[allow(unused_imports)]
pub use mock_models::{ConstantAcceleration, HarmonicOscillator, InverseRadius};
#[allow(unused_imports)]
pub use test_helpers::{relative_error, transit_time_to_reach, REFERENCE};
