//! Error taxonomy
//!
//! Every fallible operation of the crate returns [`BeamResult`]. Errors are
//! local, synchronous rejections: nothing is retried and no integration is
//! resumed after a failure.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BeamError {
    /// Input outside the domain where the model is defined
    /// (non-positive radius, drift length, transmission outside (0, 1], ...)
    #[error("Domain error: {parameter} = {value} ({reason})")]
    Domain {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Radius reached zero or became negative during integration
    #[error("Space-charge singularity at step {step}: radius = {radius} m")]
    Singularity { step: usize, radius: f64 },

    /// NaN or infinity appeared in the state
    #[error("Non-finite {quantity} at step {step}. Try reducing the time step")]
    NonFinite { step: usize, quantity: &'static str },

    /// Missing or invalid physical configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested drift needs more steps than the configured budget
    #[error("Step budget exceeded: {required} steps required, budget is {budget}")]
    StepBudgetExceeded { required: usize, budget: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scenario file error: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type BeamResult<T> = Result<T, BeamError>;

impl BeamError {
    pub(crate) fn domain(parameter: &'static str, value: f64, reason: &'static str) -> Self {
        Self::Domain { parameter, value, reason }
    }

    /// True for input-validation failures (rejected before any integration)
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain { .. })
    }
}
