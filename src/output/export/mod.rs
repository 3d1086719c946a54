//! Export of integrated envelopes
//!
//! # Architecture
//!
//! The [`Exporter`] trait abstracts the file format. Each format lives in its
//! own sub-module; adding one means adding a file.
//!
//! | Format  | Module          |
//! |---------|-----------------|
//! | CSV     | [`csv`]         |
//!
//! # Usage example
//!
//! ```rust,no_run
//! use beam_rs::output::export::{CsvConfig, CsvExporter, Exporter};
//! use beam_rs::physics::BeamConfig;
//! use beam_rs::solver::{integrate, SolverConfiguration};
//!
//! let config = BeamConfig::reference();
//! let trajectory = integrate(3.0e-3, 2.0, 1.0, &config, &SolverConfiguration::default()).unwrap();
//!
//! // Downsampled export to 500 points
//! let exporter = CsvExporter::new(CsvConfig::default().n_points(500));
//! exporter.export(&trajectory, config.axial_velocity(), "leg1.csv").unwrap();
//! ```

pub mod csv;

pub use csv::{export_trajectory_csv, CsvConfig, CsvExporter, CsvMetadata};

use std::path::Path;

use crate::solver::Trajectory;

/// Abstraction trait for all export formats.
///
/// # Associated type `Error`
///
/// Each format manages its own errors via the associated type.
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error;

    /// Writes one trajectory.
    ///
    /// `axial_velocity` converts sample times to axial positions z = v_b·t.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is invalid or the trajectory holds
    /// non-finite values.
    fn export(
        &self,
        trajectory: &Trajectory,
        axial_velocity: f64,
        path: impl AsRef<Path>,
    ) -> Result<(), Self::Error>;
}
