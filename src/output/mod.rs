//! Output of simulation results
//!
//! ```text
//! output/
//! ├── mod.rs
//! └── export/             ← Data export
//!     ├── mod.rs
//!     └── csv.rs
//! ```
//!
//! Export works on [`Trajectory`](crate::solver::Trajectory) values. Plotting
//! is left to external tools reading the CSV files.

pub mod export;

// Re-export commonly used items for convenience
pub use export::{export_trajectory_csv, CsvConfig, CsvExporter, CsvMetadata, Exporter};
