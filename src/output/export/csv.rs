//! CSV export of beam envelopes
//!
//! Compatible with spreadsheet tools, pandas and gnuplot.
//!
//! # Features
//!
//! - **Metadata support**: Optional `#` header with run information
//! - **Customizable**: Delimiter, decimal separator, precision
//! - **Downsampling**: Uniform thinning that keeps the first and last samples
//! - **Validation**: Refuses NaN and Inf values
//!
//! # Example
//!
//! ```rust,no_run
//! use beam_rs::output::export::{export_trajectory_csv, CsvConfig, CsvMetadata};
//! use beam_rs::physics::BeamConfig;
//! use beam_rs::solver::{integrate, SolverConfiguration};
//!
//! let config = BeamConfig::reference();
//! let trajectory = integrate(3.0e-3, 2.0, 1.0, &config, &SolverConfiguration::default()).unwrap();
//!
//! let csv = CsvConfig::default()
//!     .with_metadata(CsvMetadata::from_trajectory(&trajectory))
//!     .n_points(200);
//! export_trajectory_csv(&trajectory, config.axial_velocity(), "drift.csv", Some(&csv)).unwrap();
//! ```
//!
//! **Output** (`drift.csv`):
//! ```text
//! # Beam Envelope Data
//! # Generated: 2026-02-11T15:30:00+00:00
//! # Model: Space-charge envelope
//! # Solver: Runge-Kutta 4
//! # Total Time: 0.00001668 s
//! # Time Steps: 1668
//! # dt: 0.00000001 s
//! #
//! Time (s),z (m),Radius (mm),Radial velocity (m/s)
//! 0.000000e0,0.000000e0,3.000000e0,0.000000e0
//! ...
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{BeamError, BeamResult};
use crate::output::export::Exporter;
use crate::solver::Trajectory;

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use beam_rs::output::export::CsvConfig;
///
/// let config = CsvConfig {
///     delimiter: ';',
///     precision: 10,
///     ..Default::default()
/// };
/// assert!(config.radius_in_mm);
/// ```
#[derive(Clone, Debug)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Digits after the decimal point, scientific notation (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<CsvMetadata>,

    /// Write the radius in millimetres instead of metres (default: true)
    pub radius_in_mm: bool,

    /// Thin the output to this many rows (default: all samples)
    pub n_points: Option<usize>,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
            radius_in_mm: true,
            n_points: None,
        }
    }
}

impl CsvConfig {
    /// European CSV format (semicolon, comma for decimal)
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: set number of exported rows
    pub fn n_points(mut self, n_points: usize) -> Self {
        self.n_points = Some(n_points);
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }

    fn radius_header(&self) -> &'static str {
        if self.radius_in_mm { "Radius (mm)" } else { "Radius (m)" }
    }
}

/// Metadata for CSV header comments
///
/// Only fields that are set end up in the header.
#[derive(Clone, Debug, Default)]
pub struct CsvMetadata {
    pub model_name: Option<String>,
    pub solver_name: Option<String>,
    /// Integrated time (seconds)
    pub total_time: Option<f64>,
    pub time_steps: Option<usize>,
    /// Step size (seconds)
    pub dt: Option<f64>,
    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Collect run information from a trajectory
    pub fn from_trajectory(trajectory: &Trajectory) -> Self {
        let mut metadata = Self {
            model_name: trajectory.get_metadata("model").map(str::to_string),
            solver_name: trajectory.get_metadata("solver").map(str::to_string),
            total_time: Some(trajectory.final_time()),
            time_steps: Some(trajectory.steps),
            dt: Some(trajectory.dt),
            custom: Vec::new(),
        };
        for key in ["drift length", "transmission"] {
            if let Some(value) = trajectory.get_metadata(key) {
                metadata.add_custom(key, value);
            }
        }
        metadata
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: &str, value: &str) {
        self.custom.push((key.to_string(), value.to_string()));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn write_metadata_header(out: &mut impl Write, metadata: &CsvMetadata) -> BeamResult<()> {
    writeln!(out, "# Beam Envelope Data")?;
    writeln!(out, "# Generated: {}", chrono::Utc::now().to_rfc3339())?;

    if let Some(model) = &metadata.model_name {
        writeln!(out, "# Model: {}", model)?;
    }
    if let Some(solver) = &metadata.solver_name {
        writeln!(out, "# Solver: {}", solver)?;
    }
    if let Some(total_time) = metadata.total_time {
        writeln!(out, "# Total Time: {} s", total_time)?;
    }
    if let Some(time_steps) = metadata.time_steps {
        writeln!(out, "# Time Steps: {}", time_steps)?;
    }
    if let Some(dt) = metadata.dt {
        writeln!(out, "# dt: {} s", dt)?;
    }
    for (key, value) in &metadata.custom {
        writeln!(out, "# {}: {}", key, value)?;
    }

    writeln!(out, "#")?;
    Ok(())
}

/// Format number with configured precision and decimal separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$e}", value, prec = config.precision);

    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

/// Indices of a uniform thinning of `len` samples to `n_points`
///
/// The first and last samples are always kept. Requests of 0, 1 or at
/// least `len` points return every index (0 and 1 cannot hold both ends).
pub(crate) fn downsample_indices(len: usize, n_points: Option<usize>) -> Vec<usize> {
    match n_points {
        Some(n) if n >= 2 && n < len => {
            let last = len - 1;
            let mut indices: Vec<usize> = (0..n)
                .map(|k| ((k as f64) * last as f64 / (n - 1) as f64).round() as usize)
                .collect();
            indices.dedup();
            indices
        }
        _ => (0..len).collect(),
    }
}

// =============================================================================
// Export Functions
// =============================================================================

/// Export one trajectory to CSV
///
/// Columns: time, axial position z = v_b·t, radius, radial velocity.
///
/// # Errors
///
/// - NaN or Inf values in the trajectory or in `axial_velocity`
/// - File creation or write errors
pub fn export_trajectory_csv(
    trajectory: &Trajectory,
    axial_velocity: f64,
    output_path: impl AsRef<Path>,
    configuration: Option<&CsvConfig>,
) -> BeamResult<()> {
    // ============================= Validation =============================

    if trajectory.is_empty() {
        return Err(BeamError::Configuration("Empty trajectory".to_string()));
    }
    if !axial_velocity.is_finite() {
        return Err(BeamError::NonFinite { step: 0, quantity: "axial velocity" });
    }
    if let Some(index) = trajectory.states.iter().position(|s| !s.is_finite()) {
        return Err(BeamError::NonFinite { step: index, quantity: "state" });
    }

    let binding = CsvConfig::default();
    let configuration = configuration.unwrap_or(&binding);
    let radius_scale = if configuration.radius_in_mm { 1.0e3 } else { 1.0 };
    let d = configuration.delimiter;

    // ============================= Write ==================================

    let mut out = BufWriter::new(File::create(output_path)?);

    if configuration.include_metadata
        && let Some(metadata) = &configuration.metadata
    {
        write_metadata_header(&mut out, metadata)?;
    }

    writeln!(
        out,
        "Time (s){d}z (m){d}{}{d}Radial velocity (m/s)",
        configuration.radius_header()
    )?;

    for index in downsample_indices(trajectory.len(), configuration.n_points) {
        let time = trajectory.time_points[index];
        let state = &trajectory.states[index];
        writeln!(
            out,
            "{}{d}{}{d}{}{d}{}",
            format_number(time, configuration),
            format_number(time * axial_velocity, configuration),
            format_number(state.radius() * radius_scale, configuration),
            format_number(state.radial_velocity(), configuration),
        )?;
    }

    out.flush()?;
    Ok(())
}

/// CSV implementation of [`Exporter`]
#[derive(Clone, Debug, Default)]
pub struct CsvExporter {
    pub config: CsvConfig,
}

impl CsvExporter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }
}

impl Exporter for CsvExporter {
    type Error = BeamError;

    fn export(
        &self,
        trajectory: &Trajectory,
        axial_velocity: f64,
        path: impl AsRef<Path>,
    ) -> BeamResult<()> {
        export_trajectory_csv(trajectory, axial_velocity, path, Some(&self.config))
    }
}

// =================================================================================================
// Tests
// =================================================================================================
