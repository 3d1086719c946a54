//! Physical constants (SI)
//!
//! Carried as an explicit value instead of process-wide globals so that the
//! force model only ever reads what it was handed.

/// Vacuum permittivity ε₀ \[F/m\]
pub const EPSILON_0: f64 = 8.8541878128e-12;

/// Vacuum permeability μ₀ \[H/m\]
pub const MU_0: f64 = 1.25663706212e-6;

/// Speed of light in vacuum \[m/s\]
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Elementary charge \[C\], also the eV → J conversion factor
pub const ELEMENTARY_CHARGE: f64 = 1.602176634e-19;

/// Hydrogen atom mass \[kg\]. Ion masses are given in multiples of this unit.
pub const HYDROGEN_MASS: f64 = 1.6735575e-27;

/// Set of constants used by one simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    /// ε₀ \[F/m\]
    pub permittivity: f64,
    /// μ₀ \[H/m\]
    pub permeability: f64,
    /// e \[C\]
    pub elementary_charge: f64,
    /// Mass unit used for ion masses \[kg\]
    pub mass_unit: f64,
}

impl PhysicalConstants {
    /// CODATA values, ion masses in hydrogen-atom units
    pub const SI: Self = Self {
        permittivity: EPSILON_0,
        permeability: MU_0,
        elementary_charge: ELEMENTARY_CHARGE,
        mass_unit: HYDROGEN_MASS,
    };

    /// Speed of light implied by ε₀ and μ₀
    pub fn speed_of_light(&self) -> f64 {
        1.0 / (self.permittivity * self.permeability).sqrt()
    }

    /// Energy in electron-volts to joules
    pub fn ev_to_joule(&self, energy_ev: f64) -> f64 {
        energy_ev * self.elementary_charge
    }

    /// Mass in `mass_unit` multiples to kilograms
    pub fn mass_to_kg(&self, mass_units: f64) -> f64 {
        mass_units * self.mass_unit
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::SI
    }
}
