//! Mock physical models with known solutions

use beam_rs::error::BeamResult;
use beam_rs::physics::{BeamState, PhysicalModel};

/// r'' = g
///
/// Exact: r(t) = r₀ + v₀ t + g t² / 2. RK4 reproduces it to rounding.
pub struct ConstantAcceleration {
    pub acceleration: f64,
}

impl ConstantAcceleration {
    pub fn new(acceleration: f64) -> Self {
        Self { acceleration }
    }

    pub fn exact_radius(&self, initial: &BeamState, t: f64) -> f64 {
        initial.radius() + initial.radial_velocity() * t + 0.5 * self.acceleration * t * t
    }
}

impl PhysicalModel for ConstantAcceleration {
    fn derivative(&self, state: &BeamState) -> BeamResult<BeamState> {
        Ok(BeamState::new(state.radial_velocity(), self.acceleration))
    }

    fn name(&self) -> &str {
        "Constant Acceleration"
    }
}

/// r'' = -ω² r
///
/// Exact from rest: r(t) = r₀ cos(ωt)
pub struct HarmonicOscillator {
    pub omega: f64,
}

impl HarmonicOscillator {
    pub fn new(omega: f64) -> Self {
        Self { omega }
    }

    pub fn exact_radius(&self, r0: f64, t: f64) -> f64 {
        r0 * (self.omega * t).cos()
    }
}

impl PhysicalModel for HarmonicOscillator {
    fn derivative(&self, state: &BeamState) -> BeamResult<BeamState> {
        Ok(BeamState::new(
            state.radial_velocity(),
            -self.omega * self.omega * state.radius(),
        ))
    }

    fn name(&self) -> &str {
        "Harmonic Oscillator"
    }

    fn description(&self) -> Option<&str> {
        Some("Linear restoring force, periodic solution")
    }
}

/// r'' = K / r, the space-charge law with a free constant
///
/// Unlike the production model it accepts any K, including values that
/// make the comparison against quadrature well conditioned.
pub struct InverseRadius {
    pub strength: f64,
}

impl PhysicalModel for InverseRadius {
    fn derivative(&self, state: &BeamState) -> BeamResult<BeamState> {
        Ok(BeamState::new(
            state.radial_velocity(),
            self.strength / state.radius(),
        ))
    }

    fn name(&self) -> &str {
        "Inverse Radius"
    }
}
