// Model kinds, lattice sizes, and the (T, B) phase point.

use std::fmt;

/// Which spin model the lattice holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinModel {
    /// Discrete Ising spins, value ∈ {-1, +1}.
    Ising,
    /// Planar rotors, value ∈ [0, 1) as a fraction of a full turn.
    Rotor,
}

impl TryFrom<&str> for SpinModel {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "ising" => Ok(Self::Ising),
            "rotor" | "xy" => Ok(Self::Rotor),
            _ => Err(format!("unknown model '{s}', expected 'ising' or 'rotor'")),
        }
    }
}

impl fmt::Display for SpinModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ising => write!(f, "ising"),
            Self::Rotor => write!(f, "rotor"),
        }
    }
}

/// Lattice side lengths offered by the size selector.
pub const LATTICE_SIZES: [usize; 4] = [64, 128, 256, 512];

/// Check a requested side length against the selector set.
pub fn validate_size(n: usize) -> Result<usize, String> {
    if LATTICE_SIZES.contains(&n) {
        Ok(n)
    } else {
        Err(format!(
            "unsupported lattice size {n}, expected one of {LATTICE_SIZES:?}"
        ))
    }
}

/// Substituted for T when the selector sits exactly at zero, so that
/// beta = 1/T stays finite.
pub const TEMPERATURE_FLOOR: f64 = 1e-5;

/// Exact critical temperature of the square-lattice Ising model,
/// `2 / ln(1 + √2)`.
pub fn critical_temperature() -> f64 {
    2.0 / (1.0 + 2.0_f64.sqrt()).ln()
}

/// A (temperature, field) pair in physical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhasePoint {
    pub temperature: f64,
    pub field: f64,
}

impl PhasePoint {
    pub fn new(temperature: f64, field: f64) -> Self {
        Self { temperature, field }
    }

    /// The Ising critical point at zero field.
    pub fn critical() -> Self {
        Self {
            temperature: critical_temperature(),
            field: 0.0,
        }
    }

    /// Inverse temperature with the zero-temperature guard applied.
    pub fn beta(&self) -> f64 {
        let t = if self.temperature == 0.0 {
            TEMPERATURE_FLOOR
        } else {
            self.temperature
        };
        1.0 / t
    }
}

/// Linear mapping between selector pointer coordinates and (T, B).
///
/// The temperature axis maps the pointer range `[0, extent]` onto
/// `[0, t_scale]`; the field axis maps onto `[-b_scale/2, +b_scale/2]`, with
/// the midpoint of the selector at zero field.
#[derive(Debug, Clone, Copy)]
pub struct PhaseSelector {
    pub extent: [f64; 2],
    pub scalings: [f64; 2],
}

impl Default for PhaseSelector {
    fn default() -> Self {
        Self {
            extent: [200.0, 200.0],
            scalings: [3.5, 2.0],
        }
    }
}

impl PhaseSelector {
    /// Physical phase point under the pointer at (x, y).
    pub fn phase_point(&self, x: f64, y: f64) -> PhasePoint {
        PhasePoint {
            temperature: (x / self.extent[0]) * self.scalings[0],
            field: (y / self.extent[1] - 0.5) * self.scalings[1],
        }
    }

    /// Pointer position for a phase point (used by the critical-point shortcut).
    pub fn pointer_for(&self, phase: PhasePoint) -> (f64, f64) {
        (
            (phase.temperature / self.scalings[0]) * self.extent[0],
            (phase.field / self.scalings[1] + 0.5) * self.extent[1],
        )
    }
}
