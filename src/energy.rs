// Site energies, trial moves, and energy deltas for both model variants.

use crate::config::SpinModel;
use rand::Rng;
use std::f64::consts::TAU;

/// Energy contribution of a single site given its four neighbors.
///
/// Ising: `E = v·B − J·Σ v·v_k`.
///
/// Rotor: values are fractions of a full turn, so both the field term and the
/// pair term carry the 2π conversion: `E = B·cos(2π v) − J·Σ cos(2π (v − v_k))`.
pub fn site_energy(
    model: SpinModel,
    value: f64,
    neighbors: [f64; 4],
    field: f64,
    coupling: f64,
) -> f64 {
    match model {
        SpinModel::Ising => {
            let pair: f64 = neighbors.iter().map(|&s| value * s).sum();
            value * field - coupling * pair
        }
        SpinModel::Rotor => {
            let pair: f64 = neighbors.iter().map(|&t| (TAU * (value - t)).cos()).sum();
            field * (TAU * value).cos() - coupling * pair
        }
    }
}

/// Trial value for a site holding `value`.
///
/// Ising has a unique move, the sign flip. The rotor move redraws the angle
/// uniformly over the whole range rather than perturbing the current one;
/// the acceptance statistics depend on this and it must not be narrowed.
pub fn propose(model: SpinModel, value: f64, rng: &mut impl Rng) -> f64 {
    match model {
        SpinModel::Ising => -value,
        SpinModel::Rotor => rng.gen::<f64>(),
    }
}

/// Energy change of replacing `old_value` with `new_value` at a site whose
/// neighborhood is held fixed.
pub fn delta_energy(
    model: SpinModel,
    old_value: f64,
    new_value: f64,
    neighbors: [f64; 4],
    field: f64,
    coupling: f64,
) -> f64 {
    site_energy(model, new_value, neighbors, field, coupling)
        - site_energy(model, old_value, neighbors, field, coupling)
}
