// Measurements over the interior of a configuration.

use crate::config::SpinModel;
use crate::energy;
use crate::lattice::Lattice;
use num_complex::Complex64;
use std::f64::consts::TAU;

/// Scalar measurements taken at a sweep boundary.
#[derive(Debug, Clone, Copy)]
pub struct Observables {
    /// Order parameter: |mean spin| for Ising, modulus of the mean unit
    /// phasor `exp(i 2π v)` for the rotor.
    pub magnetization: f64,
    /// Energy per interior site, each pair bond counted once.
    pub energy: f64,
}

/// Measure the current configuration.
pub fn measure(lattice: &Lattice, field: f64, coupling: f64) -> Observables {
    let n = lattice.n();
    let sites = (n * n) as f64;
    let model = lattice.model();

    let mut energy_total = 0.0;
    let mut spin_sum = 0.0;
    let mut phasor = Complex64::new(0.0, 0.0);

    for i in 1..=n {
        for j in 1..=n {
            let v = lattice.get(i, j);
            // Halving the coupling counts each bond once across the two
            // sites that share it; the field term is per-site anyway.
            energy_total +=
                energy::site_energy(model, v, lattice.neighbors(i, j), field, 0.5 * coupling);
            match model {
                SpinModel::Ising => spin_sum += v,
                SpinModel::Rotor => phasor += Complex64::from_polar(1.0, TAU * v),
            }
        }
    }

    let magnetization = match model {
        SpinModel::Ising => (spin_sum / sites).abs(),
        SpinModel::Rotor => (phasor / sites).norm(),
    };

    Observables {
        magnetization,
        energy: energy_total / sites,
    }
}

/// Welford online statistics.
#[derive(Debug, Default, Clone)]
pub struct OnlineStats {
    n: u64,
    mean: f64,
    m2: f64,
}

impl OnlineStats {
    pub fn push(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        let delta2 = x - self.mean;
        self.m2 += delta * delta2;
    }

    pub fn count(&self) -> u64 {
        self.n
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn var(&self) -> f64 {
        if self.n > 1 {
            self.m2 / (self.n - 1) as f64
        } else {
            0.0
        }
    }

    pub fn std(&self) -> f64 {
        self.var().sqrt()
    }
}
