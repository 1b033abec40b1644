// Metropolis single-site updates and the N² sweep driver.

use crate::energy;
use crate::lattice::Lattice;
use rand::Rng;

/// Outcome of one attempted single-site update.
#[derive(Debug, Clone, Copy)]
pub struct StepInfo {
    pub accepted: bool,
    pub delta_energy: f64,
}

/// Per-sweep totals, maintained in O(1) per step.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepStats {
    pub attempted: usize,
    pub accepted: usize,
}

impl SweepStats {
    pub fn accept_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.accepted as f64 / self.attempted as f64
        }
    }
}

/// One attempted update: pick an interior site uniformly, propose a trial
/// value, and accept with probability `min(1, exp(−β ΔE))`.
///
/// Site selection is restricted to the interior range `1..=n`; ghost
/// coordinates are never chosen. Ties at ΔE = 0 always accept. On accept the
/// ghost ring is patched before the function returns, so neighbor reads in
/// the very next step see the committed value.
pub fn metropolis_step(
    lattice: &mut Lattice,
    field: f64,
    coupling: f64,
    beta: f64,
    rng: &mut impl Rng,
) -> StepInfo {
    let n = lattice.n();
    let i = rng.gen_range(1..=n);
    let j = rng.gen_range(1..=n);

    let old_value = lattice.get(i, j);
    let neighbors = lattice.neighbors(i, j);
    let new_value = energy::propose(lattice.model(), old_value, rng);
    let delta = energy::delta_energy(
        lattice.model(),
        old_value,
        new_value,
        neighbors,
        field,
        coupling,
    );

    let accepted = if delta <= 0.0 {
        true
    } else {
        rng.gen::<f64>() <= (-beta * delta).exp()
    };

    if accepted {
        lattice.set(i, j, new_value);
        lattice.patch_ghosts(i, j);
    }

    StepInfo {
        accepted,
        delta_energy: delta,
    }
}

/// One unit of Monte Carlo time: exactly N² attempted updates, applied
/// strictly in sequence against the same configuration.
///
/// The steps form a Markov chain of single-site updates; each one reads state
/// possibly written by the previous one, so this loop must not be reordered
/// or parallelized. Independent replicas may of course sweep concurrently.
pub fn sweep(
    lattice: &mut Lattice,
    field: f64,
    coupling: f64,
    beta: f64,
    rng: &mut impl Rng,
) -> SweepStats {
    let n = lattice.n();
    let mut stats = SweepStats::default();
    for _ in 0..n * n {
        let info = metropolis_step(lattice, field, coupling, beta, rng);
        stats.attempted += 1;
        if info.accepted {
            stats.accepted += 1;
        }
    }
    debug_assert!(lattice.ghosts_in_sync());
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PhasePoint, SpinModel};
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_energy_decrease_always_accepts() {
        // 1×1 lattice: the single interior site is always selected and its
        // four neighbor reads all mirror itself. With J = 0 and B = 1 the
        // flip +1 → −1 has ΔE = −2, so acceptance is unconditional.
        let mut rng = Pcg64::seed_from_u64(21);
        let mut lat = Lattice::random(&mut rng, 1, SpinModel::Ising);
        lat.set(1, 1, 1.0);
        lat.sync_ghosts();

        let info = metropolis_step(&mut lat, 1.0, 0.0, 0.5, &mut rng);
        assert!(info.accepted);
        assert_eq!(info.delta_energy, -2.0);
        assert_eq!(lat.get(1, 1), -1.0);
        assert!(lat.ghosts_in_sync());
    }

    #[test]
    fn test_uphill_move_rejected_at_huge_beta() {
        // Fully aligned 3×3 lattice at B = 0, J = 1: every candidate flip has
        // ΔE = +8, and at β = 1e5 the acceptance ratio underflows to zero.
        let mut rng = Pcg64::seed_from_u64(22);
        let mut lat = Lattice::random(&mut rng, 3, SpinModel::Ising);
        for i in 1..=3 {
            for j in 1..=3 {
                lat.set(i, j, 1.0);
            }
        }
        lat.sync_ghosts();

        let beta = PhasePoint::new(0.0, 0.0).beta();
        for _ in 0..50 {
            let info = metropolis_step(&mut lat, 0.0, 1.0, beta, &mut rng);
            assert!(!info.accepted);
            assert_eq!(info.delta_energy, 8.0);
        }
        for i in 1..=3 {
            for j in 1..=3 {
                assert_eq!(lat.get(i, j), 1.0);
            }
        }
    }

    #[test]
    fn test_sweep_cardinality() {
        let mut rng = Pcg64::seed_from_u64(23);
        let mut lat = Lattice::random(&mut rng, 4, SpinModel::Ising);

        let stats = sweep(&mut lat, 0.0, 1.0, 1.0 / 2.269, &mut rng);
        assert_eq!(stats.attempted, 16);
        assert!(stats.accepted <= stats.attempted);
    }

    #[test]
    fn test_sweep_preserves_ising_invariants() {
        // The N = 4 discrete scenario: 6×6 storage, interior in {−1, +1},
        // ghosts mirrored, before and after a sweep near T_c.
        let mut rng = Pcg64::seed_from_u64(24);
        let mut lat = Lattice::random(&mut rng, 4, SpinModel::Ising);
        assert!(lat.ghosts_in_sync());

        for _ in 0..10 {
            sweep(&mut lat, 0.0, 1.0, 1.0 / 2.269, &mut rng);
            assert!(lat.ghosts_in_sync());
            for i in 1..=4 {
                for j in 1..=4 {
                    let v = lat.get(i, j);
                    assert!(v == 1.0 || v == -1.0);
                }
            }
        }
    }

    #[test]
    fn test_sweep_preserves_rotor_domain() {
        let mut rng = Pcg64::seed_from_u64(25);
        let mut lat = Lattice::random(&mut rng, 6, SpinModel::Rotor);

        for _ in 0..5 {
            sweep(&mut lat, 0.3, 0.8, 1.0, &mut rng);
            assert!(lat.ghosts_in_sync());
            for i in 1..=6 {
                for j in 1..=6 {
                    assert!((0.0..1.0).contains(&lat.get(i, j)));
                }
            }
        }
    }

    #[test]
    fn test_zero_temperature_sweep_is_finite() {
        // A sweep driven by the guarded β = 1/1e-5 must not produce NaN.
        let mut rng = Pcg64::seed_from_u64(26);
        let mut lat = Lattice::random(&mut rng, 8, SpinModel::Ising);

        let beta = PhasePoint::new(0.0, 0.0).beta();
        assert_eq!(beta, 1e5);
        let stats = sweep(&mut lat, 0.0, 1.0, beta, &mut rng);
        assert_eq!(stats.attempted, 64);
        assert!(lat.ghosts_in_sync());
    }
}
