// Ghost-padded lattice storage with incremental boundary repair.

use crate::config::SpinModel;
use rand::Rng;

/// Square lattice of interior side `n` with one ring of ghost cells.
///
/// Cells are stored row-major in an `(n + 2) × (n + 2)` block. Interior sites
/// occupy rows and columns `1..=n`; ghost row 0 mirrors interior row `n`,
/// ghost row `n + 1` mirrors interior row 1, and symmetrically for columns.
/// As long as the mirrors stay in sync, every interior site can read its four
/// neighbors with plain offset arithmetic and no wrapping.
///
/// The ghost corners are never read (the von Neumann stencil of an interior
/// site only touches edge ghosts) and are left untouched by synchronization.
#[derive(Debug, Clone)]
pub struct Lattice {
    n: usize,
    side: usize,
    cells: Vec<f64>,
    model: SpinModel,
}

impl Lattice {
    /// Fresh configuration with independent uniform-random interior sites,
    /// ghosts fully synchronized.
    ///
    /// Ising sites are −1 or +1 with equal probability; rotor sites are drawn
    /// uniformly from [0, 1).
    pub fn random(rng: &mut impl Rng, n: usize, model: SpinModel) -> Self {
        assert!(n >= 1, "lattice side must be positive");
        let side = n + 2;
        let mut lattice = Self {
            n,
            side,
            cells: vec![0.0; side * side],
            model,
        };
        for i in 1..=n {
            for j in 1..=n {
                let value = match model {
                    SpinModel::Ising => {
                        if rng.gen::<f64>() < 0.5 {
                            -1.0
                        } else {
                            1.0
                        }
                    }
                    SpinModel::Rotor => rng.gen::<f64>(),
                };
                lattice.set(i, j, value);
            }
        }
        lattice.sync_ghosts();
        lattice
    }

    /// Interior side length.
    #[inline(always)]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline(always)]
    pub fn model(&self) -> SpinModel {
        self.model
    }

    #[inline(always)]
    fn idx(&self, i: usize, j: usize) -> usize {
        i * self.side + j
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[self.idx(i, j)]
    }

    #[inline(always)]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        let k = self.idx(i, j);
        self.cells[k] = value;
    }

    /// The four von Neumann neighbors of interior site (i, j), read through
    /// the ghost ring: `[down, up, right, left]`.
    #[inline(always)]
    pub fn neighbors(&self, i: usize, j: usize) -> [f64; 4] {
        [
            self.get(i + 1, j),
            self.get(i - 1, j),
            self.get(i, j + 1),
            self.get(i, j - 1),
        ]
    }

    /// Rebuild the whole ghost ring from the interior edges.
    ///
    /// Used once after initialization; per-site mutations go through
    /// [`Lattice::patch_ghosts`] instead.
    pub fn sync_ghosts(&mut self) {
        let n = self.n;
        for k in 1..=n {
            let top = self.get(1, k);
            let bottom = self.get(n, k);
            self.set(0, k, bottom);
            self.set(n + 1, k, top);

            let left = self.get(k, 1);
            let right = self.get(k, n);
            self.set(k, 0, right);
            self.set(k, n + 1, left);
        }
    }

    /// O(1) ghost repair after mutating interior site (i, j).
    ///
    /// Only the mirrors of that single site are rewritten; a corner site is
    /// both a row-edge and a column-edge case, and gets both patches.
    #[inline]
    pub fn patch_ghosts(&mut self, i: usize, j: usize) {
        let n = self.n;
        let value = self.get(i, j);
        if i == 1 {
            self.set(n + 1, j, value);
        }
        if i == n {
            self.set(0, j, value);
        }
        if j == 1 {
            self.set(i, n + 1, value);
        }
        if j == n {
            self.set(i, 0, value);
        }
    }

    /// Whether every ghost cell currently mirrors the opposite interior edge.
    /// Diagnostic; the sweep driver debug-asserts it at sweep boundaries.
    pub fn ghosts_in_sync(&self) -> bool {
        let n = self.n;
        (1..=n).all(|k| {
            self.get(0, k) == self.get(n, k)
                && self.get(n + 1, k) == self.get(1, k)
                && self.get(k, 0) == self.get(k, n)
                && self.get(k, n + 1) == self.get(k, 1)
        })
    }

    /// Interior rows only, top to bottom — the view handed to a renderer.
    /// Ghost cells are an implementation detail and are not exposed.
    pub fn interior_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (1..=self.n).map(move |i| {
            let start = i * self.side + 1;
            &self.cells[start..start + self.n]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_ising_init_domain_and_ghosts() {
        let mut rng = Pcg64::seed_from_u64(1);
        let lat = Lattice::random(&mut rng, 4, SpinModel::Ising);

        // 4 interior rows inside 6×6 storage.
        assert_eq!(lat.n(), 4);
        assert_eq!(lat.interior_rows().count(), 4);

        for i in 1..=4 {
            for j in 1..=4 {
                let v = lat.get(i, j);
                assert!(v == 1.0 || v == -1.0);
            }
        }
        assert!(lat.ghosts_in_sync());

        // Spot-check the mirror convention directly.
        for j in 1..=4 {
            assert_eq!(lat.get(0, j), lat.get(4, j));
            assert_eq!(lat.get(5, j), lat.get(1, j));
        }
    }

    #[test]
    fn test_rotor_init_domain() {
        let mut rng = Pcg64::seed_from_u64(2);
        let lat = Lattice::random(&mut rng, 8, SpinModel::Rotor);
        for i in 1..=8 {
            for j in 1..=8 {
                let v = lat.get(i, j);
                assert!((0.0..1.0).contains(&v));
            }
        }
        assert!(lat.ghosts_in_sync());
    }

    #[test]
    fn test_neighbor_reads_through_ghosts() {
        let mut rng = Pcg64::seed_from_u64(3);
        let mut lat = Lattice::random(&mut rng, 3, SpinModel::Rotor);

        // Overwrite the interior with recognizable values 10*i + j.
        for i in 1..=3 {
            for j in 1..=3 {
                lat.set(i, j, (10 * i + j) as f64);
            }
        }
        lat.sync_ghosts();

        // Bulk site: plain neighbors.
        assert_eq!(lat.neighbors(2, 2), [32.0, 12.0, 23.0, 21.0]);

        // Corner site: up and left wrap around through the ghost ring.
        assert_eq!(lat.neighbors(1, 1), [21.0, 31.0, 12.0, 13.0]);
    }

    #[test]
    fn test_patch_single_edge() {
        let mut rng = Pcg64::seed_from_u64(4);
        let mut lat = Lattice::random(&mut rng, 4, SpinModel::Ising);

        lat.set(1, 3, -3.0);
        lat.patch_ghosts(1, 3);
        assert_eq!(lat.get(5, 3), -3.0);

        lat.set(4, 2, -4.0);
        lat.patch_ghosts(4, 2);
        assert_eq!(lat.get(0, 2), -4.0);

        lat.set(2, 1, -5.0);
        lat.patch_ghosts(2, 1);
        assert_eq!(lat.get(2, 5), -5.0);

        lat.set(3, 4, -6.0);
        lat.patch_ghosts(3, 4);
        assert_eq!(lat.get(3, 0), -6.0);

        assert!(lat.ghosts_in_sync());
    }

    #[test]
    fn test_patch_corner_updates_both_mirrors() {
        let mut rng = Pcg64::seed_from_u64(5);
        let mut lat = Lattice::random(&mut rng, 4, SpinModel::Ising);

        lat.set(1, 1, -9.0);
        lat.patch_ghosts(1, 1);
        assert_eq!(lat.get(5, 1), -9.0);
        assert_eq!(lat.get(1, 5), -9.0);
        assert!(lat.ghosts_in_sync());
    }

    #[test]
    fn test_bulk_mutation_needs_no_patch() {
        let mut rng = Pcg64::seed_from_u64(6);
        let mut lat = Lattice::random(&mut rng, 4, SpinModel::Ising);

        // A site away from every edge leaves all ghosts valid.
        lat.set(2, 3, -lat.get(2, 3));
        lat.patch_ghosts(2, 3);
        assert!(lat.ghosts_in_sync());
    }

    #[test]
    fn test_interior_view_shape() {
        let mut rng = Pcg64::seed_from_u64(7);
        let lat = Lattice::random(&mut rng, 3, SpinModel::Rotor);

        let rows: Vec<&[f64]> = lat.interior_rows().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == 3));
        assert_eq!(rows[0][0], lat.get(1, 1));
        assert_eq!(rows[2][2], lat.get(3, 3));
    }
}
