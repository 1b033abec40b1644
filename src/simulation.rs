// Sweep-loop orchestration: run/pause/reset around the core sweep driver.

use crate::config::{PhasePoint, SpinModel};
use crate::lattice::Lattice;
use crate::metropolis::{self, SweepStats};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::time::Duration;

/// One lattice replica plus its RNG stream and run/pause state.
///
/// Sweeps are atomic with respect to observers: a pause request takes effect
/// between sweeps, never inside one, and the renderer-facing view is only
/// meaningful at sweep boundaries. The configuration is exclusively owned
/// here; drivers hand it out by reference from the frame callback.
pub struct Simulation {
    lattice: Lattice,
    rng: Pcg64,
    coupling: f64,
    phase: PhasePoint,
    running: bool,
    sweeps_done: usize,
}

impl Simulation {
    /// Build a replica with a fresh random configuration.
    ///
    /// The lattice size and coupling are normally pre-validated by the input
    /// layer; out-of-domain values here are caller bugs and are reported
    /// rather than clamped.
    pub fn new(
        n: usize,
        model: SpinModel,
        coupling: f64,
        phase: PhasePoint,
        seed: u64,
    ) -> Result<Self, String> {
        if n == 0 {
            return Err("lattice side must be positive".into());
        }
        if !(0.0..=1.0).contains(&coupling) {
            return Err(format!("coupling must lie in [0, 1], got {coupling}"));
        }

        let mut rng = Pcg64::seed_from_u64(seed);
        let lattice = Lattice::random(&mut rng, n, model);
        Ok(Self {
            lattice,
            rng,
            coupling,
            phase,
            running: true,
            sweeps_done: 0,
        })
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn phase(&self) -> PhasePoint {
        self.phase
    }

    /// Move the phase point; picked up by the next sweep.
    pub fn set_phase(&mut self, phase: PhasePoint) {
        self.phase = phase;
    }

    pub fn coupling(&self) -> f64 {
        self.coupling
    }

    /// Update the coupling; the input layer keeps J within [0, 1].
    pub fn set_coupling(&mut self, coupling: f64) {
        self.coupling = coupling;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn sweeps_done(&self) -> usize {
        self.sweeps_done
    }

    /// Advance one full sweep if running. Returns `None` while paused, with
    /// the configuration untouched.
    pub fn tick(&mut self) -> Option<SweepStats> {
        if !self.running {
            return None;
        }
        let beta = self.phase.beta();
        let stats = metropolis::sweep(
            &mut self.lattice,
            self.phase.field,
            self.coupling,
            beta,
            &mut self.rng,
        );
        self.sweeps_done += 1;
        Some(stats)
    }

    /// Run up to `n_sweeps` sweeps, handing the configuration to `on_frame`
    /// after each one. Stops early once paused.
    pub fn run(&mut self, n_sweeps: usize, mut on_frame: impl FnMut(&Lattice, SweepStats)) {
        for _ in 0..n_sweeps {
            match self.tick() {
                Some(stats) => on_frame(&self.lattice, stats),
                None => break,
            }
        }
    }

    /// Replace the configuration wholesale, as the size or model selector
    /// does. There is no partial reset; the RNG stream continues.
    pub fn reset(&mut self, n: usize, model: SpinModel) {
        self.lattice = Lattice::random(&mut self.rng, n, model);
        self.sweeps_done = 0;
    }
}

/// Frame interval of the interactive driver; the largest lattice gets a
/// slightly slower cadence.
pub fn frame_interval(n: usize) -> Duration {
    if n >= 512 {
        Duration::from_millis(25)
    } else {
        Duration::from_millis(20)
    }
}
