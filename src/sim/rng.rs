//! Injected randomness
//!
//! The simulation only ever needs a uniform heading and a uniform fraction.
//! Any `rand::Rng` qualifies; tests can hand in a scripted source instead.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

/// Source of the few random draws the simulation makes
pub trait RandomSource {
    /// Uniform angle in `[0, TAU)`
    fn heading(&mut self) -> f32;
    /// Uniform value in `[0, 1)`
    fn unit(&mut self) -> f32;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn heading(&mut self) -> f32 {
        self.random::<f32>() * TAU
    }

    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Seeded run RNG
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays fixed values in a loop; for tests that need exact headings
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedSource {
    /// `values` are fractions in `[0, 1)`; headings are scaled by TAU
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Source that always yields zero (heading east)
    pub fn zeros() -> Self {
        Self::new(vec![0.0])
    }

    fn next(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

impl RandomSource for ScriptedSource {
    fn heading(&mut self) -> f32 {
        self.next() * TAU
    }

    fn unit(&mut self) -> f32 {
        self.next()
    }
}
