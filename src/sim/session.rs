//! Run session: level table, tuning, random source and the live state

use rand_pcg::Pcg32;

use super::rng::{RandomSource, seeded};
use super::state::GameState;
use super::tick::{TickInput, tick};
use crate::error::{Result, SimError};
use crate::levels::Level;
use crate::tuning::Tuning;

/// Owns everything a run needs between host frames
#[derive(Debug, Clone)]
pub struct Session<R: RandomSource = Pcg32> {
    levels: Vec<Level>,
    tuning: Tuning,
    rng: R,
    state: GameState,
}

impl Session<Pcg32> {
    /// Start on level 0 with a seeded PCG source
    pub fn new(levels: Vec<Level>, tuning: Tuning, seed: u64) -> Result<Self> {
        Self::with_rng(levels, tuning, seeded(seed))
    }
}

impl<R: RandomSource> Session<R> {
    /// Start on level 0 with a caller-supplied random source
    pub fn with_rng(levels: Vec<Level>, tuning: Tuning, mut rng: R) -> Result<Self> {
        let first = levels.first().ok_or(SimError::NoLevels)?;
        let state = GameState::from_level(first, 0, tuning.clone(), &mut rng);
        Ok(Self {
            levels,
            tuning,
            rng,
            state,
        })
    }

    /// Discard the current run state and load `index` fresh
    ///
    /// Held action keys stay latched, so they need a release before they act
    /// on the new level.
    pub fn load_level(&mut self, index: usize) -> Result<()> {
        let level = self.levels.get(index).ok_or(SimError::LevelOutOfRange {
            index,
            count: self.levels.len(),
        })?;
        self.state.tuning = self.tuning.clone();
        self.state.reload(level, index, &mut self.rng);
        Ok(())
    }

    /// Back to the first level, e.g. after a mission failure
    pub fn reset(&mut self) -> Result<()> {
        self.load_level(0)
    }

    pub fn tick(&mut self, input: &TickInput) {
        tick(&mut self.state, input, &self.levels, &mut self.rng);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}
