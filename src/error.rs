//! Errors raised at the loading edges
//!
//! The simulation itself never fails; mission failure and level clears are
//! modeled as [`crate::RunPhase`] state. Only picking a level and parsing
//! external data can go wrong.

use thiserror::Error;

/// Failure while building or reloading a session
#[derive(Debug, Error)]
pub enum SimError {
    /// The level table is empty
    #[error("level table is empty")]
    NoLevels,
    /// Requested level does not exist
    #[error("level index {index} out of range (table has {count} levels)")]
    LevelOutOfRange { index: usize, count: usize },
    /// Tuning or level JSON could not be parsed
    #[error("failed to parse game data: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
