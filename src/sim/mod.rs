//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same level table, tuning, input
//! sequence and random source, a run replays identically:
//! - One fixed step per tick, no wall-clock time
//! - Randomness only through an injected [`RandomSource`]
//! - Stable iteration order (spawn order, lists walked back to front on removal)
//! - No rendering or platform dependencies

pub mod captive;
pub mod collision;
pub mod completion;
pub mod hostile;
pub mod projectiles;
pub mod rng;
pub mod session;
pub mod state;
pub mod tick;
pub mod visibility;

pub use collision::{Door, Geometry, Rect};
pub use completion::clear_condition_met;
pub use rng::{RandomSource, ScriptedSource, seeded};
pub use session::Session;
pub use state::{
    ActionEdges, Bullet, Captive, EdgeTrigger, FailureCause, GameEvent, GameState, Grenade,
    Hostile, HostileState, ObjectiveStatus, Player, RunPhase,
};
pub use tick::{TickInput, tick};
pub use visibility::segment_hits_rect;
