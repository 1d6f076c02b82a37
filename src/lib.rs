//! CQB Breach - a tick-based 2D close-quarters breach simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collision, sight, projectiles, AI, completion)
//! - `levels`: Immutable level blueprints and the built-in campaign
//! - `tuning`: Data-driven gameplay constants
//! - `error`: Failures at the loading edges (level index, JSON)

pub mod error;
pub mod levels;
pub mod sim;
pub mod tuning;

pub use error::{Result, SimError};
pub use levels::{Level, Rect, builtin_levels};
pub use sim::{GameState, RunPhase, Session, TickInput};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Arena dimensions used by the built-in levels
    pub const ARENA_WIDTH: f32 = 1000.0;
    pub const ARENA_HEIGHT: f32 = 640.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 14.0;
    pub const PLAYER_SPEED: f32 = 2.8;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;

    /// Hostile agent defaults
    pub const HOSTILE_RADIUS: f32 = 13.0;
    pub const HOSTILE_BASE_SPEED: f32 = 2.0;
    pub const HOSTILE_HEALTH: f32 = 60.0;

    /// Captive agent defaults
    pub const CAPTIVE_RADIUS: f32 = 12.0;
    pub const CAPTIVE_FOLLOW_DISTANCE: f32 = 42.0;
    /// Upper bound (exclusive) for the randomized initial panic counter
    pub const CAPTIVE_PANIC_PHASE_SPREAD: f32 = 60.0;

    /// Distance between line-of-sight samples
    pub const SIGHT_SAMPLE_STEP: f32 = 6.0;

    /// Half-extent of the square bullet hit probe (4x4)
    pub const BULLET_PROBE_HALF: f32 = 2.0;
    /// Extra reach added to an agent's radius for bullet hits
    pub const AGENT_HIT_MARGIN: f32 = 2.0;
    /// Collision radius of a thrown grenade
    pub const GRENADE_PROBE_RADIUS: f32 = 6.0;

    /// Muzzle and throw offsets beyond the player's radius
    pub const MUZZLE_OFFSET: f32 = 6.0;
    pub const THROW_OFFSET: f32 = 8.0;

    /// Manhattan displacement below which a wandering agent counts as stuck
    pub const PATROL_STUCK_EPSILON: f32 = 0.2;
    pub const PANIC_STUCK_EPSILON: f32 = 0.1;
}

/// Unit vector for an angle in radians
#[inline]
pub fn heading_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle (radians) of the direction from `from` toward `to`
#[inline]
pub fn angle_toward(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Manhattan length of a displacement, used for the "stuck" heuristic
#[inline]
pub fn manhattan(delta: Vec2) -> f32 {
    delta.x.abs() + delta.y.abs()
}
