//! Fixed timestep simulation tick
//!
//! One call advances the run by exactly one frame. Ordering inside a tick is
//! fixed: movement, actions, cooldowns, bullets, grenades, hostiles, captives,
//! extraction, completion.

use glam::Vec2;

use super::captive::{extract_captives, secure_nearest, update_captives};
use super::completion;
use super::hostile::update_hostiles;
use super::projectiles::{fire, throw_flashbang, update_bullets, update_grenades};
use super::rng::RandomSource;
use super::state::{FailureCause, GameEvent, GameState, RunPhase};
use crate::angle_toward;
use crate::levels::Level;

/// Abstract action signals for a single tick
///
/// All flags carry the raw held level. Breach, throw and secure only act on
/// the tick their signal goes from low to high.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// Fires every time the cooldown allows while held
    pub fire: bool,
    pub breach: bool,
    pub throw: bool,
    pub secure: bool,
    /// Aim target in world space
    pub pointer: Option<Vec2>,
}

impl TickInput {
    /// Unit movement direction, or zero when no (or opposing) keys are held
    pub fn move_dir(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.move_up {
            dir.y -= 1.0;
        }
        if self.move_down {
            dir.y += 1.0;
        }
        if self.move_left {
            dir.x -= 1.0;
        }
        if self.move_right {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// Advance the run by one tick
///
/// `levels` is the table the run was loaded from; it is read when a cleared
/// level's countdown runs out.
pub fn tick<R: RandomSource + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    levels: &[Level],
    rng: &mut R,
) {
    state.events.clear();

    if let Some(target) = input.pointer {
        state.player.aim = angle_toward(state.player.pos, target);
    }

    match state.phase {
        RunPhase::InProgress => {}
        RunPhase::LevelCleared { countdown } => {
            let countdown = countdown.saturating_sub(1);
            if countdown == 0 {
                advance_level(state, levels, rng);
            } else {
                state.phase = RunPhase::LevelCleared { countdown };
            }
            return;
        }
        RunPhase::Completed | RunPhase::Failed(_) => return,
    }

    state.time_ticks += 1;

    let step = input.move_dir() * state.player.speed;
    if step != Vec2::ZERO {
        state.player.pos = state
            .geometry
            .resolve_move(state.player.pos, state.player.radius, step);
    }

    if input.fire {
        fire(state);
    }
    if state.edges.breach.rising(input.breach) {
        breach(state);
    }
    if state.edges.throw.rising(input.throw) {
        throw_flashbang(state);
    }
    if state.edges.secure.rising(input.secure) {
        secure_nearest(state);
    }

    let player = &mut state.player;
    player.fire_cooldown = player.fire_cooldown.saturating_sub(1);
    player.throw_cooldown = player.throw_cooldown.saturating_sub(1);

    update_bullets(state);
    if state.phase.is_frozen() {
        return;
    }
    update_grenades(state);

    update_hostiles(state, rng);
    if state.player.is_dead() {
        state.fail(FailureCause::PlayerKilled);
        return;
    }

    update_captives(state, rng);
    extract_captives(state);
    completion::evaluate(state);
}

/// Open the nearest closed door in reach of the player
fn breach(state: &mut GameState) -> bool {
    let Some(index) = state
        .geometry
        .nearest_closed_door(state.player.pos, state.tuning.breach_radius)
    else {
        return false;
    };
    let door = &mut state.geometry.doors[index];
    if !door.open() {
        return false;
    }
    let center = door.rect.center();
    log::debug!("Door breached at {:?}", center);
    state.events.push(GameEvent::DoorBreached { center });
    true
}

/// Load the next level, or finish the campaign after the last one
fn advance_level<R: RandomSource + ?Sized>(state: &mut GameState, levels: &[Level], rng: &mut R) {
    let next = state.level_index + 1;
    match levels.get(next) {
        Some(level) => {
            log::info!("Advancing to level {}: {}", next, level.name);
            state.reload(level, next, rng);
        }
        None => {
            log::info!("All {} levels completed", levels.len());
            state.phase = RunPhase::Completed;
        }
    }
}
