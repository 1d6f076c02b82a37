//! Bullet and flashbang kinematics
//!
//! Both lists are walked back to front so in-place removal never skips or
//! revisits an entry.

use glam::Vec2;

use super::collision::Rect;
use super::state::{Bullet, FailureCause, GameEvent, GameState, Grenade};
use crate::consts::{
    AGENT_HIT_MARGIN, BULLET_PROBE_HALF, GRENADE_PROBE_RADIUS, MUZZLE_OFFSET, THROW_OFFSET,
};

/// Spawn a bullet from the player's muzzle if the fire cooldown allows it
pub fn fire(state: &mut GameState) -> bool {
    let player = &mut state.player;
    if player.fire_cooldown > 0 {
        return false;
    }
    player.fire_cooldown = state.tuning.fire_cooldown_ticks;

    let dir = player.aim_dir();
    let muzzle = player.pos + dir * (player.radius + MUZZLE_OFFSET);
    state.bullets.push(Bullet {
        pos: muzzle,
        vel: dir * state.tuning.bullet_speed,
        life: state.tuning.bullet_life_ticks,
    });
    state.events.push(GameEvent::MuzzleFlash {
        pos: muzzle,
        angle: player.aim,
    });
    true
}

/// Throw a flashbang along the aim if one is left and the throw cooldown allows it
pub fn throw_flashbang(state: &mut GameState) -> bool {
    let player = &mut state.player;
    if player.flashbangs == 0 || player.throw_cooldown > 0 {
        return false;
    }
    player.throw_cooldown = state.tuning.throw_cooldown_ticks;
    player.flashbangs -= 1;

    let dir = player.aim_dir();
    state.grenades.push(Grenade {
        pos: player.pos + dir * (player.radius + THROW_OFFSET),
        vel: dir * state.tuning.throw_power,
        life: state.tuning.grenade_life_ticks,
        detonated: false,
        blast_radius: state.tuning.blast_radius,
    });
    true
}

/// What a bullet struck this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BulletHit {
    None,
    Geometry,
    Captive,
    Hostile,
}

/// Advance every bullet one tick and resolve impacts
///
/// Captives are tested before hostiles and the first match wins. Shooting a
/// captive fails the mission and stops processing at once.
pub fn update_bullets(state: &mut GameState) {
    let damage = state.tuning.bullet_damage;

    for i in (0..state.bullets.len()).rev() {
        let bullet = &mut state.bullets[i];
        bullet.pos += bullet.vel;
        bullet.life = bullet.life.saturating_sub(1);
        let pos = bullet.pos;
        let expired = bullet.life == 0;

        let mut hit = if state.geometry.blocks_box(&Rect::around(pos, BULLET_PROBE_HALF)) {
            BulletHit::Geometry
        } else {
            BulletHit::None
        };

        if let Some(captive) = state
            .captives
            .iter_mut()
            .find(|c| c.is_active() && c.pos.distance(pos) < c.radius + AGENT_HIT_MARGIN)
        {
            captive.kill();
            hit = BulletHit::Captive;
        } else if let Some(hostile) = state
            .hostiles
            .iter_mut()
            .find(|h| h.is_alive() && h.pos.distance(pos) < h.radius + AGENT_HIT_MARGIN)
        {
            hostile.health -= damage;
            if !hostile.is_alive() {
                log::debug!("Hostile down at {:?}", hostile.pos);
            }
            state.events.push(GameEvent::HostileHit { pos: hostile.pos });
            hit = BulletHit::Hostile;
        }

        if hit != BulletHit::None || expired {
            state.bullets.remove(i);
        }

        if hit == BulletHit::Captive {
            state.fail(FailureCause::HostageKilled);
            return;
        }
    }
}

/// Advance every grenade one tick: bounce, damp, count down, detonate
pub fn update_grenades(state: &mut GameState) {
    let GameState {
        geometry,
        grenades,
        hostiles,
        tuning,
        events,
        ..
    } = state;

    for i in (0..grenades.len()).rev() {
        let grenade = &mut grenades[i];
        let next = grenade.pos + grenade.vel;

        // Per-axis: bounce on contact instead of moving
        if geometry.solid_collision(Vec2::new(next.x, grenade.pos.y), GRENADE_PROBE_RADIUS) {
            grenade.vel.x *= -tuning.grenade_restitution;
        } else {
            grenade.pos.x = next.x;
        }
        if geometry.solid_collision(Vec2::new(grenade.pos.x, next.y), GRENADE_PROBE_RADIUS) {
            grenade.vel.y *= -tuning.grenade_restitution;
        } else {
            grenade.pos.y = next.y;
        }

        grenade.vel *= tuning.grenade_damping;

        grenade.life = grenade.life.saturating_sub(1);
        if grenade.life == 0 && !grenade.detonated {
            grenade.detonated = true;
            let center = grenade.pos;
            let radius = grenade.blast_radius;

            let mut stunned = 0;
            for hostile in hostiles.iter_mut().filter(|h| h.is_alive()) {
                if hostile.pos.distance(center) <= radius
                    && geometry.has_line_of_sight(center, hostile.pos)
                {
                    hostile.stun(tuning.stun_ticks);
                    stunned += 1;
                }
            }
            log::debug!("Flashbang detonated at {:?}, stunned {}", center, stunned);
            events.push(GameEvent::FlashbangBurst {
                pos: center,
                stunned,
            });
        }

        if grenades[i].detonated {
            grenades.remove(i);
        }
    }
}
