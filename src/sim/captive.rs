//! Captive agent behaviour: panic, secure, escort, extraction

use super::rng::RandomSource;
use super::state::{GameEvent, GameState};
use crate::consts::PANIC_STUCK_EPSILON;
use crate::{angle_toward, heading_vector, manhattan};

/// Advance every captive still on the map
///
/// Secured captives close on the player until within their follow distance.
/// Unsecured captives wander in panic while any hostile is alive, and stand
/// still once the area is clear.
pub fn update_captives<R: RandomSource + ?Sized>(state: &mut GameState, rng: &mut R) {
    let hostiles_remaining = state.hostiles_alive() > 0;
    let GameState {
        geometry,
        captives,
        player,
        tuning,
        ..
    } = state;

    for captive in captives.iter_mut().filter(|c| c.is_active()) {
        if captive.is_secured() {
            if captive.pos.distance(player.pos) > captive.follow_distance {
                let step =
                    heading_vector(angle_toward(captive.pos, player.pos)) * tuning.escort_speed;
                captive.pos = geometry.resolve_move(captive.pos, captive.radius, step);
            }
        } else if hostiles_remaining {
            captive.panic_timer += 1;
            if captive.panic_timer.is_multiple_of(tuning.panic_retarget_ticks) {
                captive.panic_heading = rng.heading();
            }

            let step = heading_vector(captive.panic_heading) * tuning.panic_speed;
            let before = captive.pos;
            captive.pos = geometry.resolve_move(captive.pos, captive.radius, step);
            if manhattan(captive.pos - before) < PANIC_STUCK_EPSILON {
                captive.panic_heading = rng.heading();
            }
        }
    }
}

/// Secure the nearest eligible captive within reach of the player
pub fn secure_nearest(state: &mut GameState) -> bool {
    let player = state.player.pos;
    let reach = state.tuning.secure_radius;

    let nearest = state
        .captives
        .iter_mut()
        .filter(|c| c.can_secure())
        .map(|c| (c.pos.distance(player), c))
        .filter(|(d, _)| *d < reach)
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let Some((_, captive)) = nearest else {
        return false;
    };
    if !captive.secure() {
        return false;
    }
    let pos = captive.pos;
    log::debug!("Captive secured at {:?}", pos);
    state.events.push(GameEvent::CaptiveSecured { pos });
    true
}

/// Mark secured captives touching the extraction zone as extracted
pub fn extract_captives(state: &mut GameState) {
    let Some(zone) = state.extraction_zone else {
        return;
    };
    for captive in state.captives.iter_mut() {
        if captive.is_alive()
            && captive.is_secured()
            && !captive.is_extracted()
            && zone.touches_circle(captive.pos, captive.radius)
            && captive.extract()
        {
            log::debug!("Captive extracted at {:?}", captive.pos);
            state.events.push(GameEvent::CaptiveExtracted { pos: captive.pos });
        }
    }
}
