//! Hostile agent behaviour: patrol, chase, stunned
//!
//! A hostile chases only while it can both see the player and is within
//! perception range; otherwise it drifts on a random patrol heading.

use super::rng::RandomSource;
use super::state::{GameState, HostileState};
use crate::consts::PATROL_STUCK_EPSILON;
use crate::{angle_toward, heading_vector, manhattan};

/// Advance every living hostile one tick
pub fn update_hostiles<R: RandomSource + ?Sized>(state: &mut GameState, rng: &mut R) {
    let GameState {
        geometry,
        hostiles,
        player,
        tuning,
        ..
    } = state;

    for hostile in hostiles.iter_mut().filter(|h| h.is_alive()) {
        hostile.seen = false;

        if hostile.state == HostileState::Stunned {
            hostile.stun_timer = hostile.stun_timer.saturating_sub(1);
            if hostile.stun_timer == 0 {
                hostile.state = HostileState::Patrol;
            }
            continue;
        }

        let to_player = hostile.pos.distance(player.pos);
        if to_player < tuning.perception_range
            && geometry.has_line_of_sight(hostile.pos, player.pos)
        {
            hostile.state = HostileState::Chase;
            hostile.seen = true;
        } else {
            hostile.state = HostileState::Patrol;
        }

        match hostile.state {
            HostileState::Patrol => {
                hostile.patrol_timer += 1;
                if hostile.patrol_timer.is_multiple_of(tuning.patrol_retarget_ticks) {
                    hostile.patrol_heading = rng.heading();
                }

                let step = heading_vector(hostile.patrol_heading)
                    * hostile.base_speed
                    * tuning.patrol_speed_factor;
                let before = hostile.pos;
                hostile.pos = geometry.resolve_move(hostile.pos, hostile.radius, step);
                if manhattan(hostile.pos - before) < PATROL_STUCK_EPSILON {
                    hostile.patrol_heading = rng.heading();
                }
            }
            HostileState::Chase => {
                let step =
                    heading_vector(angle_toward(hostile.pos, player.pos)) * hostile.base_speed;
                hostile.pos = geometry.resolve_move(hostile.pos, hostile.radius, step);

                // Contact range uses the distance from before this tick's step
                if to_player < hostile.radius + player.radius + tuning.contact_margin {
                    player.health = (player.health - tuning.contact_damage).max(0.0);
                }
            }
            HostileState::Stunned => {}
        }
    }
}
