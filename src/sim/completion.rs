//! Level completion evaluation

use super::state::{GameEvent, GameState, ObjectiveStatus, RunPhase};

/// Win condition over an objective snapshot
///
/// Every hostile must be down. Captives, if any, must all be alive and either
/// extracted (when the level has an extraction zone) or secured.
pub fn clear_condition_met(status: &ObjectiveStatus) -> bool {
    if status.hostiles_alive > 0 {
        return false;
    }
    if status.captives_total == 0 {
        return true;
    }
    if status.captives_alive != status.captives_total {
        return false;
    }
    if status.has_extraction_zone {
        status.captives_extracted == status.captives_total
    } else {
        status.captives_secured == status.captives_total
    }
}

/// Start the level-advance countdown on the first tick the level is won
pub fn evaluate(state: &mut GameState) {
    if state.phase != RunPhase::InProgress {
        return;
    }
    if !clear_condition_met(&state.status()) {
        return;
    }

    log::info!("Level {} ({}) cleared", state.level_index, state.level_name);
    state.phase = RunPhase::LevelCleared {
        countdown: state.tuning.level_advance_ticks,
    };
    state.events.push(GameEvent::LevelCleared {
        level_index: state.level_index,
    });
}
