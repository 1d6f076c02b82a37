//! CQB Breach headless host
//!
//! Drives the built-in campaign with a simple autopilot and logs the run.
//! Usage: `cqb-breach [seed] [ticks]`, verbosity via `RUST_LOG`.

#[cfg(not(target_arch = "wasm32"))]
use cqb_breach::sim::{GameState, RunPhase, TickInput};

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_SEED: u64 = 12345;
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_TICKS: u64 = 60 * 60 * 5;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use cqb_breach::{Session, Tuning, builtin_levels};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_SEED);
    let ticks = args.next().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_TICKS);
    log::info!("CQB Breach (headless) starting, seed {seed}, {ticks} ticks");

    let mut session = match Session::new(builtin_levels(), Tuning::default(), seed) {
        Ok(session) => session,
        Err(err) => {
            log::error!("Failed to start session: {err}");
            std::process::exit(1);
        }
    };

    let mut phase = session.state().phase;
    let mut level = session.state().level_index;
    for n in 0..ticks {
        let input = autopilot(session.state(), n);
        session.tick(&input);

        let state = session.state();
        if state.level_index != level {
            level = state.level_index;
            log::info!("Entered {}", state.level_name);
        }
        if state.phase != phase {
            phase = state.phase;
            log::info!("Tick {n}: phase {:?}, status {:?}", phase, state.status());
        }
        match phase {
            RunPhase::Completed => break,
            RunPhase::Failed(_) => {
                log::info!("Restarting campaign");
                if let Err(err) = session.reset() {
                    log::error!("Reset failed: {err}");
                    break;
                }
                phase = session.state().phase;
                level = session.state().level_index;
            }
            _ => {}
        }
    }

    let state = session.state();
    println!(
        "{} | phase {:?} | hp {:.0} | {:?}",
        state.level_name,
        state.phase,
        state.player.health,
        state.status()
    );
}

/// Demo input: aim at and shoot the nearest visible hostile, otherwise walk
/// toward the nearest one, pulsing breach and secure as it goes
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(state: &GameState, tick: u64) -> TickInput {
    let player = state.player.pos;
    let pulse = tick % 2 == 0;

    let target = state
        .hostiles
        .iter()
        .filter(|h| h.is_alive())
        .min_by(|a, b| {
            a.pos
                .distance(player)
                .partial_cmp(&b.pos.distance(player))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let mut input = TickInput {
        breach: pulse,
        secure: pulse,
        ..Default::default()
    };

    match target {
        Some(hostile) if state.geometry.has_line_of_sight(player, hostile.pos) => {
            input.pointer = Some(hostile.pos);
            input.fire = true;
        }
        Some(hostile) => {
            let delta = hostile.pos - player;
            input.pointer = Some(hostile.pos);
            input.move_right = delta.x > 1.0;
            input.move_left = delta.x < -1.0;
            input.move_down = delta.y > 1.0;
            input.move_up = delta.y < -1.0;
        }
        None => {
            // Area clear: head for the extraction zone if there is one
            if let Some(zone) = state.extraction_zone {
                let delta = zone.center() - player;
                input.move_right = delta.x > 1.0;
                input.move_left = delta.x < -1.0;
                input.move_down = delta.y > 1.0;
                input.move_up = delta.y < -1.0;
            }
        }
    }
    input
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the deliverable on wasm; a browser host drives Session directly
}
