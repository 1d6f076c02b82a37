//! Game state and core simulation types
//!
//! Everything a level run mutates lives in [`GameState`]. It is rebuilt from a
//! [`Level`] blueprint on every load and never patched back into the table.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Geometry, Rect};
use super::rng::RandomSource;
use crate::consts::*;
use crate::heading_vector;
use crate::levels::Level;
use crate::tuning::Tuning;

/// Why a run ended in failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureCause {
    /// A bullet struck a captive
    HostageKilled,
    /// Contact damage drained the player
    PlayerKilled,
}

/// Overall run state; exactly one holds at any tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Active gameplay
    InProgress,
    /// Win condition met; next level loads when the countdown runs out
    LevelCleared { countdown: u32 },
    /// Final level cleared (terminal)
    Completed,
    /// Mission failed (terminal until reset)
    Failed(FailureCause),
}

impl RunPhase {
    /// Physics and AI do not advance outside `InProgress`
    pub fn is_frozen(&self) -> bool {
        !matches!(self, RunPhase::InProgress)
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    /// Aim angle, recomputed from the pointer every tick
    pub aim: f32,
    pub health: f32,
    pub flashbangs: u32,
    pub fire_cooldown: u32,
    pub throw_cooldown: u32,
}

impl Player {
    pub fn spawn(pos: Vec2, flashbangs: u32) -> Self {
        Self {
            pos,
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
            aim: 0.0,
            health: PLAYER_MAX_HEALTH,
            flashbangs,
            fire_cooldown: 0,
            throw_cooldown: 0,
        }
    }

    /// Unit vector along the current aim
    pub fn aim_dir(&self) -> Vec2 {
        heading_vector(self.aim)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// Hostile behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HostileState {
    #[default]
    Patrol,
    Chase,
    Stunned,
}

/// A hostile agent. Health at or below zero leaves it inert but stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hostile {
    pub pos: Vec2,
    pub radius: f32,
    pub base_speed: f32,
    pub health: f32,
    pub state: HostileState,
    pub patrol_heading: f32,
    pub stun_timer: u32,
    pub patrol_timer: u32,
    /// Set on ticks the agent perceives the player (cosmetic)
    pub seen: bool,
}

impl Hostile {
    pub fn spawn(pos: Vec2, patrol_heading: f32) -> Self {
        Self {
            pos,
            radius: HOSTILE_RADIUS,
            base_speed: HOSTILE_BASE_SPEED,
            health: HOSTILE_HEALTH,
            state: HostileState::Patrol,
            patrol_heading,
            stun_timer: 0,
            patrol_timer: 0,
            seen: false,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Force the stunned state regardless of the current one
    pub fn stun(&mut self, ticks: u32) {
        self.state = HostileState::Stunned;
        self.stun_timer = ticks;
    }
}

/// A captive agent
///
/// `alive` only ever clears; `secured` and `extracted` only ever set, and
/// extraction requires a living, secured captive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Captive {
    pub pos: Vec2,
    pub radius: f32,
    alive: bool,
    secured: bool,
    extracted: bool,
    pub panic_heading: f32,
    pub panic_timer: u32,
    pub follow_distance: f32,
}

impl Captive {
    pub fn spawn(pos: Vec2, panic_heading: f32, panic_timer: u32) -> Self {
        Self {
            pos,
            radius: CAPTIVE_RADIUS,
            alive: true,
            secured: false,
            extracted: false,
            panic_heading,
            panic_timer,
            follow_distance: CAPTIVE_FOLLOW_DISTANCE,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn is_secured(&self) -> bool {
        self.secured
    }

    #[inline]
    pub fn is_extracted(&self) -> bool {
        self.extracted
    }

    /// Still on the map and able to act (or be shot)
    #[inline]
    pub fn is_active(&self) -> bool {
        self.alive && !self.extracted
    }

    /// Eligible for the secure action
    pub fn can_secure(&self) -> bool {
        self.alive && !self.secured && !self.extracted
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Returns true if this call secured the captive
    pub fn secure(&mut self) -> bool {
        if !self.can_secure() {
            return false;
        }
        self.secured = true;
        true
    }

    /// Returns true if this call extracted the captive
    pub fn extract(&mut self) -> bool {
        if !self.alive || !self.secured || self.extracted {
            return false;
        }
        self.extracted = true;
        true
    }
}

/// A fired bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks left before expiry
    pub life: u32,
}

/// A thrown flashbang
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grenade {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks left before detonation
    pub life: u32,
    pub detonated: bool,
    pub blast_radius: f32,
}

/// Cosmetic notifications for the renderer; no gameplay rule reads these
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    MuzzleFlash { pos: Vec2, angle: f32 },
    DoorBreached { center: Vec2 },
    HostileHit { pos: Vec2 },
    FlashbangBurst { pos: Vec2, stunned: u32 },
    CaptiveSecured { pos: Vec2 },
    CaptiveExtracted { pos: Vec2 },
    LevelCleared { level_index: usize },
    MissionFailed { cause: FailureCause },
}

/// Previous-tick state of one edge-triggered action signal
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EdgeTrigger {
    was_pressed: bool,
}

impl EdgeTrigger {
    /// Feed the current level of the signal; true only on a low -> high transition
    pub fn rising(&mut self, pressed: bool) -> bool {
        let fired = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        fired
    }
}

/// Edge detectors for the discrete actions
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActionEdges {
    pub breach: EdgeTrigger,
    pub throw: EdgeTrigger,
    pub secure: EdgeTrigger,
}

/// Objective counters for the HUD and the completion check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObjectiveStatus {
    pub hostiles_alive: usize,
    pub captives_total: usize,
    pub captives_alive: usize,
    pub captives_secured: usize,
    pub captives_extracted: usize,
    pub has_extraction_zone: bool,
}

/// Complete per-level run state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Index of the loaded level in its table
    pub level_index: usize,
    pub level_name: String,
    pub extraction_zone: Option<Rect>,
    /// Simulation tick counter for this level
    pub time_ticks: u64,
    pub phase: RunPhase,
    pub tuning: Tuning,
    pub geometry: Geometry,
    pub player: Player,
    pub hostiles: Vec<Hostile>,
    pub captives: Vec<Captive>,
    pub bullets: Vec<Bullet>,
    pub grenades: Vec<Grenade>,
    pub edges: ActionEdges,
    /// Events raised during the latest tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Build fresh run state from a level blueprint
    ///
    /// Draws, in order: one patrol heading per hostile, a panic heading and
    /// panic phase per captive, then any spawn relocation headings.
    pub fn from_level<R: RandomSource + ?Sized>(
        level: &Level,
        level_index: usize,
        tuning: Tuning,
        rng: &mut R,
    ) -> Self {
        let hostiles = level
            .hostiles
            .iter()
            .map(|&pos| Hostile::spawn(pos, rng.heading()))
            .collect();
        let captives = level
            .captives
            .iter()
            .map(|&pos| {
                let heading = rng.heading();
                let phase = (rng.unit() * CAPTIVE_PANIC_PHASE_SPREAD).floor() as u32;
                Captive::spawn(pos, heading, phase)
            })
            .collect();

        let mut state = Self {
            level_index,
            level_name: level.name.clone(),
            extraction_zone: level.extraction_zone,
            time_ticks: 0,
            phase: RunPhase::InProgress,
            tuning,
            geometry: Geometry::from_level(level),
            player: Player::spawn(level.player_spawn, level.flashbangs),
            hostiles,
            captives,
            bullets: Vec::new(),
            grenades: Vec::new(),
            edges: ActionEdges::default(),
            events: Vec::new(),
        };
        state.push_spawns_from_player(rng);

        log::info!(
            "Loaded {} ({} hostiles, {} captives, extraction zone: {})",
            state.level_name,
            state.hostiles.len(),
            state.captives.len(),
            state.extraction_zone.is_some()
        );
        state
    }

    /// Replace this run with a fresh load of `level`
    ///
    /// Edge-trigger memory is the one thing carried over, so an action key
    /// still held across the load does not count as a new press.
    pub fn reload<R: RandomSource + ?Sized>(
        &mut self,
        level: &Level,
        level_index: usize,
        rng: &mut R,
    ) {
        let fresh = Self::from_level(level, level_index, self.tuning.clone(), rng);
        *self = Self {
            edges: self.edges,
            ..fresh
        };
    }

    /// Random-walk hostiles that spawned inside the safety distance away from
    /// the player, in bounded attempts. Steps into solid geometry are skipped.
    fn push_spawns_from_player<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        let min_dist = self.tuning.spawn_safety_distance;
        let step = self.tuning.spawn_relocation_step;
        let player = self.player.pos;

        for hostile in &mut self.hostiles {
            let mut tries = 0;
            while hostile.pos.distance(player) < min_dist
                && tries < self.tuning.spawn_relocation_tries
            {
                let candidate = hostile.pos + heading_vector(rng.heading()) * step;
                if !self.geometry.solid_collision(candidate, hostile.radius) {
                    hostile.pos = candidate;
                }
                tries += 1;
            }
            if hostile.pos.distance(player) < min_dist {
                log::debug!("Hostile at {:?} still inside the spawn safety distance", hostile.pos);
            }
        }
    }

    pub fn hostiles_alive(&self) -> usize {
        self.hostiles.iter().filter(|h| h.is_alive()).count()
    }

    /// Counters for the HUD and the completion evaluator
    pub fn status(&self) -> ObjectiveStatus {
        ObjectiveStatus {
            hostiles_alive: self.hostiles_alive(),
            captives_total: self.captives.len(),
            captives_alive: self.captives.iter().filter(|c| c.is_alive()).count(),
            captives_secured: self
                .captives
                .iter()
                .filter(|c| c.is_alive() && c.is_secured())
                .count(),
            captives_extracted: self
                .captives
                .iter()
                .filter(|c| c.is_alive() && c.is_extracted())
                .count(),
            has_extraction_zone: self.extraction_zone.is_some(),
        }
    }

    /// Mission failed because a captive was shot
    pub fn hostage_down(&self) -> bool {
        self.phase == RunPhase::Failed(FailureCause::HostageKilled)
    }

    /// Mission failed because the player died
    pub fn player_down(&self) -> bool {
        self.phase == RunPhase::Failed(FailureCause::PlayerKilled)
    }

    /// Level won and counting down to the next one
    pub fn level_cleared(&self) -> bool {
        matches!(self.phase, RunPhase::LevelCleared { .. })
    }

    pub fn all_levels_completed(&self) -> bool {
        self.phase == RunPhase::Completed
    }

    /// Enter a failure phase (first cause wins)
    pub(crate) fn fail(&mut self, cause: FailureCause) {
        if self.phase.is_frozen() {
            return;
        }
        log::info!("Mission failed on {}: {:?}", self.level_name, cause);
        self.phase = RunPhase::Failed(cause);
        self.events.push(GameEvent::MissionFailed { cause });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::builtin_levels;
    use crate::sim::rng::{ScriptedSource, seeded};

    #[test]
    fn test_edge_trigger_fires_once_per_press() {
        let mut edge = EdgeTrigger::default();
        assert!(edge.rising(true));
        assert!(!edge.rising(true));
        assert!(!edge.rising(false));
        assert!(edge.rising(true));
    }

    #[test]
    fn test_captive_latches() {
        let mut c = Captive::spawn(Vec2::ZERO, 0.0, 0);
        // Extraction needs a secured captive
        assert!(!c.extract());
        assert!(c.secure());
        assert!(!c.secure());
        assert!(c.extract());
        assert!(c.is_extracted());
        assert!(!c.can_secure());

        let mut dead = Captive::spawn(Vec2::ZERO, 0.0, 0);
        assert!(dead.secure());
        dead.kill();
        assert!(!dead.extract());
        assert!(!dead.is_alive());
    }

    #[test]
    fn test_from_level_copies_geometry() {
        let levels = builtin_levels();
        let mut state =
            GameState::from_level(&levels[0], 0, Tuning::default(), &mut seeded(7));
        state.geometry.doors[0].open();
        state.geometry.walls.clear();
        // The blueprint is untouched
        assert_eq!(levels[0], builtin_levels()[0]);
        assert!(!levels[0].walls.is_empty());
    }

    #[test]
    fn test_from_level_resets_player() {
        let levels = builtin_levels();
        let state = GameState::from_level(&levels[2], 2, Tuning::default(), &mut seeded(1));
        assert_eq!(state.player.pos, levels[2].player_spawn);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
        assert_eq!(state.player.flashbangs, levels[2].flashbangs);
        assert_eq!(state.hostiles.len(), 4);
        assert_eq!(state.captives.len(), 3);
        assert!(state.geometry.doors.iter().all(|d| !d.is_open()));
        assert_eq!(state.phase, RunPhase::InProgress);
    }

    #[test]
    fn test_spawn_safety_relocates_close_hostiles() {
        let level = Level {
            name: "Open floor".into(),
            player_spawn: Vec2::new(500.0, 500.0),
            flashbangs: 0,
            walls: Vec::new(),
            doors: Vec::new(),
            hostiles: vec![Vec2::new(520.0, 500.0), Vec2::new(900.0, 900.0)],
            captives: Vec::new(),
            extraction_zone: None,
        };
        // Heading 0 always steps east, 18 units per try
        let state =
            GameState::from_level(&level, 0, Tuning::default(), &mut ScriptedSource::zeros());
        assert!(state.hostiles[0].pos.distance(level.player_spawn) >= 160.0);
        assert_eq!(state.hostiles[1].pos, Vec2::new(900.0, 900.0));
    }

    #[test]
    fn test_spawn_relocation_is_bounded() {
        // Boxed in: every step collides, so the hostile stays put
        let level = Level {
            name: "Closet".into(),
            player_spawn: Vec2::new(100.0, 100.0),
            flashbangs: 0,
            walls: vec![
                Rect::new(90.0, 60.0, 80.0, 20.0),
                Rect::new(90.0, 100.0, 80.0, 20.0),
                Rect::new(150.0, 80.0, 20.0, 20.0),
            ],
            doors: Vec::new(),
            hostiles: vec![Vec2::new(130.0, 90.0)],
            captives: Vec::new(),
            extraction_zone: None,
        };
        let state =
            GameState::from_level(&level, 0, Tuning::default(), &mut ScriptedSource::zeros());
        assert_eq!(state.hostiles[0].pos, Vec2::new(130.0, 90.0));
    }

    #[test]
    fn test_status_counts_only_living() {
        let levels = builtin_levels();
        let mut state = GameState::from_level(&levels[2], 2, Tuning::default(), &mut seeded(3));
        state.hostiles[0].health = 0.0;
        state.captives[0].secure();
        state.captives[1].secure();
        state.captives[1].kill();
        let status = state.status();
        assert_eq!(status.hostiles_alive, 3);
        assert_eq!(status.captives_total, 3);
        assert_eq!(status.captives_alive, 2);
        assert_eq!(status.captives_secured, 1);
        assert!(!status.has_extraction_zone);
    }
}
