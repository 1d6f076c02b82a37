//! Data-driven gameplay tuning
//!
//! Every balance number the simulation reads lives here so a host can load
//! overrides from JSON. Missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Gameplay constants for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Hostile perception ===
    /// Hostiles chase only a visible player closer than this
    pub perception_range: f32,
    /// Health drained from the player per tick of contact
    pub contact_damage: f32,
    /// Added to both radii to form the contact range
    pub contact_margin: f32,
    /// Fraction of base speed used while patrolling
    pub patrol_speed_factor: f32,
    /// Ticks between patrol heading changes
    pub patrol_retarget_ticks: u32,

    // === Captives ===
    /// Wander speed while panicking
    pub panic_speed: f32,
    /// Ticks between panic heading changes
    pub panic_retarget_ticks: u32,
    /// Speed of a secured captive closing on the player
    pub escort_speed: f32,
    /// Maximum player distance for the secure action
    pub secure_radius: f32,

    // === Weapons ===
    pub bullet_damage: f32,
    pub bullet_speed: f32,
    pub bullet_life_ticks: u32,
    pub fire_cooldown_ticks: u32,

    // === Flashbangs ===
    pub throw_cooldown_ticks: u32,
    pub throw_power: f32,
    pub grenade_life_ticks: u32,
    pub blast_radius: f32,
    pub stun_ticks: u32,
    /// Fraction of speed kept (and reversed) on a bounce
    pub grenade_restitution: f32,
    /// Per-tick velocity multiplier
    pub grenade_damping: f32,

    // === Doors ===
    /// Maximum distance from player to a door's centre for breaching
    pub breach_radius: f32,

    // === Level flow ===
    /// Countdown between clear and loading the next level
    pub level_advance_ticks: u32,
    /// Hostiles spawned closer than this to the player get relocated
    pub spawn_safety_distance: f32,
    pub spawn_relocation_tries: u32,
    pub spawn_relocation_step: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            perception_range: 280.0,
            contact_damage: 0.25,
            contact_margin: 4.0,
            patrol_speed_factor: 0.7,
            patrol_retarget_ticks: 120,

            panic_speed: 0.8,
            panic_retarget_ticks: 50,
            escort_speed: 1.8,
            secure_radius: 55.0,

            bullet_damage: 20.0,
            bullet_speed: 10.5,
            bullet_life_ticks: 70,
            fire_cooldown_ticks: 9,

            throw_cooldown_ticks: 40,
            throw_power: 7.2,
            grenade_life_ticks: 55,
            blast_radius: 130.0,
            stun_ticks: 120,
            grenade_restitution: 0.6,
            grenade_damping: 0.98,

            breach_radius: 60.0,

            level_advance_ticks: 120,
            spawn_safety_distance: 160.0,
            spawn_relocation_tries: 60,
            spawn_relocation_step: 18.0,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning = serde_json::from_str(json)?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Serialize the full tuning table (handy as a template for overrides)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "perception_range": 200.0 }"#).unwrap();
        assert_eq!(tuning.perception_range, 200.0);
        assert_eq!(tuning.contact_damage, 0.25);
        assert_eq!(tuning.stun_ticks, 120);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ perception_range: }").is_err());
    }

    #[test]
    fn test_to_json_parses_back() {
        let tuning = Tuning {
            blast_radius: 90.0,
            ..Default::default()
        };
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }
}
