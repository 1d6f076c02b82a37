//! Level blueprints
//!
//! A [`Level`] is an immutable record consumed once per load. The simulation
//! deep-copies its geometry into per-run state, so a table can be shared by
//! any number of sessions and is never mutated.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::error::{Result, SimError};

pub use crate::sim::Rect;

/// Static description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub player_spawn: Vec2,
    /// Flashbangs issued at load
    pub flashbangs: u32,
    pub walls: Vec<Rect>,
    /// Door rectangles; every door starts closed
    pub doors: Vec<Rect>,
    pub hostiles: Vec<Vec2>,
    #[serde(default)]
    pub captives: Vec<Vec2>,
    /// When present, secured captives must be escorted here
    #[serde(default)]
    pub extraction_zone: Option<Rect>,
}

impl Level {
    pub fn has_captives(&self) -> bool {
        !self.captives.is_empty()
    }
}

/// Parse a level table from JSON
pub fn levels_from_json(json: &str) -> Result<Vec<Level>> {
    let levels: Vec<Level> = serde_json::from_str(json)?;
    if levels.is_empty() {
        return Err(SimError::NoLevels);
    }
    log::info!("Loaded {} levels from JSON", levels.len());
    Ok(levels)
}

#[inline]
fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::new(x, y, w, h)
}

#[inline]
fn at(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

/// Outer border shared by every built-in level
fn border() -> Vec<Rect> {
    const W: f32 = ARENA_WIDTH;
    const H: f32 = ARENA_HEIGHT;
    vec![
        rect(40.0, 40.0, W - 80.0, 20.0),
        rect(40.0, H - 60.0, W - 80.0, 20.0),
        rect(40.0, 60.0, 20.0, H - 120.0),
        rect(W - 60.0, 60.0, 20.0, H - 120.0),
    ]
}

fn with_border(inner: impl IntoIterator<Item = Rect>) -> Vec<Rect> {
    let mut walls = border();
    walls.extend(inner);
    walls
}

/// The five-level campaign
pub fn builtin_levels() -> Vec<Level> {
    vec![
        Level {
            name: "Level 1: Two Rooms + Hallway".into(),
            player_spawn: at(120.0, 120.0),
            flashbangs: 3,
            walls: with_border([
                rect(300.0, 60.0, 20.0, 240.0),
                rect(300.0, 360.0, 20.0, 230.0),
                rect(680.0, 60.0, 20.0, 220.0),
                rect(680.0, 340.0, 20.0, 270.0),
                rect(320.0, 300.0, 360.0, 20.0),
            ]),
            doors: vec![
                rect(300.0, 245.0, 20.0, 70.0),
                rect(680.0, 265.0, 20.0, 90.0),
                rect(480.0, 300.0, 100.0, 20.0),
            ],
            hostiles: vec![at(860.0, 120.0), at(880.0, 540.0), at(520.0, 520.0)],
            captives: Vec::new(),
            extraction_zone: None,
        },
        Level {
            name: "Level 2: Split Office + Side Closet".into(),
            player_spawn: at(120.0, 540.0),
            flashbangs: 4,
            walls: with_border([
                rect(520.0, 60.0, 20.0, ARENA_HEIGHT - 120.0),
                rect(60.0, 190.0, 460.0, 20.0),
                rect(540.0, 190.0, 400.0, 20.0),
                rect(180.0, 320.0, 20.0, 220.0),
                rect(180.0, 320.0, 220.0, 20.0),
                rect(380.0, 320.0, 20.0, 220.0),
                rect(180.0, 520.0, 220.0, 20.0),
            ]),
            doors: vec![
                rect(520.0, 340.0, 20.0, 90.0),
                rect(720.0, 190.0, 110.0, 20.0),
                rect(380.0, 410.0, 20.0, 80.0),
            ],
            hostiles: vec![
                at(860.0, 120.0),
                at(820.0, 520.0),
                at(620.0, 360.0),
                at(260.0, 420.0),
            ],
            captives: Vec::new(),
            extraction_zone: None,
        },
        Level {
            name: "Level 3: Hostage Rescue".into(),
            player_spawn: at(500.0, 110.0),
            flashbangs: 5,
            walls: with_border([
                // corridor
                rect(380.0, 80.0, 20.0, 490.0),
                rect(600.0, 80.0, 20.0, 490.0),
                // left top room
                rect(80.0, 120.0, 300.0, 20.0),
                rect(80.0, 120.0, 20.0, 200.0),
                rect(80.0, 300.0, 300.0, 20.0),
                // left bottom room
                rect(80.0, 360.0, 300.0, 20.0),
                rect(80.0, 360.0, 20.0, 180.0),
                rect(80.0, 540.0, 300.0, 20.0),
                // right top room
                rect(620.0, 120.0, 320.0, 20.0),
                rect(920.0, 120.0, 20.0, 200.0),
                rect(620.0, 300.0, 320.0, 20.0),
                // right bottom room
                rect(620.0, 360.0, 320.0, 20.0),
                rect(920.0, 360.0, 20.0, 180.0),
                rect(620.0, 540.0, 320.0, 20.0),
            ]),
            doors: vec![
                rect(380.0, 180.0, 20.0, 70.0),
                rect(380.0, 420.0, 20.0, 70.0),
                rect(600.0, 180.0, 20.0, 70.0),
                rect(600.0, 420.0, 20.0, 70.0),
            ],
            hostiles: vec![
                at(500.0, 260.0),
                at(500.0, 520.0),
                at(780.0, 220.0),
                at(220.0, 450.0),
            ],
            captives: vec![at(200.0, 220.0), at(820.0, 450.0), at(500.0, 560.0)],
            extraction_zone: None,
        },
        Level {
            name: "Level 4: Crossfire Extraction".into(),
            player_spawn: at(500.0, 110.0),
            flashbangs: 6,
            walls: with_border([
                // vertical corridor
                rect(380.0, 80.0, 20.0, 510.0),
                rect(600.0, 80.0, 20.0, 510.0),
                // cross hall
                rect(120.0, 300.0, 280.0, 20.0),
                rect(600.0, 300.0, 280.0, 20.0),
                // top left
                rect(80.0, 120.0, 300.0, 20.0),
                rect(80.0, 120.0, 20.0, 160.0),
                rect(80.0, 260.0, 300.0, 20.0),
                // top right
                rect(620.0, 120.0, 320.0, 20.0),
                rect(920.0, 120.0, 20.0, 160.0),
                rect(620.0, 260.0, 320.0, 20.0),
                // bottom left
                rect(80.0, 360.0, 300.0, 20.0),
                rect(80.0, 360.0, 20.0, 200.0),
                rect(80.0, 540.0, 300.0, 20.0),
                // bottom right
                rect(620.0, 360.0, 320.0, 20.0),
                rect(920.0, 360.0, 20.0, 200.0),
                rect(620.0, 540.0, 320.0, 20.0),
            ]),
            doors: vec![
                rect(380.0, 165.0, 20.0, 70.0),
                rect(600.0, 165.0, 20.0, 70.0),
                rect(380.0, 430.0, 20.0, 70.0),
                rect(600.0, 430.0, 20.0, 70.0),
            ],
            hostiles: vec![
                at(500.0, 240.0),
                at(500.0, 520.0),
                at(240.0, 200.0),
                at(780.0, 200.0),
                at(240.0, 470.0),
                at(780.0, 470.0),
            ],
            captives: vec![
                at(150.0, 190.0),
                at(900.0, 190.0),
                at(150.0, 500.0),
                at(900.0, 500.0),
            ],
            extraction_zone: None,
        },
        Level {
            name: "Level 5: Escort & Extract".into(),
            player_spawn: at(500.0, 120.0),
            flashbangs: 6,
            walls: with_border([
                rect(380.0, 80.0, 20.0, 510.0),
                rect(600.0, 80.0, 20.0, 510.0),
                // left top
                rect(80.0, 120.0, 300.0, 20.0),
                rect(80.0, 120.0, 20.0, 160.0),
                rect(80.0, 260.0, 300.0, 20.0),
                // left bottom
                rect(80.0, 380.0, 300.0, 20.0),
                rect(80.0, 380.0, 20.0, 170.0),
                rect(80.0, 530.0, 300.0, 20.0),
                // right top
                rect(620.0, 120.0, 320.0, 20.0),
                rect(920.0, 120.0, 20.0, 160.0),
                rect(620.0, 260.0, 320.0, 20.0),
                // right bottom
                rect(620.0, 380.0, 320.0, 20.0),
                rect(920.0, 380.0, 20.0, 170.0),
                rect(620.0, 530.0, 320.0, 20.0),
            ]),
            doors: vec![
                rect(380.0, 155.0, 20.0, 70.0),
                rect(380.0, 430.0, 20.0, 70.0),
                rect(600.0, 155.0, 20.0, 70.0),
                rect(600.0, 430.0, 20.0, 70.0),
            ],
            hostiles: vec![
                at(500.0, 240.0),
                at(500.0, 520.0),
                at(240.0, 200.0),
                at(780.0, 200.0),
                at(240.0, 470.0),
                at(780.0, 470.0),
            ],
            captives: vec![at(150.0, 190.0), at(900.0, 190.0), at(900.0, 500.0)],
            extraction_zone: Some(rect(70.0, 70.0, 160.0, 110.0)),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_campaign_shape() {
        let levels = builtin_levels();
        assert_eq!(levels.len(), 5);
        assert!(levels[..4].iter().all(|l| l.extraction_zone.is_none()));
        assert!(levels[4].extraction_zone.is_some());
        assert!(!levels[0].has_captives());
        assert_eq!(levels[2].captives.len(), 3);
    }

    #[test]
    fn test_builtin_doors_are_cut_into_walls() {
        for level in builtin_levels() {
            for door in &level.doors {
                assert!(
                    level.walls.iter().any(|w| w.overlaps(door)),
                    "{}: door {:?} floats free of every wall",
                    level.name,
                    door
                );
            }
        }
    }

    #[test]
    fn test_json_table_round_trip() {
        let json = serde_json::to_string(&builtin_levels()).unwrap();
        let parsed = levels_from_json(&json).unwrap();
        assert_eq!(parsed, builtin_levels());
    }

    #[test]
    fn test_empty_json_table_rejected() {
        assert!(matches!(levels_from_json("[]"), Err(SimError::NoLevels)));
    }

    #[test]
    fn test_json_defaults_for_optional_fields() {
        let json = r#"[{
            "name": "Bare",
            "player_spawn": [100.0, 100.0],
            "flashbangs": 1,
            "walls": [],
            "doors": [],
            "hostiles": []
        }]"#;
        let levels = levels_from_json(json).unwrap();
        assert!(levels[0].captives.is_empty());
        assert!(levels[0].extraction_zone.is_none());
    }
}
