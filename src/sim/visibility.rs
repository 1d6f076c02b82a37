//! Line-of-sight queries
//!
//! Sight is sampled rather than solved exactly: the segment is walked in steps
//! of about [`SIGHT_SAMPLE_STEP`] units and each sample is tested against
//! walls and closed doors. Geometry thinner than a step can be missed.

use glam::Vec2;

use super::collision::{Geometry, Rect};
use crate::consts::SIGHT_SAMPLE_STEP;

/// Whether any sample along `a -> b` lands inside `rect` (edges included)
///
/// A zero-length segment yields no samples and never hits.
pub fn segment_hits_rect(a: Vec2, b: Vec2, rect: &Rect) -> bool {
    let steps = (a.distance(b) / SIGHT_SAMPLE_STEP).ceil() as u32;
    if steps == 0 {
        return false;
    }
    (0..=steps).any(|i| {
        let t = i as f32 / steps as f32;
        rect.contains_point(a.lerp(b, t))
    })
}

impl Geometry {
    /// Whether `a` can see `b`: no wall and no closed door on the sampled segment.
    /// Open doors never occlude.
    pub fn has_line_of_sight(&self, a: Vec2, b: Vec2) -> bool {
        let wall_blocks = self.walls.iter().any(|w| segment_hits_rect(a, b, w));
        if wall_blocks {
            return false;
        }
        !self
            .doors
            .iter()
            .any(|d| !d.is_open() && segment_hits_rect(a, b, &d.rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Door;
    use proptest::prelude::*;

    fn room_with_door() -> Geometry {
        Geometry {
            walls: vec![Rect::new(200.0, 0.0, 20.0, 400.0)],
            doors: vec![Door::closed(Rect::new(200.0, 150.0, 20.0, 100.0))],
        }
    }

    #[test]
    fn test_wall_blocks_sight() {
        let geo = room_with_door();
        assert!(!geo.has_line_of_sight(Vec2::new(100.0, 50.0), Vec2::new(300.0, 50.0)));
        assert!(geo.has_line_of_sight(Vec2::new(100.0, 50.0), Vec2::new(180.0, 350.0)));
    }

    #[test]
    fn test_open_door_still_occluded_by_wall() {
        // Walls occlude sight even where an open door overlaps them
        let mut geo = room_with_door();
        let a = Vec2::new(100.0, 200.0);
        let b = Vec2::new(300.0, 200.0);
        assert!(!geo.has_line_of_sight(a, b));
        geo.doors[0].open();
        assert!(!geo.has_line_of_sight(a, b));
    }

    #[test]
    fn test_open_free_standing_door_does_not_occlude() {
        let mut geo = Geometry {
            walls: Vec::new(),
            doors: vec![Door::closed(Rect::new(200.0, 150.0, 20.0, 100.0))],
        };
        let a = Vec2::new(100.0, 200.0);
        let b = Vec2::new(300.0, 200.0);
        assert!(!geo.has_line_of_sight(a, b));
        geo.doors[0].open();
        assert!(geo.has_line_of_sight(a, b));
    }

    #[test]
    fn test_zero_length_segment_is_visible() {
        let geo = room_with_door();
        let inside = Vec2::new(210.0, 50.0);
        assert!(geo.has_line_of_sight(inside, inside));
    }

    #[test]
    fn test_thin_wall_can_be_missed() {
        // A 1-unit wall between samples spaced 6 apart slips through
        let geo = Geometry {
            walls: vec![Rect::new(2.5, -50.0, 1.0, 100.0)],
            doors: Vec::new(),
        };
        assert!(geo.has_line_of_sight(Vec2::new(0.0, 0.0), Vec2::new(12.0, 0.0)));
    }

    fn inflated(geo: &Geometry, by: f32) -> Geometry {
        Geometry {
            walls: geo
                .walls
                .iter()
                .map(|w| Rect::new(w.x - by, w.y - by, w.w + 2.0 * by, w.h + 2.0 * by))
                .collect(),
            doors: Vec::new(),
        }
    }

    proptest! {
        #[test]
        fn prop_line_of_sight_is_symmetric(
            ax in 0.0f32..400.0,
            ay in 0.0f32..400.0,
            bx in 0.0f32..400.0,
            by in 0.0f32..400.0,
        ) {
            let geo = Geometry {
                walls: vec![
                    Rect::new(150.0, 100.0, 20.0, 200.0),
                    Rect::new(250.0, 0.0, 100.0, 20.0),
                ],
                doors: Vec::new(),
            };
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            // Skip segments whose samples graze an edge within rounding distance
            prop_assume!(
                inflated(&geo, 0.01).has_line_of_sight(a, b)
                    == inflated(&geo, -0.01).has_line_of_sight(a, b)
            );
            prop_assert_eq!(geo.has_line_of_sight(a, b), geo.has_line_of_sight(b, a));
        }
    }
}
