//! Collision detection and movement resolution against static geometry
//!
//! Walls are axis-aligned rectangles. Doors are rectangles cut into walls:
//! closed they block like a wall, open they punch a passable gap through any
//! wall they overlap, but only where the probe itself falls inside the door.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::levels::Level;

/// Axis-aligned rectangle (top-left origin, positive extents)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square box of half-extent `half` centred on `center`
    pub fn around(center: Vec2, half: f32) -> Self {
        Self::new(center.x - half, center.y - half, half * 2.0, half * 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// AABB overlap with strict comparisons: touching edges do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Point containment, edges included
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Whether the bounding box of a circle touches this rectangle (edges included)
    pub fn touches_circle(&self, center: Vec2, radius: f32) -> bool {
        center.x + radius >= self.x
            && center.x - radius <= self.right()
            && center.y + radius >= self.y
            && center.y - radius <= self.bottom()
    }
}

/// A door rectangle. Starts closed; once opened it stays open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub rect: Rect,
    open: bool,
}

impl Door {
    pub fn closed(rect: Rect) -> Self {
        Self { rect, open: false }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the door; returns false if it was already open
    pub fn open(&mut self) -> bool {
        let was_closed = !self.open;
        self.open = true;
        was_closed
    }
}

/// Per-run copy of a level's walls and doors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub walls: Vec<Rect>,
    pub doors: Vec<Door>,
}

impl Geometry {
    /// Deep-copy a level's geometry with every door closed
    pub fn from_level(level: &Level) -> Self {
        Self {
            walls: level.walls.clone(),
            doors: level.doors.iter().copied().map(Door::closed).collect(),
        }
    }

    /// True if an open door overlapping `wall` also overlaps `probe`
    fn doorway_gap(&self, wall: &Rect, probe: &Rect) -> bool {
        self.doors
            .iter()
            .filter(|d| d.is_open() && d.rect.overlaps(wall))
            .any(|d| d.rect.overlaps(probe))
    }

    /// Whether a probe box hits solid geometry
    ///
    /// A wall blocks unless gapped at this probe by an overlapping open door.
    /// Closed doors always block.
    pub fn blocks_box(&self, probe: &Rect) -> bool {
        let wall_hit = self
            .walls
            .iter()
            .filter(|w| w.overlaps(probe))
            .any(|w| !self.doorway_gap(w, probe));
        if wall_hit {
            return true;
        }

        self.doors
            .iter()
            .any(|d| !d.is_open() && d.rect.overlaps(probe))
    }

    /// Whether a circular probe collides with solid geometry (tested by its bounding box)
    #[inline]
    pub fn solid_collision(&self, pos: Vec2, radius: f32) -> bool {
        self.blocks_box(&Rect::around(pos, radius))
    }

    /// Move a circular body by `delta`, X axis first then Y, so it slides along
    /// a surface when only one axis is blocked. Returns the resolved position.
    pub fn resolve_move(&self, pos: Vec2, radius: f32, delta: Vec2) -> Vec2 {
        let mut out = pos;

        let nx = out.x + delta.x;
        if !self.solid_collision(Vec2::new(nx, out.y), radius) {
            out.x = nx;
        }

        let ny = out.y + delta.y;
        if !self.solid_collision(Vec2::new(out.x, ny), radius) {
            out.y = ny;
        }

        out
    }

    /// Index of the closest closed door whose centre lies within `max_dist`
    pub fn nearest_closed_door(&self, pos: Vec2, max_dist: f32) -> Option<usize> {
        self.doors
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.is_open())
            .map(|(i, d)| (i, d.rect.center().distance(pos)))
            .filter(|&(_, dist)| dist < max_dist)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// A vertical wall with a door cut into its middle
    fn doorway() -> Geometry {
        Geometry {
            walls: vec![Rect::new(100.0, 0.0, 20.0, 300.0)],
            doors: vec![Door::closed(Rect::new(100.0, 120.0, 20.0, 60.0))],
        }
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Rect::new(9.9, 9.9, 5.0, 5.0)));
    }

    #[test]
    fn test_closed_door_blocks_on_its_own() {
        let geo = Geometry {
            walls: Vec::new(),
            doors: vec![Door::closed(Rect::new(0.0, 0.0, 20.0, 20.0))],
        };
        assert!(geo.solid_collision(Vec2::new(10.0, 10.0), 4.0));
    }

    #[test]
    fn test_open_door_gaps_the_wall() {
        let mut geo = doorway();
        let in_door = Vec2::new(110.0, 150.0);
        assert!(geo.solid_collision(in_door, 6.0));

        assert!(geo.doors[0].open());
        assert!(!geo.solid_collision(in_door, 6.0));

        // The rest of the wall is still solid
        assert!(geo.solid_collision(Vec2::new(110.0, 40.0), 6.0));
    }

    #[test]
    fn test_door_open_is_monotonic() {
        let mut door = Door::closed(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(door.open());
        assert!(!door.open());
        assert!(door.is_open());
    }

    #[test]
    fn test_resolve_move_slides_along_wall() {
        let geo = Geometry {
            walls: vec![Rect::new(0.0, 100.0, 400.0, 20.0)],
            doors: Vec::new(),
        };
        // Body just above the wall moving diagonally down-right
        let pos = Vec2::new(50.0, 88.0);
        let out = geo.resolve_move(pos, 10.0, Vec2::new(3.0, 3.0));
        assert_eq!(out, Vec2::new(53.0, 88.0));
    }

    #[test]
    fn test_resolve_move_x_first() {
        let geo = Geometry {
            walls: vec![Rect::new(20.0, 20.0, 20.0, 20.0)],
            doors: Vec::new(),
        };
        let out = geo.resolve_move(Vec2::new(5.0, 5.0), 4.0, Vec2::new(6.0, 6.0));
        assert_eq!(out, Vec2::new(11.0, 11.0));

        let blocked = geo.resolve_move(Vec2::new(10.0, 10.0), 4.0, Vec2::new(8.0, 8.0));
        // X step clears the block's top edge, the Y step from there does not
        assert_eq!(blocked, Vec2::new(18.0, 10.0));
    }

    #[test]
    fn test_nearest_closed_door() {
        let mut geo = Geometry {
            walls: Vec::new(),
            doors: vec![
                Door::closed(Rect::new(0.0, 0.0, 20.0, 20.0)),
                Door::closed(Rect::new(40.0, 0.0, 20.0, 20.0)),
            ],
        };
        let pos = Vec2::new(45.0, 10.0);
        assert_eq!(geo.nearest_closed_door(pos, 60.0), Some(1));
        geo.doors[1].open();
        assert_eq!(geo.nearest_closed_door(pos, 60.0), Some(0));
        assert_eq!(geo.nearest_closed_door(pos, 10.0), None);
    }

    proptest! {
        #[test]
        fn prop_probe_inside_wall_collides(
            x in 101.0f32..119.0,
            y in 1.0f32..299.0,
            r in 0.5f32..20.0,
        ) {
            let geo = Geometry {
                walls: vec![Rect::new(100.0, 0.0, 20.0, 300.0)],
                doors: Vec::new(),
            };
            prop_assert!(geo.solid_collision(Vec2::new(x, y), r));
        }

        #[test]
        fn prop_open_doorway_is_passable(
            x in 101.0f32..119.0,
            y in 126.0f32..174.0,
            r in 0.5f32..5.0,
        ) {
            let mut geo = doorway();
            geo.doors[0].open();
            prop_assert!(!geo.solid_collision(Vec2::new(x, y), r));
        }
    }
}
