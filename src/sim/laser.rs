//! Laser beams
//!
//! A laser has a fixed origin tile and one of four axis directions. At load
//! time it marches tile by tile until it lands on a wall ("wall hit"). During
//! play, movable obstructions (the thief, placed mirrors) standing in the beam
//! corridor shorten it to a "current hit" between the origin and the wall.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::sprite::Sprite;
use crate::consts::LASER_HALF_WIDTH;
use crate::error::LoadError;
use crate::level::TileGrid;
use crate::{grid_to_world, same_position};

/// Emission direction of a laser emitter tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaserDirection {
    /// Toward increasing grid rows
    Up,
    /// Toward decreasing grid rows
    Down,
    /// Toward decreasing grid columns
    Left,
    /// Toward increasing grid columns
    Right,
}

impl LaserDirection {
    pub const ALL: [LaserDirection; 4] = [
        LaserDirection::Up,
        LaserDirection::Down,
        LaserDirection::Left,
        LaserDirection::Right,
    ];

    /// Decode an emitter tile code from the laser layer
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            108 => Some(LaserDirection::Down),
            123 => Some(LaserDirection::Up),
            124 => Some(LaserDirection::Left),
            107 => Some(LaserDirection::Right),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            LaserDirection::Down => 108,
            LaserDirection::Up => 123,
            LaserDirection::Left => 124,
            LaserDirection::Right => 107,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LaserDirection::Up => "up",
            LaserDirection::Down => "down",
            LaserDirection::Left => "left",
            LaserDirection::Right => "right",
        }
    }

    /// One step in grid coordinates (column, row)
    pub fn grid_step(&self) -> (i64, i64) {
        match self {
            LaserDirection::Up => (0, 1),
            LaserDirection::Down => (0, -1),
            LaserDirection::Left => (-1, 0),
            LaserDirection::Right => (1, 0),
        }
    }

    /// Unit vector in world space (world y is flipped against grid rows)
    pub fn world_dir(&self) -> Vec2 {
        let (dc, dr) = self.grid_step();
        Vec2::new(dc as f32, -(dr as f32))
    }

    /// Whether the beam runs along the world y axis
    #[inline]
    pub fn is_vertical(&self) -> bool {
        matches!(self, LaserDirection::Up | LaserDirection::Down)
    }
}

/// Split a vector into (along-beam, cross-beam) components
#[inline]
fn split(v: Vec2, vertical: bool) -> (f32, f32) {
    if vertical { (v.y, v.x) } else { (v.x, v.y) }
}

/// A single static-origin beam
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    origin_tile: (usize, usize),
    wall_tile: (usize, usize),
    origin: Vec2,
    direction: LaserDirection,
    unit: f32,
    wall_hit: Vec2,
    hit: Vec2,
    /// Beam rectangle corners, fan order
    quad: [Vec2; 4],
}

impl Laser {
    /// Build a laser and march it to the nearest wall.
    ///
    /// `walls` is the static wall layer. The march is bounded by the grid;
    /// running off the edge without meeting a wall is a level defect.
    pub fn new(
        col: usize,
        row: usize,
        direction: LaserDirection,
        unit: f32,
        walls: &[Sprite],
    ) -> Result<Self, LoadError> {
        let origin = grid_to_world(col as f32, row as f32, unit);
        let step = direction.world_dir() * unit;
        let (dc, dr) = direction.grid_step();

        let mut tile = (col as i64, row as i64);
        let mut cursor = origin;
        loop {
            tile = (tile.0 + dc, tile.1 + dr);
            if !TileGrid::in_bounds(tile.0, tile.1) {
                return Err(LoadError::UnboundedLaser {
                    col,
                    row,
                    direction: direction.name(),
                });
            }
            cursor += step;
            if walls.iter().any(|w| same_position(w.pos(), cursor)) {
                break;
            }
        }

        let mut laser = Self {
            origin_tile: (col, row),
            wall_tile: (tile.0 as usize, tile.1 as usize),
            origin,
            direction,
            unit,
            wall_hit: cursor,
            hit: cursor,
            quad: [Vec2::ZERO; 4],
        };
        laser.recompute_quad();

        log::debug!(
            "Laser at ({}, {}) {} hits wall at ({}, {})",
            col,
            row,
            direction.name(),
            laser.wall_tile.0,
            laser.wall_tile.1
        );
        Ok(laser)
    }

    /// Point-in-beam query for one obstruction.
    ///
    /// If `point` is inside the corridor and strictly between the origin and
    /// the current hit, the beam is cut at the point and `true` is returned.
    /// Otherwise a previously shortened beam snaps back to the wall.
    pub fn collides(&mut self, point: Vec2) -> bool {
        if self.intercept(point) {
            return true;
        }
        if !same_position(self.hit, self.wall_hit) {
            self.reset();
        }
        false
    }

    /// Re-evaluate the beam against every obstruction of this step.
    ///
    /// Starts from the full beam, then cuts it at each point in order. A point
    /// only matches while it is strictly inside the current segment, so a later
    /// match always lies nearer the origin. Returns the index of the point that
    /// terminates the beam, if any.
    pub fn resolve(&mut self, points: &[Vec2]) -> Option<usize> {
        self.reset();
        let mut blocker = None;
        for (i, &p) in points.iter().enumerate() {
            if self.intercept(p) {
                blocker = Some(i);
            }
        }
        blocker
    }

    /// Snap the beam back to the wall
    pub fn reset(&mut self) {
        self.hit = self.wall_hit;
        self.recompute_quad();
    }

    fn intercept(&mut self, p: Vec2) -> bool {
        let vertical = self.direction.is_vertical();
        let half = self.unit / 2.0;

        let (p_along, p_cross) = split(p, vertical);
        let (o_along, o_cross) = split(self.origin, vertical);
        let (h_along, h_cross) = split(self.hit, vertical);

        if (p_cross - o_cross).abs() >= half || (p_cross - h_cross).abs() >= half {
            return false;
        }

        let span = (o_along - h_along).abs();
        if (p_along - o_along).abs() < span && (p_along - h_along).abs() < span {
            self.hit = if vertical {
                Vec2::new(self.hit.x, p.y)
            } else {
                Vec2::new(p.x, self.hit.y)
            };
            self.recompute_quad();
            return true;
        }
        false
    }

    fn recompute_quad(&mut self) {
        let back = self.direction.world_dir() / 2.0 * self.unit;
        let mut p0 = self.origin - back;
        let mut p1 = self.hit - back;
        let mut p2 = p1;
        let mut p3 = p0;

        let offset = if self.direction.is_vertical() {
            Vec2::new(LASER_HALF_WIDTH, 0.0)
        } else {
            Vec2::new(0.0, LASER_HALF_WIDTH)
        };
        p0 -= offset;
        p1 -= offset;
        p2 += offset;
        p3 += offset;

        self.quad = [p0, p1, p2, p3];
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn origin_tile(&self) -> (usize, usize) {
        self.origin_tile
    }

    #[inline]
    pub fn direction(&self) -> LaserDirection {
        self.direction
    }

    #[inline]
    pub fn wall_hit(&self) -> Vec2 {
        self.wall_hit
    }

    /// Grid cell of the wall the beam ends on
    pub fn wall_tile(&self) -> (usize, usize) {
        self.wall_tile
    }

    #[inline]
    pub fn current_hit(&self) -> Vec2 {
        self.hit
    }

    /// Whether an obstruction currently shortens the beam
    pub fn is_blocked(&self) -> bool {
        !same_position(self.hit, self.wall_hit)
    }

    /// Rectangle corners for rendering
    pub fn quad(&self) -> [Vec2; 4] {
        self.quad
    }

    pub fn unit(&self) -> f32 {
        self.unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{UNITS_X, UNITS_Y};
    use crate::sim::sprite::{TextureKey, UvRect};
    use proptest::prelude::*;

    const UNIT: f32 = 0.05;

    fn wall(col: usize, row: usize) -> Sprite {
        Sprite::at_tile(col, row, UNIT, TextureKey::Tilesheet, UvRect::FULL)
    }

    /// Walls along rows 0 and 39 only
    fn row_walls() -> Vec<Sprite> {
        (0..UNITS_X)
            .flat_map(|c| [wall(c, 0), wall(c, UNITS_Y - 1)])
            .collect()
    }

    /// Walls around the whole border
    fn border_walls() -> Vec<Sprite> {
        let mut walls = row_walls();
        for r in 1..UNITS_Y - 1 {
            walls.push(wall(0, r));
            walls.push(wall(UNITS_X - 1, r));
        }
        walls
    }

    fn tile(col: usize, row: usize) -> Vec2 {
        grid_to_world(col as f32, row as f32, UNIT)
    }

    #[test]
    fn test_emitter_codes() {
        assert_eq!(LaserDirection::from_code(108), Some(LaserDirection::Down));
        assert_eq!(LaserDirection::from_code(123), Some(LaserDirection::Up));
        assert_eq!(LaserDirection::from_code(124), Some(LaserDirection::Left));
        assert_eq!(LaserDirection::from_code(107), Some(LaserDirection::Right));
        assert_eq!(LaserDirection::from_code(5), None);
        for dir in LaserDirection::ALL {
            assert_eq!(LaserDirection::from_code(dir.code()), Some(dir));
        }
    }

    #[test]
    fn test_up_emitter_hits_last_row() {
        let walls = row_walls();
        let laser = Laser::new(5, 5, LaserDirection::Up, UNIT, &walls).unwrap();
        assert_eq!(laser.wall_tile(), (5, 39));
        assert!(same_position(laser.wall_hit(), tile(5, 39)));
        assert!(!laser.is_blocked());
    }

    #[test]
    fn test_down_emitter_hits_first_row() {
        let walls = row_walls();
        let laser = Laser::new(5, 5, LaserDirection::Down, UNIT, &walls).unwrap();
        assert_eq!(laser.wall_tile(), (5, 0));
        assert!(same_position(laser.wall_hit(), tile(5, 0)));
    }

    #[test]
    fn test_horizontal_emitters() {
        let walls = border_walls();
        let left = Laser::new(10, 7, LaserDirection::Left, UNIT, &walls).unwrap();
        assert_eq!(left.wall_tile(), (0, 7));
        let right = Laser::new(10, 7, LaserDirection::Right, UNIT, &walls).unwrap();
        assert_eq!(right.wall_tile(), (39, 7));
    }

    #[test]
    fn test_unbounded_laser_fails_fast() {
        let walls = row_walls();
        let err = Laser::new(5, 5, LaserDirection::Left, UNIT, &walls).unwrap_err();
        assert!(matches!(
            err,
            LoadError::UnboundedLaser {
                col: 5,
                row: 5,
                direction: "left"
            }
        ));
    }

    #[test]
    fn test_collides_cuts_vertical_beam() {
        let walls = row_walls();
        let mut laser = Laser::new(5, 5, LaserDirection::Up, UNIT, &walls).unwrap();
        let thief = tile(5, 20) + Vec2::new(0.01, 0.0);

        assert!(laser.collides(thief));
        assert!(laser.is_blocked());
        assert!((laser.current_hit().y - thief.y).abs() < 1e-6);
        // Cross-axis coordinate stays on the beam axis
        assert!((laser.current_hit().x - laser.origin().x).abs() < 1e-6);
    }

    #[test]
    fn test_collides_cuts_horizontal_beam() {
        let walls = border_walls();
        let mut laser = Laser::new(3, 12, LaserDirection::Right, UNIT, &walls).unwrap();
        let mirror = tile(15, 12);

        assert!(laser.collides(mirror));
        assert!((laser.current_hit().x - mirror.x).abs() < 1e-6);
        assert!((laser.current_hit().y - laser.origin().y).abs() < 1e-6);
    }

    #[test]
    fn test_collides_outside_corridor_resets() {
        let walls = row_walls();
        let mut laser = Laser::new(5, 5, LaserDirection::Up, UNIT, &walls).unwrap();
        let full_quad = laser.quad();

        assert!(laser.collides(tile(5, 20)));
        assert!(laser.is_blocked());

        // One tile to the side: outside the half-tile corridor
        assert!(!laser.collides(tile(6, 20)));
        assert!(!laser.is_blocked());
        assert_eq!(laser.quad(), full_quad);
    }

    #[test]
    fn test_collides_requires_strictly_between() {
        let walls = row_walls();
        let mut laser = Laser::new(5, 5, LaserDirection::Up, UNIT, &walls).unwrap();
        // Behind the emitter
        assert!(!laser.collides(tile(5, 3)));
        // Exactly at the origin
        assert!(!laser.collides(tile(5, 5)));
        // Beyond the current hit once shortened
        assert!(laser.collides(tile(5, 10)));
        assert!(!laser.collides(tile(5, 20)));
        assert!(!laser.is_blocked());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let walls = row_walls();
        let mut laser = Laser::new(5, 5, LaserDirection::Up, UNIT, &walls).unwrap();
        laser.collides(tile(5, 12));

        laser.reset();
        let once = (laser.current_hit(), laser.quad());
        laser.reset();
        let twice = (laser.current_hit(), laser.quad());
        assert_eq!(once, twice);
        assert_eq!(once.0, laser.wall_hit());
    }

    #[test]
    fn test_quad_geometry_vertical() {
        let walls = row_walls();
        let laser = Laser::new(5, 5, LaserDirection::Up, UNIT, &walls).unwrap();
        let [p0, p1, p2, p3] = laser.quad();
        let origin = laser.origin();
        let back = Vec2::new(0.0, -1.0) / 2.0 * UNIT;

        assert!((p0 - (origin - back - Vec2::new(LASER_HALF_WIDTH, 0.0))).length() < 1e-6);
        assert!((p3 - (origin - back + Vec2::new(LASER_HALF_WIDTH, 0.0))).length() < 1e-6);
        assert!((p1 - (laser.wall_hit() - back - Vec2::new(LASER_HALF_WIDTH, 0.0))).length() < 1e-6);
        assert!((p2.x - p1.x - 2.0 * LASER_HALF_WIDTH).abs() < 1e-6);
    }

    #[test]
    fn test_quad_geometry_horizontal() {
        let walls = border_walls();
        let laser = Laser::new(3, 12, LaserDirection::Left, UNIT, &walls).unwrap();
        let [p0, p1, p2, p3] = laser.quad();
        assert!((p0.x - p3.x).abs() < 1e-6);
        assert!((p3.y - p0.y - 2.0 * LASER_HALF_WIDTH).abs() < 1e-6);
        assert!((p2.y - p1.y - 2.0 * LASER_HALF_WIDTH).abs() < 1e-6);
    }

    #[test]
    fn test_resolve_nearest_wins_in_any_order() {
        let walls = row_walls();
        let mut laser = Laser::new(5, 5, LaserDirection::Up, UNIT, &walls).unwrap();
        let far = tile(5, 30);
        let near = tile(5, 10);

        assert_eq!(laser.resolve(&[far, near]), Some(1));
        assert!((laser.current_hit().y - near.y).abs() < 1e-6);

        assert_eq!(laser.resolve(&[near, far]), Some(0));
        assert!((laser.current_hit().y - near.y).abs() < 1e-6);
    }

    #[test]
    fn test_resolve_without_obstruction_restores_wall() {
        let walls = row_walls();
        let mut laser = Laser::new(5, 5, LaserDirection::Up, UNIT, &walls).unwrap();
        laser.resolve(&[tile(5, 10)]);
        assert!(laser.is_blocked());
        assert_eq!(laser.resolve(&[tile(20, 10)]), None);
        assert!(!laser.is_blocked());
    }

    proptest! {
        #[test]
        fn prop_wall_hit_lands_on_wall(
            col in 1usize..39,
            row in 1usize..39,
            dir_idx in 0usize..4,
        ) {
            let walls = border_walls();
            let dir = LaserDirection::ALL[dir_idx];
            let laser = Laser::new(col, row, dir, UNIT, &walls).unwrap();
            prop_assert!(walls.iter().any(|w| same_position(w.pos(), laser.wall_hit())));
        }

        #[test]
        fn prop_current_hit_stays_on_segment(
            col in 1usize..39,
            row in 1usize..39,
            dir_idx in 0usize..4,
            px in -1.0f32..1.0,
            py in -1.0f32..1.0,
        ) {
            let walls = border_walls();
            let dir = LaserDirection::ALL[dir_idx];
            let mut laser = Laser::new(col, row, dir, UNIT, &walls).unwrap();
            laser.collides(Vec2::new(px, py));

            let (o, _) = split(laser.origin(), dir.is_vertical());
            let (w, _) = split(laser.wall_hit(), dir.is_vertical());
            let (h, h_cross) = split(laser.current_hit(), dir.is_vertical());
            let (_, o_cross) = split(laser.origin(), dir.is_vertical());
            prop_assert!(h >= o.min(w) - 1e-5 && h <= o.max(w) + 1e-5);
            prop_assert!((h_cross - o_cross).abs() < 1e-5);
        }
    }
}
