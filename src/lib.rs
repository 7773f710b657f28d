//! Lasertrap - A top-down museum heist
//!
//! Core modules:
//! - `level`: Tile grids and level directory loading
//! - `sim`: Frame-stepped simulation (lasers, thief movement, paintings, mirrors)
//! - `renderer`: wgpu sprite/laser rendering with shader variants
//! - `platform`: Keyboard input state
//! - `settings`: JSON configuration

pub mod error;
pub mod level;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{LoadError, RenderError};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Grid dimensions (tiles)
    pub const UNITS_X: usize = 40;
    pub const UNITS_Y: usize = 40;
    /// Cells per layer
    pub const GRID_CELLS: usize = UNITS_X * UNITS_Y;

    /// Tilesheet geometry (pixels)
    pub const TILE_SIZE: u32 = 32;
    pub const TILESHEET_SIZE: u32 = 512;

    /// Epsilon for matching a marched laser position against a wall tile
    pub const POSITION_EPSILON: f32 = 1e-3;
    /// Half-width of the rendered laser beam quad
    pub const LASER_HALF_WIDTH: f32 = 0.004;

    /// Thief sprite is 1.5 tiles wide
    pub const THIEF_SCALE: f32 = 1.5;
    /// Distance of a single forward/backward step
    pub const STEP_DISTANCE: f32 = 0.01;
    /// Degrees per rotation input
    pub const ROTATION_STEP: i32 = 10;

    /// Hard collision threshold (multiples of half-width)
    pub const COLLISION_FACTOR: f32 = 1.5;
    /// Interaction range (multiples of half-width)
    pub const PROXIMITY_FACTOR: f32 = 2.5;

    /// Score for the main objective painting
    pub const MAIN_OBJECTIVE_SCORE: i64 = 10_000;
    /// Upper bound (inclusive) for a regular painting's random score
    pub const PAINTING_SCORE_MAX: i64 = 1000;
}

/// Tile size in world units for a viewport, filling the shortest side.
///
/// Uses integer pixels-per-tile, so the grid always maps to whole pixels.
pub fn unit_size_for_viewport(width: u32, height: u32) -> f32 {
    let per_tile = (width as usize / consts::UNITS_X).min(height as usize / consts::UNITS_Y);
    if per_tile == 0 {
        return 2.0 / consts::UNITS_X as f32;
    }
    1.0 / per_tile as f32
}

/// Convert a grid coordinate (column, row) to a world position
#[inline]
pub fn grid_to_world(col: f32, row: f32, unit: f32) -> Vec2 {
    let offset = 1.0 - unit / 2.0;
    Vec2::new(col * unit - offset, -(row * unit - offset))
}

/// Convert a world position back to fractional grid coordinates (column, row)
#[inline]
pub fn world_to_grid(pos: Vec2, unit: f32) -> Vec2 {
    let offset = 1.0 - unit / 2.0;
    Vec2::new((pos.x + offset) / unit, (-pos.y + offset) / unit)
}

/// Per-axis epsilon comparison of two positions
#[inline]
pub fn same_position(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() < consts::POSITION_EPSILON && (a.y - b.y).abs() < consts::POSITION_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_size_fills_shortest_side() {
        assert!((unit_size_for_viewport(800, 800) - 0.05).abs() < 1e-6);
        // 1280x800 -> 32 vs 20 pixels per tile, shortest wins
        assert!((unit_size_for_viewport(1280, 800) - 0.05).abs() < 1e-6);
        // Degenerate window falls back to spanning NDC
        assert!((unit_size_for_viewport(10, 10) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_grid_to_world_corners() {
        let unit = 0.05;
        let top_left = grid_to_world(0.0, 0.0, unit);
        assert!((top_left.x - (-0.975)).abs() < 1e-6);
        assert!((top_left.y - 0.975).abs() < 1e-6);

        let bottom_right = grid_to_world(39.0, 39.0, unit);
        assert!((bottom_right.x - 0.975).abs() < 1e-5);
        assert!((bottom_right.y - (-0.975)).abs() < 1e-5);
    }

    #[test]
    fn test_world_to_grid_inverts() {
        let unit = 0.05;
        let p = grid_to_world(7.0, 23.0, unit);
        let g = world_to_grid(p, unit);
        assert!((g.x - 7.0).abs() < 1e-4);
        assert!((g.y - 23.0).abs() < 1e-4);
    }

    #[test]
    fn test_same_position_epsilon() {
        assert!(same_position(Vec2::new(0.1, 0.2), Vec2::new(0.1005, 0.2)));
        assert!(!same_position(Vec2::new(0.1, 0.2), Vec2::new(0.102, 0.2)));
    }
}
