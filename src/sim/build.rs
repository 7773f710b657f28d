//! Level to game state
//!
//! Builds every sprite, laser and painting of a loaded level once, at level
//! start. Nothing here is called again during play.

use super::character::Character;
use super::laser::{Laser, LaserDirection};
use super::painting::scan_paintings;
use super::sprite::{Sprite, TextureKey, UvRect};
use super::state::{GameState, StaticLayers};
use crate::consts::THIEF_SCALE;
use crate::error::LoadError;
use crate::grid_to_world;
use crate::level::{Level, TileGrid};

/// Per-run parameters for building a level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSetup {
    /// World units per tile
    pub unit: f32,
    pub seed: u64,
    /// Mirrors the thief starts with
    pub mirrors: u32,
    /// Thief spawn tile (col, row)
    pub spawn: (usize, usize),
}

impl Default for LevelSetup {
    fn default() -> Self {
        Self {
            unit: 0.05,
            seed: 0,
            mirrors: 3,
            spawn: (2, 6),
        }
    }
}

/// One sprite per occupied tile
fn layer_sprites(grid: &TileGrid, unit: f32) -> Vec<Sprite> {
    grid.occupied()
        .map(|(col, row, code)| Sprite::from_tile_code(col, row, unit, code))
        .collect()
}

/// Build the full game state for `level`
pub fn build_state(level: &Level, setup: &LevelSetup) -> Result<GameState, LoadError> {
    let unit = setup.unit;

    let layers = StaticLayers {
        floor: layer_sprites(&level.floor, unit),
        wall_shadows: layer_sprites(&level.wall_shadows, unit),
        walls: layer_sprites(&level.walls, unit),
        obstacles: layer_sprites(&level.obstacles, unit),
        emitters: layer_sprites(&level.lasers, unit),
    };

    let mut lasers = Vec::new();
    for (col, row, code) in level.lasers.occupied() {
        match LaserDirection::from_code(code) {
            Some(direction) => lasers.push(Laser::new(col, row, direction, unit, &layers.walls)?),
            None => log::debug!("Tile {} at ({}, {}) is not an emitter", code, col, row),
        }
    }

    let paintings = scan_paintings(&level.paintings, unit);

    let size = unit * THIEF_SCALE;
    let (col, row) = setup.spawn;
    let thief = Sprite::new(
        grid_to_world(col as f32, row as f32, unit),
        size,
        size,
        TextureKey::Player,
        UvRect::FULL,
    );

    let mut state = GameState::new(Character::new(thief), unit, setup.seed, setup.mirrors);
    state.layers = layers;
    state.lasers = lasers;
    state.paintings = paintings;

    log::info!(
        "Built level: {} walls, {} obstacles, {} lasers, {} paintings",
        state.layers.walls.len(),
        state.layers.obstacles.len(),
        state.lasers.len(),
        state.paintings.len()
    );
    Ok(state)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::consts::{UNITS_X, UNITS_Y};

    /// Level with walls on every border tile
    pub(crate) fn walled_level() -> Level {
        let mut level = Level::default();
        for i in 0..UNITS_X {
            level.walls.set(i, 0, 1);
            level.walls.set(i, UNITS_Y - 1, 1);
        }
        for j in 0..UNITS_Y {
            level.walls.set(0, j, 1);
            level.walls.set(UNITS_X - 1, j, 1);
        }
        level
    }

    #[test]
    fn test_build_counts() {
        let mut level = walled_level();
        level.lasers.set(5, 5, LaserDirection::Up.code());
        level.lasers.set(10, 10, LaserDirection::Right.code());
        level.paintings.set(20, 1, 7);
        level.floor.set(3, 3, 0);

        let state = build_state(&level, &LevelSetup::default()).unwrap();
        assert_eq!(state.layers.walls.len(), 2 * UNITS_X + 2 * (UNITS_Y - 2));
        assert_eq!(state.layers.floor.len(), 1);
        assert_eq!(state.layers.emitters.len(), 2);
        assert_eq!(state.lasers.len(), 2);
        assert_eq!(state.paintings.len(), 1);
        assert!(state.paintings[0].is_main_objective());
        assert_eq!(state.mirrors_available, 3);
    }

    #[test]
    fn test_unknown_emitter_code_is_skipped() {
        let mut level = walled_level();
        level.lasers.set(5, 5, 3);
        let state = build_state(&level, &LevelSetup::default()).unwrap();
        assert!(state.lasers.is_empty());
        assert_eq!(state.layers.emitters.len(), 1);
    }

    #[test]
    fn test_unbounded_laser_fails_build() {
        let mut level = Level::default();
        level.lasers.set(5, 5, LaserDirection::Left.code());
        let err = build_state(&level, &LevelSetup::default()).unwrap_err();
        assert!(matches!(err, LoadError::UnboundedLaser { col: 5, row: 5, .. }));
    }

    #[test]
    fn test_thief_spawn() {
        let state = build_state(&walled_level(), &LevelSetup::default()).unwrap();
        let expected = grid_to_world(2.0, 6.0, 0.05);
        assert!((state.player.pos() - expected).length() < 1e-6);
        assert!((state.player.sprite().half_width() - 0.0375).abs() < 1e-6);
        assert_eq!(state.player.sprite().texture, TextureKey::Player);
    }
}
