//! Level data: six tile layers plus the tilesheet and player textures
//!
//! A level lives in `<levels_dir>/level<N>/` with one CSV per layer.

pub mod grid;

pub use grid::{EMPTY, TileGrid};

use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// The layers a level is built from, in draw order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Floor,
    WallShadows,
    Walls,
    Obstacles,
    Lasers,
    Paintings,
}

impl LayerKind {
    pub const ALL: [LayerKind; 6] = [
        LayerKind::Floor,
        LayerKind::WallShadows,
        LayerKind::Walls,
        LayerKind::Obstacles,
        LayerKind::Lasers,
        LayerKind::Paintings,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            LayerKind::Floor => "museum_floor.csv",
            LayerKind::WallShadows => "museum_walls_shadows.csv",
            LayerKind::Walls => "museum_walls.csv",
            LayerKind::Obstacles => "museum_obstacles.csv",
            LayerKind::Lasers => "museum_lasers.csv",
            LayerKind::Paintings => "museum_paintings.csv",
        }
    }
}

/// Tilesheet file inside a level directory
pub const TILESHEET_FILE: &str = "tilesheet.tga";
/// Player sprite file inside a level directory
pub const PLAYER_FILE: &str = "player.gif";

/// All static data for one level
#[derive(Debug, Clone, Default)]
pub struct Level {
    pub floor: TileGrid,
    pub wall_shadows: TileGrid,
    pub walls: TileGrid,
    pub obstacles: TileGrid,
    pub lasers: TileGrid,
    pub paintings: TileGrid,
    /// Directory the level was loaded from (texture paths resolve against it)
    pub dir: PathBuf,
}

impl Level {
    /// Directory of level `number` under `levels_dir`
    pub fn dir_for(levels_dir: &Path, number: u32) -> PathBuf {
        levels_dir.join(format!("level{number}"))
    }

    /// Load every layer of a level, failing on the first bad file
    pub fn load(levels_dir: &Path, number: u32) -> Result<Self, LoadError> {
        let dir = Self::dir_for(levels_dir, number);
        log::info!("Loading level {} from {}", number, dir.display());

        let mut level = Level {
            dir: dir.clone(),
            ..Default::default()
        };
        for kind in LayerKind::ALL {
            let grid = TileGrid::load(&dir.join(kind.file_name()))?;
            *level.layer_mut(kind) = grid;
        }
        Ok(level)
    }

    pub fn layer(&self, kind: LayerKind) -> &TileGrid {
        match kind {
            LayerKind::Floor => &self.floor,
            LayerKind::WallShadows => &self.wall_shadows,
            LayerKind::Walls => &self.walls,
            LayerKind::Obstacles => &self.obstacles,
            LayerKind::Lasers => &self.lasers,
            LayerKind::Paintings => &self.paintings,
        }
    }

    pub fn layer_mut(&mut self, kind: LayerKind) -> &mut TileGrid {
        match kind {
            LayerKind::Floor => &mut self.floor,
            LayerKind::WallShadows => &mut self.wall_shadows,
            LayerKind::Walls => &mut self.walls,
            LayerKind::Obstacles => &mut self.obstacles,
            LayerKind::Lasers => &mut self.lasers,
            LayerKind::Paintings => &mut self.paintings,
        }
    }

    pub fn tilesheet_path(&self) -> PathBuf {
        self.dir.join(TILESHEET_FILE)
    }

    pub fn player_path(&self) -> PathBuf {
        self.dir.join(PLAYER_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{UNITS_X, UNITS_Y};
    use std::fs;

    fn write_layer(dir: &Path, kind: LayerKind, code: i32) {
        let row = vec![code.to_string(); UNITS_X].join(",");
        let text = vec![row; UNITS_Y].join("\n");
        fs::write(dir.join(kind.file_name()), text).unwrap();
    }

    fn temp_levels_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lasertrap-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(Level::dir_for(&dir, 1)).unwrap();
        dir
    }

    #[test]
    fn test_load_all_layers() {
        let root = temp_levels_dir("load");
        let level_dir = Level::dir_for(&root, 1);
        for kind in LayerKind::ALL {
            write_layer(&level_dir, kind, -1);
        }
        write_layer(&level_dir, LayerKind::Walls, 3);

        let level = Level::load(&root, 1).unwrap();
        assert_eq!(level.walls.get(0, 0), 3);
        assert_eq!(level.floor.get(0, 0), EMPTY);
        assert_eq!(level.tilesheet_path(), level_dir.join(TILESHEET_FILE));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_missing_layer_reports_path() {
        let root = temp_levels_dir("missing");
        let level_dir = Level::dir_for(&root, 1);
        write_layer(&level_dir, LayerKind::Floor, -1);

        let err = Level::load(&root, 1).unwrap_err();
        match err {
            LoadError::Io { path, .. } => {
                assert_eq!(path, level_dir.join(LayerKind::WallShadows.file_name()));
            }
            other => panic!("unexpected error: {other}"),
        }

        let _ = fs::remove_dir_all(&root);
    }
}
