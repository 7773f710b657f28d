//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in `GameState`, including the RNG,
//! so a level plays back identically for the same seed and inputs.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::character::Character;
use super::laser::Laser;
use super::painting::Painting;
use super::sprite::{Sprite, TextureKey, UvRect};

/// Overall outcome of the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Ongoing,
    /// Main objective collected
    Won,
    /// Thief walked into a beam
    Caught,
}

impl GameStatus {
    /// Integer code shown on the HUD (0 ongoing, 1 won, -1 caught)
    pub fn code(&self) -> i32 {
        match self {
            GameStatus::Ongoing => 0,
            GameStatus::Won => 1,
            GameStatus::Caught => -1,
        }
    }

    pub fn is_finished(&self) -> bool {
        *self != GameStatus::Ongoing
    }
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Caught { laser: usize },
    PaintingCollected { points: i64, main_objective: bool },
    MirrorPlaced { id: u32 },
    MirrorCollected { id: u32 },
}

/// Mirror tint (RGBA)
pub const MIRROR_COLOR: [u8; 4] = [160, 220, 255, 255];

/// A placed mirror: a point obstruction for lasers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mirror {
    pub id: u32,
    pub sprite: Sprite,
}

impl Mirror {
    pub fn new(id: u32, pos: Vec2, unit: f32) -> Self {
        Self {
            id,
            sprite: Sprite::new(pos, unit, unit, TextureKey::Color(MIRROR_COLOR), UvRect::FULL),
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.sprite.pos()
    }
}

/// Static sprites per level layer, in draw order
#[derive(Debug, Clone, Default)]
pub struct StaticLayers {
    pub floor: Vec<Sprite>,
    pub wall_shadows: Vec<Sprite>,
    pub walls: Vec<Sprite>,
    pub obstacles: Vec<Sprite>,
    pub emitters: Vec<Sprite>,
}

impl StaticLayers {
    /// All layers back to front
    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.floor
            .iter()
            .chain(&self.wall_shadows)
            .chain(&self.walls)
            .chain(&self.obstacles)
            .chain(&self.emitters)
    }
}

/// Complete game state for one level
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Explicit RNG context (painting scores)
    pub rng: Pcg32,
    /// World units per tile
    pub unit: f32,
    pub layers: StaticLayers,
    pub lasers: Vec<Laser>,
    pub paintings: Vec<Painting>,
    pub mirrors: Vec<Mirror>,
    pub player: Character,
    pub score: i64,
    pub status: GameStatus,
    /// Mirrors still in the thief's pocket
    pub mirrors_available: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    next_id: u32,
}

impl GameState {
    /// Empty level around a player; entities are added by the level builder
    pub fn new(player: Character, unit: f32, seed: u64, mirrors_available: u32) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            unit,
            layers: StaticLayers::default(),
            lasers: Vec::new(),
            paintings: Vec::new(),
            mirrors: Vec::new(),
            player,
            score: 0,
            status: GameStatus::Ongoing,
            mirrors_available,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Positions lasers are tested against: the player first, then mirrors
    pub fn obstruction_points(&self) -> Vec<Vec2> {
        std::iter::once(self.player.pos())
            .chain(self.mirrors.iter().map(Mirror::pos))
            .collect()
    }

    /// Put a mirror one tile ahead of the player. Returns its id.
    pub fn place_mirror(&mut self) -> Option<u32> {
        if self.mirrors_available == 0 {
            return None;
        }
        let pos = self.player.pos() + self.player.sprite().facing() * self.unit;
        let id = self.next_entity_id();
        self.mirrors.push(Mirror::new(id, pos, self.unit));
        self.mirrors_available -= 1;
        Some(id)
    }

    /// One-line HUD shown in the window title
    pub fn hud_text(&self) -> String {
        format!(
            "Score: {}, Status: {}, Mirrors: {}",
            self.score,
            self.status.code(),
            self.mirrors_available
        )
    }

    /// Pick mirror `index` back up; every beam snaps back to its wall
    pub fn collect_mirror(&mut self, index: usize) -> Option<u32> {
        if index >= self.mirrors.len() {
            return None;
        }
        let mirror = self.mirrors.remove(index);
        self.mirrors_available += 1;
        for laser in &mut self.lasers {
            laser.reset();
        }
        Some(mirror.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        let sprite = Sprite::new(Vec2::ZERO, 0.075, 0.075, TextureKey::Player, UvRect::FULL);
        GameState::new(Character::new(sprite), 0.05, 42, 2)
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(GameStatus::Ongoing.code(), 0);
        assert_eq!(GameStatus::Won.code(), 1);
        assert_eq!(GameStatus::Caught.code(), -1);
        assert!(GameStatus::Caught.is_finished());
        assert!(!GameStatus::Ongoing.is_finished());
    }

    #[test]
    fn test_place_mirror_ahead_of_player() {
        let mut s = state();
        let id = s.place_mirror().unwrap();
        assert_eq!(s.mirrors_available, 1);
        assert_eq!(s.mirrors.len(), 1);
        assert_eq!(s.mirrors[0].id, id);
        assert!((s.mirrors[0].pos() - Vec2::new(0.05, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_place_mirror_respects_pool() {
        let mut s = state();
        assert!(s.place_mirror().is_some());
        assert!(s.place_mirror().is_some());
        assert!(s.place_mirror().is_none());
        assert_eq!(s.mirrors.len(), 2);
    }

    #[test]
    fn test_collect_mirror_returns_to_pool() {
        let mut s = state();
        let id = s.place_mirror().unwrap();
        assert_eq!(s.collect_mirror(0), Some(id));
        assert_eq!(s.mirrors_available, 2);
        assert!(s.mirrors.is_empty());
        assert_eq!(s.collect_mirror(0), None);
    }

    #[test]
    fn test_hud_text() {
        let mut s = state();
        s.score = 420;
        s.status = GameStatus::Caught;
        assert_eq!(s.hud_text(), "Score: 420, Status: -1, Mirrors: 2");
        s.status = GameStatus::Won;
        assert_eq!(s.hud_text(), "Score: 420, Status: 1, Mirrors: 2");
    }

    #[test]
    fn test_obstruction_points_player_first() {
        let mut s = state();
        s.place_mirror();
        let points = s.obstruction_points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], s.player.pos());
    }
}
