//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - One step per frame, driven only by `TickInput`
//! - Seeded RNG owned by `GameState`
//! - Stable iteration order (container order)
//! - No rendering or platform dependencies

pub mod build;
pub mod character;
pub mod laser;
pub mod painting;
pub mod sprite;
pub mod state;
pub mod tick;

pub use build::{LevelSetup, build_state};
pub use character::{Character, CharacterAction, MoveState};
pub use laser::{Laser, LaserDirection};
pub use painting::{Orientation, Painting, scan_paintings};
pub use sprite::{Sprite, TextureKey, UvRect};
pub use state::{GameEvent, GameState, GameStatus, Mirror, StaticLayers};
pub use tick::{TickInput, tick};
