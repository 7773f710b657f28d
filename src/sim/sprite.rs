//! Axis-aligned billboard sprites
//!
//! A sprite is a position, a rotation in whole degrees and half extents, plus
//! the texture region it shows. Collision between sprites is a single
//! centre-distance threshold: every sprite in the game is square, so there is
//! no need for polygon tests.

use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::{TILE_SIZE, TILESHEET_SIZE};
use crate::grid_to_world;

/// Which texture a sprite samples; resolved to a GPU handle by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextureKey {
    /// Gameplay-only sprite, never drawn
    #[default]
    None,
    /// The level's tilesheet
    Tilesheet,
    /// The thief's sprite image
    Player,
    /// A 1x1 solid colour (RGBA)
    Color([u8; 4]),
}

/// Texture coordinates of a sprite (top-left origin, like wgpu)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl UvRect {
    /// Whole texture
    pub const FULL: UvRect = UvRect {
        u0: 0.0,
        v0: 0.0,
        u1: 1.0,
        v1: 1.0,
    };

    /// Region of tile `index` in a square sheet of `sheet_px` with `tile_px` tiles
    pub fn from_tile(index: u32, tile_px: u32, sheet_px: u32) -> Self {
        let cols = (sheet_px / tile_px).max(1);
        let rows = cols;
        let xc = index % cols;
        let yc = index / cols;

        let nw = tile_px as f32 / sheet_px as f32;
        let nh = nw;
        let xn = xc as f32 / cols as f32;
        let yn = yc as f32 / rows as f32;

        Self {
            u0: xn,
            v0: yn,
            u1: xn + nw,
            v1: yn + nh,
        }
    }

    /// Region of a tile in the default tilesheet layout
    pub fn from_tilesheet(index: u32) -> Self {
        Self::from_tile(index, TILE_SIZE, TILESHEET_SIZE)
    }
}

impl Default for UvRect {
    fn default() -> Self {
        Self::FULL
    }
}

/// A textured square in world space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pos: Vec2,
    /// Degrees, kept in [0, 360)
    rotation: i32,
    half_width: f32,
    half_height: f32,
    pub texture: TextureKey,
    pub uv: UvRect,
}

impl Sprite {
    pub fn new(pos: Vec2, width: f32, height: f32, texture: TextureKey, uv: UvRect) -> Self {
        Self {
            pos,
            rotation: 0,
            half_width: width * 0.5,
            half_height: height * 0.5,
            texture,
            uv,
        }
    }

    /// One-tile sprite centred on grid cell (col, row)
    pub fn at_tile(col: usize, row: usize, unit: f32, texture: TextureKey, uv: UvRect) -> Self {
        let pos = grid_to_world(col as f32, row as f32, unit);
        Self::new(pos, unit, unit, texture, uv)
    }

    /// One-tile sprite showing tilesheet tile `code`
    pub fn from_tile_code(col: usize, row: usize, unit: f32, code: i32) -> Self {
        let uv = UvRect::from_tilesheet(code.max(0) as u32);
        Self::at_tile(col, row, unit, TextureKey::Tilesheet, uv)
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// Move by `delta` in world space
    pub fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    /// Rotation in degrees, [0, 360)
    #[inline]
    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    /// Rotate by `delta` degrees (accumulates, wraps at 360)
    pub fn set_rot(&mut self, delta: i32) {
        self.rotation = (self.rotation + delta).rem_euclid(360);
    }

    /// Unit vector the sprite is facing (rotation 0 faces +x)
    pub fn facing(&self) -> Vec2 {
        Vec2::from_angle((self.rotation as f32).to_radians())
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.half_width
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.half_height
    }

    pub fn is_visible(&self) -> bool {
        self.texture != TextureKey::None
    }

    /// Model-to-world transform mapping the [-1, 1] square onto the sprite
    pub fn transform(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(
            Vec2::new(self.half_width, self.half_height),
            (self.rotation as f32).to_radians(),
            self.pos,
        )
    }

    /// Distance between centres
    pub fn distance_to(&self, other: &Sprite) -> f32 {
        self.pos.distance(other.pos)
    }

    /// True if `other`'s centre is closer than `half_width * factor`.
    ///
    /// A small factor is a hard collision, a larger one an interaction range.
    pub fn collides_with(&self, other: &Sprite, factor: f32) -> bool {
        self.collides_at(self.pos, other, factor)
    }

    /// Same test as [`Sprite::collides_with`] with this sprite moved to `pos`
    pub fn collides_at(&self, pos: Vec2, other: &Sprite, factor: f32) -> bool {
        pos.distance(other.pos) < self.half_width * factor
    }
}
