//! Shape generation for sprites and laser beams
//!
//! Turns a `GameState` into one vertex list plus draw batches. Pure CPU code,
//! read-only over the simulation.

use std::ops::Range;

use glam::Vec2;

use super::shader::ShaderKind;
use super::vertex::Vertex;
use crate::sim::{GameState, Laser, Sprite, TextureKey, UvRect};

/// Beam colour (RGBA8, fed to the texture cache)
pub const LASER_COLOR: [u8; 4] = [255, 40, 40, 255];

/// Consecutive triangles sharing a texture and shader variant
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub texture: TextureKey,
    pub shader: ShaderKind,
    pub vertices: Range<u32>,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub vertices: Vec<Vertex>,
    pub batches: Vec<Batch>,
}

impl Frame {
    fn push(&mut self, texture: TextureKey, shader: ShaderKind, quad: [Vertex; 6]) {
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&quad);
        let end = self.vertices.len() as u32;

        match self.batches.last_mut() {
            Some(last) if last.texture == texture && last.shader == shader => {
                last.vertices.end = end;
            }
            _ => self.batches.push(Batch {
                texture,
                shader,
                vertices: start..end,
            }),
        }
    }

    fn push_sprite(&mut self, sprite: &Sprite, shader: ShaderKind) {
        if sprite.is_visible() {
            self.push(sprite.texture, shader, sprite_quad(sprite));
        }
    }
}

/// Shader variants for the animated entities of a frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameEffects {
    pub lasers: ShaderKind,
    pub mirrors: ShaderKind,
}

/// Two triangles from four corners in fan order
fn fan(corners: [Vec2; 4], uvs: [[f32; 2]; 4]) -> [Vertex; 6] {
    let v = |i: usize| Vertex::new(corners[i].x, corners[i].y, uvs[i][0], uvs[i][1]);
    [v(0), v(1), v(2), v(0), v(2), v(3)]
}

/// Textured quad for a sprite, rotated about its centre
pub fn sprite_quad(sprite: &Sprite) -> [Vertex; 6] {
    let t = sprite.transform();
    let UvRect { u0, v0, u1, v1 } = sprite.uv;
    let corners = [
        t.transform_point2(Vec2::new(-1.0, -1.0)),
        t.transform_point2(Vec2::new(1.0, -1.0)),
        t.transform_point2(Vec2::new(1.0, 1.0)),
        t.transform_point2(Vec2::new(-1.0, 1.0)),
    ];
    fan(corners, [[u0, v1], [u1, v1], [u1, v0], [u0, v0]])
}

/// Beam rectangle from the origin to the current hit
pub fn laser_quad(laser: &Laser) -> [Vertex; 6] {
    fan(laser.quad(), [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]])
}

/// Build the frame back to front: static layers, lasers, paintings, mirrors, thief
pub fn build_frame(state: &GameState, effects: &FrameEffects) -> Frame {
    let mut frame = Frame::default();

    for sprite in state.layers.iter() {
        frame.push_sprite(sprite, ShaderKind::Plain);
    }
    for laser in &state.lasers {
        frame.push(TextureKey::Color(LASER_COLOR), effects.lasers, laser_quad(laser));
    }
    for painting in &state.paintings {
        for sprite in painting.sprites() {
            frame.push_sprite(sprite, ShaderKind::Plain);
        }
    }
    for mirror in &state.mirrors {
        frame.push_sprite(&mirror.sprite, effects.mirrors);
    }
    frame.push_sprite(state.player.sprite(), ShaderKind::Plain);

    frame
}
