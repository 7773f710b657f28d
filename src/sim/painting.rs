//! Collectible paintings
//!
//! A painting spans one or more contiguous tiles of the painting layer.

use serde::{Deserialize, Serialize};

use super::sprite::Sprite;
use crate::consts::{UNITS_X, UNITS_Y};
use crate::level::{EMPTY, TileGrid};

/// Axis a multi-tile painting runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Single,
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Painting {
    sprites: Vec<Sprite>,
    orientation: Orientation,
    is_main_objective: bool,
}

impl Painting {
    pub fn new(sprites: Vec<Sprite>, orientation: Orientation, is_main_objective: bool) -> Self {
        Self {
            sprites,
            orientation,
            is_main_objective,
        }
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_main_objective(&self) -> bool {
        self.is_main_objective
    }

    pub fn set_main_objective(&mut self, value: bool) {
        self.is_main_objective = value;
    }
}

/// Group the painting layer into paintings.
///
/// Tiles are visited in row-major order. A tile with an occupied right
/// neighbour starts a horizontal run, otherwise one with an occupied lower
/// neighbour starts a vertical run. Runs never wrap past the grid edge. The
/// last painting found is the main objective.
pub fn scan_paintings(layer: &TileGrid, unit: f32) -> Vec<Painting> {
    let mut remaining = layer.clone();
    let mut paintings = Vec::new();

    for row in 0..UNITS_Y {
        for col in 0..UNITS_X {
            if !remaining.is_occupied(col, row) {
                continue;
            }

            let mut sprites = Vec::new();
            let orientation = if remaining.is_occupied(col + 1, row) {
                let mut c = col;
                while c < UNITS_X && remaining.is_occupied(c, row) {
                    sprites.push(Sprite::from_tile_code(c, row, unit, remaining.get(c, row)));
                    remaining.set(c, row, EMPTY);
                    c += 1;
                }
                Orientation::Horizontal
            } else if remaining.is_occupied(col, row + 1) {
                let mut r = row;
                while r < UNITS_Y && remaining.is_occupied(col, r) {
                    sprites.push(Sprite::from_tile_code(col, r, unit, remaining.get(col, r)));
                    remaining.set(col, r, EMPTY);
                    r += 1;
                }
                Orientation::Vertical
            } else {
                sprites.push(Sprite::from_tile_code(col, row, unit, remaining.get(col, row)));
                remaining.set(col, row, EMPTY);
                Orientation::Single
            };

            paintings.push(Painting::new(sprites, orientation, false));
        }
    }

    if let Some(last) = paintings.last_mut() {
        last.set_main_objective(true);
    }
    log::info!("Found {} paintings", paintings.len());
    paintings
}
