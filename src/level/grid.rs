//! Fixed-size tile grid for one level layer
//!
//! Layers are stored as comma-separated integers, one grid row per line.
//! Negative codes mark empty cells.

use std::fs;
use std::path::Path;

use crate::consts::{GRID_CELLS, UNITS_X, UNITS_Y};
use crate::error::LoadError;

/// Marker for an empty cell
pub const EMPTY: i32 = -1;

/// A 40x40 row-major grid of tile codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    cells: Vec<i32>,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::empty()
    }
}

impl TileGrid {
    /// Grid with every cell empty
    pub fn empty() -> Self {
        Self {
            cells: vec![EMPTY; GRID_CELLS],
        }
    }

    /// Wrap an already parsed cell list; `None` if the size is wrong
    pub fn from_cells(cells: Vec<i32>) -> Option<Self> {
        (cells.len() == GRID_CELLS).then_some(Self { cells })
    }

    /// Read and parse a layer file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let grid = Self::parse(&text, path)?;
        log::debug!(
            "Loaded layer {} ({} occupied cells)",
            path.display(),
            grid.occupied().count()
        );
        Ok(grid)
    }

    /// Parse CSV text. Reading stops at the first blank line.
    pub fn parse(text: &str, path: &Path) -> Result<Self, LoadError> {
        let mut cells = Vec::with_capacity(GRID_CELLS);

        for (line_idx, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                break;
            }
            let values: Vec<&str> = line.split(',').collect();
            let last = values.len() - 1;
            for (col_idx, value) in values.into_iter().enumerate() {
                let value = value.trim();
                // Tolerate a trailing comma at the end of a row
                if value.is_empty() && col_idx > 0 && col_idx == last {
                    continue;
                }
                let code = value.parse::<i32>().map_err(|_| LoadError::InvalidCell {
                    path: path.to_path_buf(),
                    line: line_idx + 1,
                    column: col_idx + 1,
                    value: value.to_string(),
                })?;
                cells.push(code);
            }
        }

        if cells.len() != GRID_CELLS {
            return Err(LoadError::CellCount {
                path: path.to_path_buf(),
                expected: GRID_CELLS,
                actual: cells.len(),
            });
        }

        Ok(Self { cells })
    }

    /// Row-major index of a cell
    #[inline]
    pub fn index_of(col: usize, row: usize) -> usize {
        row * UNITS_X + col
    }

    /// (column, row) of a row-major index
    #[inline]
    pub fn coords_of(index: usize) -> (usize, usize) {
        (index % UNITS_X, index / UNITS_X)
    }

    /// Whether (col, row) lies inside the grid
    #[inline]
    pub fn in_bounds(col: i64, row: i64) -> bool {
        col >= 0 && row >= 0 && (col as usize) < UNITS_X && (row as usize) < UNITS_Y
    }

    /// Code at (col, row); out-of-bounds reads as empty
    pub fn get(&self, col: usize, row: usize) -> i32 {
        if col >= UNITS_X || row >= UNITS_Y {
            return EMPTY;
        }
        self.cells[Self::index_of(col, row)]
    }

    /// Overwrite a cell (level construction and tests)
    pub fn set(&mut self, col: usize, row: usize, code: i32) {
        if col < UNITS_X && row < UNITS_Y {
            self.cells[Self::index_of(col, row)] = code;
        }
    }

    /// Whether the cell holds a tile
    #[inline]
    pub fn is_occupied(&self, col: usize, row: usize) -> bool {
        self.get(col, row) > EMPTY
    }

    /// All occupied cells as (col, row, code), in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, i32)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, &code)| {
            if code > EMPTY {
                let (col, row) = Self::coords_of(i);
                Some((col, row, code))
            } else {
                None
            }
        })
    }

    /// Raw cells in row-major order
    pub fn cells(&self) -> &[i32] {
        &self.cells
    }
}
