//! Error types for level and texture loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a level or its textures.
///
/// Everything here is a level-authoring defect; the simulation itself never
/// produces errors once a level has loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be read.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A grid cell is not an integer.
    #[error("Non-numeric cell '{value}' in '{path}' at line {line}, column {column}")]
    InvalidCell {
        path: PathBuf,
        line: usize,
        column: usize,
        value: String,
    },

    /// Grid does not have the expected number of cells.
    #[error("Grid '{path}' has {actual} cells, expected {expected}")]
    CellCount {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    /// A laser emitter has no wall anywhere along its beam.
    #[error("Laser at column {col}, row {row} pointing {direction} never reaches a wall")]
    UnboundedLaser {
        col: usize,
        row: usize,
        direction: &'static str,
    },

    /// Image could not be decoded.
    #[error("Failed to decode image '{path}': {details}")]
    Image { path: PathBuf, details: String },
}

/// Errors while bringing up the GPU renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("No suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("Failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// A level texture failed to load.
    #[error(transparent)]
    Texture(#[from] LoadError),
}
