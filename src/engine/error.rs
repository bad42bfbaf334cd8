// Error types for the generators and their configuration.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
    #[error("grid of {width}x{height} needs {expected} cells, got {actual}")]
    CellCount { width: u32, height: u32, expected: usize, actual: usize },
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, actual: usize },
    #[error("field size must be positive and small enough for building heights, got {0}")]
    FieldSize(f32),
}

#[derive(Debug, Error)]
pub enum RigError {
    #[error("segment count must be at least 1")]
    NoSegments,
    #[error("segment height must be positive and finite, got {0}")]
    SegmentHeight(f32),
    #[error("cylinder radius must be non-negative and finite, got {0}")]
    Radius(f32),
    #[error("segment count {0} exceeds the 16-bit joint index range")]
    TooManySegments(u32),
}

#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("failed to load raster {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image of {width}x{height} pixels is too small to subdivide (need at least 10x10)")]
    TooSmall { width: u32, height: u32 },
    #[error("terrain plane size must be positive and finite, got {width}x{height}")]
    PlaneSize { width: f32, height: f32 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level error for the scene binary.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Rig(#[from] RigError),
    #[error(transparent)]
    Terrain(#[from] TerrainError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
