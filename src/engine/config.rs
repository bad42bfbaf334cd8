// Scene configuration, loaded from an optional JSON file.
// Every field has a default, so a partial file only overrides what it names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::city::{TileCode, TileGrid};
use super::error::{ConfigError, GridError, RigError, TerrainError};
use super::rig::{CylinderParams, RigSizing};
use super::terrain::TerrainSpec;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub city:    CityConfig,
    pub rig:     RigConfig,
    pub terrain: TerrainConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    pub field_size: f32,
    /// Rows of tile codes. `None` uses the built-in example block.
    pub layout:     Option<Vec<Vec<TileCode>>>,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self { field_size: 100.0, layout: None }
    }
}

impl CityConfig {
    pub fn grid(&self) -> Result<TileGrid, GridError> {
        match &self.layout {
            Some(rows) => TileGrid::from_rows(rows, self.field_size),
            None => TileGrid::example_layout(self.field_size),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub segment_height: f32,
    pub segment_count:  u32,
    pub radius_top:     f32,
    pub radius_bottom:  f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        let cylinder = CylinderParams::default();
        Self {
            segment_height: 8.0,
            segment_count:  4,
            radius_top:     cylinder.radius_top,
            radius_bottom:  cylinder.radius_bottom,
        }
    }
}

impl RigConfig {
    pub fn sizing(&self) -> Result<RigSizing, RigError> {
        RigSizing::new(self.segment_height, self.segment_count)
    }

    pub fn cylinder(&self) -> CylinderParams {
        CylinderParams { radius_top: self.radius_top, radius_bottom: self.radius_bottom }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub albedo_path:        PathBuf,
    pub displacement_path:  PathBuf,
    pub plane_width:        f32,
    pub plane_height:       f32,
    pub image_width:        u32,
    pub image_height:       u32,
    pub displacement_scale: f32,
    pub displacement_bias:  f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        let spec = TerrainSpec::default();
        Self {
            albedo_path:        PathBuf::from("heightmap/material.png"),
            displacement_path:  PathBuf::from("heightmap/heightmap.png"),
            plane_width:        spec.plane_width,
            plane_height:       spec.plane_height,
            image_width:        spec.image_width,
            image_height:       spec.image_height,
            displacement_scale: spec.displacement_scale,
            displacement_bias:  spec.displacement_bias,
        }
    }
}

impl TerrainConfig {
    pub fn spec(&self) -> Result<TerrainSpec, TerrainError> {
        let spec = TerrainSpec {
            plane_width:        self.plane_width,
            plane_height:       self.plane_height,
            image_width:        self.image_width,
            image_height:       self.image_height,
            displacement_scale: self.displacement_scale,
            displacement_bias:  self.displacement_bias,
        };
        spec.validate()?;
        Ok(spec)
    }
}

impl SceneConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
