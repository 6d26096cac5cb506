use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Errors from loading or validating a quadtree configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Quadtree configuration. Fixed for the lifetime of a [`crate::QuadTree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadTreeConfig {
    /// Lower corner of the domain on the XZ plane.
    pub origin: [f32; 2],
    /// Edge length of the (square) domain.
    pub size: f32,
    /// Number of LOD levels. Leaves use levels `0..=lod_count - 2`.
    pub lod_count: u32,
    /// Grid subdivisions along a patch edge at LOD 0.
    pub mesh_resolution: u32,
    /// Nodes this short are never split. Also the stitching probe offset.
    pub min_patch_length: f32,
    /// Coverage above which a node is split.
    pub max_coverage: f32,
    /// Screen-area scale applied to projected cell area.
    pub screen_area: f32,
    /// Horizontal displacement allowance added around every node footprint.
    #[serde(default = "default_horizontal_margin")]
    pub horizontal_margin: f32,
    /// Half-height of the culling box.
    #[serde(default = "default_vertical_margin")]
    pub vertical_margin: f32,
}

fn default_horizontal_margin() -> f32 {
    1.35
}

fn default_vertical_margin() -> f32 {
    0.01
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            origin: [-512.0, -512.0],
            size: 1024.0,
            lod_count: 6,
            mesh_resolution: 64,
            min_patch_length: 16.0,
            max_coverage: 64.0,
            screen_area: 1920.0 * 1080.0,
            horizontal_margin: default_horizontal_margin(),
            vertical_margin: default_vertical_margin(),
        }
    }
}

impl QuadTreeConfig {
    pub fn origin(&self) -> Vec2 {
        Vec2::from(self.origin)
    }

    /// Check that the parameters are internally consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lod_count < 2 {
            return Err(invalid("lod_count", "must be at least 2"));
        }
        if self.mesh_resolution == 0 || !self.mesh_resolution.is_power_of_two() {
            return Err(invalid("mesh_resolution", "must be a non-zero power of two"));
        }
        if self.lod_count > 32 || self.mesh_resolution >> (self.lod_count - 1) == 0 {
            return Err(invalid(
                "lod_count",
                format!(
                    "mesh_resolution {} cannot be halved {} times",
                    self.mesh_resolution,
                    self.lod_count - 1
                ),
            ));
        }
        if self.origin.iter().any(|c| !c.is_finite()) {
            return Err(invalid("origin", "must be finite"));
        }
        positive("size", self.size)?;
        positive("min_patch_length", self.min_patch_length)?;
        positive("max_coverage", self.max_coverage)?;
        positive("screen_area", self.screen_area)?;
        non_negative("horizontal_margin", self.horizontal_margin)?;
        non_negative("vertical_margin", self.vertical_margin)?;
        Ok(())
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive and finite, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be non-negative, got {value}")))
    }
}
