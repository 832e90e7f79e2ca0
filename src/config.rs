//! Tunables for the energy field.
//!
//! Every value defaults to what the landing page shipped with, so an empty
//! config file (or none at all) reproduces the original look.

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Whether the viewport is small enough to warrant a reduced pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayClass {
    Standard,
    Constrained,
}

impl DisplayClass {
    pub fn classify(viewport_width: f32, config: &FieldConfig) -> Self {
        if viewport_width <= config.constrained_max_width {
            DisplayClass::Constrained
        } else {
            DisplayClass::Standard
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub particle_count: usize,
    pub constrained_particle_count: usize,
    /// Viewports at or below this width get `constrained_particle_count`.
    pub constrained_max_width: f32,
    pub max_fps: f32,
    pub resize_debounce_ms: u64,
    /// How far outside the surface a particle may drift before it respawns.
    pub respawn_margin: f32,
    pub link_distance: f32,
    pub link_alpha: f32,
    pub link_width: f32,
    pub link_color: [u8; 3],
    pub fill_alpha: f32,
    pub glow_blur: f32,
    pub glow_alpha: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 50,
            constrained_particle_count: 25,
            constrained_max_width: 768.0,
            max_fps: 60.0,
            resize_debounce_ms: 250,
            respawn_margin: 10.0,
            link_distance: 120.0,
            link_alpha: 0.25,
            link_width: 0.8,
            link_color: [0, 212, 255],
            fill_alpha: 0.8,
            glow_blur: 10.0,
            glow_alpha: 0.5,
        }
    }
}

impl FieldConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.particle_count == 0 || self.constrained_particle_count == 0 {
            return Err(Error::InvalidConfig("particle counts must be non-zero"));
        }
        if !(self.max_fps.is_finite() && self.max_fps >= 1.0) {
            return Err(Error::InvalidConfig("max_fps must be a finite value of at least 1"));
        }
        if !(self.link_distance.is_finite() && self.link_distance > 0.0) {
            return Err(Error::InvalidConfig("link_distance must be positive"));
        }
        if self.respawn_margin < 0.0 || self.glow_blur < 0.0 {
            return Err(Error::InvalidConfig("respawn_margin and glow_blur must not be negative"));
        }
        Ok(())
    }

    pub fn pool_size(&self, class: DisplayClass) -> usize {
        match class {
            DisplayClass::Standard => self.particle_count,
            DisplayClass::Constrained => self.constrained_particle_count,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.max_fps as f64)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}
