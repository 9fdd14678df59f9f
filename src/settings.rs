//! Tunable constants for the observation mode
//!
//! Loaded from a JSON file; any field left out keeps its default.

use anyhow::{Context, Result};
use glam::Vec3;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub birds: BirdSettings,
    pub sound: SoundSettings,
    pub overlay: OverlaySettings,
}

/// Which transforms count as birds and how found ones move
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BirdSettings {
    pub name_prefix: String,
    pub hit_radius: f32,
    /// World units per update, along +Z
    pub drift_per_update: f32,
}

/// Looping ambient source orbiting the scene
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SoundSettings {
    pub volume: f32,
    pub half_volume_radius: f32,
    pub orbit_center: Vec3,
    pub orbit_radius: f32,
    /// Length of the synthesized loop in seconds
    pub loop_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    pub help_text: String,
    pub clear_color: [f32; 4],
}

impl Default for BirdSettings {
    fn default() -> Self {
        Self {
            name_prefix: "BIRD".to_owned(),
            hit_radius: crate::math::HIT_RADIUS,
            drift_per_update: 0.1,
        }
    }
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            half_volume_radius: 10.0,
            orbit_center: Vec3::new(10.0, 4.0, 1.0),
            orbit_radius: 10.0,
            loop_seconds: 4,
        }
    }
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            help_text: "--- SWITCH CAMERAS WITH LEFT/RIGHT ---".to_owned(),
            clear_color: [0.85, 0.85, 0.90, 0.0],
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings {}", path.display()))
    }

    /// Defaults when no path is given; a given path must load
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let settings = Self::load(path)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            None => Ok(Self::default()),
        }
    }
}
