//! Host settings
//!
//! Supplied by the embedding app; persisted by the host, not by the core.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    /// Drawing surface width in pixels
    pub screen_width: f32,
    /// Drawing surface height in pixels
    pub screen_height: f32,

    // === Simulation ===
    /// Largest frame delta a single tick will simulate (seconds)
    pub max_frame_dt: f32,
    /// Upper bound on live bodies in the world
    pub max_bodies: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: 1080.0,
            screen_height: 1920.0,

            max_frame_dt: 0.1,
            max_bodies: 256,
        }
    }
}

impl Settings {
    /// Settings for a given screen size
    pub fn for_screen(width: f32, height: f32) -> Self {
        Self {
            screen_width: width,
            screen_height: height,
            ..Self::default()
        }
    }

    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    /// Clamp a frame delta into the range a tick may simulate
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.max_frame_dt.max(0.0))
        } else {
            0.0
        }
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        if let Ok(json) = std::fs::read_to_string(path) {
            if let Some(settings) = Self::from_json(&json) {
                log::info!("Loaded settings from {}", path.display());
                return settings;
            }
            log::warn!("Ignoring malformed settings in {}", path.display());
        }

        log::info!("Using default settings");
        Self::default()
    }
}
