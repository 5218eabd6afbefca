//! Level data contract
//!
//! Levels arrive from the host's level repository as JSON using the same
//! field names as the shipped level packs. They are read once per session and
//! never mutated during play.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MASCOT_X, DEFAULT_MASCOT_Y};
use crate::error::LevelError;
use crate::sim::{HazardKind, MaterialType};

/// A hazard placed in the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardDefinition {
    #[serde(rename = "type")]
    pub kind: HazardKind,
    pub position_x: f32,
    pub position_y: f32,
}

fn default_character_x() -> f32 {
    DEFAULT_MASCOT_X
}

fn default_character_y() -> f32 {
    DEFAULT_MASCOT_Y
}

fn default_allowed_materials() -> Vec<MaterialType> {
    MaterialType::ALL.to_vec()
}

/// One stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDefinition {
    pub id: String,
    /// Mascot spawn
    #[serde(default = "default_character_x")]
    pub character_x: f32,
    #[serde(default = "default_character_y")]
    pub character_y: f32,
    /// Survival target in seconds
    pub time_to_survive: u32,
    /// How many shields the player may draw
    pub draw_limit: u32,
    #[serde(default)]
    pub hazards: Vec<HazardDefinition>,
    /// First entry is the initial selection
    #[serde(default = "default_allowed_materials")]
    pub allowed_materials: Vec<MaterialType>,
}

impl LevelDefinition {
    /// A level with default spawn, every material allowed and no hazards
    pub fn new(id: impl Into<String>, time_to_survive: u32, draw_limit: u32) -> Self {
        Self {
            id: id.into(),
            character_x: DEFAULT_MASCOT_X,
            character_y: DEFAULT_MASCOT_Y,
            time_to_survive,
            draw_limit,
            hazards: Vec::new(),
            allowed_materials: default_allowed_materials(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Material selected when the session starts
    pub fn default_material(&self) -> MaterialType {
        self.allowed_materials.first().copied().unwrap_or_default()
    }
}

/// Player progress through a pack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackProgress {
    pub completed: u32,
    pub stars: u32,
}

/// A bundle of levels as shipped or downloaded by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelPack {
    pub pack_id: String,
    pub name: String,
    pub levels: Vec<LevelDefinition>,
    #[serde(default)]
    pub progress: PackProgress,
}

impl LevelPack {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path)?;
        let pack = Self::from_json(&json)?;
        log::info!(
            "Loaded pack {} ({} levels) from {}",
            pack.pack_id,
            pack.levels.len(),
            path.display()
        );
        Ok(pack)
    }

    pub fn level(&self, id: &str) -> Option<&LevelDefinition> {
        self.levels.iter().find(|l| l.id == id)
    }
}

/// Read one level from JSON holding either a pack or a single level.
///
/// From a pack, `id` picks the level; without one the first level is used.
pub fn parse_level(json: &str, id: Option<&str>) -> Result<LevelDefinition, LevelError> {
    match LevelPack::from_json(json) {
        Ok(pack) => {
            log::info!(
                "Pack {} ({}): {} levels, {} completed",
                pack.pack_id,
                pack.name,
                pack.levels.len(),
                pack.progress.completed
            );
            let level = match id {
                Some(id) => pack.level(id),
                None => pack.levels.first(),
            };
            level.cloned().ok_or_else(|| LevelError::NotFound {
                id: id.unwrap_or("<first>").to_string(),
            })
        }
        Err(e) => {
            log::debug!("Not a level pack ({e}), reading a single level");
            LevelDefinition::from_json(json)
        }
    }
}

/// [`parse_level`] on the contents of a file
pub fn load_level(path: &Path, id: Option<&str>) -> Result<LevelDefinition, LevelError> {
    let json = std::fs::read_to_string(path)?;
    let level = parse_level(&json, id)?;
    log::info!("Loaded level {} from {}", level.id, path.display());
    Ok(level)
}
