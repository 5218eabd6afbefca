//! Shield materials and their physical constants

use serde::{Deserialize, Serialize};

/// Material a shield can be drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialType {
    #[default]
    Rubber,
    Stone,
    Ice,
    Cloth,
}

impl MaterialType {
    /// Every material, in selector order
    pub const ALL: [MaterialType; 4] = [
        MaterialType::Rubber,
        MaterialType::Stone,
        MaterialType::Ice,
        MaterialType::Cloth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Rubber => "Rubber",
            MaterialType::Stone => "Stone",
            MaterialType::Ice => "Ice",
            MaterialType::Cloth => "Cloth",
        }
    }

    /// Physical constants for this material
    pub fn profile(&self) -> MaterialProfile {
        MaterialProfile::from(*self)
    }

    /// Whether the material slowly loses durability on its own
    pub fn erodes(&self) -> bool {
        matches!(self, MaterialType::Ice)
    }
}

/// Fixture parameters and starting durability of a material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialProfile {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub durability: f32,
}

impl From<MaterialType> for MaterialProfile {
    fn from(material: MaterialType) -> Self {
        match material {
            MaterialType::Rubber => MaterialProfile {
                density: 0.4,
                friction: 0.4,
                restitution: 0.8,
                durability: 1.2,
            },
            MaterialType::Stone => MaterialProfile {
                density: 2.2,
                friction: 0.9,
                restitution: 0.1,
                durability: 2.4,
            },
            MaterialType::Ice => MaterialProfile {
                density: 0.7,
                friction: 0.1,
                restitution: 0.05,
                durability: 0.6,
            },
            MaterialType::Cloth => MaterialProfile {
                density: 0.5,
                friction: 0.6,
                restitution: 0.2,
                durability: 1.0,
            },
        }
    }
}
