//! Contact response policy
//!
//! Only contact *begin* events matter: damage is dealt once per new contact,
//! never continuously while two bodies keep overlapping.

use super::drawing::Shield;
use super::hazard::{HazardBody, HazardKind};
use super::material::MaterialType;
use super::world::ContactBegin;
use crate::consts::HOT_SOUP_CONTACT_DAMAGE;

/// Durability a shield of `material` loses when `hazard` starts touching it
pub fn contact_damage(hazard: HazardKind, material: MaterialType) -> Option<f32> {
    match (hazard, material) {
        (HazardKind::HotSoup, MaterialType::Ice) => Some(HOT_SOUP_CONTACT_DAMAGE),
        (HazardKind::HotSoup, MaterialType::Rubber | MaterialType::Stone | MaterialType::Cloth) => {
            None
        }
        (HazardKind::Bee | HazardKind::Rock | HazardKind::Wind, _) => None,
    }
}

/// Apply contact damage for every begin event. Returns the number of hits.
///
/// Exhausted shields are left for the caller to reap.
pub fn resolve_contacts(
    begins: &[ContactBegin],
    hazards: &[HazardBody],
    shields: &mut [Shield],
) -> usize {
    let mut hits = 0;
    for begin in begins {
        for hazard in hazards {
            let Some(other) = begin.other(hazard.handle) else {
                continue;
            };
            let Some(shield) = shields.iter_mut().find(|s| s.handle == other) else {
                continue;
            };
            if let Some(amount) = contact_damage(hazard.kind, shield.material) {
                shield.damage(amount);
                shield.contact_hits += 1;
                hits += 1;
                log::debug!(
                    "{} hit shield {} for {amount}, durability {:.2}",
                    hazard.kind.as_str(),
                    shield.id,
                    shield.durability
                );
            }
        }
    }
    hits
}
