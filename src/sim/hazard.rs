//! Hazard kinds, their bodies and per-tick behavior

use glam::Vec2;
use rapier2d::prelude::RigidBodyHandle;
use serde::{Deserialize, Serialize};

use super::world::PhysicsWorld;
use crate::consts::{BEE_FORCE, SOUP_RISE_STEP, WIND_STEP};

/// Hazard types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HazardKind {
    Bee,
    Rock,
    Wind,
    HotSoup,
}

/// Collision shape of a hazard fixture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HazardShape {
    Circle { radius: f32 },
    Box { half_width: f32, half_height: f32 },
}

/// How the body is simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardMotion {
    /// Moved by gravity, forces and collisions
    Dynamic,
    /// Moved only by explicit translation
    Kinematic,
}

/// Fixture geometry and material of a hazard body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardProfile {
    pub shape: HazardShape,
    pub motion: HazardMotion,
    /// Sensors report contacts but never push anything
    pub sensor: bool,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

/// What the hazard controller does to a hazard every tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HazardDrive {
    /// No explicit behavior; gravity and collisions only
    Passive,
    /// Constant force on the center of mass
    Force(Vec2),
    /// Constant kinematic displacement per tick
    Translate(Vec2),
}

impl HazardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HazardKind::Bee => "Bee",
            HazardKind::Rock => "Rock",
            HazardKind::Wind => "Wind",
            HazardKind::HotSoup => "Hot Soup",
        }
    }

    pub fn profile(&self) -> HazardProfile {
        match self {
            HazardKind::Bee => HazardProfile {
                shape: HazardShape::Circle { radius: 0.3 },
                motion: HazardMotion::Dynamic,
                sensor: false,
                density: 0.3,
                friction: 0.2,
                restitution: 0.6,
            },
            HazardKind::Rock => HazardProfile {
                shape: HazardShape::Box {
                    half_width: 0.4,
                    half_height: 0.4,
                },
                motion: HazardMotion::Dynamic,
                sensor: false,
                density: 1.2,
                friction: 0.8,
                restitution: 0.1,
            },
            HazardKind::Wind => HazardProfile {
                shape: HazardShape::Box {
                    half_width: 0.8,
                    half_height: 0.2,
                },
                motion: HazardMotion::Kinematic,
                sensor: true,
                density: 0.0,
                friction: 0.0,
                restitution: 0.0,
            },
            HazardKind::HotSoup => HazardProfile {
                shape: HazardShape::Box {
                    half_width: 1.2,
                    half_height: 0.4,
                },
                motion: HazardMotion::Kinematic,
                sensor: true,
                density: 0.0,
                friction: 0.0,
                restitution: 0.0,
            },
        }
    }

    /// Per-tick behavior.
    ///
    /// Wind keeps drifting right with no wrap or clamp and eventually leaves
    /// the world for good.
    pub fn drive(&self) -> HazardDrive {
        match self {
            HazardKind::Bee => HazardDrive::Force(Vec2::new(BEE_FORCE, 0.0)),
            HazardKind::Rock => HazardDrive::Passive,
            HazardKind::Wind => HazardDrive::Translate(Vec2::new(WIND_STEP, 0.0)),
            HazardKind::HotSoup => HazardDrive::Translate(Vec2::new(0.0, SOUP_RISE_STEP)),
        }
    }
}

/// A live hazard in the world. Hazards are never destroyed during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HazardBody {
    pub kind: HazardKind,
    pub handle: RigidBodyHandle,
}

/// Apply every hazard's drive for this tick
pub fn update_hazards(world: &mut PhysicsWorld) {
    for i in 0..world.hazards().len() {
        let hazard = world.hazards()[i];
        match hazard.kind.drive() {
            HazardDrive::Passive => {}
            HazardDrive::Force(force) => world.set_force(hazard.handle, force),
            HazardDrive::Translate(delta) => world.translate_kinematic(hazard.handle, delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::level::{HazardDefinition, LevelDefinition};

    fn world_with(kind: HazardKind, x: f32, y: f32) -> PhysicsWorld {
        let level = LevelDefinition {
            character_x: 1.0,
            hazards: vec![HazardDefinition {
                kind,
                position_x: x,
                position_y: y,
            }],
            ..LevelDefinition::new("hazard-test", 10, 1)
        };
        PhysicsWorld::initialize(&level, 16).unwrap()
    }

    #[test]
    fn test_sensor_kinds_are_kinematic() {
        for kind in [HazardKind::Wind, HazardKind::HotSoup] {
            let profile = kind.profile();
            assert!(profile.sensor);
            assert_eq!(profile.motion, HazardMotion::Kinematic);
        }
        for kind in [HazardKind::Bee, HazardKind::Rock] {
            let profile = kind.profile();
            assert!(!profile.sensor);
            assert_eq!(profile.motion, HazardMotion::Dynamic);
        }
    }

    #[test]
    fn test_rock_heavier_than_bee() {
        let bee = HazardKind::Bee.profile();
        let rock = HazardKind::Rock.profile();
        assert!(rock.density > bee.density);
        assert!(bee.restitution > rock.restitution);
    }

    #[test]
    fn test_wind_drifts_right_without_wrapping() {
        let mut world = world_with(HazardKind::Wind, 9.5, 12.0);
        let wind = world.hazards()[0].handle;

        for _ in 0..200 {
            update_hazards(&mut world);
            world.step(SIM_DT);
        }

        let pos = world.body_position(wind).unwrap();
        assert!((pos.x - (9.5 + 200.0 * WIND_STEP)).abs() < 1e-3);
        assert!(pos.x > crate::consts::WORLD_WIDTH);
        assert!((pos.y - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_soup_rises() {
        let mut world = world_with(HazardKind::HotSoup, 5.0, 2.0);
        let soup = world.hazards()[0].handle;

        for _ in 0..100 {
            update_hazards(&mut world);
            world.step(SIM_DT);
        }

        let pos = world.body_position(soup).unwrap();
        assert!((pos.y - (2.0 + 100.0 * SOUP_RISE_STEP)).abs() < 1e-3);
        assert!((pos.x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_bee_is_pushed_right() {
        let mut world = world_with(HazardKind::Bee, 5.0, 10.0);
        let bee = world.hazards()[0].handle;

        for _ in 0..30 {
            update_hazards(&mut world);
            world.step(SIM_DT);
        }

        assert!(world.body_position(bee).unwrap().x > 5.0);
        assert!(world.body_velocity(bee).unwrap().x > 0.0);
    }

    #[test]
    fn test_rock_only_falls() {
        let mut world = world_with(HazardKind::Rock, 7.0, 10.0);
        let rock = world.hazards()[0].handle;

        for _ in 0..30 {
            update_hazards(&mut world);
            world.step(SIM_DT);
        }

        let pos = world.body_position(rock).unwrap();
        assert!(pos.y < 10.0);
        assert!((pos.x - 7.0).abs() < 1e-4);
    }
}
