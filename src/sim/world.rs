//! Rigid-body world
//!
//! Wraps the rapier2d pipeline. Everything outside this module talks in
//! `glam::Vec2` and body handles; nalgebra types stay in here.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use glam::Vec2;
use rapier2d::crossbeam::channel::{Receiver, unbounded};
use rapier2d::prelude::*;

use super::hazard::{HazardBody, HazardMotion, HazardShape};
use super::material::MaterialProfile;
use crate::consts::*;
use crate::error::WorldError;
use crate::level::{HazardDefinition, LevelDefinition};

#[inline]
fn to_vector(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

#[inline]
fn to_point(v: Vec2) -> Point<Real> {
    point![v.x, v.y]
}

#[inline]
fn to_vec2(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Two bodies that started touching during the last step.
///
/// Reported once per body pair, however many of their colliders touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactBegin {
    pub body_a: RigidBodyHandle,
    pub body_b: RigidBodyHandle,
}

impl ContactBegin {
    /// The other body of the pair, if `body` takes part in it
    pub fn other(&self, body: RigidBodyHandle) -> Option<RigidBodyHandle> {
        if self.body_a == body {
            Some(self.body_b)
        } else if self.body_b == body {
            Some(self.body_a)
        } else {
            None
        }
    }
}

/// Order-independent key for a pair of bodies
fn body_pair(a: RigidBodyHandle, b: RigidBodyHandle) -> (RigidBodyHandle, RigidBodyHandle) {
    if a.into_raw_parts() <= b.into_raw_parts() {
        (a, b)
    } else {
        (b, a)
    }
}

/// The physics world of one session: ground, mascot, hazards and shields.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: ChannelEventCollector,
    collision_recv: Receiver<CollisionEvent>,
    _force_recv: Receiver<ContactForceEvent>,
    /// Touching collider pairs per body pair
    touching: HashMap<(RigidBodyHandle, RigidBodyHandle), u32>,
    max_bodies: usize,
    mascot: RigidBodyHandle,
    mascot_spawn: Vec2,
    hazards: Vec<HazardBody>,
}

impl PhysicsWorld {
    /// Build the world for a level: ground, mascot and one body per hazard.
    ///
    /// Bad level data degrades (default spawn, skipped hazards); only running
    /// out of body capacity is an error.
    pub fn initialize(level: &LevelDefinition, max_bodies: usize) -> Result<Self, WorldError> {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.num_solver_iterations =
            NonZeroUsize::new(VELOCITY_ITERATIONS).unwrap_or(NonZeroUsize::MIN);
        integration_parameters.num_internal_pgs_iterations = POSITION_ITERATIONS;

        let (collision_send, collision_recv) = unbounded::<CollisionEvent>();
        let (force_send, force_recv) = unbounded::<ContactForceEvent>();

        let mut world = Self {
            gravity: vector![0.0, GRAVITY_Y],
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: ChannelEventCollector::new(collision_send, force_send),
            collision_recv,
            _force_recv: force_recv,
            touching: HashMap::new(),
            max_bodies,
            mascot: RigidBodyHandle::invalid(),
            mascot_spawn: Vec2::ZERO,
            hazards: Vec::with_capacity(level.hazards.len()),
        };

        world.spawn_ground()?;

        let spawn = Vec2::new(level.character_x, level.character_y);
        let spawn = if spawn.is_finite() {
            spawn
        } else {
            log::warn!(
                "Level {}: invalid mascot spawn, using default position",
                level.id
            );
            Vec2::new(DEFAULT_MASCOT_X, DEFAULT_MASCOT_Y)
        };
        world.spawn_mascot(spawn)?;

        for def in &level.hazards {
            if !(def.position_x.is_finite() && def.position_y.is_finite()) {
                log::warn!("Level {}: skipping {:?} with invalid position", level.id, def.kind);
                continue;
            }
            let hazard = world.spawn_hazard(def)?;
            world.hazards.push(hazard);
        }

        log::debug!(
            "World ready for level {}: {} hazards, {} bodies",
            level.id,
            world.hazards.len(),
            world.bodies.len()
        );
        Ok(world)
    }

    fn insert_body(&mut self, body: RigidBody) -> Result<RigidBodyHandle, WorldError> {
        if self.bodies.len() >= self.max_bodies {
            return Err(WorldError::BodyLimit {
                limit: self.max_bodies,
            });
        }
        Ok(self.bodies.insert(body))
    }

    fn attach(&mut self, collider: Collider, parent: RigidBodyHandle) -> ColliderHandle {
        self.colliders
            .insert_with_parent(collider, parent, &mut self.bodies)
    }

    /// Static slab whose top face is the ground line
    fn spawn_ground(&mut self) -> Result<RigidBodyHandle, WorldError> {
        let half_thickness = GROUND_THICKNESS / 2.0;
        let body = RigidBodyBuilder::fixed()
            .translation(vector![WORLD_WIDTH / 2.0, GROUND_Y - half_thickness])
            .build();
        let handle = self.insert_body(body)?;
        self.attach(
            ColliderBuilder::cuboid(WORLD_WIDTH / 2.0, half_thickness).build(),
            handle,
        );
        Ok(handle)
    }

    fn spawn_mascot(&mut self, position: Vec2) -> Result<RigidBodyHandle, WorldError> {
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(position))
            .build();
        let handle = self.insert_body(body)?;
        let collider = ColliderBuilder::ball(MASCOT_RADIUS)
            .density(MASCOT_DENSITY)
            .friction(MASCOT_FRICTION)
            .restitution(MASCOT_RESTITUTION)
            .build();
        self.attach(collider, handle);
        self.mascot = handle;
        self.mascot_spawn = position;
        Ok(handle)
    }

    fn spawn_hazard(&mut self, def: &HazardDefinition) -> Result<HazardBody, WorldError> {
        let profile = def.kind.profile();
        let builder = match profile.motion {
            HazardMotion::Dynamic => RigidBodyBuilder::dynamic(),
            HazardMotion::Kinematic => RigidBodyBuilder::kinematic_position_based(),
        };
        let body = builder
            .translation(vector![def.position_x, def.position_y])
            .build();
        let handle = self.insert_body(body)?;

        let builder = match profile.shape {
            HazardShape::Circle { radius } => ColliderBuilder::ball(radius),
            HazardShape::Box {
                half_width,
                half_height,
            } => ColliderBuilder::cuboid(half_width, half_height),
        };
        let collider = if profile.sensor {
            builder
                .sensor(true)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build()
        } else {
            builder
                .density(profile.density)
                .friction(profile.friction)
                .restitution(profile.restitution)
                .build()
        };
        self.attach(collider, handle);

        Ok(HazardBody {
            kind: def.kind,
            handle,
        })
    }

    /// Create a shield body: one edge fixture per consecutive pair of points.
    ///
    /// The body sits at the origin so fixture coordinates are the stroke's
    /// world coordinates.
    pub fn spawn_shield(
        &mut self,
        points: &[Vec2],
        profile: MaterialProfile,
    ) -> Result<RigidBodyHandle, WorldError> {
        let body = RigidBodyBuilder::dynamic().translation(vector![0.0, 0.0]).build();
        let handle = self.insert_body(body)?;
        for pair in points.windows(2) {
            let collider = ColliderBuilder::capsule_from_endpoints(
                to_point(pair[0]),
                to_point(pair[1]),
                SHIELD_HALF_THICKNESS,
            )
            .density(profile.density)
            .friction(profile.friction)
            .restitution(profile.restitution)
            .build();
            self.attach(collider, handle);
        }
        Ok(handle)
    }

    /// Remove a body and its fixtures. Returns false if it was already gone.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        self.touching.retain(|&(a, b), _| a != handle && b != handle);
        self.bodies
            .remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    /// Advance the simulation by exactly one step of `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );
    }

    /// Body pairs that started touching since the last drain.
    ///
    /// A pair is reported when its first collider pair starts touching and
    /// not again until every collider pair between the two bodies has
    /// stopped. Events whose collider vanished in the meantime are dropped.
    pub fn drain_contact_begins(&mut self) -> Vec<ContactBegin> {
        let mut begins = Vec::new();
        while let Ok(event) = self.collision_recv.try_recv() {
            let (a, b) = match event {
                CollisionEvent::Started(a, b, _) | CollisionEvent::Stopped(a, b, _) => (a, b),
            };
            let (Some(body_a), Some(body_b)) = (self.collider_parent(a), self.collider_parent(b))
            else {
                continue;
            };
            let key = body_pair(body_a, body_b);

            if event.started() {
                let count = self.touching.entry(key).or_insert(0);
                *count += 1;
                if *count == 1 {
                    begins.push(ContactBegin { body_a, body_b });
                }
            } else if let Some(count) = self.touching.get_mut(&key) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    self.touching.remove(&key);
                }
            }
        }
        begins
    }

    fn collider_parent(&self, collider: ColliderHandle) -> Option<RigidBodyHandle> {
        self.colliders.get(collider)?.parent()
    }

    /// Replace the force acting on a body's center of mass for the next step
    pub fn set_force(&mut self, handle: RigidBodyHandle, force: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.reset_forces(true);
            body.add_force(to_vector(force), true);
        }
    }

    /// Move a kinematic body by `delta` over the next step
    pub fn translate_kinematic(&mut self, handle: RigidBodyHandle, delta: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            let next = body.translation() + to_vector(delta);
            body.set_next_kinematic_translation(next);
        }
    }

    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.bodies.get(handle).map(|b| to_vec2(b.translation()))
    }

    pub fn body_velocity(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.bodies.get(handle).map(|b| to_vec2(b.linvel()))
    }

    /// Map body-local points to world space
    pub fn transform_points(&self, handle: RigidBodyHandle, local: &[Vec2]) -> Vec<Vec2> {
        match self.bodies.get(handle) {
            Some(body) => {
                let iso = body.position();
                local
                    .iter()
                    .map(|p| {
                        let world = iso * to_point(*p);
                        Vec2::new(world.x, world.y)
                    })
                    .collect()
            }
            None => Vec::new(),
        }
    }

    pub fn contains_body(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    pub fn mascot_position(&self) -> Vec2 {
        self.body_position(self.mascot).unwrap_or(self.mascot_spawn)
    }

    pub fn hazards(&self) -> &[HazardBody] {
        &self.hazards
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
