//! Stroke capture and shield lifecycle
//!
//! Turns touch strokes into shield bodies under the level's draw budget and
//! owns the set of live shields (durability, erosion, removal).

use glam::Vec2;
use rapier2d::prelude::RigidBodyHandle;
use serde::{Deserialize, Serialize};

use super::material::MaterialType;
use super::state::{InputEvent, TouchKind};
use super::world::PhysicsWorld;
use crate::consts::*;
use crate::level::LevelDefinition;
use crate::screen_to_world;

/// Gesture state of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokePhase {
    /// Waiting for a touch
    Idle,
    /// Collecting points of a stroke
    Drawing,
}

/// What a touch event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchResponse {
    /// Not consumed (no budget, nothing in progress, dead zone)
    Ignored,
    /// Tap landed on the material selector
    MaterialSelected(MaterialType),
    StrokeStarted,
    PointAdded,
    /// Drag too close to the previous point
    PointSkipped,
    /// Stroke became a shield
    Committed { shield_id: u32 },
    /// Stroke ended without enough points (or the world was full)
    Cancelled,
}

/// A drawn barrier body
#[derive(Debug, Clone, PartialEq)]
pub struct Shield {
    pub id: u32,
    pub handle: RigidBodyHandle,
    pub material: MaterialType,
    pub base_durability: f32,
    pub durability: f32,
    /// Stroke points in body-local space (world space at creation)
    pub points: Vec<Vec2>,
    /// Contact-damage events received
    pub contact_hits: u32,
}

impl Shield {
    fn new(id: u32, handle: RigidBodyHandle, material: MaterialType, points: Vec<Vec2>) -> Self {
        let base_durability = material.profile().durability;
        Self {
            id,
            handle,
            material,
            base_durability,
            durability: base_durability,
            points,
            contact_hits: 0,
        }
    }

    /// Reduce durability. Negative or non-finite amounts are ignored so
    /// durability never goes up.
    pub fn damage(&mut self, amount: f32) {
        if amount.is_finite() && amount > 0.0 {
            self.durability -= amount;
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.durability <= 0.0
    }
}

/// Draw budget, material selection, stroke state machine and live shields
#[derive(Debug, Clone)]
pub struct ShieldDrawingController {
    phase: StrokePhase,
    stroke: Vec<Vec2>,
    initial_budget: u32,
    remaining_draws: u32,
    committed: u32,
    allowed: Vec<MaterialType>,
    selected: MaterialType,
    shields: Vec<Shield>,
    next_id: u32,
}

impl ShieldDrawingController {
    pub fn new(level: &LevelDefinition) -> Self {
        Self {
            phase: StrokePhase::Idle,
            stroke: Vec::new(),
            initial_budget: level.draw_limit,
            remaining_draws: level.draw_limit,
            committed: 0,
            allowed: level.allowed_materials.clone(),
            selected: level.default_material(),
            shields: Vec::new(),
            next_id: 1,
        }
    }

    /// Route a screen-space input event
    pub fn handle(
        &mut self,
        event: &InputEvent,
        screen_size: Vec2,
        world: &mut PhysicsWorld,
    ) -> TouchResponse {
        let point = screen_to_world(Vec2::new(event.x, event.y), screen_size);
        match event.kind {
            TouchKind::Down => self.touch_down(point),
            TouchKind::Drag => self.touch_drag(point),
            TouchKind::Up => self.touch_up(world),
        }
    }

    /// Touch down at a world-space point
    pub fn touch_down(&mut self, point: Vec2) -> TouchResponse {
        if point.y >= WORLD_HEIGHT - HUD_BAND_HEIGHT {
            if let Some(material) = self.material_at(point.x) {
                self.selected = material;
                self.reset_stroke();
                log::debug!("Selected material {}", material.as_str());
                return TouchResponse::MaterialSelected(material);
            }
        }

        if self.remaining_draws == 0 {
            return TouchResponse::Ignored;
        }

        self.stroke.clear();
        self.stroke.push(point);
        self.phase = StrokePhase::Drawing;
        TouchResponse::StrokeStarted
    }

    pub fn touch_drag(&mut self, point: Vec2) -> TouchResponse {
        if self.phase != StrokePhase::Drawing {
            return TouchResponse::Ignored;
        }
        let far_enough = self
            .stroke
            .last()
            .is_none_or(|last| last.distance(point) > MIN_POINT_SPACING);
        if far_enough {
            self.stroke.push(point);
            TouchResponse::PointAdded
        } else {
            TouchResponse::PointSkipped
        }
    }

    /// Finish the stroke; commits a shield when it has at least two points
    pub fn touch_up(&mut self, world: &mut PhysicsWorld) -> TouchResponse {
        if self.phase != StrokePhase::Drawing {
            return TouchResponse::Ignored;
        }
        if self.stroke.len() < 2 || self.remaining_draws == 0 {
            self.reset_stroke();
            return TouchResponse::Cancelled;
        }

        let points = std::mem::take(&mut self.stroke);
        self.phase = StrokePhase::Idle;
        let material = self.selected;

        match world.spawn_shield(&points, material.profile()) {
            Ok(handle) => {
                let id = self.next_id;
                self.next_id += 1;
                self.shields.push(Shield::new(id, handle, material, points));
                self.remaining_draws = self.remaining_draws.saturating_sub(1);
                self.committed += 1;
                log::debug!(
                    "Shield {} committed ({}), {} draws left",
                    id,
                    material.as_str(),
                    self.remaining_draws
                );
                TouchResponse::Committed { shield_id: id }
            }
            Err(e) => {
                log::warn!("Dropping stroke: {e}");
                TouchResponse::Cancelled
            }
        }
    }

    fn reset_stroke(&mut self) {
        self.stroke.clear();
        self.phase = StrokePhase::Idle;
    }

    /// Selector slot under a world-space x coordinate
    fn material_at(&self, x: f32) -> Option<MaterialType> {
        if self.allowed.is_empty() || !(0.0..WORLD_WIDTH).contains(&x) {
            return None;
        }
        let index = (x / WORLD_WIDTH * self.allowed.len() as f32) as usize;
        self.allowed.get(index).copied()
    }

    /// Select a material directly. Only materials the level allows are accepted.
    pub fn select_material(&mut self, material: MaterialType) -> bool {
        if self.allowed.contains(&material) {
            self.selected = material;
            true
        } else {
            false
        }
    }

    /// Time-based erosion of materials that melt on their own
    pub fn erode(&mut self, dt: f32) {
        for shield in &mut self.shields {
            if shield.material.erodes() {
                shield.damage(dt * ICE_EROSION_PER_SEC);
            }
        }
    }

    /// Remove every exhausted shield from the world. Returns how many went.
    pub fn reap(&mut self, world: &mut PhysicsWorld) -> usize {
        let before = self.shields.len();
        self.shields.retain(|shield| {
            if shield.is_exhausted() {
                world.remove_body(shield.handle);
                log::debug!("Shield {} ({}) broke", shield.id, shield.material.as_str());
                false
            } else {
                true
            }
        });
        before - self.shields.len()
    }

    pub fn phase(&self) -> StrokePhase {
        self.phase
    }

    /// Points of the stroke in progress
    pub fn stroke(&self) -> &[Vec2] {
        &self.stroke
    }

    pub fn remaining_draws(&self) -> u32 {
        self.remaining_draws
    }

    pub fn initial_budget(&self) -> u32 {
        self.initial_budget
    }

    /// Shields committed this session, including ones already broken
    pub fn committed(&self) -> u32 {
        self.committed
    }

    pub fn selected(&self) -> MaterialType {
        self.selected
    }

    pub fn allowed(&self) -> &[MaterialType] {
        &self.allowed
    }

    pub fn shields(&self) -> &[Shield] {
        &self.shields
    }

    pub(crate) fn shields_mut(&mut self) -> &mut [Shield] {
        &mut self.shields
    }
}
