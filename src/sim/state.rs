//! Session-facing value types
//!
//! Input events flow in from the host; snapshots flow out to the
//! presentation layer once per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::hazard::HazardKind;
use super::material::MaterialType;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Survival clock still running
    Active,
    /// Survival target reached (stage clear). Physics keeps running.
    Safe,
}

/// Touch gesture stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchKind {
    Down,
    Drag,
    Up,
}

/// A touch event in screen pixels (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub kind: TouchKind,
    pub x: f32,
    pub y: f32,
}

impl InputEvent {
    pub fn down(x: f32, y: f32) -> Self {
        Self {
            kind: TouchKind::Down,
            x,
            y,
        }
    }

    pub fn drag(x: f32, y: f32) -> Self {
        Self {
            kind: TouchKind::Drag,
            x,
            y,
        }
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self {
            kind: TouchKind::Up,
            x,
            y,
        }
    }
}

/// Hazard as seen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardView {
    pub kind: HazardKind,
    pub position: Vec2,
}

/// Shield as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShieldView {
    pub id: u32,
    pub material: MaterialType,
    pub durability: f32,
    /// World-space polyline
    pub vertices: Vec<Vec2>,
}

/// Read-only view of one tick's result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    /// Whole seconds survived
    pub elapsed_seconds: u32,
    /// Whole seconds still to survive (0 once safe)
    pub seconds_left: u32,
    pub remaining_draws: u32,
    pub selected_material: MaterialType,
    pub allowed_materials: Vec<MaterialType>,
    pub safe: bool,
    pub in_danger: bool,
    /// Time spent in the safe state, for the stage-clear celebration
    pub celebrate_seconds: f32,
    pub mascot: Vec2,
    pub hazards: Vec<HazardView>,
    pub shields: Vec<ShieldView>,
    /// Stroke currently being drawn
    pub stroke_preview: Vec<Vec2>,
}
