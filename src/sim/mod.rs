//! Gameplay simulation module
//!
//! Everything a session does lives here. The module is headless and
//! deterministic:
//! - One physics step per tick, driven by the host's frame delta
//! - No RNG
//! - Stable iteration order (hazards in level order, shields by creation)
//! - No rendering or platform dependencies

pub mod contact;
pub mod drawing;
pub mod hazard;
pub mod material;
pub mod session;
pub mod state;
pub mod world;

pub use contact::{contact_damage, resolve_contacts};
pub use drawing::{Shield, ShieldDrawingController, StrokePhase, TouchResponse};
pub use hazard::{
    HazardBody, HazardDrive, HazardKind, HazardMotion, HazardProfile, HazardShape, update_hazards,
};
pub use material::{MaterialProfile, MaterialType};
pub use session::GameplaySession;
pub use state::{HazardView, InputEvent, SessionPhase, ShieldView, Snapshot, TouchKind};
pub use world::{ContactBegin, PhysicsWorld};
