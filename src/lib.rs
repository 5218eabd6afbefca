//! Cozy Protect - draw shields to keep the mascot safe
//!
//! Core modules:
//! - `sim`: Gameplay simulation (physics world, shields, hazards, session loop)
//! - `level`: Level data contract supplied by the host
//! - `settings`: Host configuration (screen size, frame clamp, capacity)
//! - `error`: Error types for session construction and level loading

pub mod error;
pub mod level;
pub mod settings;
pub mod sim;

pub use error::{LevelError, SessionError, WorldError};
pub use level::{HazardDefinition, LevelDefinition, LevelPack, PackProgress, load_level, parse_level};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// World dimensions in world units (not pixels)
    pub const WORLD_WIDTH: f32 = 10.0;
    pub const WORLD_HEIGHT: f32 = 16.0;

    /// Constant downward gravity (units/s²)
    pub const GRAVITY_Y: f32 = -9.8;

    /// Height of the ground line
    pub const GROUND_Y: f32 = 1.0;
    /// Thickness of the ground slab below the ground line
    pub const GROUND_THICKNESS: f32 = 1.0;

    /// Solver iterations per step
    pub const VELOCITY_ITERATIONS: usize = 6;
    pub const POSITION_ITERATIONS: usize = 2;

    /// Mascot body
    pub const MASCOT_RADIUS: f32 = 0.5;
    pub const MASCOT_DENSITY: f32 = 1.0;
    pub const MASCOT_FRICTION: f32 = 0.6;
    pub const MASCOT_RESTITUTION: f32 = 0.2;
    /// Spawn used when level data carries no usable position
    pub const DEFAULT_MASCOT_X: f32 = 4.0;
    pub const DEFAULT_MASCOT_Y: f32 = 3.0;

    /// Any hazard closer than this to the mascot makes it worried
    pub const DANGER_RADIUS: f32 = 2.2;

    /// Minimum spacing between recorded stroke points
    pub const MIN_POINT_SPACING: f32 = 0.2;
    /// Half thickness of a drawn shield edge
    pub const SHIELD_HALF_THICKNESS: f32 = 0.075;

    /// Height of the material-selector strip at the top of the screen
    pub const HUD_BAND_HEIGHT: f32 = 1.2;

    /// Ice melts slowly on its own (durability per second)
    pub const ICE_EROSION_PER_SEC: f32 = 0.02;
    /// Durability lost by an ice shield each time hot soup touches it
    pub const HOT_SOUP_CONTACT_DAMAGE: f32 = 0.4;

    /// Hazard drives (applied once per tick)
    pub const BEE_FORCE: f32 = 0.4;
    pub const WIND_STEP: f32 = 0.01;
    pub const SOUP_RISE_STEP: f32 = 0.002;
}

/// Map a screen-space pixel position to world space.
///
/// Screen y grows downward, world y grows upward.
#[inline]
pub fn screen_to_world(screen: Vec2, screen_size: Vec2) -> Vec2 {
    if screen_size.x <= 0.0 || screen_size.y <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        screen.x / screen_size.x * consts::WORLD_WIDTH,
        (screen_size.y - screen.y) / screen_size.y * consts::WORLD_HEIGHT,
    )
}
