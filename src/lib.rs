//! Arcade Sim - actor simulation and collision engine for 2D arcade shooters
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actors, weapons, boundaries, collisions, scene loop)
//! - `settings`: Scene configuration loaded from JSON
//!
//! Two game variants share the engine: an asteroid field that wraps at the
//! world edges, and a bounded arena where actors reflect off the walls.

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError, Variant};

/// Simulation tuning constants shared across variants
pub mod consts {
    /// Default arena world side length
    pub const ARENA_WORLD_SIZE: f32 = 1500.0;
    /// Default asteroid field side length
    pub const ASTEROIDS_WORLD_SIZE: f32 = 800.0;
    /// Fraction of the view kept between the followed player and the world edge
    pub const VIEW_EDGE_FRACTION: f32 = 0.2;

    /// Player velocity damping after bouncing off an arena wall
    pub const PLAYER_WALL_DAMPING: f32 = 0.75;
    /// Velocity damping for everything else reflecting off an arena wall
    pub const REFLECT_DAMPING: f32 = 0.9;

    /// Force value that destroys an actor regardless of health
    pub const INSTANT_KILL: i32 = -1;

    /// Default score multiplier and lives for a fresh game
    pub const START_MULTIPLIER: u32 = 1;
    pub const START_LIVES: u32 = 3;
}

/// Radians per degree. Headings are kept in degrees, velocities rotate in radians.
pub const RAD: f32 = std::f32::consts::PI / 180.0;

/// Convert a heading in degrees to radians
#[inline]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * RAD
}

/// Convert radians to a heading in degrees
#[inline]
pub fn rad_to_deg(radians: f32) -> f32 {
    radians / RAD
}
