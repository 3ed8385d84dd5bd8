//! Duel Pong - motion and collision core for a two-paddle ball game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integration, walls, paddles, snapshots)
//! - `settings`: Data-driven physics tuning

pub mod settings;
pub mod sim;

pub use settings::PhysicsSettings;

use glam::Vec2;

/// Simulation timing constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted from the host (seconds)
    pub const MAX_FRAME_DELTA: f32 = 0.25;
    /// Threshold below which a vector is treated as zero length
    pub const GEOM_EPSILON: f32 = 1e-6;
}

/// Rescale `v` to `speed`, keeping its direction. Zero vectors stay zero.
#[inline]
pub fn with_speed(v: Vec2, speed: f32) -> Vec2 {
    v.normalize_or_zero() * speed
}

/// Rotate `v` by `angle` radians, turning +x toward +y
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}
