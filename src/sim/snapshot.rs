//! Resolution-independent snapshots
//!
//! Used when the viewport changes mid-rally: capture state as fractions of
//! the old viewport, rebuild it at the new size. Gameplay proportions (where
//! the ball is, how fast relative to the arena) survive the resize exactly.
//! Only call between steps.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Ball, Paddle, Viewport};
use crate::settings::PhysicsSettings;

/// Ball state independent of viewport size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedState {
    /// Position as fractions of viewport width/height
    pub position: Vec2,
    /// Unit direction of travel (zero for a resting ball)
    pub direction: Vec2,
    pub speed_multiplier: f32,
}

/// Paddle state independent of viewport size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleState {
    /// Paddle center as a fraction of viewport height
    pub center_ratio: f32,
}

/// Everything needed to rebuild a rally at another resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub ball: NormalizedState,
    /// `[left, right]`
    pub paddles: [PaddleState; 2],
}

pub fn save(ball: &Ball, viewport: &Viewport) -> NormalizedState {
    NormalizedState {
        position: ball.pos / viewport.size(),
        direction: ball.vel.normalize_or_zero(),
        speed_multiplier: ball.speed_multiplier,
    }
}

/// Rebuild the ball for `viewport`. Radius and base speed come from the new
/// size; destroyed/scoring flags are left as they were.
pub fn restore(ball: &mut Ball, state: &NormalizedState, viewport: &Viewport, settings: &PhysicsSettings) {
    ball.resize(viewport, settings);
    ball.set_speed_multiplier(state.speed_multiplier, settings);
    ball.pos = state.position * viewport.size();
    ball.prev_pos = ball.pos;
    ball.vel = state.direction.normalize_or_zero() * ball.current_speed;
}

pub fn save_paddle(paddle: &Paddle, viewport: &Viewport) -> PaddleState {
    PaddleState {
        center_ratio: paddle.center_y() / viewport.height,
    }
}

/// Resize the paddle for `viewport` and put its center back at the saved ratio
pub fn restore_paddle(paddle: &mut Paddle, state: &PaddleState, viewport: &Viewport, settings: &PhysicsSettings) {
    paddle.resize(viewport, settings);
    paddle.pos.y = state.center_ratio * viewport.height - paddle.height * 0.5;
    paddle.clamp_to(viewport);
}
