//! Arena boundaries
//!
//! Top and bottom reflect. Left and right are scoring zones: crossing one
//! marks the ball destroyed and leaves the velocity alone.

use serde::{Deserialize, Serialize};

use super::state::{Ball, Side, Viewport};
use crate::consts::GEOM_EPSILON;
use crate::settings::PhysicsSettings;

/// Reflecting wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Top,
    Bottom,
}

/// Everything a full boundary pass found
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundaryHit {
    pub wall: Option<Wall>,
    pub exit: Option<Side>,
}

/// Walls, then the anti-stall floor, then the scoring edges
pub fn resolve_boundaries(ball: &mut Ball, viewport: &Viewport, settings: &PhysicsSettings) -> BoundaryHit {
    let wall = resolve_walls(ball, viewport, settings);
    let exit = check_exit(ball, viewport);
    BoundaryHit { wall, exit }
}

/// Clamp the ball inside the top/bottom walls and turn it away from them.
///
/// Reports a hit only when the ball was moving into the wall, so a ball that
/// is already leaving is not accelerated twice.
pub fn resolve_walls(ball: &mut Ball, viewport: &Viewport, settings: &PhysicsSettings) -> Option<Wall> {
    let r = ball.radius;
    let eps = settings.contact_epsilon;

    let wall = if ball.pos.y - r < 0.0 {
        let approaching = ball.vel.y < 0.0;
        ball.pos.y = r + eps;
        ball.vel.y = ball.vel.y.abs();
        approaching.then_some(Wall::Top)
    } else if ball.pos.y + r > viewport.height {
        let approaching = ball.vel.y > 0.0;
        ball.pos.y = viewport.height - r - eps;
        ball.vel.y = -ball.vel.y.abs();
        approaching.then_some(Wall::Bottom)
    } else {
        None
    };

    enforce_min_speed(ball, settings);
    wall
}

/// Mark the ball destroyed once its edge is past the left or right side
pub fn check_exit(ball: &mut Ball, viewport: &Viewport) -> Option<Side> {
    let side = if ball.pos.x - ball.radius < 0.0 {
        Side::Left
    } else if ball.pos.x + ball.radius > viewport.width {
        Side::Right
    } else {
        return None;
    };

    ball.destroyed = true;
    ball.hit_left_border = side == Side::Left;
    Some(side)
}

/// Lift a crawling ball back up to the minimum speed. A resting ball
/// (zero velocity) stays at rest.
pub fn enforce_min_speed(ball: &mut Ball, settings: &PhysicsSettings) {
    let speed = ball.vel.length();
    let min = settings.min_speed(ball.base_speed);
    if speed > GEOM_EPSILON && speed < min {
        ball.vel *= min / speed;
    }
}
