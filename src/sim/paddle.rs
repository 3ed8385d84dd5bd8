//! Ball vs. paddle collision response
//!
//! Two phases per paddle per step:
//!
//! 1. Continuous: sweep the ball center from its previous to its current
//!    position against the paddle grown by the ball radius. Catches fast
//!    balls that would otherwise pass straight through.
//! 2. Discrete: if the sweep found nothing, test the final position with a
//!    closest-point check. Catches spawn overlap, rounding drift, and balls
//!    that were already touching when the step began.
//!
//! Front-face hits get the deflection model. Cap (top/bottom) and corner
//! hits freeze the paddle briefly so input can't drive it back into the ball.

use glam::Vec2;

use super::boundary::enforce_min_speed;
use super::collision::{
    HitFace, Rect, circle_rect_overlap_within, reflect_velocity, separated_center, sweep_point_rect,
};
use super::state::{Ball, Paddle, Viewport};
use crate::consts::GEOM_EPSILON;
use crate::rotate;
use crate::settings::PhysicsSettings;

/// Resolve contact between the ball and one paddle.
///
/// Returns the part of the paddle that was hit, or `None` when the ball did
/// not bounce. Either way the ball ends up outside the paddle, and a ball
/// pushed out of the paddle is never pushed past the top or bottom wall
/// when another way out exists.
pub fn resolve_paddle(
    ball: &mut Ball,
    paddle: &mut Paddle,
    viewport: &Viewport,
    settings: &PhysicsSettings,
) -> Option<HitFace> {
    let rect = paddle.rect();
    if let Some(face) = sweep_phase(ball, paddle, &rect, settings) {
        return Some(face);
    }
    discrete_phase(ball, paddle, &rect, viewport, settings)
}

fn sweep_phase(ball: &mut Ball, paddle: &mut Paddle, rect: &Rect, settings: &PhysicsSettings) -> Option<HitFace> {
    let expanded = rect.expand(ball.radius);
    let hit = sweep_point_rect(ball.prev_pos, ball.pos, &expanded)?;
    if ball.vel.dot(hit.normal) >= 0.0 {
        return None;
    }

    let face = HitFace::from_normal(hit.normal);
    ball.pos = hit.point + hit.normal * settings.contact_epsilon;
    ball.prev_pos = ball.pos;
    ball.vel = reflect_velocity(ball.vel, hit.normal);
    apply_face_response(ball, paddle, face, hit.normal, settings);

    log::debug!(
        "{:?} paddle swept {:?} hit at t={:.3}",
        paddle.side,
        face,
        hit.t
    );
    Some(face)
}

fn discrete_phase(
    ball: &mut Ball,
    paddle: &mut Paddle,
    rect: &Rect,
    viewport: &Viewport,
    settings: &PhysicsSettings,
) -> Option<HitFace> {
    // Centers the walls allow, less the separation slop; scoring edges are open
    let slop = ball.radius + settings.contact_epsilon;
    let bounds = Rect {
        min: Vec2::new(f32::NEG_INFINITY, slop),
        max: Vec2::new(f32::INFINITY, viewport.height - slop),
    };
    let overlap = circle_rect_overlap_within(ball.pos, ball.radius, rect, ball.vel, Some(&bounds))?;

    ball.pos = separated_center(ball.pos, ball.radius, rect, &overlap, settings.contact_epsilon);
    ball.prev_pos = ball.pos;

    // Already moving away: separation only, no bounce
    if ball.vel.dot(overlap.normal) >= 0.0 {
        return None;
    }

    ball.vel = reflect_velocity(ball.vel, overlap.normal);
    apply_face_response(ball, paddle, overlap.face, overlap.normal, settings);

    log::debug!(
        "{:?} paddle overlap {:?} hit (degenerate={})",
        paddle.side,
        overlap.face,
        overlap.degenerate
    );
    Some(overlap.face)
}

/// Post-reflection policy shared by both phases
fn apply_face_response(ball: &mut Ball, paddle: &mut Paddle, face: HitFace, normal: Vec2, settings: &PhysicsSettings) {
    match face {
        HitFace::Face => {
            let def_norm = relative_hit(ball.pos.y, paddle)
                .map(|rel| deflection_norm(rel, settings.deflection_zone))
                .unwrap_or(0.0);
            ball.vel = deflect(ball.vel, normal, def_norm, settings);
        }
        HitFace::Cap | HitFace::Corner => paddle.freeze(settings.paddle_freeze_secs),
    }
    enforce_min_speed(ball, settings);
}

/// Where along the paddle the ball struck: 0 = top, 1 = bottom.
/// `None` for a paddle with no height.
pub fn relative_hit(y: f32, paddle: &Paddle) -> Option<f32> {
    if paddle.height <= GEOM_EPSILON {
        return None;
    }
    Some(((y - paddle.pos.y) / paddle.height).clamp(0.0, 1.0))
}

/// Map a relative hit to a normalized deflection in [-1, 1].
///
/// The middle `[zone, 1 - zone]` is a dead zone; outside it the value ramps
/// linearly to -1 at the top tip and +1 at the bottom tip.
pub fn deflection_norm(rel_hit: f32, zone: f32) -> f32 {
    if zone <= GEOM_EPSILON {
        return 0.0;
    }
    if rel_hit < zone {
        -(zone - rel_hit) / zone
    } else if rel_hit > 1.0 - zone {
        (rel_hit - (1.0 - zone)) / zone
    } else {
        0.0
    }
}

/// Rotate a reflected velocity by the deflection for a face with `normal`.
///
/// Negative `def_norm` steers up the screen, positive steers down, whichever
/// way the face points. The result stays within `max_bounce_angle` of the
/// normal, keeps at least `min_vertical_ratio` of vertical direction, and
/// keeps its speed. A zero deflection returns `velocity` untouched.
pub fn deflect(velocity: Vec2, normal: Vec2, def_norm: f32, settings: &PhysicsSettings) -> Vec2 {
    let speed = velocity.length();
    if def_norm == 0.0 || speed < GEOM_EPSILON {
        return velocity;
    }

    // +angle turns +x toward +y, so mirror it for faces pointing left
    let angle = def_norm * settings.max_deflection * normal.x.signum();
    let dir = rotate(velocity / speed, angle);
    let dir = clamp_to_cone(dir, normal, settings.max_bounce_angle);
    let dir = enforce_min_vertical(dir, def_norm, settings.min_vertical_ratio);
    dir * speed
}

/// Limit the angle between `dir` and `normal` to `max_angle`
fn clamp_to_cone(dir: Vec2, normal: Vec2, max_angle: f32) -> Vec2 {
    let tangent = normal.perp();
    let angle = dir.dot(tangent).atan2(dir.dot(normal));
    if angle.abs() <= max_angle {
        return dir;
    }
    let clamped = angle.clamp(-max_angle, max_angle);
    normal * clamped.cos() + tangent * clamped.sin()
}

/// Keep a deflected direction from going near-horizontal
fn enforce_min_vertical(dir: Vec2, def_norm: f32, min_ratio: f32) -> Vec2 {
    if dir.y.abs() >= min_ratio {
        return dir;
    }
    let sign_y = if dir.y != 0.0 { dir.y.signum() } else { def_norm.signum() };
    Vec2::new(dir.x.signum() * (1.0 - min_ratio * min_ratio).sqrt(), sign_y * min_ratio)
}
