//! Collision geometry for a circle against axis-aligned rectangles
//!
//! Everything here is a pure function over points, vectors and boxes, so the
//! tricky parts (swept entry time, corner vs. side classification, degenerate
//! normals) can be tested without building a ball or a paddle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::GEOM_EPSILON;

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Rectangle from its top-left corner and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Minkowski sum with a circle, squared off at the corners
    pub fn expand(&self, radius: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(radius),
            max: self.max + Vec2::splat(radius),
        }
    }

    /// Closest point of the rectangle (interior included) to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    /// True when `p` lies inside or on the edge
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Which part of a paddle rectangle a contact touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitFace {
    /// Left or right face (the long, vertical faces of a paddle)
    Face,
    /// Top or bottom end
    Cap,
    /// One of the four corners
    Corner,
}

impl HitFace {
    /// Classify an axis-aligned face normal
    pub fn from_normal(normal: Vec2) -> Self {
        if normal.x.abs() >= normal.y.abs() {
            HitFace::Face
        } else {
            HitFace::Cap
        }
    }
}

/// Earliest entry of a moving point into a rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Fraction of the segment travelled at entry, in [0, 1]
    pub t: f32,
    /// Outward normal of the face that was entered
    pub normal: Vec2,
    /// Entry point
    pub point: Vec2,
}

/// Slab test of the segment `from -> to` against `rect`
///
/// Returns `None` when the segment misses, starts inside the rectangle, or
/// only reaches it beyond `to`.
pub fn sweep_point_rect(from: Vec2, to: Vec2, rect: &Rect) -> Option<SweepHit> {
    let delta = to - from;
    if !from.is_finite() || !delta.is_finite() {
        return None;
    }

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = Vec2::ZERO;

    for axis in 0..2 {
        let p = from[axis];
        let d = delta[axis];
        let (lo, hi) = (rect.min[axis], rect.max[axis]);

        if d.abs() < GEOM_EPSILON {
            // Parallel to this slab: must already be inside it
            if p < lo || p > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t0 = (lo - p) * inv;
        let mut t1 = (hi - p) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        if t0 > t_enter {
            t_enter = t0;
            normal = Vec2::ZERO;
            normal[axis] = -d.signum();
        }
        t_exit = t_exit.min(t1);

        if t_enter > t_exit {
            return None;
        }
    }

    if !(0.0..=1.0).contains(&t_enter) {
        return None;
    }

    Some(SweepHit {
        t: t_enter,
        normal,
        point: from + delta * t_enter,
    })
}

/// Static overlap between a circle and a rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// Closest point of the rectangle to the circle center
    pub closest: Vec2,
    /// Unit normal pointing from the rectangle toward the circle
    pub normal: Vec2,
    /// Distance from `closest` to the circle center
    pub distance: f32,
    pub face: HitFace,
    /// Circle center was inside (or exactly on) the rectangle, so `normal`
    /// is the shallowest way out instead of the contact geometry
    pub degenerate: bool,
}

/// Closest-point test of a circle against `rect`
///
/// `velocity` is only consulted when the center sits inside the rectangle and
/// the contact normal would be zero length.
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect, velocity: Vec2) -> Option<Overlap> {
    circle_rect_overlap_within(center, radius, rect, velocity, None)
}

/// [`circle_rect_overlap`] for a circle whose center must stay inside
/// `bounds`. A center inside `rect` is pushed out through a face that keeps
/// it there, whenever the rectangle has such a face.
pub fn circle_rect_overlap_within(
    center: Vec2,
    radius: f32,
    rect: &Rect,
    velocity: Vec2,
    bounds: Option<&Rect>,
) -> Option<Overlap> {
    let closest = rect.closest_point(center);
    let offset = center - closest;
    let distance = offset.length();

    if !distance.is_finite() || distance > radius {
        return None;
    }

    if distance < GEOM_EPSILON {
        let normal = inside_normal(center, radius, rect, velocity, bounds);
        return Some(Overlap {
            closest,
            normal,
            distance,
            face: HitFace::from_normal(normal),
            degenerate: true,
        });
    }

    let clamped_x = center.x < rect.min.x || center.x > rect.max.x;
    let clamped_y = center.y < rect.min.y || center.y > rect.max.y;
    let normal = offset / distance;
    let face = if clamped_x && clamped_y {
        HitFace::Corner
    } else {
        HitFace::from_normal(normal)
    };

    Some(Overlap {
        closest,
        normal,
        distance,
        face,
        degenerate: false,
    })
}

/// Center position that puts the circle `epsilon` clear of `rect`
pub fn separated_center(center: Vec2, radius: f32, rect: &Rect, overlap: &Overlap, epsilon: f32) -> Vec2 {
    let clearance = radius + epsilon;
    if !overlap.degenerate {
        return overlap.closest + overlap.normal * clearance;
    }

    // Inside the box: slide out through the face the normal points at
    let mut out = center;
    if overlap.normal.x > 0.0 {
        out.x = rect.max.x + clearance;
    } else if overlap.normal.x < 0.0 {
        out.x = rect.min.x - clearance;
    } else if overlap.normal.y > 0.0 {
        out.y = rect.max.y + clearance;
    } else {
        out.y = rect.min.y - clearance;
    }
    out
}

/// Exit normal for a center inside `rect`
///
/// Takes the face with the shallowest penetration. Faces whose separated
/// center would land outside `bounds` are skipped while another face is
/// left. Equal depths go to [`fallback_normal`].
fn inside_normal(center: Vec2, radius: f32, rect: &Rect, velocity: Vec2, bounds: Option<&Rect>) -> Vec2 {
    let preferred = fallback_normal(velocity, center - rect.center());
    let faces = [
        (Vec2::NEG_Y, center.y - rect.min.y, Vec2::new(center.x, rect.min.y - radius)),
        (Vec2::Y, rect.max.y - center.y, Vec2::new(center.x, rect.max.y + radius)),
        (Vec2::NEG_X, center.x - rect.min.x, Vec2::new(rect.min.x - radius, center.y)),
        (Vec2::X, rect.max.x - center.x, Vec2::new(rect.max.x + radius, center.y)),
    ];
    let fits = |exit: Vec2| bounds.is_none_or(|b| b.contains(exit));
    let any_fits = faces.iter().any(|&(_, _, exit)| fits(exit));

    let mut best: Option<(Vec2, f32)> = None;
    for &(normal, depth, exit) in &faces {
        if any_fits && !fits(exit) {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_normal, best_depth)) => {
                depth < best_depth - GEOM_EPSILON
                    || (depth <= best_depth + GEOM_EPSILON && normal.dot(preferred) > best_normal.dot(preferred))
            }
        };
        if better {
            best = Some((normal, depth));
        }
    }
    best.map_or(preferred, |(normal, _)| normal)
}

/// Axis-aligned normal used when geometry gives none
///
/// Opposes the dominant axis of the incoming velocity. A resting ball falls
/// back to the dominant axis of `offset` (rectangle center to ball), and
/// finally straight up.
pub fn fallback_normal(velocity: Vec2, offset: Vec2) -> Vec2 {
    if velocity.length_squared() > GEOM_EPSILON {
        dominant_axis(-velocity)
    } else if offset.length_squared() > GEOM_EPSILON {
        dominant_axis(offset)
    } else {
        Vec2::NEG_Y
    }
}

fn dominant_axis(v: Vec2) -> Vec2 {
    if v.x.abs() >= v.y.abs() {
        Vec2::new(v.x.signum(), 0.0)
    } else {
        Vec2::new(0.0, v.y.signum())
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paddle() -> Rect {
        Rect::new(0.0, 100.0, 20.0, 200.0)
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let reflected = reflect_velocity(Vec2::new(100.0, 30.0), Vec2::new(-1.0, 0.0));
        assert!((reflected.x + 100.0).abs() < 1e-4);
        assert!((reflected.y - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_sweep_hits_front_face() {
        let hit = sweep_point_rect(Vec2::new(50.0, 200.0), Vec2::new(10.0, 200.0), &paddle())
            .expect("segment crosses the right face");
        assert!((hit.t - 0.75).abs() < 1e-5);
        assert_eq!(hit.normal, Vec2::X);
        assert!((hit.point.x - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_sweep_hits_top_cap() {
        let hit = sweep_point_rect(Vec2::new(10.0, 50.0), Vec2::new(10.0, 150.0), &paddle())
            .expect("segment crosses the top");
        assert_eq!(hit.normal, Vec2::NEG_Y);
        assert_eq!(HitFace::from_normal(hit.normal), HitFace::Cap);
    }

    #[test]
    fn test_sweep_catches_tunneling_segment() {
        // Travels many paddle widths in one step, straight through
        let hit = sweep_point_rect(Vec2::new(300.0, 150.0), Vec2::new(-300.0, 150.0), &paddle());
        assert!(hit.is_some());
        assert_eq!(hit.unwrap().normal, Vec2::X);
    }

    #[test]
    fn test_sweep_misses() {
        // Short of the box
        assert!(sweep_point_rect(Vec2::new(60.0, 200.0), Vec2::new(30.0, 200.0), &paddle()).is_none());
        // Parallel, outside the slab
        assert!(sweep_point_rect(Vec2::new(60.0, 50.0), Vec2::new(-60.0, 50.0), &paddle()).is_none());
        // Starts inside
        assert!(sweep_point_rect(Vec2::new(10.0, 200.0), Vec2::new(-30.0, 200.0), &paddle()).is_none());
        // Zero-length
        assert!(sweep_point_rect(Vec2::new(40.0, 200.0), Vec2::new(40.0, 200.0), &paddle()).is_none());
    }

    #[test]
    fn test_overlap_side_and_corner() {
        let rect = paddle();

        let side = circle_rect_overlap(Vec2::new(25.0, 200.0), 8.0, &rect, Vec2::NEG_X).unwrap();
        assert_eq!(side.face, HitFace::Face);
        assert_eq!(side.normal, Vec2::X);

        let corner = circle_rect_overlap(Vec2::new(24.0, 97.0), 8.0, &rect, Vec2::NEG_X).unwrap();
        assert_eq!(corner.face, HitFace::Corner);
        assert!((corner.normal - Vec2::new(0.8, -0.6)).length() < 1e-5);

        assert!(circle_rect_overlap(Vec2::new(40.0, 200.0), 8.0, &rect, Vec2::NEG_X).is_none());
    }

    #[test]
    fn test_overlap_degenerate_tie_uses_velocity_axis() {
        let rect = paddle();
        let o = circle_rect_overlap(Vec2::new(10.0, 200.0), 8.0, &rect, Vec2::new(-5.0, 1.0)).unwrap();
        assert!(o.degenerate);
        assert_eq!(o.normal, Vec2::X);

        let out = separated_center(Vec2::new(10.0, 200.0), 8.0, &rect, &o, 0.01);
        assert!((out.x - 28.01).abs() < 1e-4);
        assert!(circle_rect_overlap(out, 8.0, &rect, Vec2::ZERO).is_none());
    }

    #[test]
    fn test_overlap_degenerate_takes_shallowest_face() {
        // Center 1px inside the front face, falling fast
        let rect = Rect::new(16.0, 0.0, 12.0, 108.0);
        let o = circle_rect_overlap(Vec2::new(27.0, 30.0), 7.2, &rect, Vec2::new(-150.0, 700.0)).unwrap();
        assert!(o.degenerate);
        assert_eq!(o.normal, Vec2::X);
        assert_eq!(o.face, HitFace::Face);
    }

    #[test]
    fn test_overlap_degenerate_stays_within_bounds() {
        // Paddle flush with the top wall; the top cap is the shallowest face
        let rect = Rect::new(16.0, 0.0, 24.0, 108.0);
        let center = Vec2::new(28.0, 8.0);
        let free = circle_rect_overlap(center, 7.2, &rect, Vec2::new(0.0, -300.0)).unwrap();
        assert_eq!(free.normal, Vec2::NEG_Y);

        let bounds = Rect {
            min: Vec2::new(f32::NEG_INFINITY, 7.2),
            max: Vec2::new(f32::INFINITY, 592.8),
        };
        let o = circle_rect_overlap_within(center, 7.2, &rect, Vec2::new(0.0, -300.0), Some(&bounds)).unwrap();
        assert_eq!(o.normal, Vec2::NEG_X);
        let out = separated_center(center, 7.2, &rect, &o, 0.01);
        assert!(bounds.contains(out));
        assert!(circle_rect_overlap(out, 7.2, &rect, Vec2::ZERO).is_none());
    }

    #[test]
    fn test_fallback_normal_never_zero() {
        assert_eq!(fallback_normal(Vec2::new(0.0, 3.0), Vec2::ZERO), Vec2::NEG_Y);
        assert_eq!(fallback_normal(Vec2::ZERO, Vec2::new(-4.0, 1.0)), Vec2::NEG_X);
        assert_eq!(fallback_normal(Vec2::ZERO, Vec2::ZERO), Vec2::NEG_Y);
    }

    #[test]
    fn test_separated_center_clears_corner() {
        let rect = paddle();
        let center = Vec2::new(24.0, 97.0);
        let o = circle_rect_overlap(center, 8.0, &rect, Vec2::NEG_X).unwrap();
        let out = separated_center(center, 8.0, &rect, &o, 0.01);
        assert!(circle_rect_overlap(out, 8.0, &rect, Vec2::ZERO).is_none());
    }
}
