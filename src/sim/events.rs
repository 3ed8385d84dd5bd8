//! Notifications from the physics core to the host game
//!
//! Called synchronously from inside a step, at the moment the contact is
//! resolved. Implementors only receive plain values, never the ball or
//! paddles, so nothing outside can observe a half-finished step.

use serde::{Deserialize, Serialize};

use super::boundary::Wall;
use super::collision::HitFace;
use super::state::Side;

/// Event sink. Every method defaults to a no-op.
pub trait PhysicsEvents {
    fn on_wall_hit(&mut self, _wall: Wall) {}

    fn on_paddle_hit(&mut self, _side: Side, _face: HitFace) {}

    /// Ball left the arena through `side`; the other player scores
    fn on_ball_exit(&mut self, _side: Side) {}
}

/// Discards everything
impl PhysicsEvents for () {}

/// A recorded notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhysicsEvent {
    WallHit(Wall),
    PaddleHit { side: Side, face: HitFace },
    BallExit(Side),
}

/// Records events in order, handy for tests and replays
impl PhysicsEvents for Vec<PhysicsEvent> {
    fn on_wall_hit(&mut self, wall: Wall) {
        self.push(PhysicsEvent::WallHit(wall));
    }

    fn on_paddle_hit(&mut self, side: Side, face: HitFace) {
        self.push(PhysicsEvent::PaddleHit { side, face });
    }

    fn on_ball_exit(&mut self, side: Side) {
        self.push(PhysicsEvent::BallExit(side));
    }
}
