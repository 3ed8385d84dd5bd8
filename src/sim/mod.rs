//! Deterministic simulation module
//!
//! All motion and collision logic lives here. This module must be pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable resolution order (walls, left paddle, right paddle)
//! - No rendering or platform dependencies

pub mod accel;
pub mod boundary;
pub mod collision;
pub mod events;
pub mod paddle;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use accel::accelerate;
pub use boundary::{BoundaryHit, Wall, check_exit, enforce_min_speed, resolve_boundaries, resolve_walls};
pub use collision::{HitFace, Rect, reflect_velocity, sweep_point_rect};
pub use events::{PhysicsEvent, PhysicsEvents};
pub use paddle::{deflect, deflection_norm, relative_hit, resolve_paddle};
pub use snapshot::{MatchSnapshot, NormalizedState, PaddleState};
pub use state::{Ball, FrameReport, GamePhase, Match, Paddle, Side, Viewport};
pub use tick::{FrameClock, StepOutcome, integrate, step};
