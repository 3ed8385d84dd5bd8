//! Fixed timestep simulation tick
//!
//! `FrameClock` turns variable frame deltas into a whole number of fixed
//! steps; `step` advances the ball by exactly one of them. Nothing in here
//! reads the wall clock, so the same inputs always give the same bits.

use super::accel::accelerate;
use super::boundary::{check_exit, resolve_walls};
use super::events::PhysicsEvents;
use super::paddle::resolve_paddle;
use super::state::{Ball, Paddle, Side, Viewport};
use crate::consts::{MAX_FRAME_DELTA, MAX_SUBSTEPS, SIM_DT};
use crate::settings::PhysicsSettings;

/// What happened during one fixed step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub wall_hit: bool,
    /// Indexed by `Side::index()`
    pub paddle_hit: [bool; 2],
    pub exited: Option<Side>,
}

impl StepOutcome {
    #[inline]
    pub fn any_paddle_hit(&self) -> bool {
        self.paddle_hit[0] || self.paddle_hit[1]
    }
}

/// Move the ball by `vel * dt` and enforce the speed cap
pub fn integrate(ball: &mut Ball, dt: f32, settings: &PhysicsSettings) {
    ball.prev_pos = ball.pos;
    ball.pos += ball.vel * dt;

    let cap = settings.max_speed(ball.base_speed);
    if ball.vel.length() > cap {
        ball.vel = crate::with_speed(ball.vel, cap);
    }
}

/// Advance the simulation by one fixed step.
///
/// Order: paddle cooldowns, move, top/bottom walls, left paddle, right
/// paddle, one acceleration tick per hit, scoring exits. A destroyed ball
/// stays where it is until the host restarts it.
pub fn step(
    ball: &mut Ball,
    paddles: &mut [Paddle; 2],
    viewport: &Viewport,
    settings: &PhysicsSettings,
    dt: f32,
    events: &mut impl PhysicsEvents,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();

    for paddle in paddles.iter_mut() {
        paddle.tick_freeze(dt);
    }

    if ball.destroyed {
        return outcome;
    }

    integrate(ball, dt, settings);

    let mut hits = 0;
    if let Some(wall) = resolve_walls(ball, viewport, settings) {
        outcome.wall_hit = true;
        hits += 1;
        events.on_wall_hit(wall);
    }

    for paddle in paddles.iter_mut() {
        if let Some(face) = resolve_paddle(ball, paddle, viewport, settings) {
            outcome.paddle_hit[paddle.side.index()] = true;
            hits += 1;
            events.on_paddle_hit(paddle.side, face);
        }
    }

    for _ in 0..hits {
        accelerate(ball, settings);
    }

    if let Some(side) = check_exit(ball, viewport) {
        log::info!("ball exited {:?} at multiplier {:.2}", side, ball.speed_multiplier);
        outcome.exited = Some(side);
        events.on_ball_exit(side);
    }

    outcome
}

/// Fixed-timestep accumulator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    pub fixed_dt: f32,
    /// Step budget per frame (spiral-of-death guard)
    pub max_substeps: u32,
    pub accumulator: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FrameClock {
    pub fn new(fixed_dt: f32, max_substeps: u32) -> Self {
        Self {
            fixed_dt,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    /// Add a frame's delta and return how many fixed steps to run now.
    ///
    /// Backlog still above two steps after the budget is spent is dropped:
    /// a stalled or backgrounded host loses that time instead of replaying it.
    pub fn advance(&mut self, delta: f32) -> u32 {
        let delta = if delta.is_finite() {
            delta.clamp(0.0, MAX_FRAME_DELTA)
        } else {
            0.0
        };
        self.accumulator += delta;

        let mut steps = 0;
        while self.accumulator >= self.fixed_dt && steps < self.max_substeps {
            self.accumulator -= self.fixed_dt;
            steps += 1;
        }

        if self.accumulator > 2.0 * self.fixed_dt {
            log::warn!("dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        steps
    }

    /// Forget accumulated time (pause, countdown, restore)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Fraction of a step left over, for render interpolation
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.fixed_dt
    }
}
