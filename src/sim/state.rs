//! Simulation state: viewport, ball, paddles and the owning match scene
//!
//! `Match` is the only long-lived owner. Resolvers borrow the ball and
//! paddles for the length of one fixed step.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::events::PhysicsEvents;
use super::snapshot::{self, MatchSnapshot};
use super::tick::{FrameClock, StepOutcome, step};
use crate::settings::PhysicsSettings;

/// Smallest accepted viewport side (px)
const MIN_VIEWPORT_SIDE: f32 = 1.0;

/// Current phase of gameplay, driven by the host's pause/countdown logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay, physics runs
    Playing,
    /// Game is paused
    Paused,
    /// Countdown before play (re)starts
    Countdown,
}

/// Arena side, used for paddles and scoring exits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Index into `[left, right]` arrays
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Sign of x when moving toward this side
    #[inline]
    pub fn direction_x(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Drawable area the arena is mapped onto
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        let side = |v: f32| if v.is_finite() { v.max(MIN_VIEWPORT_SIDE) } else { MIN_VIEWPORT_SIDE };
        Self {
            width: side(width),
            height: side(height),
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    #[inline]
    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Velocity in px/s
    pub vel: Vec2,
    pub radius: f32,
    /// Speed at multiplier 1.0, derived from viewport width
    pub base_speed: f32,
    pub speed_multiplier: f32,
    /// Always `base_speed * speed_multiplier`
    pub current_speed: f32,
    /// Position at the start of the current step (sweep origin)
    pub prev_pos: Vec2,
    pub destroyed: bool,
    /// Which side the ball left through; only meaningful once destroyed
    pub hit_left_border: bool,
}

impl Ball {
    /// Stationary ball at the arena center
    pub fn new(viewport: &Viewport, settings: &PhysicsSettings) -> Self {
        let mut ball = Self {
            pos: viewport.center(),
            vel: Vec2::ZERO,
            radius: 0.0,
            base_speed: 0.0,
            speed_multiplier: settings.initial_multiplier,
            current_speed: 0.0,
            prev_pos: viewport.center(),
            destroyed: false,
            hit_left_border: false,
        };
        ball.resize(viewport, settings);
        ball
    }

    /// Recompute radius and base speed from the viewport
    pub fn resize(&mut self, viewport: &Viewport, settings: &PhysicsSettings) {
        self.radius = viewport.min_side() * settings.ball_radius_ratio;
        self.base_speed = viewport.width * settings.base_speed_ratio;
        self.current_speed = self.base_speed * self.speed_multiplier;
    }

    /// Set the multiplier (clamped to its bounds) and the derived speed.
    /// Velocity is left alone.
    pub fn set_speed_multiplier(&mut self, multiplier: f32, settings: &PhysicsSettings) {
        self.speed_multiplier = multiplier.clamp(settings.initial_multiplier, settings.max_multiplier);
        self.current_speed = self.base_speed * self.speed_multiplier;
    }

    /// Re-center after a point: zero velocity, flags cleared, speed reset
    pub fn restart(&mut self, viewport: &Viewport, settings: &PhysicsSettings) {
        self.pos = viewport.center();
        self.prev_pos = self.pos;
        self.vel = Vec2::ZERO;
        self.destroyed = false;
        self.hit_left_border = false;
        self.set_speed_multiplier(settings.initial_multiplier, settings);
    }

    /// Start moving along `direction` at the current speed
    pub fn launch(&mut self, direction: Vec2) {
        self.vel = crate::with_speed(direction, self.current_speed);
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// True when the ball scored by leaving through the left edge
    #[inline]
    pub fn is_hit_left_border(&self) -> bool {
        self.hit_left_border
    }
}

/// A player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Seconds left during which external movement is ignored
    pub freeze_timer: f32,
}

impl Paddle {
    /// Paddle sized for the viewport, vertically centered
    pub fn new(side: Side, viewport: &Viewport, settings: &PhysicsSettings) -> Self {
        let mut paddle = Self {
            side,
            pos: Vec2::ZERO,
            width: 0.0,
            height: 0.0,
            freeze_timer: 0.0,
        };
        paddle.resize(viewport, settings);
        paddle.pos.y = (viewport.height - paddle.height) * 0.5;
        paddle
    }

    /// Recompute size and x from the viewport, keeping y inside the arena
    pub fn resize(&mut self, viewport: &Viewport, settings: &PhysicsSettings) {
        self.width = viewport.width * settings.paddle_width_ratio;
        self.height = viewport.height * settings.paddle_height_ratio;
        let margin = viewport.width * settings.paddle_margin_ratio;
        self.pos.x = match self.side {
            Side::Left => margin,
            Side::Right => viewport.width - margin - self.width,
        };
        self.clamp_to(viewport);
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.pos.y + self.height * 0.5
    }

    /// Keep the paddle within `[0, viewport_height - height]`
    pub fn clamp_to(&mut self, viewport: &Viewport) {
        let max_y = (viewport.height - self.height).max(0.0);
        self.pos.y = self.pos.y.clamp(0.0, max_y);
    }

    /// Input/AI move to a new top y. Returns false while frozen.
    pub fn move_to(&mut self, y: f32, viewport: &Viewport) -> bool {
        if self.is_frozen() || !y.is_finite() {
            return false;
        }
        self.pos.y = y;
        self.clamp_to(viewport);
        true
    }

    /// Input/AI relative move. Returns false while frozen.
    pub fn move_by(&mut self, dy: f32, viewport: &Viewport) -> bool {
        self.move_to(self.pos.y + dy, viewport)
    }

    /// Start (or extend) the freeze cooldown
    pub fn freeze(&mut self, secs: f32) {
        self.freeze_timer = self.freeze_timer.max(secs);
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.freeze_timer > 0.0
    }

    pub fn tick_freeze(&mut self, dt: f32) {
        if self.freeze_timer > 0.0 {
            self.freeze_timer = (self.freeze_timer - dt).max(0.0);
        }
    }
}

/// Summary of every fixed step run during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    pub steps: u32,
    pub wall_hits: u32,
    pub paddle_hit: [bool; 2],
    pub exited: Option<Side>,
}

impl FrameReport {
    fn absorb(&mut self, outcome: StepOutcome) {
        self.steps += 1;
        if outcome.wall_hit {
            self.wall_hits += 1;
        }
        self.paddle_hit[0] |= outcome.paddle_hit[0];
        self.paddle_hit[1] |= outcome.paddle_hit[1];
        if outcome.exited.is_some() {
            self.exited = outcome.exited;
        }
    }
}

/// One match: owns the ball, both paddles and the frame clock
#[derive(Debug, Clone)]
pub struct Match {
    pub settings: PhysicsSettings,
    pub viewport: Viewport,
    pub phase: GamePhase,
    pub ball: Ball,
    /// `[left, right]`
    pub paddles: [Paddle; 2],
    pub clock: FrameClock,
    /// Run seed for reproducible serves
    pub seed: u64,
    rng: Pcg32,
}

impl Match {
    /// New match in countdown with the ball resting at center
    pub fn new(seed: u64, viewport: Viewport, settings: PhysicsSettings) -> Self {
        let settings = settings.sanitized();
        let ball = Ball::new(&viewport, &settings);
        let paddles = [
            Paddle::new(Side::Left, &viewport, &settings),
            Paddle::new(Side::Right, &viewport, &settings),
        ];
        log::info!(
            "match created: seed={} viewport={}x{}",
            seed,
            viewport.width,
            viewport.height
        );
        Self {
            settings,
            viewport,
            phase: GamePhase::Countdown,
            ball,
            paddles,
            clock: FrameClock::default(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn paddle(&self, side: Side) -> &Paddle {
        &self.paddles[side.index()]
    }

    #[inline]
    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        &mut self.paddles[side.index()]
    }

    /// Switch phase; leaving `Playing` discards any accumulated time
    pub fn set_phase(&mut self, phase: GamePhase) {
        if phase != GamePhase::Playing {
            self.clock.reset();
        }
        self.phase = phase;
    }

    /// Re-center the ball after a point
    pub fn restart_ball(&mut self) {
        self.ball.restart(&self.viewport, &self.settings);
    }

    /// Launch the resting ball toward `toward` at a random angle
    pub fn serve(&mut self, toward: Side) {
        let spread = self.settings.serve_max_angle;
        let angle = self.rng.random_range(-spread..=spread);
        let direction = Vec2::new(toward.direction_x() * angle.cos(), angle.sin());
        self.ball.launch(direction);
        log::info!("serve toward {:?} at {:.1}°", toward, angle.to_degrees());
    }

    /// Feed one rendered frame's delta time (seconds). Physics only runs
    /// while `Playing`.
    pub fn frame(&mut self, delta: f32, events: &mut impl PhysicsEvents) -> FrameReport {
        let mut report = FrameReport::default();
        if self.phase != GamePhase::Playing {
            return report;
        }

        let steps = self.clock.advance(delta);
        let dt = self.clock.fixed_dt;
        for _ in 0..steps {
            let outcome = step(
                &mut self.ball,
                &mut self.paddles,
                &self.viewport,
                &self.settings,
                dt,
                events,
            );
            report.absorb(outcome);
        }
        report
    }

    /// Resolution-independent snapshot of ball and paddles
    pub fn save_state(&self) -> MatchSnapshot {
        MatchSnapshot {
            ball: snapshot::save(&self.ball, &self.viewport),
            paddles: [
                snapshot::save_paddle(&self.paddles[0], &self.viewport),
                snapshot::save_paddle(&self.paddles[1], &self.viewport),
            ],
        }
    }

    /// Rebuild absolute state from a snapshot for `viewport`. Accumulated
    /// frame time is discarded.
    pub fn restore_state(&mut self, saved: &MatchSnapshot, viewport: Viewport) {
        self.clock.reset();
        self.viewport = viewport;
        snapshot::restore(&mut self.ball, &saved.ball, &self.viewport, &self.settings);
        for (paddle, state) in self.paddles.iter_mut().zip(saved.paddles.iter()) {
            snapshot::restore_paddle(paddle, state, &self.viewport, &self.settings);
        }
    }

    /// Viewport changed: snapshot at the old size, restore at the new one
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        let saved = self.save_state();
        log::info!(
            "resize {}x{} -> {}x{}",
            self.viewport.width,
            self.viewport.height,
            viewport.width,
            viewport.height
        );
        self.restore_state(&saved, viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> PhysicsSettings {
        PhysicsSettings::default()
    }

    #[test]
    fn test_ball_derives_size_from_viewport() {
        let s = settings();
        let vp = Viewport::new(800.0, 600.0);
        let ball = Ball::new(&vp, &s);
        assert!((ball.radius - 600.0 * s.ball_radius_ratio).abs() < 1e-5);
        assert!((ball.base_speed - 800.0 * s.base_speed_ratio).abs() < 1e-4);
        assert_eq!(ball.current_speed, ball.base_speed * s.initial_multiplier);
        assert_eq!(ball.pos, Vec2::new(400.0, 300.0));
        assert_eq!(ball.vel, Vec2::ZERO);
    }

    #[test]
    fn test_restart_clears_flags_and_speed() {
        let s = settings();
        let vp = Viewport::new(800.0, 600.0);
        let mut ball = Ball::new(&vp, &s);
        ball.pos = Vec2::new(-5.0, 20.0);
        ball.vel = Vec2::new(-300.0, 10.0);
        ball.destroyed = true;
        ball.hit_left_border = true;
        ball.set_speed_multiplier(1.7, &s);

        ball.restart(&vp, &s);
        assert_eq!(ball.pos, vp.center());
        assert_eq!(ball.vel, Vec2::ZERO);
        assert!(!ball.is_destroyed());
        assert!(!ball.is_hit_left_border());
        assert_eq!(ball.speed_multiplier, s.initial_multiplier);
    }

    #[test]
    fn test_multiplier_is_bounded() {
        let s = settings();
        let mut ball = Ball::new(&Viewport::new(800.0, 600.0), &s);
        ball.set_speed_multiplier(99.0, &s);
        assert_eq!(ball.speed_multiplier, s.max_multiplier);
        ball.set_speed_multiplier(0.1, &s);
        assert_eq!(ball.speed_multiplier, s.initial_multiplier);
    }

    #[test]
    fn test_paddle_layout() {
        let s = settings();
        let vp = Viewport::new(1000.0, 500.0);
        let left = Paddle::new(Side::Left, &vp, &s);
        let right = Paddle::new(Side::Right, &vp, &s);

        assert!((left.pos.x - 20.0).abs() < 1e-4);
        assert!((right.pos.x + right.width - 980.0).abs() < 1e-3);
        assert!((left.center_y() - 250.0).abs() < 1e-3);
    }

    #[test]
    fn test_paddle_clamped_to_arena() {
        let s = settings();
        let vp = Viewport::new(800.0, 600.0);
        let mut paddle = Paddle::new(Side::Left, &vp, &s);

        assert!(paddle.move_to(-50.0, &vp));
        assert_eq!(paddle.pos.y, 0.0);
        assert!(paddle.move_by(10_000.0, &vp));
        assert_eq!(paddle.pos.y, 600.0 - paddle.height);
    }

    #[test]
    fn test_frozen_paddle_ignores_input() {
        let s = settings();
        let vp = Viewport::new(800.0, 600.0);
        let mut paddle = Paddle::new(Side::Right, &vp, &s);
        let y = paddle.pos.y;

        paddle.freeze(0.1);
        assert!(!paddle.move_by(40.0, &vp));
        assert_eq!(paddle.pos.y, y);

        paddle.tick_freeze(0.05);
        assert!(paddle.is_frozen());
        paddle.tick_freeze(0.06);
        assert!(!paddle.is_frozen());
        assert!(paddle.move_by(40.0, &vp));
    }

    #[test]
    fn test_degenerate_viewport_is_clamped() {
        let vp = Viewport::new(0.0, f32::NAN);
        assert_eq!(vp.width, MIN_VIEWPORT_SIDE);
        assert_eq!(vp.height, MIN_VIEWPORT_SIDE);
    }

    #[test]
    fn test_serve_speed_and_direction() {
        let mut game = Match::new(7, Viewport::new(800.0, 600.0), settings());
        game.serve(Side::Left);

        let v = game.ball.velocity();
        assert!(v.x < 0.0);
        assert!((v.length() - game.ball.current_speed).abs() < 1e-2);
        let angle = (v.y / v.length()).asin().abs();
        assert!(angle <= game.settings.serve_max_angle + 1e-4);
    }

    #[test]
    fn test_physics_only_runs_while_playing() {
        let mut game = Match::new(1, Viewport::new(800.0, 600.0), settings());
        game.serve(Side::Right);
        let start = game.ball.pos;

        let report = game.frame(0.1, &mut ());
        assert_eq!(report.steps, 0);
        assert_eq!(game.ball.pos, start);

        game.set_phase(GamePhase::Playing);
        let report = game.frame(0.1, &mut ());
        assert!(report.steps > 0);
        assert!(game.ball.pos.x > start.x);
    }

    #[test]
    fn test_same_seed_replays_identically() {
        let run = || {
            let mut game = Match::new(4242, Viewport::new(960.0, 540.0), settings());
            game.set_phase(GamePhase::Playing);
            game.serve(Side::Left);
            let deltas = [0.016, 0.017, 0.033, 0.008, 0.016, 0.05];
            for i in 0..600 {
                let delta = deltas[i % deltas.len()];
                let report = game.frame(delta, &mut ());
                if let Some(side) = report.exited {
                    game.restart_ball();
                    game.serve(side.opponent());
                }
                let target = game.ball.pos.y - game.paddles[0].height * 0.5;
                let vp = game.viewport;
                game.paddles[0].move_to(target, &vp);
            }
            (game.ball.pos, game.ball.vel, game.ball.speed_multiplier)
        };

        let (pos_a, vel_a, mult_a) = run();
        let (pos_b, vel_b, mult_b) = run();
        assert_eq!(pos_a.x.to_bits(), pos_b.x.to_bits());
        assert_eq!(pos_a.y.to_bits(), pos_b.y.to_bits());
        assert_eq!(vel_a.x.to_bits(), vel_b.x.to_bits());
        assert_eq!(vel_a.y.to_bits(), vel_b.y.to_bits());
        assert_eq!(mult_a.to_bits(), mult_b.to_bits());
    }

    #[test]
    fn test_restore_discards_accumulated_time() {
        let mut game = Match::new(11, Viewport::new(800.0, 600.0), settings());
        game.set_phase(GamePhase::Playing);
        game.serve(Side::Right);
        game.frame(0.012, &mut ());
        assert!(game.clock.accumulator > 0.0);

        let saved = game.save_state();
        game.restore_state(&saved, Viewport::new(1024.0, 768.0));
        assert_eq!(game.clock.accumulator, 0.0);
    }

    #[test]
    fn test_resize_keeps_proportions() {
        let mut game = Match::new(3, Viewport::new(800.0, 600.0), settings());
        game.serve(Side::Right);
        game.ball.pos = Vec2::new(200.0, 150.0);
        game.ball.set_speed_multiplier(1.5, &game.settings);
        game.ball.launch(Vec2::new(3.0, 4.0));
        let vp = game.viewport;
        game.paddles[1].move_to(100.0, &vp);
        let paddle_ratio = game.paddles[1].center_y() / 600.0;

        game.resize(Viewport::new(1600.0, 900.0));

        assert!((game.ball.pos - Vec2::new(400.0, 225.0)).length() < 1e-3);
        assert!((game.ball.vel.normalize() - Vec2::new(0.6, 0.8)).length() < 1e-4);
        assert!((game.ball.current_speed - 1600.0 * game.settings.base_speed_ratio * 1.5).abs() < 1e-2);
        assert!((game.ball.vel.length() - game.ball.current_speed).abs() < 1e-2);
        assert!((game.paddles[1].center_y() / 900.0 - paddle_ratio).abs() < 1e-5);
        assert!((game.ball.radius - 900.0 * game.settings.ball_radius_ratio).abs() < 1e-4);
    }
}
