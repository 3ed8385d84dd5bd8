//! Speed ramp: every bounce makes the rally a little faster

use super::state::Ball;
use crate::settings::PhysicsSettings;

/// One acceleration tick. The only place ball speed goes up.
pub fn accelerate(ball: &mut Ball, settings: &PhysicsSettings) {
    let multiplier = (ball.speed_multiplier + settings.acceleration_rate).min(settings.max_multiplier);
    ball.set_speed_multiplier(multiplier, settings);
    ball.vel = crate::with_speed(ball.vel, ball.current_speed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use glam::Vec2;

    #[test]
    fn test_accelerate_keeps_direction() {
        let settings = PhysicsSettings::default();
        let mut ball = Ball::new(&Viewport::new(800.0, 600.0), &settings);
        ball.vel = Vec2::new(-30.0, 40.0);

        accelerate(&mut ball, &settings);

        let expected = ball.base_speed * (settings.initial_multiplier + settings.acceleration_rate);
        assert!((ball.current_speed - expected).abs() < 1e-3);
        assert!((ball.vel.length() - expected).abs() < 1e-3);
        assert!((ball.vel.normalize() - Vec2::new(-0.6, 0.8)).length() < 1e-5);
    }

    #[test]
    fn test_accelerate_saturates() {
        let settings = PhysicsSettings::default();
        let mut ball = Ball::new(&Viewport::new(800.0, 600.0), &settings);
        ball.vel = Vec2::X;

        for _ in 0..1000 {
            accelerate(&mut ball, &settings);
        }
        assert_eq!(ball.speed_multiplier, settings.max_multiplier);
        assert!((ball.vel.length() - ball.base_speed * settings.max_multiplier).abs() < 1e-2);
    }
}
