//! Physics tuning settings
//!
//! Every gameplay constant of the motion core lives here so a host can load
//! a balance profile from JSON instead of recompiling.

use serde::{Deserialize, Serialize};

/// Tuning values for ball, paddles and collision response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    // === Ball ===
    /// Ball radius as a fraction of `min(width, height)`
    pub ball_radius_ratio: f32,
    /// Base ball speed (px/s) as a fraction of viewport width
    pub base_speed_ratio: f32,
    /// Minimum speed as a fraction of base speed (anti-stall floor)
    pub min_speed_ratio: f32,

    // === Acceleration ===
    /// Speed multiplier at serve
    pub initial_multiplier: f32,
    /// Multiplier gained per bounce
    pub acceleration_rate: f32,
    /// Multiplier ceiling
    pub max_multiplier: f32,

    // === Paddles ===
    /// Paddle width as a fraction of viewport width
    pub paddle_width_ratio: f32,
    /// Paddle height as a fraction of viewport height
    pub paddle_height_ratio: f32,
    /// Gap between screen edge and paddle, fraction of viewport width
    pub paddle_margin_ratio: f32,
    /// Freeze cooldown after top/bottom/corner hits (seconds)
    pub paddle_freeze_secs: f32,

    // === Deflection ===
    /// Size of each deflection zone at the paddle ends (fraction of height)
    pub deflection_zone: f32,
    /// Rotation applied at the very tip of the paddle (radians)
    pub max_deflection: f32,
    /// Largest outgoing angle from the face normal (radians)
    pub max_bounce_angle: f32,
    /// Minimum |dy| of the unit direction after a deflected front-face hit
    pub min_vertical_ratio: f32,

    // === Serve ===
    /// Serve angle spread either side of horizontal (radians)
    pub serve_max_angle: f32,

    // === Numerics ===
    /// Separation left between ball and a surface after correction (px)
    pub contact_epsilon: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            ball_radius_ratio: 0.012,
            base_speed_ratio: 0.5,
            min_speed_ratio: 0.5,

            initial_multiplier: 1.0,
            acceleration_rate: 0.05,
            max_multiplier: 2.0,

            paddle_width_ratio: 0.015,
            paddle_height_ratio: 0.18,
            paddle_margin_ratio: 0.02,
            paddle_freeze_secs: 0.15,

            deflection_zone: 0.35,
            max_deflection: std::f32::consts::FRAC_PI_4,
            max_bounce_angle: 75f32.to_radians(),
            min_vertical_ratio: 0.2,

            serve_max_angle: std::f32::consts::FRAC_PI_6,

            contact_epsilon: 0.01,
        }
    }
}

impl PhysicsSettings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Copy with nonsensical values pulled back into range
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut s = self.clone();

        let positive = |name: &str, value: &mut f32, fallback: f32| {
            if !value.is_finite() || *value <= 0.0 {
                log::warn!("settings: {name}={value} invalid, using {fallback}");
                *value = fallback;
            }
        };
        positive("ball_radius_ratio", &mut s.ball_radius_ratio, defaults.ball_radius_ratio);
        positive("base_speed_ratio", &mut s.base_speed_ratio, defaults.base_speed_ratio);
        positive("initial_multiplier", &mut s.initial_multiplier, defaults.initial_multiplier);
        positive("paddle_width_ratio", &mut s.paddle_width_ratio, defaults.paddle_width_ratio);
        positive("paddle_height_ratio", &mut s.paddle_height_ratio, defaults.paddle_height_ratio);
        positive("contact_epsilon", &mut s.contact_epsilon, defaults.contact_epsilon);

        if !s.max_multiplier.is_finite() || s.max_multiplier < s.initial_multiplier {
            log::warn!(
                "settings: max_multiplier={} below initial {}, clamping",
                s.max_multiplier,
                s.initial_multiplier
            );
            s.max_multiplier = s.initial_multiplier;
        }
        if !s.acceleration_rate.is_finite() || s.acceleration_rate < 0.0 {
            log::warn!("settings: acceleration_rate={} invalid, using 0", s.acceleration_rate);
            s.acceleration_rate = 0.0;
        }

        let finite = |value: &mut f32, fallback: f32| {
            if !value.is_finite() {
                *value = fallback;
            }
        };
        finite(&mut s.min_speed_ratio, defaults.min_speed_ratio);
        finite(&mut s.paddle_margin_ratio, defaults.paddle_margin_ratio);
        finite(&mut s.paddle_freeze_secs, defaults.paddle_freeze_secs);
        finite(&mut s.deflection_zone, defaults.deflection_zone);
        finite(&mut s.max_bounce_angle, defaults.max_bounce_angle);
        finite(&mut s.max_deflection, defaults.max_deflection);
        finite(&mut s.min_vertical_ratio, defaults.min_vertical_ratio);
        finite(&mut s.serve_max_angle, defaults.serve_max_angle);

        s.min_speed_ratio = s.min_speed_ratio.clamp(0.0, s.initial_multiplier);
        s.paddle_margin_ratio = s.paddle_margin_ratio.clamp(0.0, 0.5);
        s.paddle_freeze_secs = s.paddle_freeze_secs.max(0.0);
        s.deflection_zone = s.deflection_zone.clamp(0.0, 0.5);
        s.max_bounce_angle = s.max_bounce_angle.clamp(0.0, 85f32.to_radians());
        s.max_deflection = s.max_deflection.clamp(0.0, s.max_bounce_angle);
        s.min_vertical_ratio = s.min_vertical_ratio.clamp(0.0, s.max_bounce_angle.sin());
        s.serve_max_angle = s.serve_max_angle.clamp(0.0, s.max_bounce_angle);
        s
    }

    /// Minimum speed for a given base speed
    #[inline]
    pub fn min_speed(&self, base_speed: f32) -> f32 {
        base_speed * self.min_speed_ratio
    }

    /// Maximum speed for a given base speed
    #[inline]
    pub fn max_speed(&self, base_speed: f32) -> f32 {
        base_speed * self.max_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let s = PhysicsSettings::from_json(r#"{ "max_multiplier": 3.0 }"#).unwrap();
        assert_eq!(s.max_multiplier, 3.0);
        assert_eq!(s.acceleration_rate, PhysicsSettings::default().acceleration_rate);
    }

    #[test]
    fn test_json_round_trip() {
        let s = PhysicsSettings::default();
        let back = PhysicsSettings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(PhysicsSettings::from_json("{ not json").is_err());
    }

    #[test]
    fn test_sanitized_fixes_degenerate_values() {
        let s = PhysicsSettings {
            ball_radius_ratio: -1.0,
            max_multiplier: 0.5,
            acceleration_rate: f32::NAN,
            deflection_zone: 0.9,
            ..Default::default()
        }
        .sanitized();

        assert!(s.ball_radius_ratio > 0.0);
        assert_eq!(s.max_multiplier, s.initial_multiplier);
        assert_eq!(s.acceleration_rate, 0.0);
        assert_eq!(s.deflection_zone, 0.5);
    }

    #[test]
    fn test_defaults_survive_sanitize() {
        let s = PhysicsSettings::default();
        assert_eq!(s.sanitized(), s);
    }
}
