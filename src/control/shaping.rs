use nalgebra::Vector3;

use crate::config::ControlConfig;
use crate::math::vector::soft_clamp;

// ---------------------------------------------------------------------------
// Output shaping: easing on the leveling axes, speed-scaled yaw
// ---------------------------------------------------------------------------

/// Smallest multiplier applied to a leveling axis; keeps the body homing in.
pub const MIN_EASING: f64 = 0.01;
/// Forward speed at which the yaw modifier reaches 1.0, m/s.
pub const REFERENCE_SPEED: f64 = 30.0;

/// Multiplier for one leveling axis: 1 - |angle|/threshold, held in
/// [MIN_EASING, cap].
pub fn easing_gain(angle_deg: f64, threshold_deg: f64, cap: f64) -> f64 {
    soft_clamp(1.0 - angle_deg.abs() / threshold_deg, MIN_EASING, cap)
}

/// Speed along the reference forward axis (sign dropped), m/s.
pub fn forward_speed(velocity: &Vector3<f64>, forward: &Vector3<f64>) -> f64 {
    velocity.dot(forward).abs()
}

/// Yaw command for a turn-axis input. Zero without input or below the
/// minimum turning speed; otherwise scaled by speed/REFERENCE_SPEED within
/// the configured modifier band.
pub fn yaw_command(turn_axis: f64, forward_speed: f64, config: &ControlConfig) -> f64 {
    if turn_axis == 0.0 || forward_speed <= config.min_turn_speed {
        return 0.0;
    }
    let modifier = soft_clamp(
        forward_speed / REFERENCE_SPEED,
        config.min_yaw_modifier,
        config.max_yaw_modifier,
    );
    turn_axis * config.max_yaw_rate * modifier
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_hits_floor_at_threshold() {
        assert_eq!(easing_gain(20.0, 20.0, 0.15), MIN_EASING);
        assert_eq!(easing_gain(-30.0, 20.0, 0.15), MIN_EASING);
    }

    #[test]
    fn easing_capped_near_center() {
        assert_eq!(easing_gain(1.0, 15.0, 0.15), 0.15);
        assert_eq!(easing_gain(0.0, 15.0, 0.5), 0.5);
    }

    #[test]
    fn easing_ramps_in_between() {
        let g = easing_gain(14.0, 15.0, 0.15);
        assert!((g - (1.0 - 14.0 / 15.0)).abs() < 1e-12);
    }

    #[test]
    fn easing_with_zero_threshold_is_finite() {
        assert_eq!(easing_gain(0.0, 0.0, 0.15), MIN_EASING);
        assert_eq!(easing_gain(3.0, 0.0, 0.15), MIN_EASING);
    }

    #[test]
    fn no_yaw_when_slow_or_idle() {
        let cfg = ControlConfig::default();
        assert_eq!(yaw_command(1.0, 1.0, &cfg), 0.0);
        assert_eq!(yaw_command(1.0, cfg.min_turn_speed, &cfg), 0.0);
        assert_eq!(yaw_command(0.0, 50.0, &cfg), 0.0);
    }

    #[test]
    fn yaw_scales_with_speed_inside_band() {
        let cfg = ControlConfig::default();
        // 15 m/s -> modifier 0.5
        assert!((yaw_command(1.0, 15.0, &cfg) - 0.2 * 0.5).abs() < 1e-12);
        // 3 m/s -> 0.1, floored to 0.2
        assert!((yaw_command(-1.0, 3.0, &cfg) + 0.2 * 0.2).abs() < 1e-12);
        // 90 m/s -> 3.0, capped to 1.0
        assert!((yaw_command(1.0, 90.0, &cfg) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn forward_speed_ignores_direction_and_sideslip() {
        let fwd = Vector3::new(0.0, 0.0, 1.0);
        assert_eq!(forward_speed(&Vector3::new(5.0, 0.0, -12.0), &fwd), 12.0);
    }
}
