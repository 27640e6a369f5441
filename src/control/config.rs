//! Driving control configuration.
//!
//! All tunable control constants live here rather than scattered across
//! systems. To change the driving feel, edit `Default` and run `cargo test`
//! to verify the regression suite still passes.

use bevy::prelude::*;

/// Number of independently braked wheels.
pub const WHEEL_COUNT: usize = 4;

/// Steerable axle indices (front-left, front-right).
pub const STEERED_AXLES: [usize; 2] = [0, 1];

/// Tunable parameters for the per-tick driving control loop.
#[derive(Resource, Clone, Copy, Debug)]
pub struct ControlConfig {
    /// Steering change per tick while a direction key is held (radians).
    pub steer_rate: f32,
    /// Steering decay per tick while no direction key is held (radians).
    pub steer_return_rate: f32,
    /// Hard saturation bound for the steering angle (radians).
    pub max_steer_angle: f32,
    /// Engine force applied to the wheels while accelerating.
    pub engine_force: f32,
    /// Brake force per wheel index while the brake is held.
    pub brake_forces: [f32; WHEEL_COUNT],
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            steer_rate: 1.0 / 50.0,
            steer_return_rate: 0.016,
            max_steer_angle: 0.6,
            engine_force: 500.0,
            brake_forces: [20.0, 40.0, 40.0, 20.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_steering_rates_are_sane() {
        let config = ControlConfig::default();
        assert!(config.steer_rate > 0.0, "Steer rate must be positive");
        assert!(
            config.steer_return_rate > 0.0,
            "Return rate must be positive or steering never re-centers"
        );
        // Release must not snap harder than active steering ramps.
        assert!(config.steer_return_rate <= config.steer_rate);
    }

    #[test]
    fn default_max_angle_below_wheel_lock() {
        let config = ControlConfig::default();
        assert!(config.max_steer_angle > 0.0);
        assert!(
            config.max_steer_angle < std::f32::consts::FRAC_PI_2,
            "Max steer angle {} would fold the wheels sideways",
            config.max_steer_angle
        );
    }

    #[test]
    fn default_forces_are_non_negative() {
        let config = ControlConfig::default();
        assert!(config.engine_force > 0.0);
        for (wheel, force) in config.brake_forces.iter().enumerate() {
            assert!(*force >= 0.0, "Wheel {} has negative brake force", wheel);
        }
    }
}
