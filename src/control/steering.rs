//! The per-tick steering and throttle control loop.
//!
//! The steering angle is a continuous variable under bounded-rate control:
//! a held direction key acts as a velocity command toward the saturation
//! bound, and releasing both keys eases the angle back toward zero without
//! ever crossing it. Throttle/brake is a direct three-way selector with no
//! transition logic of its own.

use bevy::prelude::*;

use crate::control::actuator::VehicleActuator;
use crate::control::config::{ControlConfig, STEERED_AXLES, WHEEL_COUNT};
use crate::control::input::{DriverInput, Power, SteerDirection};

/// Controller state advanced exactly once per physics tick.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct SteeringController {
    /// Current steering angle in radians. Always within
    /// `[-max_steer_angle, max_steer_angle]`.
    angle: f32,
    /// Whether brake forces from an earlier tick are still held by the
    /// actuator. Brake state persists in the physics engine until cleared.
    brakes_engaged: bool,
}

impl SteeringController {
    /// Current steering angle in radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Advance one simulation tick and issue actuator commands.
    ///
    /// Per tick this issues one steering call per steerable axle, one engine
    /// force call, and up to `WHEEL_COUNT` brake calls. Engine and brake
    /// forces are never non-zero on the same tick.
    pub fn tick(
        &mut self,
        input: DriverInput,
        config: &ControlConfig,
        actuator: &mut dyn VehicleActuator,
    ) {
        let max = config.max_steer_angle;
        self.angle = match input.direction {
            SteerDirection::Left => (self.angle - config.steer_rate).clamp(-max, max),
            SteerDirection::Right => (self.angle + config.steer_rate).clamp(-max, max),
            SteerDirection::Center => {
                // Ease back toward straight, clamped per sign so the decay
                // step lands on exactly zero instead of oscillating past it.
                if self.angle > 0.0 {
                    (self.angle - config.steer_return_rate).clamp(0.0, max)
                } else {
                    (self.angle + config.steer_return_rate).clamp(-max, 0.0)
                }
            }
        };

        for axle in STEERED_AXLES {
            actuator.set_steering(self.angle, axle);
        }

        match input.power {
            Power::Accelerate => {
                actuator.apply_engine_force(config.engine_force);
                self.release_brakes(actuator);
            }
            Power::Brake => {
                actuator.apply_engine_force(0.0);
                for (wheel, force) in config.brake_forces.into_iter().enumerate() {
                    actuator.set_brake(force, wheel);
                }
                self.brakes_engaged = true;
            }
            Power::Idle => {
                actuator.apply_engine_force(0.0);
                self.release_brakes(actuator);
            }
        }
    }

    /// Clear held brake forces, if any. Skipped entirely when no brake was
    /// applied, so a plain accelerate tick issues no brake calls at all.
    fn release_brakes(&mut self, actuator: &mut dyn VehicleActuator) {
        if self.brakes_engaged {
            for wheel in 0..WHEEL_COUNT {
                actuator.set_brake(0.0, wheel);
            }
            self.brakes_engaged = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Actuator that discards every command.
    struct NullActuator;

    impl VehicleActuator for NullActuator {
        fn set_steering(&mut self, _angle: f32, _axle: usize) {}
        fn apply_engine_force(&mut self, _force: f32) {}
        fn set_brake(&mut self, _force: f32, _wheel: usize) {}
    }

    fn held(direction: SteerDirection) -> DriverInput {
        DriverInput {
            power: Power::Idle,
            direction,
        }
    }

    #[test]
    fn left_ramps_monotonically_to_the_bound() {
        let config = ControlConfig::default();
        let mut controller = SteeringController::default();

        let mut previous = controller.angle();
        for _ in 0..60 {
            controller.tick(held(SteerDirection::Left), &config, &mut NullActuator);
            assert!(controller.angle() <= previous, "Angle moved away from the bound");
            assert!(controller.angle() >= -config.max_steer_angle);
            previous = controller.angle();
        }
        assert_eq!(controller.angle(), -config.max_steer_angle);
    }

    #[test]
    fn right_ramps_monotonically_to_the_bound() {
        let config = ControlConfig::default();
        let mut controller = SteeringController::default();

        let mut previous = controller.angle();
        for _ in 0..60 {
            controller.tick(held(SteerDirection::Right), &config, &mut NullActuator);
            assert!(controller.angle() >= previous);
            assert!(controller.angle() <= config.max_steer_angle);
            previous = controller.angle();
        }
        assert_eq!(controller.angle(), config.max_steer_angle);
    }

    #[test]
    fn saturated_angle_is_unchanged_by_further_ticks() {
        let config = ControlConfig::default();
        let mut controller = SteeringController::default();

        for _ in 0..60 {
            controller.tick(held(SteerDirection::Left), &config, &mut NullActuator);
        }
        let saturated = controller.angle();
        for _ in 0..10 {
            controller.tick(held(SteerDirection::Left), &config, &mut NullActuator);
            assert_eq!(controller.angle(), saturated);
        }
    }

    #[test]
    fn release_decays_to_exactly_zero_and_stays() {
        let config = ControlConfig::default();

        for direction in [SteerDirection::Left, SteerDirection::Right] {
            let mut controller = SteeringController::default();
            for _ in 0..60 {
                controller.tick(held(direction), &config, &mut NullActuator);
            }

            let mut previous = controller.angle().abs();
            for _ in 0..100 {
                controller.tick(held(SteerDirection::Center), &config, &mut NullActuator);
                let magnitude = controller.angle().abs();
                assert!(magnitude <= previous, "Decay overshot zero");
                previous = magnitude;
            }
            assert_eq!(controller.angle(), 0.0);

            // Further release ticks must not disturb the centered wheel.
            controller.tick(held(SteerDirection::Center), &config, &mut NullActuator);
            assert_eq!(controller.angle(), 0.0);
        }
    }

    #[test]
    fn partial_decay_never_flips_sign() {
        let config = ControlConfig::default();
        let mut controller = SteeringController::default();

        // One tick of input leaves 0.02 rad; the first release tick leaves a
        // remainder smaller than the return step, and the second must clamp
        // at zero instead of crossing it.
        controller.tick(held(SteerDirection::Right), &config, &mut NullActuator);
        controller.tick(held(SteerDirection::Center), &config, &mut NullActuator);
        assert!(controller.angle() > 0.0);
        assert!(controller.angle() < config.steer_return_rate);
        controller.tick(held(SteerDirection::Center), &config, &mut NullActuator);
        assert_eq!(controller.angle(), 0.0);
    }
}
