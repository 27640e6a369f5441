//! Actuator interface between the control loop and the physics vehicle.

/// Commands accepted by a vehicle with steerable axles, one engine and
/// independently braked wheels.
///
/// The control loop only ever talks to this trait. The production
/// implementation forwards to the Rapier raycast vehicle; tests substitute a
/// recording mock. Implementations ignore out-of-range axle and wheel
/// indices rather than reporting them.
pub trait VehicleActuator {
    /// Set the steering angle (radians) of one steerable wheel.
    fn set_steering(&mut self, angle: f32, axle: usize);

    /// Apply the engine force to the drive wheels.
    fn apply_engine_force(&mut self, force: f32);

    /// Set the brake force on one wheel.
    fn set_brake(&mut self, force: f32, wheel: usize);
}
