//! Driving control module - keyboard polling and the per-tick control loop.

pub mod actuator;
mod config;
mod input;
mod steering;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

pub use actuator::VehicleActuator;
pub use config::{ControlConfig, STEERED_AXLES, WHEEL_COUNT};
pub use input::{DriverInput, Power, SteerDirection};
pub use steering::SteeringController;

use crate::vehicle::{attach_vehicle, drive_vehicle, RaycastVehicle};

/// Plugin wiring driver input to the vehicle actuator.
pub struct ControlPlugin;

impl Plugin for ControlPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DriverInput>()
            .init_resource::<ControlConfig>()
            .init_resource::<SteeringController>()
            .add_systems(Update, input::read_driver_input)
            .add_systems(
                FixedUpdate,
                steering_tick
                    .after(attach_vehicle)
                    .before(drive_vehicle)
                    .before(PhysicsSet::StepSimulation),
            );
    }
}

/// Advance the controller once per physics tick. A no-op while no vehicle is
/// attached, e.g. during the first ticks before Rapier registers the chassis.
fn steering_tick(
    input: Res<DriverInput>,
    config: Res<ControlConfig>,
    mut controller: ResMut<SteeringController>,
    mut vehicles: Query<&mut RaycastVehicle>,
) {
    let Ok(mut vehicle) = vehicles.get_single_mut() else {
        return;
    };
    controller.tick(*input, &config, &mut *vehicle);
}
