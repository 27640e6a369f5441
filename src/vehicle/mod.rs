//! Vehicle construction and the bridge to Rapier's raycast vehicle.
//!
//! The chassis spawns as an ordinary dynamic body. Once Rapier registers it,
//! `attach_vehicle` builds the `DynamicRayCastVehicleController` with four
//! suspended wheels; until then the control loop treats the vehicle as
//! absent. Each tick, after the controller has written wheel commands,
//! `drive_vehicle` runs the suspension raycasts and applies the resulting
//! forces to the chassis ahead of the physics step.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use bevy_rapier3d::rapier::control::{DynamicRayCastVehicleController, WheelTuning};
use bevy_rapier3d::rapier::na::{Point3, Vector3};
use bevy_rapier3d::rapier::prelude::QueryFilter as RapierQueryFilter;

use crate::control::{SteeringController, VehicleActuator, STEERED_AXLES};

/// Geometry and suspension parameters for the demo vehicle.
#[derive(Resource, Clone, Copy, Debug)]
pub struct VehicleConfig {
    /// Chassis collider half extents.
    pub chassis_half_extents: Vec3,
    /// Spawn height above the terrain.
    pub spawn_height: f32,
    /// Wheel connection points in chassis space, indexed front-left,
    /// front-right, rear-left, rear-right.
    pub wheel_positions: [Vec3; 4],
    pub wheel_radius: f32,
    pub suspension_rest_length: f32,
    pub suspension_stiffness: f32,
    pub suspension_compression: f32,
    pub suspension_damping: f32,
    pub max_suspension_travel: f32,
    pub friction_slip: f32,
    pub max_suspension_force: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            chassis_half_extents: Vec3::new(1.3, 0.6, 3.0),
            spawn_height: 5.0,
            wheel_positions: [
                Vec3::new(-1.6, -1.0, 3.3),
                Vec3::new(1.6, -1.0, 3.3),
                Vec3::new(-1.6, -1.0, -3.2),
                Vec3::new(1.6, -1.0, -3.2),
            ],
            wheel_radius: 0.7,
            suspension_rest_length: 0.5,
            suspension_stiffness: 20.88,
            suspension_compression: 5.83,
            suspension_damping: 10.28,
            max_suspension_travel: 300.0,
            friction_slip: 10.5,
            max_suspension_force: 3000.0,
        }
    }
}

/// Marker for the vehicle chassis entity.
#[derive(Component)]
pub struct VehicleChassis;

/// Marker for a wheel visual mesh. The index matches the actuator wheel
/// index.
#[derive(Component)]
pub struct WheelVisual {
    pub index: usize,
}

/// Rapier raycast-vehicle state, attached once the chassis body exists.
#[derive(Component)]
pub struct RaycastVehicle {
    controller: DynamicRayCastVehicleController,
}

impl VehicleActuator for RaycastVehicle {
    fn set_steering(&mut self, angle: f32, axle: usize) {
        if let Some(wheel) = self.controller.wheels_mut().get_mut(axle) {
            wheel.steering = angle;
        }
    }

    fn apply_engine_force(&mut self, force: f32) {
        for wheel in self.controller.wheels_mut() {
            wheel.engine_force = force;
        }
    }

    fn set_brake(&mut self, force: f32, wheel: usize) {
        if let Some(wheel) = self.controller.wheels_mut().get_mut(wheel) {
            wheel.brake = force;
        }
    }
}

/// Plugin managing the vehicle lifecycle.
pub struct VehiclePlugin;

impl Plugin for VehiclePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VehicleConfig>()
            .add_systems(Startup, spawn_vehicle)
            .add_systems(
                FixedUpdate,
                (attach_vehicle, drive_vehicle)
                    .chain()
                    .after(PhysicsSet::SyncBackend)
                    .before(PhysicsSet::StepSimulation),
            )
            .add_systems(Update, sync_wheel_visuals);
    }
}

/// Spawn the chassis body with its wheel meshes.
pub fn spawn_vehicle(
    mut commands: Commands,
    config: Res<VehicleConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let half = config.chassis_half_extents;
    let chassis_mesh = meshes.add(Cuboid::new(half.x * 2.0, half.y * 2.0, half.z * 2.0));
    let chassis_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.75, 0.10, 0.12),
        perceptual_roughness: 0.5,
        ..default()
    });

    let wheel_mesh = meshes.add(Cylinder::new(config.wheel_radius, 0.4));
    let wheel_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.08, 0.08, 0.08),
        perceptual_roughness: 0.9,
        ..default()
    });

    commands
        .spawn((
            VehicleChassis,
            RigidBody::Dynamic,
            Collider::cuboid(half.x, half.y, half.z),
            Velocity::default(),
            Mesh3d(chassis_mesh),
            MeshMaterial3d(chassis_material),
            Transform::from_xyz(0.0, config.spawn_height, 0.0),
        ))
        .with_children(|parent| {
            for (index, position) in config.wheel_positions.into_iter().enumerate() {
                parent.spawn((
                    WheelVisual { index },
                    Mesh3d(wheel_mesh.clone()),
                    MeshMaterial3d(wheel_material.clone()),
                    Transform::from_translation(
                        position - Vec3::Y * config.suspension_rest_length,
                    )
                    .with_rotation(wheel_roll()),
                ));
            }
        });

    info!("Spawned vehicle chassis at height {}", config.spawn_height);
}

/// Build the raycast vehicle once Rapier has created the chassis body.
pub fn attach_vehicle(
    mut commands: Commands,
    config: Res<VehicleConfig>,
    context: ReadDefaultRapierContext,
    pending: Query<Entity, (With<VehicleChassis>, Without<RaycastVehicle>)>,
) {
    let Ok(entity) = pending.get_single() else {
        return;
    };
    let context = context.single();
    let Some(handle) = context.entity2body().get(&entity).copied() else {
        return;
    };

    let tuning = WheelTuning {
        suspension_stiffness: config.suspension_stiffness,
        suspension_compression: config.suspension_compression,
        suspension_damping: config.suspension_damping,
        max_suspension_travel: config.max_suspension_travel,
        friction_slip: config.friction_slip,
        max_suspension_force: config.max_suspension_force,
        ..WheelTuning::default()
    };

    let mut controller = DynamicRayCastVehicleController::new(handle);
    controller.index_up_axis = 1;
    controller.index_forward_axis = 2;
    for position in config.wheel_positions {
        controller.add_wheel(
            Point3::new(position.x, position.y, position.z),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
            config.suspension_rest_length,
            config.wheel_radius,
            &tuning,
        );
    }

    commands.entity(entity).insert(RaycastVehicle { controller });
    info!("Vehicle attached to physics body {:?}", handle);
}

/// Run the suspension raycasts and apply wheel forces to the chassis.
pub fn drive_vehicle(
    time: Res<Time>,
    mut context: WriteDefaultRapierContext,
    mut vehicles: Query<(Entity, &mut RaycastVehicle)>,
) {
    let Ok((entity, mut vehicle)) = vehicles.get_single_mut() else {
        return;
    };
    let context: &mut RapierContext = &mut context;
    let Some(handle) = context.entity2body().get(&entity).copied() else {
        return;
    };

    // The chassis must not catch its own suspension rays.
    let filter = RapierQueryFilter::default().exclude_rigid_body(handle);
    vehicle.controller.update_vehicle(
        time.delta().as_secs_f32(),
        &mut context.bodies,
        &context.colliders,
        &context.query_pipeline,
        filter,
    );
}

/// Yaw the front wheel meshes by the current steering angle.
fn sync_wheel_visuals(
    controller: Res<SteeringController>,
    mut wheels: Query<(&WheelVisual, &mut Transform)>,
) {
    for (wheel, mut transform) in &mut wheels {
        if STEERED_AXLES.contains(&wheel.index) {
            transform.rotation = Quat::from_rotation_y(controller.angle()) * wheel_roll();
        }
    }
}

/// Base rotation aligning a cylinder mesh's axis with the wheel axle.
fn wheel_roll() -> Quat {
    Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)
}
