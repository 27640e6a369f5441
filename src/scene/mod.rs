//! Scene assembly - gravity, ground, props, lighting and the chase camera.

mod props;
mod terrain;

pub use terrain::{HeightMap, TerrainConfig};

use bevy::pbr::CascadeShadowConfigBuilder;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::vehicle::VehicleChassis;

/// Scene gravity, stronger than Earth's so the heavy-feeling demo vehicle
/// settles quickly.
const GRAVITY: Vec3 = Vec3::new(0.0, -30.0, 0.0);

/// Chase camera offset in chassis space: above and behind the vehicle.
const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 5.0, -35.0);

/// Sun position; the light aims from here toward the origin.
const LIGHT_POSITION: Vec3 = Vec3::new(20.0, 20.0, -15.0);

/// Plugin assembling the static scene.
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        let config = TerrainConfig::default();
        app.insert_resource(HeightMap::generate(&config))
            .insert_resource(config)
            .add_systems(
                Startup,
                (
                    terrain::setup_terrain,
                    props::scatter_boxes,
                    setup_lights,
                    setup_camera,
                ),
            )
            .add_systems(Update, (configure_gravity, follow_vehicle));
    }
}

/// Override the default gravity on every physics context as it appears.
fn configure_gravity(mut configs: Query<&mut RapierConfiguration, Added<RapierConfiguration>>) {
    for mut config in &mut configs {
        config.gravity = GRAVITY;
    }
}

/// One shadow-casting sun. Cascaded shadow maps cover the whole play area,
/// so the light needs no per-frame repositioning to keep the vehicle lit.
fn setup_lights(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: light_consts::lux::OVERCAST_DAY,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(LIGHT_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        CascadeShadowConfigBuilder {
            maximum_distance: 400.0,
            ..default()
        }
        .build(),
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 80.0,
    });
}

/// Narrow-angle chase camera, initially parked at the spawn point.
fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 35.0_f32.to_radians(),
            near: 1.0,
            far: 1000.0,
            ..default()
        }),
        Transform::from_translation(CAMERA_OFFSET).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Keep the camera rigidly behind the chassis, looking at it.
fn follow_vehicle(
    chassis: Query<&Transform, (With<VehicleChassis>, Without<Camera3d>)>,
    mut camera: Query<&mut Transform, With<Camera3d>>,
) {
    let (Ok(chassis), Ok(mut camera)) = (chassis.get_single(), camera.get_single_mut()) else {
        return;
    };

    let target = chassis.translation;
    camera.translation = target + chassis.rotation * CAMERA_OFFSET;
    camera.look_at(target, Vec3::Y);
}
