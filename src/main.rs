//! Offroad Driving Demo - Main Entry
//!
//! A drivable vehicle on procedural terrain, simulated with Rapier's
//! raycast-vehicle physics. Arrow keys or WASD to drive.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use offroad::control::ControlPlugin;
use offroad::scene::ScenePlugin;
use offroad::vehicle::{VehicleChassis, VehiclePlugin};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Offroad Driving Demo".into(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
        .insert_resource(TimestepMode::Fixed {
            dt: 1.0 / 60.0,
            substeps: 1,
        })
        .insert_resource(Time::<Fixed>::from_hz(60.0))
        .add_plugins(ScenePlugin)
        .add_plugins(VehiclePlugin)
        .add_plugins(ControlPlugin)
        .insert_resource(FrameCounter(0))
        .add_systems(Update, log_frame)
        .run();
}

/// Frame counter for logging
#[derive(Resource)]
struct FrameCounter(u32);

/// Log the vehicle speed every N frames
fn log_frame(mut counter: ResMut<FrameCounter>, chassis: Query<&Velocity, With<VehicleChassis>>) {
    counter.0 += 1;
    if counter.0 % 120 == 0 {
        if let Ok(velocity) = chassis.get_single() {
            info!(
                "Frame {}: vehicle speed {:.1} m/s",
                counter.0,
                velocity.linvel.length()
            );
        }
    }
}
