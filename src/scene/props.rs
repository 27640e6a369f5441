//! Scattered boxes for the vehicle to plow through.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use super::terrain::HeightMap;

// ==================== SCATTER CONFIG ====================
/// Number of boxes dropped into the scene.
pub const BOX_COUNT: usize = 50;
/// Box edge length range.
const BOX_SIZE_MIN: f32 = 0.5;
const BOX_SIZE_MAX: f32 = 2.5;
/// Scatter area on both axes (a cluster off to one side of the spawn).
const SCATTER_MIN: f32 = -50.0;
const SCATTER_MAX: f32 = -25.0;
/// Drop height above the local terrain surface.
const DROP_CLEARANCE: f32 = 5.0;
/// Low friction, high restitution - the boxes skid and tumble when hit.
const BOX_FRICTION: f32 = 0.4;
const BOX_RESTITUTION: f32 = 0.6;
// ========================================================

/// Drop randomly sized dynamic boxes over the scatter area.
pub fn scatter_boxes(
    mut commands: Commands,
    heightmap: Res<HeightMap>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut rng = rand::thread_rng();
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.71, 0.58, 0.39),
        perceptual_roughness: 0.8,
        ..default()
    });

    for _ in 0..BOX_COUNT {
        let size = rng.gen_range(BOX_SIZE_MIN..BOX_SIZE_MAX);
        let x = rng.gen_range(SCATTER_MIN..SCATTER_MAX);
        let z = rng.gen_range(SCATTER_MIN..SCATTER_MAX);
        let y = heightmap.sample(x, z) + DROP_CLEARANCE;

        commands.spawn((
            RigidBody::Dynamic,
            Collider::cuboid(size / 2.0, size / 2.0, size / 2.0),
            Friction::coefficient(BOX_FRICTION),
            Restitution::coefficient(BOX_RESTITUTION),
            Mesh3d(meshes.add(Cuboid::new(size, size, size))),
            MeshMaterial3d(material.clone()),
            Transform::from_xyz(x, y, z),
        ));
    }

    info!("Scattered {BOX_COUNT} boxes");
}
