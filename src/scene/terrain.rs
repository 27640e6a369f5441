//! Terrain generation.
//!
//! One Simplex-noise height grid feeds both the ground render mesh and the
//! Rapier heightfield collider, so the wheels always touch what the camera
//! sees.

use bevy::prelude::*;
use bevy::render::mesh::Indices;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::PrimitiveTopology;
use bevy_rapier3d::prelude::*;
use noise::{NoiseFn, Simplex};

/// Terrain dimensions, noise parameters and surface material response.
#[derive(Resource, Clone, Copy, Debug)]
pub struct TerrainConfig {
    /// World-space extent of the square ground plane.
    pub size: f32,
    /// Number of quads along each side.
    pub quads: usize,
    /// Noise input divisor; larger values give gentler slopes.
    pub noise_scale: f64,
    /// Height displacement amplitude.
    pub amplitude: f32,
    pub seed: u32,
    /// High friction so the tires grip.
    pub friction: f32,
    /// Low restitution so landings do not bounce.
    pub restitution: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 300.0,
            quads: 100,
            noise_scale: 30.0,
            amplitude: 1.0,
            seed: 7,
            friction: 0.8,
            restitution: 0.4,
        }
    }
}

/// Sampled height grid of `(quads + 1)^2` vertices centered on the origin.
#[derive(Resource)]
pub struct HeightMap {
    verts: usize,
    step: f32,
    half: f32,
    data: Vec<f32>,
}

impl HeightMap {
    /// Sample the configured noise field over the ground plane.
    pub fn generate(config: &TerrainConfig) -> Self {
        let noise = Simplex::new(config.seed);
        let verts = config.quads + 1;
        let step = config.size / config.quads as f32;
        let half = config.size / 2.0;

        let mut data = Vec::with_capacity(verts * verts);
        for row in 0..verts {
            for col in 0..verts {
                let x = col as f32 * step - half;
                let z = row as f32 * step - half;
                let height = noise.get([
                    f64::from(x) / config.noise_scale,
                    f64::from(z) / config.noise_scale,
                ]) as f32
                    * config.amplitude;
                data.push(height);
            }
        }

        Self {
            verts,
            step,
            half,
            data,
        }
    }

    /// Height at grid coordinates. `col` runs along x, `row` along z.
    fn height(&self, col: usize, row: usize) -> f32 {
        self.data[row * self.verts + col]
    }

    /// Bilinearly interpolated height at a world position, clamped to the
    /// terrain bounds.
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        let last = (self.verts - 1) as f32;
        let fx = ((x + self.half) / self.step).clamp(0.0, last);
        let fz = ((z + self.half) / self.step).clamp(0.0, last);

        let col = fx.floor() as usize;
        let row = fz.floor() as usize;
        let col1 = (col + 1).min(self.verts - 1);
        let row1 = (row + 1).min(self.verts - 1);

        let tx = fx - fx.floor();
        let tz = fz - fz.floor();

        let h00 = self.height(col, row);
        let h10 = self.height(col1, row);
        let h01 = self.height(col, row1);
        let h11 = self.height(col1, row1);

        let h0 = h00 * (1.0 - tx) + h10 * tx;
        let h1 = h01 * (1.0 - tx) + h11 * tx;

        h0 * (1.0 - tz) + h1 * tz
    }

    /// Vertex normal from central height differences. Edges reuse the
    /// nearest interior sample.
    fn normal(&self, col: usize, row: usize) -> [f32; 3] {
        let left = self.height(col.saturating_sub(1), row);
        let right = self.height((col + 1).min(self.verts - 1), row);
        let near = self.height(col, row.saturating_sub(1));
        let far = self.height(col, (row + 1).min(self.verts - 1));

        Vec3::new(left - right, 2.0 * self.step, near - far)
            .normalize()
            .to_array()
    }

    /// Build the ground render mesh: one vertex per grid sample, two
    /// triangles per quad, texture coordinates tiled three times across the
    /// plane.
    pub fn build_mesh(&self) -> Mesh {
        let verts = self.verts;
        let mut positions = Vec::with_capacity(verts * verts);
        let mut normals = Vec::with_capacity(verts * verts);
        let mut uvs = Vec::with_capacity(verts * verts);

        for row in 0..verts {
            for col in 0..verts {
                let x = col as f32 * self.step - self.half;
                let z = row as f32 * self.step - self.half;
                positions.push([x, self.height(col, row), z]);
                normals.push(self.normal(col, row));
                uvs.push([
                    col as f32 / (verts - 1) as f32 * 3.0,
                    row as f32 / (verts - 1) as f32 * 3.0,
                ]);
            }
        }

        let mut indices = Vec::with_capacity((verts - 1) * (verts - 1) * 6);
        for row in 0..verts - 1 {
            for col in 0..verts - 1 {
                let i0 = (row * verts + col) as u32;
                let i1 = i0 + 1;
                let i2 = i0 + verts as u32;
                let i3 = i2 + 1;
                indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
            }
        }

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
        mesh.insert_indices(Indices::U32(indices));
        mesh
    }

    /// Build the matching heightfield collider. Rapier stores heights in
    /// column-major order with rows along z and columns along x.
    pub fn collider(&self) -> Collider {
        let verts = self.verts;
        let mut heights = Vec::with_capacity(verts * verts);
        for col in 0..verts {
            for row in 0..verts {
                heights.push(self.height(col, row));
            }
        }

        let size = self.step * (verts - 1) as f32;
        Collider::heightfield(heights, verts, verts, Vec3::new(size, 1.0, size))
    }
}

/// Spawn the ground as a fixed body.
pub fn setup_terrain(
    mut commands: Commands,
    config: Res<TerrainConfig>,
    heightmap: Res<HeightMap>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.45, 0.40, 0.33),
        perceptual_roughness: 1.0,
        ..default()
    });

    commands.spawn((
        RigidBody::Fixed,
        heightmap.collider(),
        Friction::coefficient(config.friction),
        Restitution::coefficient(config.restitution),
        Mesh3d(meshes.add(heightmap.build_mesh())),
        MeshMaterial3d(material),
        Transform::default(),
    ));

    info!(
        "Terrain ready: {}x{} units, {} quads per side",
        config.size, config.size, config.quads
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> TerrainConfig {
        TerrainConfig {
            size: 40.0,
            quads: 8,
            ..TerrainConfig::default()
        }
    }

    #[test]
    fn sample_matches_grid_at_vertices() {
        let config = test_config();
        let map = HeightMap::generate(&config);
        let step = config.size / config.quads as f32;
        let half = config.size / 2.0;

        for row in 0..=config.quads {
            for col in 0..=config.quads {
                let x = col as f32 * step - half;
                let z = row as f32 * step - half;
                let expected = map.height(col, row);
                assert!((map.sample(x, z) - expected).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn sample_is_bounded_by_amplitude() {
        let config = test_config();
        let map = HeightMap::generate(&config);

        for i in 0..100 {
            let t = i as f32 / 99.0;
            let p = (t - 0.5) * config.size;
            let h = map.sample(p, -p);
            assert!(h.abs() <= config.amplitude + 1e-5);
        }
    }

    #[test]
    fn sample_clamps_outside_the_terrain() {
        let config = test_config();
        let map = HeightMap::generate(&config);
        let half = config.size / 2.0;

        // Far outside either edge, the nearest border height is returned.
        assert_eq!(map.sample(half * 10.0, 0.0), map.sample(half, 0.0));
        assert_eq!(map.sample(0.0, -half * 10.0), map.sample(0.0, -half));
    }

    #[test]
    fn mesh_has_one_vertex_per_grid_sample() {
        let config = test_config();
        let map = HeightMap::generate(&config);
        let mesh = map.build_mesh();

        let verts = config.quads + 1;
        assert_eq!(mesh.count_vertices(), verts * verts);
    }
}
