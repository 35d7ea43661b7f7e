use std::collections::HashMap;

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use crate::geometry::{MeshPrimitive, Primitive, Scene};
use crate::render::SceneRenderer;
use crate::scene::{LineSet, MaterialCache, ScenePrimitive};

#[derive(Clone, Debug)]
pub struct PrimitiveRenderSettings {
    /// Sphere radius per marker size unit, as a fraction of the scene diagonal.
    pub radius_per_size: f32,
    /// Scenes smaller than this are sized as if their diagonal had this length.
    pub min_scene_extent: f32,
}

impl Default for PrimitiveRenderSettings {
    fn default() -> Self {
        Self {
            radius_per_size: 0.0006,
            min_scene_extent: 1.0,
        }
    }
}

/// Default renderer: spheres for markers, meshes for collision objects,
/// gizmo lines for edges and k-d cells.
#[derive(Default)]
pub struct PrimitiveRenderer {
    pub settings: PrimitiveRenderSettings,
}

/// World-space radius of a marker of `size` in a scene with the given diagonal.
pub fn point_radius(size: f32, diagonal: f32, settings: &PrimitiveRenderSettings) -> f32 {
    size * diagonal.max(settings.min_scene_extent) * settings.radius_per_size
}

/// Triangle mesh with flat normals, so faceted collision geometry reads clearly.
pub fn build_mesh(primitive: &MeshPrimitive) -> Mesh {
    let positions: Vec<[f32; 3]> = primitive.vertices.iter().map(|v| v.to_array()).collect();
    let indices: Vec<u32> = primitive.triangles.iter().flatten().copied().collect();

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_indices(Indices::U32(indices));
    mesh.duplicate_vertices();
    mesh.compute_flat_normals();
    mesh
}

impl SceneRenderer for PrimitiveRenderer {
    fn spawn_scene(
        &self,
        commands: &mut Commands,
        meshes: &mut ResMut<Assets<Mesh>>,
        materials: &mut ResMut<Assets<StandardMaterial>>,
        cache: &mut ResMut<MaterialCache>,
        lines: &mut ResMut<LineSet>,
        scene: &Scene,
        scene_index: usize,
    ) {
        let diagonal = scene
            .bounds()
            .map(|(lo, hi)| (hi - lo).length())
            .unwrap_or(0.0);
        let mut spheres: HashMap<u32, Handle<Mesh>> = HashMap::new();
        let tag = ScenePrimitive { scene: scene_index };

        for primitive in &scene.primitives {
            match primitive {
                Primitive::Point {
                    position,
                    color,
                    size,
                } => {
                    let sphere = spheres
                        .entry(size.to_bits())
                        .or_insert_with(|| {
                            meshes.add(Sphere::new(point_radius(*size, diagonal, &self.settings)))
                        })
                        .clone();
                    commands.spawn((
                        Mesh3d(sphere),
                        MeshMaterial3d(cache.marker(materials, *color)),
                        Transform::from_translation(*position),
                        tag,
                    ));
                }
                Primitive::Line {
                    from,
                    to,
                    color,
                    weight,
                } => lines.push_line(*from, *to, *color, *weight),
                Primitive::WireBox {
                    min,
                    max,
                    color,
                    weight,
                } => lines.push_box(*min, *max, *color, *weight),
                Primitive::Mesh(mesh) => {
                    if mesh.triangles.is_empty() {
                        continue;
                    }
                    commands.spawn((
                        Mesh3d(meshes.add(build_mesh(mesh))),
                        MeshMaterial3d(cache.surface(materials, mesh.color)),
                        Transform {
                            translation: mesh.translation,
                            rotation: mesh.rotation,
                            ..default()
                        },
                        tag,
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::palette;

    #[test]
    fn point_radius_scales_with_scene_and_has_a_floor() {
        let settings = PrimitiveRenderSettings::default();
        let small = point_radius(12.0, 0.01, &settings);
        let large = point_radius(12.0, 100.0, &settings);

        assert!((small - 12.0 * 0.0006).abs() < 1e-6);
        assert!((large - 12.0 * 100.0 * 0.0006).abs() < 1e-4);
    }

    #[test]
    fn mesh_gets_one_vertex_per_triangle_corner() {
        let primitive = MeshPrimitive {
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
            color: palette::LIGHT_GRAY,
        };
        let mesh = build_mesh(&primitive);

        assert_eq!(mesh.count_vertices(), 6);
        assert!(mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_some());
        assert!(mesh.indices().is_none());
    }
}
