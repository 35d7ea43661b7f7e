//! Scene ingestion: setup_scene, ingest_scenes, SceneRegistry.

use bevy::prelude::*;

use crate::camera::OrbitCamera;
use crate::data::SceneChannel;
use crate::geometry::{DumpSummary, PrimitiveCounts};
use crate::render::RendererResource;
use crate::scene::{LineSet, MaterialCache};

const MAX_SCENES_PER_FRAME: usize = 1;

/// Tags every entity spawned for a scene with the scene's registry index.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScenePrimitive {
    pub scene: usize,
}

/// Entry in the scene registry, shown by the HUD.
pub struct SceneEntry {
    pub label: String,
    pub summaries: Vec<DumpSummary>,
    pub counts: PrimitiveCounts,
}

/// Registry of ingested scenes.
#[derive(Resource, Default)]
pub struct SceneRegistry {
    pub entries: Vec<SceneEntry>,
}

impl SceneRegistry {
    pub fn total_primitives(&self) -> usize {
        self.entries.iter().map(|e| e.counts.total()).sum()
    }
}

/// Union of the bounds of every ingested scene; the camera frames this.
#[derive(Resource, Default, Debug, PartialEq)]
pub struct SceneBounds(pub Option<(Vec3, Vec3)>);

impl SceneBounds {
    pub fn include(&mut self, (lo, hi): (Vec3, Vec3)) {
        self.0 = Some(match self.0 {
            Some((a, b)) => (a.min(lo), b.max(hi)),
            None => (lo, hi),
        });
    }
}

pub fn setup_scene(mut commands: Commands) {
    commands.insert_resource(SceneRegistry::default());
    commands.insert_resource(SceneBounds::default());
    commands.insert_resource(MaterialCache::default());
    let camera = OrbitCamera::default();
    commands.spawn((Camera3d::default(), camera.transform(), camera));
    commands.spawn((
        DirectionalLight::default(),
        Transform::from_xyz(4., 8., 4.).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
    });
}

#[allow(clippy::too_many_arguments)]
pub fn ingest_scenes(
    mut commands: Commands,
    channel: Res<SceneChannel>,
    renderer: Res<RendererResource>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut cache: ResMut<MaterialCache>,
    mut lines: ResMut<LineSet>,
    mut registry: ResMut<SceneRegistry>,
    mut bounds: ResMut<SceneBounds>,
) {
    let mut received = 0usize;
    while received < MAX_SCENES_PER_FRAME {
        match channel.0.try_recv() {
            Ok(scene) => {
                let index = registry.entries.len();
                renderer.0.spawn_scene(
                    &mut commands,
                    &mut meshes,
                    &mut materials,
                    &mut cache,
                    &mut lines,
                    &scene,
                    index,
                );

                let counts = scene.counts();
                if let Some(extent) = scene.bounds() {
                    bounds.include(extent);
                }
                info!(
                    "scene {:?}: {} primitives ({} points, {} lines, {} boxes, {} meshes)",
                    scene.label,
                    counts.total(),
                    counts.points,
                    counts.lines,
                    counts.boxes,
                    counts.meshes
                );
                registry.entries.push(SceneEntry {
                    label: scene.label,
                    summaries: scene.summaries,
                    counts,
                });
                received += 1;
            }
            Err(_) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{palette, LineWeight, Primitive, Scene};
    use crate::render::PrimitiveRenderer;

    #[test]
    fn setup_scene_inserts_resources_and_entities() {
        let mut app = App::new();
        app.add_systems(Startup, setup_scene);

        app.update();

        assert!(app.world().get_resource::<SceneRegistry>().is_some());
        assert!(app.world().get_resource::<SceneBounds>().is_some());
        assert!(app.world().get_resource::<MaterialCache>().is_some());

        let world = app.world_mut();
        let camera_count = world.query::<&OrbitCamera>().iter(world).count();
        let light_count = world.query::<&DirectionalLight>().iter(world).count();

        assert_eq!(camera_count, 1);
        assert!(light_count >= 1);
    }

    fn scene() -> Scene {
        Scene {
            label: "test".to_string(),
            primitives: vec![
                Primitive::point(Vec3::ZERO, palette::BLUE, 12.0),
                Primitive::point(Vec3::X, palette::BLUE, 12.0),
                Primitive::line(Vec3::ZERO, Vec3::X, palette::BLACK, LineWeight::Thin),
                Primitive::WireBox {
                    min: Vec3::ZERO,
                    max: Vec3::ONE,
                    color: palette::RED,
                    weight: LineWeight::Heavy,
                },
            ],
            summaries: Vec::new(),
        }
    }

    #[test]
    fn ingest_spawns_markers_and_collects_lines() {
        let (tx, rx) = crossbeam_channel::bounded(4);
        tx.send(scene()).unwrap();
        tx.send(scene()).unwrap();

        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .init_resource::<MaterialCache>()
            .init_resource::<LineSet>()
            .init_resource::<SceneRegistry>()
            .init_resource::<SceneBounds>()
            .insert_resource(SceneChannel(rx))
            .insert_resource(RendererResource::new(PrimitiveRenderer::default()))
            .add_systems(Update, ingest_scenes);

        app.update();

        let registry = app.world().resource::<SceneRegistry>();
        assert_eq!(registry.entries.len(), 1);
        assert_eq!(registry.entries[0].counts.points, 2);
        assert_eq!(registry.total_primitives(), 4);
        assert_eq!(app.world().resource::<LineSet>().len(), 13);
        assert_eq!(app.world().resource::<MaterialCache>().len(), 1);
        assert_eq!(
            app.world().resource::<SceneBounds>().0,
            Some((Vec3::ZERO, Vec3::ONE))
        );

        let world = app.world_mut();
        let spawned = world.query::<&ScenePrimitive>().iter(world).count();
        assert_eq!(spawned, 2);

        // One scene per frame.
        app.update();
        let registry = app.world().resource::<SceneRegistry>();
        assert_eq!(registry.entries.len(), 2);
        assert_eq!(registry.entries[1].counts.boxes, 1);
    }
}
