//! Renderer traits and default implementations.

mod primitives;

use bevy::prelude::*;

use crate::geometry::Scene;
use crate::scene::{LineSet, MaterialCache};

pub use primitives::{build_mesh, point_radius, PrimitiveRenderSettings, PrimitiveRenderer};

/// Turns a derived [`Scene`] into entities and gizmo lines.
pub trait SceneRenderer: Send + Sync + 'static {
    fn setup(&self, _app: &mut App) {}
    #[allow(clippy::too_many_arguments)]
    fn spawn_scene(
        &self,
        commands: &mut Commands,
        meshes: &mut ResMut<Assets<Mesh>>,
        materials: &mut ResMut<Assets<StandardMaterial>>,
        cache: &mut ResMut<MaterialCache>,
        lines: &mut ResMut<LineSet>,
        scene: &Scene,
        scene_index: usize,
    );
}

#[derive(Resource)]
pub struct RendererResource(pub Box<dyn SceneRenderer>);

impl RendererResource {
    pub fn new(renderer: impl SceneRenderer) -> Self {
        Self(Box::new(renderer))
    }
}
