//! Shared materials for markers and collision meshes, one per colour.

use std::collections::HashMap;

use bevy::color::ColorToPacked;
use bevy::prelude::*;

#[derive(Resource, Default)]
pub struct MaterialCache {
    markers: HashMap<[u8; 4], Handle<StandardMaterial>>,
    surfaces: HashMap<[u8; 4], Handle<StandardMaterial>>,
}

fn key(color: Color) -> [u8; 4] {
    color.to_srgba().to_u8_array()
}

impl MaterialCache {
    /// Unlit, so marker colours stay exact regardless of lighting.
    pub fn marker(
        &mut self,
        materials: &mut ResMut<Assets<StandardMaterial>>,
        color: Color,
    ) -> Handle<StandardMaterial> {
        self.markers
            .entry(key(color))
            .or_insert_with(|| {
                materials.add(StandardMaterial {
                    base_color: color,
                    unlit: true,
                    ..default()
                })
            })
            .clone()
    }

    /// Lit and double sided; planner meshes have no consistent winding.
    pub fn surface(
        &mut self,
        materials: &mut ResMut<Assets<StandardMaterial>>,
        color: Color,
    ) -> Handle<StandardMaterial> {
        self.surfaces
            .entry(key(color))
            .or_insert_with(|| {
                materials.add(StandardMaterial {
                    base_color: color,
                    perceptual_roughness: 0.8,
                    double_sided: true,
                    cull_mode: None,
                    ..default()
                })
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.markers.len() + self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::palette;

    fn cache_system(
        mut cache: ResMut<MaterialCache>,
        mut materials: ResMut<Assets<StandardMaterial>>,
    ) {
        let a = cache.marker(&mut materials, palette::RED);
        let b = cache.marker(&mut materials, palette::RED);
        assert_eq!(a, b);
        cache.marker(&mut materials, palette::BLUE);
        cache.surface(&mut materials, palette::RED);
    }

    #[test]
    fn materials_are_shared_per_colour_and_kind() {
        let mut app = App::new();
        app.init_resource::<Assets<StandardMaterial>>()
            .init_resource::<MaterialCache>()
            .add_systems(Update, cache_system);

        app.update();

        assert_eq!(app.world().resource::<MaterialCache>().len(), 3);
        assert_eq!(app.world().resource::<Assets<StandardMaterial>>().len(), 3);
    }
}
