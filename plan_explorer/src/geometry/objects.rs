use bevy::math::Quat;

use super::{palette, CoordinateMap, MeshPrimitive, Primitive};
use crate::data::MeshObject;
use crate::error::{ExplorerError, Result};

/// One light-grey mesh per collision object, posed by its axis-angle rotation and position.
pub fn object_primitives(objects: &[MeshObject], map: &CoordinateMap) -> Result<Vec<Primitive>> {
    objects
        .iter()
        .map(|object| {
            let len = object.vertices.len();
            if let Some(&index) = object.triangles.iter().flatten().find(|&&i| i as usize >= len) {
                return Err(ExplorerError::IndexOutOfRange {
                    index: index as usize,
                    len,
                });
            }
            let rotation = match map.axis(object.axis).try_normalize() {
                Some(axis) => Quat::from_axis_angle(axis, object.angle),
                None => Quat::IDENTITY,
            };
            Ok(Primitive::Mesh(MeshPrimitive {
                vertices: map.points(&object.vertices),
                triangles: object.triangles.clone(),
                rotation,
                translation: map.point(object.position),
                color: palette::LIGHT_GRAY,
            }))
        })
        .collect()
}
