//! Renderer-agnostic geometry derived from planner dumps.
//!
//! Everything in here is a pure function of the parsed dump and the
//! [`VisualSettings`]; the bevy side only turns [`Primitive`]s into entities
//! and gizmo lines.

mod compose;
mod est;
mod kdtree;
mod objects;
mod world_tree;

use bevy::color::Color;
use bevy::math::{Quat, Vec3};

use crate::data::EstNode;
use crate::error::{ExplorerError, Result};

pub use compose::{
    compose_session, compose_world_tree, DumpSummary, PrimitiveCounts, Scene, WorldTreeOverlay,
};
pub use est::{est_overlay_primitives, est_primitives, rotation_distance};
pub use kdtree::kdtree_primitives;
pub use objects::object_primitives;
pub use world_tree::world_tree_primitives;

/// Default marker size, in the same units the HUD reports.
pub const POINT_SIZE: f32 = 12.0;
/// Marker size for per-node rotation samples.
pub const SMALL_POINT_SIZE: f32 = 6.0;

pub mod palette {
    use bevy::color::Color;

    pub const BLACK: Color = Color::srgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::srgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::srgb(0.0, 0.5, 0.0);
    pub const BLUE: Color = Color::srgb(0.0, 0.0, 1.0);
    pub const LIGHT_GRAY: Color = Color::srgb(0.83, 0.83, 0.83);
}

/// Stroke weight of a line or wireframe box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineWeight {
    Thin,
    Bold,
    Heavy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeshPrimitive {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
    pub rotation: Quat,
    pub translation: Vec3,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Point {
        position: Vec3,
        color: Color,
        size: f32,
    },
    Line {
        from: Vec3,
        to: Vec3,
        color: Color,
        weight: LineWeight,
    },
    WireBox {
        min: Vec3,
        max: Vec3,
        color: Color,
        weight: LineWeight,
    },
    Mesh(MeshPrimitive),
}

impl Primitive {
    pub fn point(position: Vec3, color: Color, size: f32) -> Self {
        Self::Point {
            position,
            color,
            size,
        }
    }

    pub fn line(from: Vec3, to: Vec3, color: Color, weight: LineWeight) -> Self {
        Self::Line {
            from,
            to,
            color,
            weight,
        }
    }

    /// Corners spanned by this primitive, used to frame the camera.
    pub fn extent(&self) -> Option<(Vec3, Vec3)> {
        match self {
            Self::Point { position, .. } => Some((*position, *position)),
            Self::Line { from, to, .. } => Some((from.min(*to), from.max(*to))),
            Self::WireBox { min, max, .. } => Some((*min, *max)),
            Self::Mesh(mesh) => mesh
                .vertices
                .iter()
                .map(|v| mesh.rotation * *v + mesh.translation)
                .fold(None, |acc: Option<(Vec3, Vec3)>, v| match acc {
                    Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                    None => Some((v, v)),
                }),
        }
    }
}

/// Display toggles of the viewers. Defaults match the planner team's usual setup.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualSettings {
    /// Draw EST edges into leaf nodes.
    pub visualize_leaves: bool,
    /// Draw the planner's static collision meshes.
    pub visualize_objects: bool,
    /// Mark every drawn EST node with its rotation distance to the root.
    pub visualize_rotation: bool,
    /// Number of k-d leaves to highlight.
    pub highlight_kd_nodes: usize,
    /// Draw only highlighted k-d leaves.
    pub exclusive_highlight_kd_nodes: bool,
    /// Draw the rated samples stored in k-d leaves.
    pub visualize_kd_nodes: bool,
    /// Deepest k-d level to draw; the root is level 1.
    pub maximum_kd_depth: usize,
    /// Draw the world tree's own k-d index under the world tree.
    pub visualize_world_kd_tree: bool,
    pub mirror_x: bool,
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            visualize_leaves: true,
            visualize_objects: true,
            visualize_rotation: false,
            highlight_kd_nodes: 0,
            exclusive_highlight_kd_nodes: false,
            visualize_kd_nodes: false,
            maximum_kd_depth: 10,
            visualize_world_kd_tree: false,
            mirror_x: false,
        }
    }
}

impl VisualSettings {
    pub fn coordinate_map(&self) -> CoordinateMap {
        CoordinateMap {
            mirror_x: self.mirror_x,
        }
    }
}

/// Maps planner coordinates to display coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoordinateMap {
    pub mirror_x: bool,
}

impl CoordinateMap {
    pub fn point(&self, p: [f32; 3]) -> Vec3 {
        let v = Vec3::from_array(p);
        if self.mirror_x {
            Vec3::new(-v.x, v.y, v.z)
        } else {
            v
        }
    }

    pub fn points(&self, points: &[[f32; 3]]) -> Vec<Vec3> {
        points.iter().map(|p| self.point(*p)).collect()
    }

    /// Rotation axis conjugated by the mirror: mirroring `R v + t` gives a
    /// rotation by the same angle about `(x, -y, -z)`.
    pub fn axis(&self, axis: [f32; 3]) -> Vec3 {
        let a = Vec3::from_array(axis);
        if self.mirror_x {
            Vec3::new(a.x, -a.y, -a.z)
        } else {
            a
        }
    }

    /// Maps both corners and re-sorts them, since mirroring swaps min and max.
    pub fn aabb(&self, min: [f32; 3], max: [f32; 3]) -> (Vec3, Vec3) {
        let a = self.point(min);
        let b = self.point(max);
        (a.min(b), a.max(b))
    }
}

/// Every non-root node must name an existing parent.
pub(crate) fn validate_parents(nodes: &[EstNode]) -> Result<()> {
    for (i, node) in nodes.iter().enumerate() {
        if !node.is_root && node.parent >= nodes.len() {
            return Err(ExplorerError::DanglingParent {
                node: i,
                parent: node.parent,
                len: nodes.len(),
            });
        }
    }
    Ok(())
}

/// Indices from `start` up to and including its root.
pub(crate) fn parent_chain(nodes: &[EstNode], start: usize) -> Result<Vec<usize>> {
    if start >= nodes.len() {
        return Err(ExplorerError::IndexOutOfRange {
            index: start,
            len: nodes.len(),
        });
    }
    let mut chain = vec![start];
    let mut current = start;
    while !nodes[current].is_root {
        if chain.len() > nodes.len() {
            return Err(ExplorerError::ParentCycle { start });
        }
        current = nodes[current].parent;
        chain.push(current);
    }
    Ok(chain)
}
