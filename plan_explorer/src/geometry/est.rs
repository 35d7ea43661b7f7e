//! EST geometry: edges to parents, the solution path and root markers.

use bevy::color::Color;
use bevy::math::{Vec3, Vec4};

use super::{
    palette, parent_chain, validate_parents, CoordinateMap, LineWeight, Primitive,
    VisualSettings, POINT_SIZE, SMALL_POINT_SIZE,
};
use crate::data::{EstDump, EstNode};
use crate::error::{ExplorerError, Result};

/// Symmetric quaternion distance: half the rotation angle between `a` and `b`,
/// both given as `[w, x, y, z]`.
pub fn rotation_distance(a: [f32; 4], b: [f32; 4]) -> f32 {
    let qa = Vec4::from_array(a).try_normalize().unwrap_or(Vec4::X);
    let qb = Vec4::from_array(b).try_normalize().unwrap_or(Vec4::X);
    qa.dot(qb).clamp(-1.0, 1.0).acos()
}

/// Rotation distance of every node to the first node, scaled to `[0, 1]`.
fn normalized_rotation_distances(nodes: &[EstNode]) -> Vec<f32> {
    let Some(first) = nodes.first() else {
        return Vec::new();
    };
    let root = first.config.rotation;
    let mut distances: Vec<f32> = nodes
        .iter()
        .map(|n| rotation_distance(root, n.config.rotation))
        .collect();
    let max = distances.iter().copied().fold(0.0_f32, f32::max);
    if max > 0.0 {
        for d in &mut distances {
            *d /= max;
        }
    }
    distances
}

/// A node is a leaf when no other node names it as parent. Roots never are.
fn leaf_flags(nodes: &[EstNode]) -> Vec<bool> {
    let mut is_leaf = vec![true; nodes.len()];
    for (i, node) in nodes.iter().enumerate() {
        if node.is_root {
            is_leaf[i] = false;
        } else {
            is_leaf[node.parent] = false;
        }
    }
    is_leaf
}

pub fn est_primitives(
    dump: &EstDump,
    settings: &VisualSettings,
    map: &CoordinateMap,
) -> Result<Vec<Primitive>> {
    let nodes = &dump.est.nodes;
    validate_parents(nodes)?;

    let points: Vec<Vec3> = nodes.iter().map(|n| map.point(n.config.position)).collect();
    let rotation = normalized_rotation_distances(nodes);
    let mut out = Vec::new();
    let mut on_solution = vec![false; nodes.len()];

    if let Some(matchee) = &dump.matchee {
        let matchee_pos = map.point(matchee.position);
        out.push(Primitive::point(matchee_pos, palette::GREEN, POINT_SIZE));

        if let Some(solution) = dump.solution_index {
            if solution >= nodes.len() {
                return Err(ExplorerError::IndexOutOfRange {
                    index: solution,
                    len: nodes.len(),
                });
            }
            if dump.complete_solution {
                out.push(Primitive::line(
                    matchee_pos,
                    points[solution],
                    palette::GREEN,
                    LineWeight::Bold,
                ));
            }
            if !settings.visualize_leaves && !nodes[solution].is_root {
                out.push(Primitive::line(
                    points[solution],
                    points[nodes[solution].parent],
                    palette::RED,
                    LineWeight::Bold,
                ));
            }
            for idx in parent_chain(nodes, solution)? {
                on_solution[idx] = true;
            }
        }
    }

    let is_leaf = leaf_flags(nodes);
    for (i, node) in nodes.iter().enumerate() {
        if node.is_root {
            out.push(Primitive::point(points[i], palette::BLUE, POINT_SIZE));
            continue;
        }
        if is_leaf[i] && !settings.visualize_leaves {
            continue;
        }

        let parent = node.parent;
        if on_solution[i] && on_solution[parent] {
            out.push(Primitive::line(
                points[i],
                points[parent],
                palette::GREEN,
                LineWeight::Bold,
            ));
        } else {
            out.push(Primitive::line(
                points[i],
                points[parent],
                palette::BLACK,
                LineWeight::Thin,
            ));
        }

        if settings.visualize_rotation {
            let d = rotation[i];
            out.push(Primitive::point(
                points[i],
                Color::srgb(d, 0.0, d),
                SMALL_POINT_SIZE,
            ));
        }
    }

    Ok(out)
}

/// Plain overlay: every non-root node joined to its parent in green.
pub fn est_overlay_primitives(nodes: &[EstNode], map: &CoordinateMap) -> Result<Vec<Primitive>> {
    validate_parents(nodes)?;
    Ok(nodes
        .iter()
        .filter(|n| !n.is_root)
        .map(|n| {
            Primitive::line(
                map.point(n.config.position),
                map.point(nodes[n.parent].config.position),
                palette::GREEN,
                LineWeight::Thin,
            )
        })
        .collect())
}
