//! K-d tree geometry: depth-shaded cell boxes, highlighted leaves and rated samples.

use bevy::color::Color;

use super::{palette, CoordinateMap, LineWeight, Primitive, VisualSettings, POINT_SIZE};
use crate::data::{KdData, KdNode, KdTree};
use crate::error::{ExplorerError, Result};

/// Cells reaching this far are the planner's unbounded domain and are not drawn.
const UNBOUNDED: f32 = 1.0e30;

pub fn kdtree_primitives(
    tree: &KdTree,
    settings: &VisualSettings,
    map: &CoordinateMap,
) -> Result<Vec<Primitive>> {
    let (max_rating, max_depth) = extent(tree, &tree.root, 1, settings.maximum_kd_depth)?;
    let mut walk = KdWalk {
        tree,
        settings,
        map,
        max_rating,
        max_depth: max_depth.max(1),
        highlighted: 0,
    };
    walk.visit(&tree.root, 1)
}

fn sample<'a>(tree: &'a KdTree, index: usize) -> Result<&'a KdData> {
    tree.data.get(index).ok_or(ExplorerError::IndexOutOfRange {
        index,
        len: tree.data.len(),
    })
}

/// Largest sample rating and deepest level within `limit`. A subtree cut off
/// by the limit reports the limit as its depth.
fn extent(tree: &KdTree, node: &KdNode, depth: usize, limit: usize) -> Result<(f64, usize)> {
    if depth > limit {
        return Ok((0.0, limit));
    }
    if node.is_split() {
        let mut acc = (0.0_f64, depth);
        for child in node.children() {
            let (rating, child_depth) = extent(tree, child, depth + 1, limit)?;
            acc = (acc.0.max(rating), acc.1.max(child_depth));
        }
        return Ok(acc);
    }
    let mut max_rating = 0.0_f64;
    for &index in &node.points {
        max_rating = max_rating.max(sample(tree, index)?.rating);
    }
    Ok((max_rating, depth))
}

struct KdWalk<'a> {
    tree: &'a KdTree,
    settings: &'a VisualSettings,
    map: &'a CoordinateMap,
    max_rating: f64,
    max_depth: usize,
    /// Leaves whose samples were drawn while highlighted.
    highlighted: usize,
}

impl KdWalk<'_> {
    fn visit(&mut self, node: &KdNode, depth: usize) -> Result<Vec<Primitive>> {
        if depth > self.settings.maximum_kd_depth {
            return Ok(Vec::new());
        }

        let mut out: Vec<Primitive> = self.cell(node, depth).into_iter().collect();

        if node.is_split() {
            if self.settings.exclusive_highlight_kd_nodes {
                out.clear();
            }
            for child in node.children() {
                out.extend(self.visit(child, depth + 1)?);
            }
            return Ok(out);
        }

        let highlighted = self.highlighted < self.settings.highlight_kd_nodes;
        if highlighted {
            if let Some(Primitive::WireBox { color, weight, .. }) = out.last_mut() {
                *color = palette::RED;
                *weight = LineWeight::Heavy;
            }
        }

        if !node.points.is_empty() && highlighted && self.settings.visualize_kd_nodes {
            out.extend(self.samples(node)?);
            self.highlighted += 1;
        } else if self.settings.exclusive_highlight_kd_nodes {
            out.clear();
        } else if self.settings.visualize_kd_nodes {
            out.extend(self.samples(node)?);
        }
        Ok(out)
    }

    fn cell(&self, node: &KdNode, depth: usize) -> Option<Primitive> {
        let min = node.bounds.min.position;
        let max = node.bounds.max.position;
        let bounded = min
            .iter()
            .chain(max.iter())
            .all(|c| c.is_finite() && c.abs() < UNBOUNDED);
        if !bounded {
            return None;
        }
        let (min, max) = self.map.aabb(min, max);
        let shade = (depth as f32 / self.max_depth as f32).min(1.0);
        Some(Primitive::WireBox {
            min,
            max,
            color: Color::srgb(0.0, 0.0, shade),
            weight: LineWeight::Bold,
        })
    }

    fn samples(&self, node: &KdNode) -> Result<Vec<Primitive>> {
        node.points
            .iter()
            .map(|&index| {
                let data = sample(self.tree, index)?;
                let grey = if self.max_rating > 0.0 {
                    (data.rating / self.max_rating) as f32
                } else {
                    0.0
                };
                Ok(Primitive::point(
                    self.map.point(data.config.position),
                    Color::srgb(grey, grey, grey),
                    POINT_SIZE,
                ))
            })
            .collect()
    }
}
