//! Assembling whole scenes out of the per-structure geometry.

use std::fmt;

use bevy::math::Vec3;

use super::{
    est_overlay_primitives, est_primitives, kdtree_primitives, object_primitives,
    world_tree_primitives, Primitive, VisualSettings,
};
use crate::data::{EstDump, WorldTree};
use crate::error::Result;

/// What the HUD shows about one loaded dump.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DumpSummary {
    pub label: String,
    pub nodes: usize,
    pub solution_index: Option<usize>,
    pub complete_solution: bool,
    /// Current node of a world tree.
    pub position: Option<usize>,
}

impl DumpSummary {
    fn est(label: &str, dump: &EstDump) -> Self {
        Self {
            label: label.to_string(),
            nodes: dump.est.nodes.len(),
            solution_index: dump.solution_index,
            complete_solution: dump.complete_solution,
            position: None,
        }
    }
}

impl fmt::Display for DumpSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {} nodes", self.label, self.nodes)?;
        match self.solution_index {
            Some(index) if self.complete_solution => write!(f, "  solution #{index} (complete)")?,
            Some(index) => write!(f, "  solution #{index}")?,
            None => {}
        }
        if let Some(position) = self.position {
            write!(f, "  at #{position}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrimitiveCounts {
    pub points: usize,
    pub lines: usize,
    pub boxes: usize,
    pub meshes: usize,
}

impl PrimitiveCounts {
    pub fn total(&self) -> usize {
        self.points + self.lines + self.boxes + self.meshes
    }
}

/// Everything one viewer invocation draws.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub label: String,
    pub primitives: Vec<Primitive>,
    pub summaries: Vec<DumpSummary>,
}

impl Scene {
    pub fn counts(&self) -> PrimitiveCounts {
        let mut counts = PrimitiveCounts::default();
        for primitive in &self.primitives {
            match primitive {
                Primitive::Point { .. } => counts.points += 1,
                Primitive::Line { .. } => counts.lines += 1,
                Primitive::WireBox { .. } => counts.boxes += 1,
                Primitive::Mesh(_) => counts.meshes += 1,
            }
        }
        counts
    }

    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.primitives
            .iter()
            .filter_map(Primitive::extent)
            .reduce(|(lo, hi), (a, b)| (lo.min(a), hi.max(b)))
    }
}

/// How an EST is drawn on top of a world tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WorldTreeOverlay {
    /// Same rendering as the session viewer: solution path, roots, leaves.
    #[default]
    Full,
    /// Green parent edges only.
    Plain,
}

/// EST geometry and k-d tree of every dump, plus the collision objects of the first.
pub fn compose_session(
    label: impl Into<String>,
    dumps: &[(String, EstDump)],
    settings: &VisualSettings,
) -> Result<Scene> {
    let map = settings.coordinate_map();
    let mut scene = Scene {
        label: label.into(),
        ..Scene::default()
    };

    for (name, dump) in dumps {
        scene.primitives.extend(est_primitives(dump, settings, &map)?);
        if let Some(kd) = &dump.kd_tree {
            scene.primitives.extend(kdtree_primitives(kd, settings, &map)?);
        }
        scene.summaries.push(DumpSummary::est(name, dump));
    }

    if settings.visualize_objects {
        if let Some((_, first)) = dumps.first() {
            scene
                .primitives
                .extend(object_primitives(&first.objects, &map)?);
        }
    }

    Ok(scene)
}

pub fn compose_world_tree(
    label: impl Into<String>,
    tree: &WorldTree,
    est: Option<(&str, &EstDump)>,
    overlay: WorldTreeOverlay,
    settings: &VisualSettings,
) -> Result<Scene> {
    let map = settings.coordinate_map();
    let mut scene = Scene {
        label: label.into(),
        ..Scene::default()
    };

    scene.primitives.extend(world_tree_primitives(tree, &map)?);
    if settings.visualize_world_kd_tree {
        if let Some(kd) = &tree.kd_tree {
            scene.primitives.extend(kdtree_primitives(kd, settings, &map)?);
        }
    }
    scene.summaries.push(DumpSummary {
        label: "world tree".to_string(),
        nodes: tree.nodes.len(),
        solution_index: None,
        complete_solution: false,
        position: Some(tree.position),
    });

    if let Some((name, dump)) = est {
        let primitives = match overlay {
            WorldTreeOverlay::Full => est_primitives(dump, settings, &map)?,
            WorldTreeOverlay::Plain => est_overlay_primitives(&dump.est.nodes, &map)?,
        };
        scene.primitives.extend(primitives);
        scene.summaries.push(DumpSummary::est(name, dump));
    }

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Configuration, Est, KdBox, KdData, KdNode, KdTree, MeshObject};
    use crate::geometry::test_support::node;

    fn dump(objects: Vec<MeshObject>) -> EstDump {
        EstDump {
            est: Est {
                nodes: vec![node([0.0; 3], 0, true), node([1.0, 2.0, 3.0], 0, false)],
            },
            matchee: Some(Configuration::at([1.0, 2.0, 4.0])),
            kd_tree: None,
            solution_index: Some(1),
            complete_solution: false,
            objects,
        }
    }

    fn cube_face() -> MeshObject {
        MeshObject {
            vertices: vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            triangles: vec![[0, 1, 2]],
            position: [0.0; 3],
            axis: [0.0, 0.0, 1.0],
            angle: 0.0,
        }
    }

    #[test]
    fn session_takes_objects_from_the_first_dump_only() {
        let dumps = vec![
            ("est-1-1.json".to_string(), dump(vec![cube_face()])),
            ("est-1-2.json".to_string(), dump(vec![cube_face(), cube_face()])),
        ];
        let scene = compose_session("session 1", &dumps, &VisualSettings::default()).unwrap();
        let counts = scene.counts();

        assert_eq!(counts.meshes, 1);
        // Per dump: matchee + root markers and one edge.
        assert_eq!(counts.points, 4);
        assert_eq!(counts.lines, 2);
        assert_eq!(scene.summaries.len(), 2);
        assert_eq!(scene.summaries[1].solution_index, Some(1));
    }

    #[test]
    fn objects_can_be_hidden() {
        let dumps = vec![("est-1-1.json".to_string(), dump(vec![cube_face()]))];
        let settings = VisualSettings {
            visualize_objects: false,
            ..VisualSettings::default()
        };
        let scene = compose_session("session 1", &dumps, &settings).unwrap();
        assert_eq!(scene.counts().meshes, 0);
    }

    #[test]
    fn bounds_cover_every_primitive() {
        let dumps = vec![("est-1-1.json".to_string(), dump(Vec::new()))];
        let scene = compose_session("session 1", &dumps, &VisualSettings::default()).unwrap();
        assert_eq!(
            scene.bounds(),
            Some((Vec3::ZERO, Vec3::new(1.0, 2.0, 4.0)))
        );
        assert_eq!(Scene::default().bounds(), None);
    }

    #[test]
    fn world_tree_scene_overlays_the_est() {
        let tree = WorldTree {
            nodes: vec![node([0.0; 3], 0, true), node([0.0, 1.0, 0.0], 0, false)],
            kd_tree: None,
            position: 1,
        };
        let est = dump(Vec::new());
        let scene = compose_world_tree(
            "world",
            &tree,
            Some(("est-1-1.json", &est)),
            WorldTreeOverlay::Plain,
            &VisualSettings::default(),
        )
        .unwrap();

        assert_eq!(scene.counts().lines, 2);
        assert_eq!(scene.summaries[0].position, Some(1));
        assert_eq!(scene.summaries[1].nodes, 2);
    }

    #[test]
    fn summary_line_mentions_solution_and_position() {
        let mut summary = DumpSummary::est("est-7-2.json", &dump(Vec::new()));
        assert_eq!(summary.to_string(), "est-7-2.json  2 nodes  solution #1");

        summary.complete_solution = true;
        summary.position = Some(0);
        assert_eq!(
            summary.to_string(),
            "est-7-2.json  2 nodes  solution #1 (complete)  at #0"
        );
    }

    #[test]
    fn world_kd_tree_has_its_own_toggle() {
        let leaf = KdNode {
            split: None,
            bounds: KdBox {
                min: Configuration::at([0.0; 3]),
                max: Configuration::at([1.0; 3]),
            },
            left: None,
            right: None,
            points: vec![0],
        };
        let tree = WorldTree {
            nodes: vec![node([0.0; 3], 0, true)],
            kd_tree: Some(KdTree {
                root: leaf,
                data: vec![KdData {
                    config: Configuration::at([0.5; 3]),
                    rating: 1.0,
                }],
                size: 1,
                leaf_size: 1,
            }),
            position: 0,
        };
        let draw = |settings: VisualSettings| {
            compose_world_tree("world", &tree, None, WorldTreeOverlay::Full, &settings)
                .unwrap()
                .counts()
        };

        let samples_only = VisualSettings {
            visualize_kd_nodes: true,
            ..VisualSettings::default()
        };
        assert_eq!(draw(samples_only).boxes, 0);

        let with_index = VisualSettings {
            visualize_world_kd_tree: true,
            ..VisualSettings::default()
        };
        let counts = draw(with_index);
        assert_eq!(counts.boxes, 1);
        assert_eq!(counts.points, 0);
    }
}
