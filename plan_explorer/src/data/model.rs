// Planner dump schema. Field names follow the planner's JSON writer (PascalCase);
// everything here is read-only input.

use serde::Deserialize;

/// Position plus orientation. Rotations are written as `[w, x, y, z]`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Configuration {
    pub position: [f32; 3],
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
}

fn identity_rotation() -> [f32; 4] {
    [1.0, 0.0, 0.0, 0.0]
}

impl Configuration {
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            rotation: identity_rotation(),
        }
    }
}

/// One node of an EST or a world tree.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EstNode {
    pub config: Configuration,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub parent: usize,
    #[serde(default)]
    pub is_root: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Est {
    pub nodes: Vec<EstNode>,
}

/// Contents of an `est-<session>-<counter>.json` dump.
#[derive(Clone, Debug, Deserialize)]
pub struct EstDump {
    #[serde(rename = "EST")]
    pub est: Est,
    #[serde(rename = "Matchee", default)]
    pub matchee: Option<Configuration>,
    #[serde(rename = "KDTree", default)]
    pub kd_tree: Option<KdTree>,
    #[serde(rename = "SolutionIndex", default)]
    pub solution_index: Option<usize>,
    #[serde(rename = "CompleteSolution", default)]
    pub complete_solution: bool,
    #[serde(rename = "Objects", default)]
    pub objects: Vec<MeshObject>,
}

/// A sample stored in a k-d tree, with the planner's rating.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KdData {
    pub config: Configuration,
    #[serde(default)]
    pub rating: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KdSplit {
    pub split_value: f32,
    pub direction: usize,
}

/// Only the positions of `Min`/`Max` span the drawn box.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KdBox {
    pub min: Configuration,
    pub max: Configuration,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KdNode {
    #[serde(default)]
    pub split: Option<KdSplit>,
    #[serde(rename = "Box")]
    pub bounds: KdBox,
    #[serde(default)]
    pub left: Option<Box<KdNode>>,
    #[serde(default)]
    pub right: Option<Box<KdNode>>,
    #[serde(default)]
    pub points: Vec<usize>,
}

impl KdNode {
    /// Children in traversal order. A split node missing a child is walked as far as it goes.
    pub fn children(&self) -> impl Iterator<Item = &KdNode> {
        self.left.iter().chain(self.right.iter()).map(|c| c.as_ref())
    }

    pub fn is_split(&self) -> bool {
        self.split.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KdTree {
    pub root: KdNode,
    #[serde(default)]
    pub data: Vec<KdData>,
    #[serde(default)]
    pub size: usize,
    #[serde(default)]
    pub leaf_size: usize,
}

/// A static collision object as dumped by the planner's object manager.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MeshObject {
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
    pub position: [f32; 3],
    pub axis: [f32; 3],
    /// Radians.
    pub angle: f32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorldTree {
    pub nodes: Vec<EstNode>,
    #[serde(rename = "KDTree", default)]
    pub kd_tree: Option<KdTree>,
    /// Index of the node the movable object currently sits at.
    #[serde(default)]
    pub position: usize,
}

/// Contents of `world_tree.json`.
#[derive(Clone, Debug, Deserialize)]
pub struct WorldTreeDump {
    #[serde(rename = "WTree")]
    pub tree: WorldTree,
}
