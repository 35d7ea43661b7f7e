mod channel;
mod model;
mod session;

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{ExplorerError, Result};

pub use channel::{init_scene_channel, spawn_loader, SceneChannel, SceneSource};
pub use model::{
    Configuration, Est, EstDump, EstNode, KdBox, KdData, KdNode, KdSplit, KdTree, MeshObject,
    WorldTree, WorldTreeDump,
};
pub use session::{parse_dump_name, Session};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).map_err(|e| ExplorerError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|e| ExplorerError::json(path, e))
}

/// Reads one `est-<session>-<counter>.json` dump.
pub fn load_est(path: &Path) -> Result<EstDump> {
    let dump: EstDump = read_json(path)?;
    tracing::info!(
        path = %path.display(),
        nodes = dump.est.nodes.len(),
        solution = ?dump.solution_index,
        "loaded EST dump"
    );
    Ok(dump)
}

/// Reads a `world_tree.json` dump and unwraps its `WTree` member.
pub fn load_world_tree(path: &Path) -> Result<WorldTree> {
    let dump: WorldTreeDump = read_json(path)?;
    tracing::info!(
        path = %path.display(),
        nodes = dump.tree.nodes.len(),
        position = dump.tree.position,
        "loaded world tree"
    );
    Ok(dump.tree)
}
