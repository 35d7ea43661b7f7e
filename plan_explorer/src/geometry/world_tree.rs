use super::{palette, parent_chain, validate_parents, CoordinateMap, LineWeight, Primitive};
use crate::data::WorldTree;
use crate::error::Result;

/// Red path from the current node back to the root, thin black edges elsewhere.
pub fn world_tree_primitives(tree: &WorldTree, map: &CoordinateMap) -> Result<Vec<Primitive>> {
    let nodes = &tree.nodes;
    if nodes.is_empty() {
        return Ok(Vec::new());
    }
    validate_parents(nodes)?;

    let points: Vec<_> = nodes.iter().map(|n| map.point(n.config.position)).collect();
    let mut rendered = vec![false; nodes.len()];
    let mut out = Vec::new();

    let chain = parent_chain(nodes, tree.position)?;
    for pair in chain.windows(2) {
        let (child, parent) = (pair[0], pair[1]);
        out.push(Primitive::line(
            points[child],
            points[parent],
            palette::RED,
            LineWeight::Bold,
        ));
        rendered[child] = true;
    }
    if let Some(&root) = chain.last() {
        rendered[root] = true;
    }

    for (i, node) in nodes.iter().enumerate() {
        if rendered[i] || node.is_root {
            continue;
        }
        out.push(Primitive::line(
            points[i],
            points[node.parent],
            palette::BLACK,
            LineWeight::Thin,
        ));
    }

    Ok(out)
}
