//! Scene loading from TOML files

use crate::entity::Entity;
use crate::format::SceneFile;
use crate::graph::SceneGraph;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tarmac_core::{NodeId, Result, TarmacError};

/// Load a scene from a TOML file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<(SceneGraph, SceneFile)> {
    let content = fs::read_to_string(path)?;
    load_scene_string(&content)
}

/// Load a scene from a TOML string
pub fn load_scene_string(content: &str) -> Result<(SceneGraph, SceneFile)> {
    let scene_file: SceneFile = toml::from_str(content)?;
    let graph = build_graph(&scene_file)?;
    Ok((graph, scene_file))
}

/// Build a graph from a parsed scene file.
///
/// Graph ids follow file order, so file id `k` at position `i` becomes
/// `NodeId(i + 1)` (the root is `NodeId(0)`).
pub fn build_graph(scene_file: &SceneFile) -> Result<SceneGraph> {
    // First pass: map file ids to graph ids
    let mut ids: HashMap<u32, NodeId> = HashMap::with_capacity(scene_file.nodes.len());
    for (i, def) in scene_file.nodes.iter().enumerate() {
        let id = NodeId::from_raw(i as u32 + 1);
        if ids.insert(def.id, id).is_some() {
            return Err(TarmacError::SceneError(format!(
                "duplicate node id {} in scene '{}'",
                def.id, scene_file.scene.name
            )));
        }
    }

    let lookup = |file_id: u32, what: &str| -> Result<NodeId> {
        ids.get(&file_id).copied().ok_or_else(|| {
            TarmacError::SceneError(format!("{what} refers to unknown node id {file_id}"))
        })
    };

    // Second pass: add nodes, remapping references
    let mut graph = SceneGraph::new();
    for def in &scene_file.nodes {
        let parent = match def.parent {
            Some(p) => {
                let parent = lookup(p, "parent")?;
                if parent.raw() as usize > graph.len() - 1 {
                    return Err(TarmacError::HierarchyError(format!(
                        "node {} appears before its parent {}",
                        def.id, p
                    )));
                }
                parent
            }
            None => graph.root(),
        };

        let mut entity = def.entity.clone();
        match &mut entity {
            Entity::TaxiRoute(route) => {
                route.source = lookup(route.source.raw(), "taxi route source")?;
                route.target = lookup(route.target.raw(), "taxi route target")?;
            }
            Entity::RoadEdge(road) => {
                road.source = lookup(road.source.raw(), "road source")?;
                road.target = lookup(road.target.raw(), "road target")?;
            }
            _ => {}
        }

        let id = graph.add(parent, def.name.clone(), entity)?;
        if def.hidden {
            graph.set_hidden(id, true)?;
        }
    }

    Ok(graph)
}
