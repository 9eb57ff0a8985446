//! Scene saving to TOML files

use crate::entity::Entity;
use crate::format::{NodeDef, SceneFile};
use crate::graph::SceneGraph;
use std::fs;
use std::path::Path;
use tarmac_core::Result;

/// Save a graph to a scene file
pub fn save_scene<P: AsRef<Path>>(path: P, graph: &SceneGraph, name: impl Into<String>) -> Result<()> {
    let content = save_scene_string(graph, name)?;
    fs::write(path, content)?;
    Ok(())
}

/// Save a graph to a TOML string
pub fn save_scene_string(graph: &SceneGraph, name: impl Into<String>) -> Result<String> {
    let scene_file = graph_to_scene_file(graph, name);
    let content = toml::to_string_pretty(&scene_file)?;
    Ok(content)
}

/// Convert a graph to a SceneFile in pre-order, using graph ids as file ids
pub fn graph_to_scene_file(graph: &SceneGraph, name: impl Into<String>) -> SceneFile {
    let mut scene = SceneFile::new(name);
    let root = graph.root();

    for id in graph.descendants(root) {
        let Some(node) = graph.node(id) else {
            continue;
        };
        if matches!(node.entity, Entity::Root) {
            continue;
        }
        scene.nodes.push(NodeDef {
            id: id.raw(),
            parent: node.parent.filter(|p| *p != root).map(|p| p.raw()),
            name: node.name.clone(),
            hidden: node.hidden,
            entity: node.entity.clone(),
        });
    }

    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{AirportData, RouteNodeData, TaxiRouteData, WidthClass};
    use crate::loader::load_scene_string;
    use tarmac_core::LatLon;

    #[test]
    fn test_save_then_load_preserves_structure() {
        let mut g = SceneGraph::new();
        let apt = g
            .add(
                g.root(),
                "Test",
                Entity::Airport(AirportData {
                    icao: "KTST".to_string(),
                    ..Default::default()
                }),
            )
            .unwrap();
        let a = g
            .add(apt, "", Entity::RouteNode(RouteNodeData { location: LatLon::new(1.0, 2.0) }))
            .unwrap();
        let b = g
            .add(apt, "", Entity::RouteNode(RouteNodeData { location: LatLon::new(1.001, 2.0) }))
            .unwrap();
        let e = g
            .add(
                apt,
                "B",
                Entity::TaxiRoute(TaxiRouteData::new(a, b).with_width(WidthClass::D)),
            )
            .unwrap();
        g.set_hidden(e, true).unwrap();

        let text = save_scene_string(&g, "Round Trip").unwrap();
        assert!(text.contains("type = \"taxi_route\""));

        let (loaded, file) = load_scene_string(&text).unwrap();
        assert_eq!(file.scene.name, "Round Trip");
        assert_eq!(loaded.len(), g.len());
        assert_eq!(loaded.entity(e), g.entity(e));
        assert!(loaded.is_hidden(e));
        assert_eq!(loaded.parent(e), Some(apt));
    }
}
