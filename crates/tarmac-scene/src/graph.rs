//! SceneGraph - arena of nodes with an exclusive ownership tree

use crate::entity::{AirportData, Entity};
use tarmac_core::{LatLon, NodeId, Result, TarmacError};

/// A scene element: one entity payload plus its position in the tree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub hidden: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub entity: Entity,
}

/// The scene graph.
///
/// Nodes live in a dense arena indexed by `NodeId`; the root is always
/// `NodeId(0)`. Children keep insertion order. The graph is read-only input to
/// validation; mutation is only used while building a scene.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                id: NodeId(0),
                name: "root".to_string(),
                hidden: false,
                parent: None,
                children: Vec::new(),
                entity: Entity::Root,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Add a node as the last child of `parent`
    pub fn add(&mut self, parent: NodeId, name: impl Into<String>, entity: Entity) -> Result<NodeId> {
        if matches!(entity, Entity::Root) {
            return Err(TarmacError::HierarchyError(
                "only the graph itself creates a root node".to_string(),
            ));
        }
        if self.node(parent).is_none() {
            return Err(TarmacError::NodeNotFound(parent.to_string()));
        }

        let id = NodeId::from_raw(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            name: name.into(),
            hidden: false,
            parent: Some(parent),
            children: Vec::new(),
            entity,
        });
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn entity(&self, id: NodeId) -> Option<&Entity> {
        self.node(id).map(|n| &n.entity)
    }

    /// Node name, empty for unknown ids
    pub fn name(&self, id: NodeId) -> &str {
        self.node(id).map(|n| n.name.as_str()).unwrap_or("")
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) -> Result<()> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| TarmacError::NodeNotFound(id.to_string()))?;
        node.hidden = hidden;
        Ok(())
    }

    /// The node's own visibility flag
    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.node(id).map(|n| n.hidden).unwrap_or(false)
    }

    /// Nearest airport among the node itself and its ancestors
    pub fn owning_airport(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(cur) = current {
            let node = self.node(cur)?;
            if node.entity.is_airport() {
                return Some(cur);
            }
            current = node.parent;
        }
        None
    }

    pub fn is_within_airport(&self, id: NodeId) -> bool {
        self.owning_airport(id).is_some()
    }

    pub fn airport(&self, id: NodeId) -> Option<&AirportData> {
        match self.entity(id)? {
            Entity::Airport(a) => Some(a),
            _ => None,
        }
    }

    /// ICAO id of the airport owning `id`
    pub fn airport_icao(&self, id: NodeId) -> Option<&str> {
        let airport = self.owning_airport(id)?;
        self.airport(airport).map(|a| a.icao.as_str())
    }

    /// Location of a visible route node
    pub fn route_location(&self, id: NodeId) -> Option<LatLon> {
        if self.is_hidden(id) {
            return None;
        }
        match self.entity(id)? {
            Entity::RouteNode(n) => Some(n.location),
            _ => None,
        }
    }

    /// Endpoint positions of a taxi route or road edge
    pub fn edge_endpoints(&self, id: NodeId) -> Option<(LatLon, LatLon)> {
        let (source, target) = match self.entity(id)? {
            Entity::TaxiRoute(r) => (r.source, r.target),
            Entity::RoadEdge(r) => (r.source, r.target),
            _ => return None,
        };
        Some((self.route_location(source)?, self.route_location(target)?))
    }

    /// All positions a node occupies, resolving edge endpoints through the graph
    pub fn locations(&self, id: NodeId) -> Vec<LatLon> {
        if let Some((a, b)) = self.edge_endpoints(id) {
            return vec![a, b];
        }
        self.entity(id).map(|e| e.locations()).unwrap_or_default()
    }

    /// Pre-order walk of the subtree under `id`, including `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if self.node(cur).is_none() {
                continue;
            }
            out.push(cur);
            stack.extend(self.children(cur).iter().rev());
        }
        out
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }
}
