//! Scene collector: one depth-first pass sorting nodes into typed buckets

use crate::entity::Entity;
use crate::graph::SceneGraph;
use tarmac_core::NodeId;

/// Node ids grouped by kind, each bucket in traversal order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    pub airports: Vec<NodeId>,
    pub runways: Vec<NodeId>,
    pub sealanes: Vec<NodeId>,
    pub helipads: Vec<NodeId>,
    pub taxiways: Vec<NodeId>,
    pub boundaries: Vec<NodeId>,
    pub linear_features: Vec<NodeId>,
    pub flows: Vec<NodeId>,
    pub frequencies: Vec<NodeId>,
    pub ramps: Vec<NodeId>,
    pub tower_viewpoints: Vec<NodeId>,
    pub windsocks: Vec<NodeId>,
    pub truck_parkings: Vec<NodeId>,
    pub truck_destinations: Vec<NodeId>,
    pub route_nodes: Vec<NodeId>,
    pub taxi_routes: Vec<NodeId>,
    pub roads: Vec<NodeId>,
    pub objects: Vec<NodeId>,
    pub facades: Vec<NodeId>,
    pub forests: Vec<NodeId>,
    pub orthophotos: Vec<NodeId>,
    pub draped_polygons: Vec<NodeId>,
    pub line_placements: Vec<NodeId>,
    /// Every visited node, in traversal order
    pub visited: Vec<NodeId>,
}

impl Collection {
    /// Nodes carrying a library resource reference
    pub fn resource_users(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.objects
            .iter()
            .chain(&self.facades)
            .chain(&self.forests)
            .chain(&self.orthophotos)
            .chain(&self.draped_polygons)
            .chain(&self.line_placements)
            .copied()
    }

    /// Nodes with polygon geometry
    pub fn polygons(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.taxiways
            .iter()
            .chain(&self.boundaries)
            .chain(&self.facades)
            .chain(&self.forests)
            .chain(&self.orthophotos)
            .chain(&self.draped_polygons)
            .copied()
    }

    /// Nodes with open or closed chain geometry
    pub fn chains(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.linear_features
            .iter()
            .chain(&self.line_placements)
            .copied()
    }

    /// Keep only nodes for which `keep` holds, in every bucket
    pub fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        for bucket in [
            &mut self.airports,
            &mut self.runways,
            &mut self.sealanes,
            &mut self.helipads,
            &mut self.taxiways,
            &mut self.boundaries,
            &mut self.linear_features,
            &mut self.flows,
            &mut self.frequencies,
            &mut self.ramps,
            &mut self.tower_viewpoints,
            &mut self.windsocks,
            &mut self.truck_parkings,
            &mut self.truck_destinations,
            &mut self.route_nodes,
            &mut self.taxi_routes,
            &mut self.roads,
            &mut self.objects,
            &mut self.facades,
            &mut self.forests,
            &mut self.orthophotos,
            &mut self.draped_polygons,
            &mut self.line_placements,
            &mut self.visited,
        ] {
            bucket.retain(|id| keep(*id));
        }
    }
}

/// Collect the visible subtree under `root`.
///
/// Hidden nodes are skipped with their whole subtree. Nested airports are
/// entered only when `root` is neither an airport nor inside one, so a
/// whole-document pass sees every airport while a single-airport pass never
/// picks up another airport's contents.
pub fn collect(graph: &SceneGraph, root: NodeId) -> Collection {
    let mut out = Collection::default();
    let enter_airports = !graph.is_within_airport(root);

    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let Some(node) = graph.node(id) else {
            continue;
        };
        if node.hidden {
            continue;
        }
        if id != root && node.entity.is_airport() && !enter_airports {
            continue;
        }

        out.visited.push(id);
        let bucket = match &node.entity {
            Entity::Airport(_) => Some(&mut out.airports),
            Entity::Runway(_) => Some(&mut out.runways),
            Entity::Sealane(_) => Some(&mut out.sealanes),
            Entity::Helipad(_) => Some(&mut out.helipads),
            Entity::Taxiway(_) => Some(&mut out.taxiways),
            Entity::Boundary(_) => Some(&mut out.boundaries),
            Entity::LinearFeature(_) => Some(&mut out.linear_features),
            Entity::AtcFlow(_) => Some(&mut out.flows),
            Entity::AtcFrequency(_) => Some(&mut out.frequencies),
            Entity::RampPosition(_) => Some(&mut out.ramps),
            Entity::TowerViewpoint(_) => Some(&mut out.tower_viewpoints),
            Entity::Windsock(_) => Some(&mut out.windsocks),
            Entity::TruckParking(_) => Some(&mut out.truck_parkings),
            Entity::TruckDestination(_) => Some(&mut out.truck_destinations),
            Entity::RouteNode(_) => Some(&mut out.route_nodes),
            Entity::TaxiRoute(_) => Some(&mut out.taxi_routes),
            Entity::RoadEdge(_) => Some(&mut out.roads),
            Entity::ObjectPlacement(_) => Some(&mut out.objects),
            Entity::Facade(_) => Some(&mut out.facades),
            Entity::Forest(_) => Some(&mut out.forests),
            Entity::DrapedOrtho(_) => Some(&mut out.orthophotos),
            Entity::DrapedPolygon(_) => Some(&mut out.draped_polygons),
            Entity::LinePlacement(_) => Some(&mut out.line_placements),
            // Flow rules are read through their flow
            Entity::AtcWindRule(_) | Entity::AtcTimeRule(_) | Entity::AtcRunwayUse(_) => None,
            Entity::Root | Entity::Group => None,
        };
        if let Some(bucket) = bucket {
            bucket.push(id);
        }

        stack.extend(node.children.iter().rev());
    }

    out
}
