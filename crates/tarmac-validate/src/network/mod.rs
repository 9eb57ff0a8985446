//! Taxi route and road network checks
//!
//! Every sub-check reads the same `NetworkContext`, built once per airport:
//! a local projection, one `RunwayBox` per runway, and the resolved endpoint
//! positions of every taxi route and road edge. Edges whose endpoints cannot
//! be resolved are set aside and reported by `check_edge_endpoints`. The
//! sub-checks do not depend on each other and can run in any order.

mod components;
mod hot_zone;
mod junction;
mod runway_routes;

pub use components::check_components;
pub use hot_zone::{check_hot_zones, hot_zone_extension, ZoneOp};
pub use junction::{
    check_edge_endpoints, check_roads, check_route_junctions, JUNCTION_TOLERANCE_M, MIN_ROUTE_SEGMENT_M,
};
pub use runway_routes::{check_runway_routes, ALIGN_TOLERANCE_DEG, RUNWAY_SPAN_SLOP_MIN_M};

use crate::context::ValidationContext;
use crate::rules::naming::{canonical_end, runway_end_names};
use std::collections::HashSet;
use tarmac_core::{LatLon, LocalProjection, NodeId, Vec2};
use tarmac_scene::entity::{Surface, TaxiRouteData, VehicleClass, WidthClass};
use tarmac_scene::{Collection, Entity};

/// A runway in local meters
#[derive(Debug, Clone)]
pub struct RunwayBox {
    pub id: NodeId,
    pub name: String,
    /// Canonical end names, low end first
    pub end_names: [String; 2],
    pub start: Vec2,
    pub end: Vec2,
    /// Unit vector from `start` to `end`
    pub along: Vec2,
    /// Unit vector to the left of `along`
    pub across: Vec2,
    pub length: f64,
    pub half_width: f64,
    pub paved: bool,
    pub corners: [Vec2; 4],
}

impl RunwayBox {
    fn new(id: NodeId, name: &str, ends: [Vec2; 2], width: f64, surface: Surface) -> Self {
        let delta = ends[1] - ends[0];
        let along = delta.normalized();
        let across = along.perp();
        let half_width = width * 0.5;
        let side = across * half_width;
        let end_names = runway_end_names(name)
            .unwrap_or_else(|| [name.to_string(), name.to_string()]);
        Self {
            id,
            name: name.to_string(),
            end_names,
            start: ends[0],
            end: ends[1],
            along,
            across,
            length: delta.length(),
            half_width,
            paved: surface.is_paved(),
            corners: [ends[0] - side, ends[1] - side, ends[1] + side, ends[0] + side],
        }
    }

    /// Runway-frame coordinates of `p`: distance along the centerline from
    /// the low end, and signed lateral offset
    pub fn frame(&self, p: Vec2) -> (f64, f64) {
        let d = p - self.start;
        (d.dot(&self.along), d.dot(&self.across))
    }

    /// Whether `tag` names this runway, either whole (`09/27`) or by the
    /// pair of its end names
    pub fn matches(&self, tag: &str) -> bool {
        tag == self.name || runway_end_names(tag).is_some_and(|ends| ends == self.end_names)
    }

    /// Index of the end `end` names, if any
    pub fn end_index(&self, end: &str) -> Option<usize> {
        let end = canonical_end(end)?;
        self.end_names.iter().position(|n| *n == end)
    }
}

/// A taxi route or road edge with its endpoints resolved
#[derive(Debug, Clone)]
pub struct NetEdge {
    pub id: NodeId,
    pub source: NodeId,
    pub target: NodeId,
    pub a: Vec2,
    pub b: Vec2,
}

impl NetEdge {
    pub fn length(&self) -> f64 {
        self.a.distance(&self.b)
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }

    pub fn same_nodes(&self, other: &NetEdge) -> bool {
        (self.source == other.source && self.target == other.target)
            || (self.source == other.target && self.target == other.source)
    }

    pub fn endpoints(&self) -> [(NodeId, Vec2); 2] {
        [(self.source, self.a), (self.target, self.b)]
    }
}

/// Shared, read-only state for one airport's network checks
pub struct NetworkContext {
    pub projection: LocalProjection,
    pub runways: Vec<RunwayBox>,
    /// Sealane names, accepted as route runway tags
    pub sealane_names: Vec<String>,
    pub routes: Vec<NetEdge>,
    pub roads: Vec<NetEdge>,
    /// Taxi routes and roads with an endpoint that is not a visible route
    /// node of this airport
    pub unresolved: Vec<NodeId>,
}

impl NetworkContext {
    pub fn build(ctx: &ValidationContext, col: &Collection) -> Self {
        let graph = ctx.graph;
        let mut anchors: Vec<LatLon> = Vec::new();
        for &id in col.runways.iter().chain(&col.route_nodes) {
            anchors.extend(graph.locations(id));
        }
        let projection = LocalProjection::centered_on(anchors.iter());

        let runways = col
            .runways
            .iter()
            .filter_map(|&id| match graph.entity(id) {
                Some(Entity::Runway(r)) => Some(RunwayBox::new(
                    id,
                    graph.name(id),
                    [projection.to_local(r.ends[0]), projection.to_local(r.ends[1])],
                    r.width_m,
                    r.surface,
                )),
                _ => None,
            })
            .collect();

        let sealane_names = col
            .sealanes
            .iter()
            .map(|&id| graph.name(id).to_string())
            .collect();

        let known: HashSet<NodeId> = col.route_nodes.iter().copied().collect();
        let resolve = |id: NodeId| -> Option<NetEdge> {
            let (source, target) = match graph.entity(id)? {
                Entity::TaxiRoute(r) => (r.source, r.target),
                Entity::RoadEdge(r) => (r.source, r.target),
                _ => return None,
            };
            if !known.contains(&source) || !known.contains(&target) {
                return None;
            }
            let (a, b) = graph.edge_endpoints(id)?;
            Some(NetEdge {
                id,
                source,
                target,
                a: projection.to_local(a),
                b: projection.to_local(b),
            })
        };

        let mut unresolved = Vec::new();
        let mut resolve_all = |ids: &[NodeId]| -> Vec<NetEdge> {
            let mut edges = Vec::with_capacity(ids.len());
            for &id in ids {
                match resolve(id) {
                    Some(edge) => edges.push(edge),
                    None => unresolved.push(id),
                }
            }
            edges
        };
        let routes = resolve_all(col.taxi_routes.as_slice());
        let roads = resolve_all(col.roads.as_slice());

        Self {
            projection,
            runways,
            sealane_names,
            routes,
            roads,
            unresolved,
        }
    }

    /// Runway a route tag refers to
    pub fn runway_for_tag(&self, tag: &str) -> Option<&RunwayBox> {
        self.runways.iter().find(|r| r.matches(tag))
    }

    /// Whether a route tag names any runway or sealane
    pub fn is_known_runway(&self, tag: &str) -> bool {
        self.runway_for_tag(tag).is_some() || self.sealane_names.iter().any(|n| n == tag)
    }

    /// Whether `end` names an end of any runway
    pub fn is_known_end(&self, end: &str) -> bool {
        self.runways.iter().any(|r| r.end_index(end).is_some())
    }
}

/// Taxi route payload of a network edge
pub(crate) fn route_data<'g>(ctx: &ValidationContext<'g>, edge: &NetEdge) -> Option<&'g TaxiRouteData> {
    match ctx.graph.entity(edge.id)? {
        Entity::TaxiRoute(r) => Some(r),
        _ => None,
    }
}

pub(crate) fn is_aircraft(route: &TaxiRouteData) -> bool {
    route.vehicle == VehicleClass::Aircraft
}

pub(crate) fn width_index(width: WidthClass) -> usize {
    match width {
        WidthClass::A => 0,
        WidthClass::B => 1,
        WidthClass::C => 2,
        WidthClass::D => 3,
        WidthClass::E => 4,
        WidthClass::F => 5,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Small airport fixtures shared by the network tests

    use tarmac_core::{LatLon, NodeId, DEG_TO_MTR_LAT};
    use tarmac_scene::entity::{AirportData, RouteNodeData, RunwayData, Surface, TaxiRouteData};
    use tarmac_scene::{Entity, SceneGraph};

    /// Runway 09/27 from (0, 0) east for `length_m` at the equator
    pub fn airport_with_runway(length_m: f64) -> (SceneGraph, NodeId, NodeId) {
        let mut g = SceneGraph::new();
        let apt = g
            .add(
                g.root(),
                "Test Field",
                Entity::Airport(AirportData {
                    icao: "KXYZ".to_string(),
                    ..Default::default()
                }),
            )
            .unwrap();
        let rwy = g
            .add(
                apt,
                "09/27",
                Entity::Runway(RunwayData {
                    ends: [LatLon::new(0.0, 0.0), east(length_m, 0.0)],
                    width_m: 30.0,
                    surface: Surface::Asphalt,
                    roughness: 0.25,
                    displaced_m: [0.0, 0.0],
                    blastpad_m: [0.0, 0.0],
                }),
            )
            .unwrap();
        (g, apt, rwy)
    }

    /// Position `x` meters east and `y` meters north of (0, 0)
    pub fn east(x: f64, y: f64) -> LatLon {
        LatLon::new(x / DEG_TO_MTR_LAT, y / DEG_TO_MTR_LAT)
    }

    pub fn node(g: &mut SceneGraph, parent: NodeId, x: f64, y: f64) -> NodeId {
        g.add(parent, "", Entity::RouteNode(RouteNodeData { location: east(x, y) }))
            .unwrap()
    }

    pub fn route(g: &mut SceneGraph, parent: NodeId, name: &str, data: TaxiRouteData) -> NodeId {
        g.add(parent, name, Entity::TaxiRoute(data)).unwrap()
    }

    /// Chain of route nodes along `xs` at `y`, joined by edges built by `edge`
    pub fn chain(
        g: &mut SceneGraph,
        parent: NodeId,
        xs: &[f64],
        y: f64,
        edge: impl Fn(NodeId, NodeId) -> TaxiRouteData,
    ) -> (Vec<NodeId>, Vec<NodeId>) {
        let nodes: Vec<NodeId> = xs.iter().map(|&x| node(g, parent, x, y)).collect();
        let edges = nodes
            .windows(2)
            .map(|w| route(g, parent, "A", edge(w[0], w[1])))
            .collect();
        (nodes, edges)
    }
}
