//! Edge-level checks: degenerate and duplicate edges, unjoined endpoints,
//! T junctions and segment length, for taxi routes and roads

use super::{route_data, width_index, NetEdge, NetworkContext};
use crate::code::Code;
use crate::context::ValidationContext;
use crate::diagnostic::Findings;
use tarmac_core::geometry::distance_point_segment;

/// Endpoints closer than this, by width class A to F, should be one node
pub const JUNCTION_TOLERANCE_M: [f64; 6] = [1.0, 1.5, 2.0, 2.5, 3.0, 4.0];

/// Shortest sensible taxi route segment, by width class A to F
pub const MIN_ROUTE_SEGMENT_M: [f64; 6] = [2.0, 3.0, 5.0, 7.0, 9.0, 12.0];

/// Fixed join tolerance for roads
pub const ROAD_JOIN_TOLERANCE_M: f64 = 1.0;

/// Edges shorter than this are treated as zero length
const ZERO_LENGTH_M: f64 = 0.01;

fn is_degenerate(e: &NetEdge) -> bool {
    e.source == e.target || e.length() < ZERO_LENGTH_M
}

/// Kind of defect found between two edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairDefect {
    NotJoined,
    TJunction,
}

/// Compare two non-degenerate edges. Endpoints that are distinct nodes but
/// lie within `tol` of each other are not joined; an endpoint within `tol` of
/// the other edge's interior is an unjoined T junction.
fn pair_defect(e: &NetEdge, f: &NetEdge, tol: f64) -> Option<PairDefect> {
    for (n, p) in e.endpoints() {
        for (m, q) in f.endpoints() {
            if n != m && p.distance(&q) < tol {
                return Some(PairDefect::NotJoined);
            }
        }
    }
    for (this, other) in [(e, f), (f, e)] {
        for (n, p) in this.endpoints() {
            if other.touches(n) {
                continue;
            }
            let near_end = other.endpoints().iter().any(|(_, q)| p.distance(q) < tol);
            if !near_end && distance_point_segment(p, other.a, other.b) < tol {
                return Some(PairDefect::TJunction);
            }
        }
    }
    None
}

/// Report each group of edges that connect the same two nodes
fn duplicates(edges: &[&NetEdge]) -> Vec<Vec<usize>> {
    let mut grouped = vec![false; edges.len()];
    let mut out = Vec::new();
    for i in 0..edges.len() {
        if grouped[i] {
            continue;
        }
        let group: Vec<usize> = (i..edges.len())
            .filter(|&j| !grouped[j] && edges[j].same_nodes(edges[i]))
            .collect();
        if group.len() > 1 {
            for &j in &group {
                grouped[j] = true;
            }
            out.push(group);
        }
    }
    out
}

pub fn check_route_junctions(ctx: &ValidationContext, net: &NetworkContext, out: &mut Findings) {
    let edges: Vec<&NetEdge> = net.routes.iter().collect();
    let widths: Vec<usize> = edges
        .iter()
        .map(|e| route_data(ctx, e).map(|r| width_index(r.width)).unwrap_or(0))
        .collect();

    for (i, e) in edges.iter().enumerate() {
        let name = ctx.graph.name(e.id);
        if let Some(tag) = route_data(ctx, e).and_then(|r| r.runway.as_deref()) {
            if !net.is_known_runway(tag) {
                out.emit(
                    Code::RouteUnknownRunway,
                    format!("The taxi route '{}' is tagged to runway '{}', which does not exist.", name, tag),
                    [e.id],
                );
            }
        }

        if is_degenerate(e) {
            out.emit(
                Code::RouteZeroLength,
                format!("The taxi route '{}' has zero length.", name),
                [e.id],
            );
            continue;
        }
        let min_len = MIN_ROUTE_SEGMENT_M[widths[i]];
        if e.length() < min_len {
            out.emit(
                Code::RouteSegmentShort,
                format!(
                    "The taxi route '{}' is only {} long; routes of its size should be at least {}.",
                    name,
                    ctx.len_str(e.length()),
                    ctx.len_str(min_len)
                ),
                [e.id],
            );
        }
    }

    for group in duplicates(&edges) {
        out.emit(
            Code::RouteDuplicate,
            format!("{} taxi routes connect the same two nodes.", group.len()),
            group.iter().map(|&j| edges[j].id),
        );
    }

    for i in 0..edges.len() {
        if is_degenerate(edges[i]) {
            continue;
        }
        for j in (i + 1)..edges.len() {
            if is_degenerate(edges[j]) || edges[i].same_nodes(edges[j]) {
                continue;
            }
            let tol = JUNCTION_TOLERANCE_M[widths[i].max(widths[j])];
            match pair_defect(edges[i], edges[j], tol) {
                Some(PairDefect::NotJoined) => out.emit(
                    Code::RouteNotJoined,
                    format!(
                        "The taxi routes '{}' and '{}' end within {} of each other but are not joined.",
                        ctx.graph.name(edges[i].id),
                        ctx.graph.name(edges[j].id),
                        ctx.len_str(tol)
                    ),
                    [edges[i].id, edges[j].id],
                ),
                Some(PairDefect::TJunction) => out.emit(
                    Code::RouteTJunction,
                    format!(
                        "The taxi routes '{}' and '{}' form a T junction without a shared node.",
                        ctx.graph.name(edges[i].id),
                        ctx.graph.name(edges[j].id)
                    ),
                    [edges[i].id, edges[j].id],
                ),
                None => {}
            }
        }
    }
}

/// One error per edge whose source or target is missing, hidden, not a route
/// node, or outside this airport
pub fn check_edge_endpoints(ctx: &ValidationContext, net: &NetworkContext, out: &mut Findings) {
    for &id in &net.unresolved {
        let kind = ctx.graph.entity(id).map(|e| e.kind_name()).unwrap_or("edge");
        out.emit(
            Code::RouteEndpointInvalid,
            format!(
                "The {} '{}' does not connect two visible route nodes of this airport.",
                kind,
                ctx.graph.name(id)
            ),
            [id],
        );
    }
}

pub fn check_roads(ctx: &ValidationContext, net: &NetworkContext, out: &mut Findings) {
    let edges: Vec<&NetEdge> = net.roads.iter().collect();

    for e in &edges {
        if is_degenerate(e) {
            out.emit(
                Code::RoadZeroLength,
                format!("The road '{}' has zero length.", ctx.graph.name(e.id)),
                [e.id],
            );
        }
    }

    for group in duplicates(&edges) {
        out.emit(
            Code::RoadDuplicate,
            format!("{} roads connect the same two nodes.", group.len()),
            group.iter().map(|&j| edges[j].id),
        );
    }

    for i in 0..edges.len() {
        if is_degenerate(edges[i]) {
            continue;
        }
        for j in (i + 1)..edges.len() {
            if is_degenerate(edges[j]) || edges[i].same_nodes(edges[j]) {
                continue;
            }
            if pair_defect(edges[i], edges[j], ROAD_JOIN_TOLERANCE_M).is_some() {
                out.emit(
                    Code::RoadNotJoined,
                    format!(
                        "The roads '{}' and '{}' meet without a shared node.",
                        ctx.graph.name(edges[i].id),
                        ctx.graph.name(edges[j].id)
                    ),
                    [edges[i].id, edges[j].id],
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::ValidationConfig;
    use crate::diagnostic::DiagnosticList;
    use tarmac_core::NodeId;
    use tarmac_scene::entity::{RoadData, TaxiRouteData, WidthClass};
    use tarmac_scene::{collect, Entity, SceneGraph};

    fn run(g: &SceneGraph, apt: NodeId) -> Vec<Code> {
        let config = ValidationConfig::default();
        let ctx = ValidationContext::new(g, &config);
        let net = NetworkContext::build(&ctx, &collect(g, apt));
        let mut list = DiagnosticList::new();
        let mut out = Findings::new(&mut list, Some(apt), config.export_target);
        check_edge_endpoints(&ctx, &net, &mut out);
        check_route_junctions(&ctx, &net, &mut out);
        check_roads(&ctx, &net, &mut out);
        list.iter().map(|d| d.code()).collect()
    }

    #[test]
    fn test_shared_nodes_are_clean() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        let (nodes, _) = chain(&mut g, apt, &[0.0, 100.0, 200.0], 100.0, TaxiRouteData::new);
        let branch = node(&mut g, apt, 100.0, 200.0);
        route(&mut g, apt, "B", TaxiRouteData::new(nodes[1], branch));
        assert!(run(&g, apt).is_empty());
    }

    #[test]
    fn test_nearby_ends_not_joined() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        chain(&mut g, apt, &[0.0, 100.0], 100.0, TaxiRouteData::new);
        chain(&mut g, apt, &[100.5, 200.0], 100.0, TaxiRouteData::new);
        assert_eq!(run(&g, apt), vec![Code::RouteNotJoined]);
    }

    #[test]
    fn test_t_junction() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        chain(&mut g, apt, &[0.0, 200.0], 100.0, TaxiRouteData::new);
        let a = node(&mut g, apt, 100.0, 100.5);
        let b = node(&mut g, apt, 100.0, 200.0);
        route(&mut g, apt, "B", TaxiRouteData::new(a, b));
        assert_eq!(run(&g, apt), vec![Code::RouteTJunction]);
    }

    #[test]
    fn test_width_class_sets_tolerances() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        let wide = |s, t| TaxiRouteData::new(s, t).with_width(WidthClass::F);
        chain(&mut g, apt, &[0.0, 100.0, 110.0], 100.0, wide);
        chain(&mut g, apt, &[113.0, 200.0], 100.0, wide);
        assert_eq!(run(&g, apt), vec![Code::RouteSegmentShort, Code::RouteNotJoined]);
    }

    #[test]
    fn test_degenerate_duplicate_and_unknown_runway() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        let a = node(&mut g, apt, 0.0, 100.0);
        let b = node(&mut g, apt, 100.0, 100.0);
        route(&mut g, apt, "A", TaxiRouteData::new(a, a));
        route(&mut g, apt, "B", TaxiRouteData::new(a, b));
        route(&mut g, apt, "B", TaxiRouteData::new(b, a));
        let c = node(&mut g, apt, 0.0, 300.0);
        let d = node(&mut g, apt, 100.0, 300.0);
        route(&mut g, apt, "R", TaxiRouteData::new(c, d).with_runway("18/36"));
        assert_eq!(
            run(&g, apt),
            vec![Code::RouteZeroLength, Code::RouteUnknownRunway, Code::RouteDuplicate]
        );
    }

    #[test]
    fn test_edges_to_non_route_or_hidden_nodes() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        let (nodes, _) = chain(&mut g, apt, &[0.0, 100.0], 100.0, TaxiRouteData::new);
        let to_airport = route(&mut g, apt, "B", TaxiRouteData::new(nodes[1], apt));
        let hidden = node(&mut g, apt, 300.0, 100.0);
        g.set_hidden(hidden, true).unwrap();
        let to_hidden = route(&mut g, apt, "C", TaxiRouteData::new(nodes[0], hidden));

        let config = ValidationConfig::default();
        let ctx = ValidationContext::new(&g, &config);
        let net = NetworkContext::build(&ctx, &collect(&g, apt));
        assert_eq!(net.routes.len(), 1);
        assert_eq!(net.unresolved, vec![to_airport, to_hidden]);
        assert_eq!(
            run(&g, apt),
            vec![Code::RouteEndpointInvalid, Code::RouteEndpointInvalid]
        );
    }

    #[test]
    fn test_roads() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        let a = node(&mut g, apt, 0.0, 500.0);
        let b = node(&mut g, apt, 100.0, 500.0);
        let c = node(&mut g, apt, 100.5, 500.0);
        let d = node(&mut g, apt, 200.0, 500.0);
        let road = |s, t| {
            Entity::RoadEdge(RoadData {
                source: s,
                target: t,
                road_type: 1,
                width_m: 6.0,
            })
        };
        g.add(apt, "r1", road(a, b)).unwrap();
        g.add(apt, "r2", road(c, d)).unwrap();
        g.add(apt, "r3", road(d, d)).unwrap();
        assert_eq!(run(&g, apt), vec![Code::RoadZeroLength, Code::RoadNotJoined]);
    }
}
