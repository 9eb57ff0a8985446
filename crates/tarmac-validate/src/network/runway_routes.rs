//! Routes tagged to a runway: valence, span, turns and centerline

use super::{route_data, NetEdge, NetworkContext, RunwayBox};
use crate::code::Code;
use crate::context::ValidationContext;
use crate::diagnostic::Findings;
use std::collections::HashMap;
use tarmac_core::NodeId;

/// Runway routes must reach within this distance of each runway end, or
/// `RUNWAY_SPAN_SLOP_FRACTION` of the runway length if that is larger
pub const RUNWAY_SPAN_SLOP_MIN_M: f64 = 20.0;
pub const RUNWAY_SPAN_SLOP_FRACTION: f64 = 0.05;

pub const ALIGN_TOLERANCE_DEG: f64 = 3.0;

/// Slack on the lateral offset test for rounding in the projection
const LATERAL_EPSILON_M: f64 = 0.01;

pub fn check_runway_routes(ctx: &ValidationContext, net: &NetworkContext, out: &mut Findings) {
    for rwy in &net.runways {
        let edges: Vec<&NetEdge> = net
            .routes
            .iter()
            .filter(|e| {
                route_data(ctx, e)
                    .and_then(|r| r.runway.as_deref())
                    .is_some_and(|tag| rwy.matches(tag))
            })
            .collect();
        if edges.is_empty() {
            continue;
        }

        let single_chain = check_valence(rwy, &edges, out);
        check_span(ctx, rwy, &edges, out);
        if single_chain {
            check_turns(rwy, &edges, out);
        }
        check_centerline(rwy, &edges, out);
    }
}

fn edge_ids<'a>(edges: &'a [&NetEdge]) -> impl Iterator<Item = NodeId> + 'a {
    edges.iter().map(|e| e.id)
}

/// Count edge references per node. A runway route is one unbranched chain,
/// so exactly two nodes are referenced once. Returns whether that holds.
fn check_valence(rwy: &RunwayBox, edges: &[&NetEdge], out: &mut Findings) -> bool {
    let mut order: Vec<NodeId> = Vec::new();
    let mut counts: HashMap<NodeId, usize> = HashMap::new();
    for e in edges {
        for n in [e.source, e.target] {
            *counts.entry(n).or_insert_with(|| {
                order.push(n);
                0
            }) += 1;
        }
    }
    let count = |n: &NodeId| counts.get(n).copied().unwrap_or(0);

    let ends = order.iter().filter(|n| count(*n) == 1).count();
    let mut ok = ends == 2;
    if ends == 0 {
        out.emit(
            Code::RunwayRouteLoop,
            format!("The taxi routes on runway '{}' form a loop.", rwy.name),
            edge_ids(edges),
        );
    } else if ends != 2 {
        out.emit(
            Code::RunwayRouteNotContinuous,
            format!(
                "The taxi routes on runway '{}' are not continuous: they have {} loose ends.",
                rwy.name, ends
            ),
            edge_ids(edges),
        );
    }

    for n in order.iter().filter(|n| count(*n) >= 3) {
        ok = false;
        let touching = edges.iter().filter(|e| e.touches(*n)).map(|e| e.id);
        out.emit(
            Code::RunwayRouteSplit,
            format!(
                "The taxi routes on runway '{}' have a {}-way split.",
                rwy.name,
                count(n)
            ),
            std::iter::once(*n).chain(touching),
        );
    }
    ok
}

/// The extent of the projected endpoints stands in for the union of the
/// edges. A single chain projects onto one unbroken interval; a gap needs
/// two chains, which `check_valence` reports as not continuous.
fn check_span(ctx: &ValidationContext, rwy: &RunwayBox, edges: &[&NetEdge], out: &mut Findings) {
    let (lo, hi) = edges
        .iter()
        .flat_map(|e| [e.a, e.b])
        .map(|p| rwy.frame(p).0)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| (lo.min(s), hi.max(s)));

    let slop = RUNWAY_SPAN_SLOP_MIN_M.max(RUNWAY_SPAN_SLOP_FRACTION * rwy.length);
    if lo > slop || hi < rwy.length - slop {
        out.emit(
            Code::RunwayRouteSpan,
            format!(
                "The taxi routes on runway '{}' do not span enough runway: they run from {} to {} of {}.",
                rwy.name,
                ctx.len_str(lo.max(0.0)),
                ctx.len_str(hi.min(rwy.length)),
                ctx.len_str(rwy.length)
            ),
            edge_ids(edges),
        );
    }
}

/// Walk the chain from one loose end. At each shared node the stored
/// directions of the two edges must agree with how the node joins them: when
/// the node ends one edge and starts the next (or starts one and ends the
/// next) the directions should point the same way, otherwise opposite ways.
fn check_turns(rwy: &RunwayBox, edges: &[&NetEdge], out: &mut Findings) {
    let Some(start) = edges
        .iter()
        .flat_map(|e| [e.source, e.target])
        .find(|n| edges.iter().filter(|e| e.touches(*n)).count() == 1)
    else {
        return;
    };
    let Some(mut edge) = edges.iter().find(|e| e.touches(start)).copied() else {
        return;
    };
    let mut node = start;

    for _ in 0..edges.len() {
        let far = if edge.source == node { edge.target } else { edge.source };
        let Some(next) = edges
            .iter()
            .find(|e| e.touches(far) && e.id != edge.id)
            .copied()
        else {
            break;
        };

        let expect_same_way = (edge.target == far) == (next.source == far);
        let same_way = (edge.b - edge.a).dot(&(next.b - next.a)) > 0.0;
        if same_way != expect_same_way {
            out.emit(
                Code::RunwayRouteTightTurn,
                format!(
                    "The taxi routes on runway '{}' double back on themselves.",
                    rwy.name
                ),
                [edge.id, next.id, far],
            );
        }
        node = far;
        edge = next;
    }
}

fn check_centerline(rwy: &RunwayBox, edges: &[&NetEdge], out: &mut Findings) {
    let cos_tolerance = ALIGN_TOLERANCE_DEG.to_radians().cos();
    for e in edges {
        let (_, t0) = rwy.frame(e.a);
        let (_, t1) = rwy.frame(e.b);
        let limit = rwy.half_width + LATERAL_EPSILON_M;
        if t0.abs() > limit || t1.abs() > limit {
            out.emit(
                Code::RunwayRouteOffCenter,
                format!(
                    "A taxi route tagged to runway '{}' is not on the runway centerline.",
                    rwy.name
                ),
                [e.id],
            );
            continue;
        }

        let dir = (e.b - e.a).normalized();
        if e.length() > 0.0 && dir.dot(&rwy.along).abs() < cos_tolerance {
            out.emit(
                Code::RunwayRouteMisaligned,
                format!(
                    "A taxi route tagged to runway '{}' is not aligned with the runway.",
                    rwy.name
                ),
                [e.id],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::ValidationConfig;
    use crate::diagnostic::DiagnosticList;
    use tarmac_scene::entity::TaxiRouteData;
    use tarmac_scene::{collect, SceneGraph};

    fn on_runway(s: NodeId, t: NodeId) -> TaxiRouteData {
        TaxiRouteData::new(s, t).with_runway("09/27")
    }

    fn run(g: &SceneGraph, apt: NodeId) -> DiagnosticList {
        let config = ValidationConfig::default();
        let ctx = ValidationContext::new(g, &config);
        let net = NetworkContext::build(&ctx, &collect(g, apt));
        let mut list = DiagnosticList::new();
        let mut out = Findings::new(&mut list, Some(apt), config.export_target);
        check_runway_routes(&ctx, &net, &mut out);
        list
    }

    #[test]
    fn test_straight_chain_is_clean() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        chain(&mut g, apt, &[0.0, 300.0, 700.0, 1000.0], 0.0, on_runway);
        let list = run(&g, apt);
        assert!(list.is_empty(), "{:?}", list);
    }

    #[test]
    fn test_gap_is_reported_as_not_continuous() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        chain(&mut g, apt, &[0.0, 400.0], 0.0, on_runway);
        chain(&mut g, apt, &[600.0, 1000.0], 0.0, on_runway);
        let codes: Vec<Code> = run(&g, apt).iter().map(|d| d.code()).collect();
        assert_eq!(codes, vec![Code::RunwayRouteNotContinuous]);
    }

    #[test]
    fn test_branch_is_one_split() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        let (nodes, _) = chain(&mut g, apt, &[0.0, 500.0, 1000.0], 0.0, on_runway);
        let spur = node(&mut g, apt, 500.0, 10.0);
        route(&mut g, apt, "spur", on_runway(nodes[1], spur));

        let list = run(&g, apt);
        let splits: Vec<_> = list.with_code(Code::RunwayRouteSplit).collect();
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].nodes()[0], nodes[1]);
        assert!(splits[0].message().contains("3-way"));
    }

    #[test]
    fn test_loop() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        let (nodes, _) = chain(&mut g, apt, &[0.0, 1000.0], 0.0, on_runway);
        route(&mut g, apt, "back", on_runway(nodes[1], nodes[0]));
        let list = run(&g, apt);
        assert_eq!(list.with_code(Code::RunwayRouteLoop).count(), 1);
    }

    #[test]
    fn test_short_span() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        chain(&mut g, apt, &[150.0, 850.0], 0.0, on_runway);
        let codes: Vec<Code> = run(&g, apt).iter().map(|d| d.code()).collect();
        assert_eq!(codes, vec![Code::RunwayRouteSpan]);
    }

    #[test]
    fn test_reversed_edge_is_not_a_turn() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        let a = node(&mut g, apt, 0.0, 0.0);
        let b = node(&mut g, apt, 500.0, 0.0);
        let c = node(&mut g, apt, 1000.0, 0.0);
        route(&mut g, apt, "A", on_runway(a, b));
        route(&mut g, apt, "A", on_runway(c, b));
        assert!(run(&g, apt).is_empty());
    }

    #[test]
    fn test_doubling_back_is_a_turn() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        chain(&mut g, apt, &[0.0, 1000.0, 600.0], 0.0, on_runway);
        let codes: Vec<Code> = run(&g, apt).iter().map(|d| d.code()).collect();
        assert_eq!(codes, vec![Code::RunwayRouteTightTurn]);
    }

    #[test]
    fn test_off_center_and_misaligned() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        let a = node(&mut g, apt, 0.0, 0.0);
        let b = node(&mut g, apt, 200.0, 12.0);
        let c = node(&mut g, apt, 1000.0, 40.0);
        route(&mut g, apt, "A", on_runway(a, b));
        route(&mut g, apt, "A", on_runway(b, c));
        let codes: Vec<Code> = run(&g, apt).iter().map(|d| d.code()).collect();
        assert_eq!(
            codes,
            vec![Code::RunwayRouteMisaligned, Code::RunwayRouteOffCenter]
        );
    }
}
