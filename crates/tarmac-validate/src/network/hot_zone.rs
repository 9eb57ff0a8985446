//! Runway hot zones
//!
//! Each runway end has an arrival and a departure zone: the runway box
//! widened by a lateral margin and stretched past the threshold (arrivals) or
//! past the far end (departures). Aircraft routes crossing a zone must carry
//! the matching hot zone tag.

use super::{is_aircraft, route_data, width_index, NetEdge, NetworkContext, RunwayBox};
use crate::code::Code;
use crate::context::ValidationContext;
use crate::diagnostic::Findings;
use crate::rules::naming::canonical_end;
use std::collections::BTreeSet;
use tarmac_core::{NodeId, Vec2};
use tarmac_scene::entity::RampData;
use tarmac_scene::Entity;

pub const HOT_LATERAL_PAVED_M: f64 = 45.0;
pub const HOT_LATERAL_UNPAVED_M: f64 = 15.0;

/// Wingspan used for a ramp start's footprint, by width class
const RAMP_SPAN_M: [f64; 6] = [15.0, 24.0, 36.0, 52.0, 65.0, 80.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneOp {
    Arrival,
    Departure,
}

impl ZoneOp {
    fn label(self) -> &'static str {
        match self {
            ZoneOp::Arrival => "arrival",
            ZoneOp::Departure => "departure",
        }
    }
}

/// How far a zone reaches past the runway
pub fn hot_zone_extension(length: f64, paved: bool) -> f64 {
    if paved {
        (0.2 * length).clamp(150.0, 600.0)
    } else {
        (0.1 * length).clamp(60.0, 300.0)
    }
}

/// Axis-aligned rectangle in a runway's frame: `s` along, `t` across
#[derive(Debug, Clone, Copy)]
struct Zone {
    s_min: f64,
    s_max: f64,
    t_max: f64,
}

impl Zone {
    fn for_end(rwy: &RunwayBox, end: usize, op: ZoneOp) -> Self {
        let ext = hot_zone_extension(rwy.length, rwy.paved);
        // End 0 sits at s = 0 and faces toward s = length
        let before_start = matches!((end, op), (0, ZoneOp::Arrival) | (1, ZoneOp::Departure));
        let (s_min, s_max) = if before_start {
            (-ext, rwy.length)
        } else {
            (0.0, rwy.length + ext)
        };
        Self {
            s_min,
            s_max,
            t_max: lateral_limit(rwy),
        }
    }

    /// Union of all four zones of a runway
    fn whole(rwy: &RunwayBox) -> Self {
        let ext = hot_zone_extension(rwy.length, rwy.paved);
        Self {
            s_min: -ext,
            s_max: rwy.length + ext,
            t_max: lateral_limit(rwy),
        }
    }

    fn contains(&self, (s, t): (f64, f64)) -> bool {
        (self.s_min..=self.s_max).contains(&s) && t.abs() <= self.t_max
    }

    /// Liang-Barsky clip of the segment `p`-`q` against the zone
    fn hits_segment(&self, p: (f64, f64), q: (f64, f64)) -> bool {
        let (ds, dt) = (q.0 - p.0, q.1 - p.1);
        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;
        let bounds = [
            (-ds, p.0 - self.s_min),
            (ds, self.s_max - p.0),
            (-dt, p.1 + self.t_max),
            (dt, self.t_max - p.1),
        ];
        for (denom, num) in bounds {
            if denom == 0.0 {
                if num < 0.0 {
                    return false;
                }
            } else {
                let r = num / denom;
                if denom < 0.0 {
                    t0 = t0.max(r);
                } else {
                    t1 = t1.min(r);
                }
                if t0 > t1 {
                    return false;
                }
            }
        }
        true
    }
}

fn lateral_limit(rwy: &RunwayBox) -> f64 {
    let margin = if rwy.paved {
        HOT_LATERAL_PAVED_M
    } else {
        HOT_LATERAL_UNPAVED_M
    };
    rwy.half_width + margin
}

fn has_tag(tags: &BTreeSet<String>, end: &str) -> bool {
    tags.iter().any(|t| canonical_end(t).as_deref() == Some(end))
}

fn ramp_corners(net: &NetworkContext, ramp: &RampData) -> [Vec2; 4] {
    let center = net.projection.to_local(ramp.location);
    let half = RAMP_SPAN_M[width_index(ramp.width)] * 0.5;
    let heading = ramp.heading.to_radians();
    let fwd = Vec2::new(heading.sin(), heading.cos()) * half;
    let right = Vec2::new(heading.cos(), -heading.sin()) * half;
    [
        center + fwd + right,
        center + fwd - right,
        center - fwd - right,
        center - fwd + right,
    ]
}

pub fn check_hot_zones(ctx: &ValidationContext, net: &NetworkContext, ramps: &[NodeId], out: &mut Findings) {
    let aircraft: Vec<&NetEdge> = net
        .routes
        .iter()
        .filter(|e| route_data(ctx, e).is_some_and(is_aircraft))
        .collect();

    for rwy in &net.runways {
        for (end, end_name) in rwy.end_names.iter().enumerate() {
            for op in [ZoneOp::Arrival, ZoneOp::Departure] {
                let zone = Zone::for_end(rwy, end, op);
                let missing: Vec<NodeId> = aircraft
                    .iter()
                    .filter_map(|e| {
                        let route = route_data(ctx, e)?;
                        if route.runway.as_deref().is_some_and(|tag| rwy.matches(tag)) {
                            return None;
                        }
                        let tags = match op {
                            ZoneOp::Arrival => &route.hot_arrival,
                            ZoneOp::Departure => &route.hot_departure,
                        };
                        let hit = zone.hits_segment(rwy.frame(e.a), rwy.frame(e.b));
                        (hit && !has_tag(tags, end_name)).then_some(e.id)
                    })
                    .collect();
                if !missing.is_empty() {
                    out.emit(
                        Code::HotZoneMissing,
                        format!(
                            "{} taxi route(s) cross the {} hot zone of runway {} but are not marked hot for {}.",
                            missing.len(),
                            op.label(),
                            end_name,
                            op.label()
                        ),
                        missing,
                    );
                }
            }
        }

        let whole = Zone::whole(rwy);
        for &id in ramps {
            let Some(Entity::RampPosition(ramp)) = ctx.graph.entity(id) else {
                continue;
            };
            if ramp_corners(net, ramp).iter().any(|c| whole.contains(rwy.frame(*c))) {
                out.emit(
                    Code::HotZoneRamp,
                    format!(
                        "The ramp start '{}' is inside the hot zone of runway '{}'.",
                        ctx.graph.name(id),
                        rwy.name
                    ),
                    [id],
                );
            }
        }
    }

    for e in &aircraft {
        let Some(route) = route_data(ctx, e) else {
            continue;
        };
        let unknown: Vec<&str> = route
            .hot_arrival
            .iter()
            .chain(&route.hot_departure)
            .chain(&route.hot_ils)
            .map(String::as_str)
            .filter(|t| !net.is_known_end(t))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if !unknown.is_empty() {
            out.emit(
                Code::HotZoneUnknownRunway,
                format!(
                    "The taxi route '{}' is marked hot for runway end(s) {} that do not exist.",
                    ctx.graph.name(e.id),
                    unknown.join(", ")
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
    use tarmac_scene::entity::{Equipment, RampType, TaxiRouteData};
    use tarmac_scene::{collect, SceneGraph};

    fn run(g: &SceneGraph, apt: NodeId) -> DiagnosticList {
        let config = ValidationConfig::default();
        let ctx = ValidationContext::new(g, &config);
        let col = collect(g, apt);
        let net = NetworkContext::build(&ctx, &col);
        let mut list = DiagnosticList::new();
        let mut out = Findings::new(&mut list, Some(apt), config.export_target);
        check_hot_zones(&ctx, &net, &col.ramps, &mut out);
        list
    }

    fn crossing(g: &mut SceneGraph, apt: NodeId, x: f64, data: impl Fn(NodeId, NodeId) -> TaxiRouteData) -> NodeId {
        let a = node(g, apt, x, -100.0);
        let b = node(g, apt, x, 100.0);
        route(g, apt, "B", data(a, b))
    }

    fn tags(ends: &[&str]) -> BTreeSet<String> {
        ends.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extension_limits() {
        assert_eq!(hot_zone_extension(500.0, true), 150.0);
        assert_eq!(hot_zone_extension(2000.0, true), 400.0);
        assert_eq!(hot_zone_extension(5000.0, true), 600.0);
        assert_eq!(hot_zone_extension(300.0, false), 60.0);
        assert_eq!(hot_zone_extension(5000.0, false), 300.0);
    }

    #[test]
    fn test_unmarked_crossing() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        let id = crossing(&mut g, apt, 500.0, TaxiRouteData::new);
        let list = run(&g, apt);
        assert_eq!(list.len(), 4);
        assert!(list.iter().all(|d| d.code() == Code::HotZoneMissing && d.nodes() == [id]));
    }

    #[test]
    fn test_marked_crossing() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        crossing(&mut g, apt, 500.0, |a, b| TaxiRouteData {
            hot_arrival: tags(&["09", "27"]),
            hot_departure: tags(&["9", "27"]),
            ..TaxiRouteData::new(a, b)
        });
        assert!(run(&g, apt).is_empty());
    }

    #[test]
    fn test_crossing_before_threshold() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        crossing(&mut g, apt, -100.0, TaxiRouteData::new);
        let list = run(&g, apt);
        let messages: Vec<&str> = list.iter().map(|d| d.message()).collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("arrival hot zone of runway 09"));
        assert!(messages[1].contains("departure hot zone of runway 27"));
    }

    #[test]
    fn test_parallel_taxiway_is_clear() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        chain(&mut g, apt, &[0.0, 500.0, 1000.0], 100.0, TaxiRouteData::new);
        assert!(run(&g, apt).is_empty());
    }

    #[test]
    fn test_unknown_end_and_ramp() {
        let (mut g, apt, _) = airport_with_runway(1000.0);
        let a = node(&mut g, apt, 0.0, 200.0);
        let b = node(&mut g, apt, 100.0, 200.0);
        let bad = route(
            &mut g,
            apt,
            "C",
            TaxiRouteData {
                hot_ils: tags(&["18"]),
                ..TaxiRouteData::new(a, b)
            },
        );
        let ramp = g
            .add(
                apt,
                "GA 1",
                Entity::RampPosition(RampData {
                    location: east(500.0, 40.0),
                    heading: 0.0,
                    ramp_type: RampType::TieDown,
                    equipment: vec![Equipment::Props],
                    width: Default::default(),
                    operation: Default::default(),
                    airlines: String::new(),
                }),
            )
            .unwrap();

        let found: Vec<(Code, NodeId)> = run(&g, apt).iter().map(|d| (d.code(), d.nodes()[0])).collect();
        assert_eq!(
            found,
            vec![(Code::HotZoneRamp, ramp), (Code::HotZoneUnknownRunway, bad)]
        );
    }
}
