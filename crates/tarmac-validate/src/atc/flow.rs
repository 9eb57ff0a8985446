//! ATC flows: rule legality, wind coverage and tailwind exposure
//!
//! Flows are tried in declared order and the first whose rules match wins,
//! so coverage is accounted cumulatively: a flow only claims the part of the
//! wind rose where it raises the speed covered by the flows before it.

use crate::code::Code;
use crate::context::ValidationContext;
use crate::diagnostic::Findings;
use crate::rules::naming::{canonical_end, runway_end_names};
use std::collections::HashMap;
use tarmac_core::{bearing_deg, heading_delta, LatLon, NodeId};
use tarmac_scene::entity::{FlowData, RunwayUseData, TimeRuleData, WindRuleData};
use tarmac_scene::{Collection, Entity};

/// Wind speed a flow without wind rules accepts
pub const MAX_WIND_KT: u32 = 999;

pub const TAILWIND_LIMIT_KT: f64 = 10.0;
pub const DEPARTURE_ONLY_TAILWIND_LIMIT_KT: f64 = 15.0;

/// Highest wind speed covered, per degree the wind blows from
pub type WindRose = [u32; 360];

/// A flow with its rules, read from its visible children
pub struct FlowRules<'g> {
    pub id: NodeId,
    pub flow: &'g FlowData,
    pub winds: Vec<(NodeId, &'g WindRuleData)>,
    pub times: Vec<(NodeId, &'g TimeRuleData)>,
    pub uses: Vec<(NodeId, &'g RunwayUseData)>,
}

impl<'g> FlowRules<'g> {
    pub fn read(ctx: &ValidationContext<'g>, id: NodeId) -> Option<Self> {
        let graph = ctx.graph;
        let Some(Entity::AtcFlow(flow)) = graph.entity(id) else {
            return None;
        };
        let mut rules = Self {
            id,
            flow,
            winds: Vec::new(),
            times: Vec::new(),
            uses: Vec::new(),
        };
        for &child in graph.children(id) {
            if graph.is_hidden(child) {
                continue;
            }
            match graph.entity(child) {
                Some(Entity::AtcWindRule(w)) => rules.winds.push((child, w)),
                Some(Entity::AtcTimeRule(t)) => rules.times.push((child, t)),
                Some(Entity::AtcRunwayUse(u)) => rules.uses.push((child, u)),
                _ => {}
            }
        }
        Some(rules)
    }

    /// A flow without time restriction or weather minima is always eligible
    pub fn is_unconditional(&self) -> bool {
        self.times.is_empty() && self.flow.visibility_sm == 0.0 && self.flow.ceiling_ft == 0.0
    }

    /// Speeds this flow accepts on its own, per degree
    pub fn coverage(&self) -> WindRose {
        if self.winds.is_empty() {
            return [MAX_WIND_KT; 360];
        }
        let mut rose = [0; 360];
        for (_, w) in &self.winds {
            if wind_rule_problem(w).is_some() {
                continue;
            }
            let speed = w.speed_kt.unsigned_abs();
            for d in rule_degrees(w.dir_lo_deg as usize, w.dir_hi_deg as usize) {
                rose[d] = rose[d].max(speed);
            }
        }
        rose
    }
}

/// Degrees in `[lo, hi)` going clockwise, wrapping at 360. Equal bounds mean
/// the whole circle.
pub fn rule_degrees(lo: usize, hi: usize) -> impl Iterator<Item = usize> {
    let lo = lo % 360;
    let hi = hi % 360;
    let count = if lo == hi { 360 } else { (hi + 360 - lo) % 360 };
    (0..count).map(move |i| (lo + i) % 360)
}

/// Contiguous runs of degrees where `pred` holds, merged across north.
/// Each run is `(first degree, length)`.
pub fn degree_runs(pred: impl Fn(usize) -> bool) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    let mut d = 0;
    while d < 360 {
        if pred(d) {
            let start = d;
            while d < 360 && pred(d) {
                d += 1;
            }
            runs.push((start, d - start));
        } else {
            d += 1;
        }
    }
    if runs.len() > 1 {
        let (first_start, first_len) = runs[0];
        let (last_start, last_len) = runs[runs.len() - 1];
        if first_start == 0 && last_start + last_len == 360 {
            runs.remove(0);
            if let Some(last) = runs.last_mut() {
                *last = (last_start, last_len + first_len);
            }
        }
    }
    runs
}

fn wind_rule_problem(w: &WindRuleData) -> Option<String> {
    let dir_ok = |d: i32| (0..360).contains(&d);
    if !dir_ok(w.dir_lo_deg) || !dir_ok(w.dir_hi_deg) {
        Some(format!(
            "directions {} to {} must be between 0 and 359",
            w.dir_lo_deg, w.dir_hi_deg
        ))
    } else if w.speed_kt <= 0 {
        Some(format!("speed {} kt must be positive", w.speed_kt))
    } else {
        None
    }
}

fn zulu_ok(hhmm: u32) -> bool {
    hhmm <= 2400 && hhmm % 100 < 60
}

fn time_rule_problem(t: &TimeRuleData) -> Option<String> {
    if !zulu_ok(t.start_zulu) || !zulu_ok(t.end_zulu) {
        Some(format!(
            "times {:04} to {:04} must be between 0000 and 2400",
            t.start_zulu, t.end_zulu
        ))
    } else if t.start_zulu >= t.end_zulu {
        Some(format!("start {:04} must be before end {:04}", t.start_zulu, t.end_zulu))
    } else {
        None
    }
}

/// Heading of every runway and sealane end at the airport, by canonical
/// end name, with the position of the threshold
fn end_headings(ctx: &ValidationContext, col: &Collection) -> HashMap<String, (f64, LatLon)> {
    let mut out = HashMap::new();
    for &id in col.runways.iter().chain(&col.sealanes) {
        let ends = match ctx.graph.entity(id) {
            Some(Entity::Runway(r)) => r.ends,
            Some(Entity::Sealane(s)) => s.ends,
            _ => continue,
        };
        if let Some([lo, hi]) = runway_end_names(ctx.graph.name(id)) {
            out.insert(lo, (bearing_deg(ends[0], ends[1]), ends[0]));
            out.insert(hi, (bearing_deg(ends[1], ends[0]), ends[1]));
        }
    }
    out
}

fn check_flow_rules(rules: &FlowRules, ctx: &ValidationContext, ends: &HashMap<String, (f64, LatLon)>, out: &mut Findings) {
    let id = rules.id;
    let name = ctx.graph.name(id);
    let flow = rules.flow;

    if name.trim().is_empty() {
        out.emit(Code::FlowNameEmpty, "An ATC flow has an empty name.", [id]);
    }
    if flow.metar_icao.trim().is_empty() {
        out.emit(
            Code::FlowNoMetar,
            format!("The ATC flow '{}' has no METAR station.", name),
            [id],
        );
    }
    if flow.visibility_sm < 0.0 || flow.ceiling_ft < 0.0 {
        out.emit(
            Code::FlowMinimaInvalid,
            format!("The ATC flow '{}' has negative visibility or ceiling minima.", name),
            [id],
        );
    }
    if rules.uses.is_empty() {
        out.emit(
            Code::FlowNoRunwayUse,
            format!("The ATC flow '{}' does not use any runway.", name),
            [id],
        );
    }
    if let Some(pattern) = &flow.pattern_runway {
        let known = canonical_end(pattern).is_some_and(|e| ends.contains_key(&e));
        if !known {
            out.emit(
                Code::FlowUnknownRunway,
                format!("The ATC flow '{}' has pattern runway '{}', which does not exist.", name, pattern),
                [id],
            );
        }
    }

    for (rule_id, w) in &rules.winds {
        if let Some(problem) = wind_rule_problem(w) {
            out.emit(
                Code::WindRuleInvalid,
                format!("A wind rule of ATC flow '{}' is invalid: {}.", name, problem),
                [*rule_id],
            );
        }
    }
    for (rule_id, t) in &rules.times {
        if let Some(problem) = time_rule_problem(t) {
            out.emit(
                Code::TimeRuleInvalid,
                format!("A time rule of ATC flow '{}' is invalid: {}.", name, problem),
                [*rule_id],
            );
        }
    }
    for (use_id, u) in &rules.uses {
        let known = canonical_end(&u.runway).is_some_and(|e| ends.contains_key(&e));
        if !known {
            out.emit(
                Code::FlowUnknownRunway,
                format!("The ATC flow '{}' uses runway '{}', which does not exist.", name, u.runway),
                [*use_id],
            );
        }
    }
}

/// Worst tailwind a runway use sees under a flow's own wind rules
fn check_tailwind(rules: &FlowRules, ctx: &ValidationContext, ends: &HashMap<String, (f64, LatLon)>, out: &mut Findings) {
    if rules.winds.is_empty() {
        return;
    }
    let rose = rules.coverage();
    let name = ctx.graph.name(rules.id);

    for (use_id, u) in &rules.uses {
        let Some(&(heading, at)) = canonical_end(&u.runway).and_then(|e| ends.get(&e)) else {
            continue;
        };
        // Wind rules are magnetic
        let heading = ctx.magnetic.magnetic(heading, at);
        let worst = (0..360)
            .filter(|&d| rose[d] > 0)
            .map(|d| {
                let angle = heading_delta(d as f64, heading).to_radians();
                (d, -f64::from(rose[d]) * angle.cos())
            })
            .fold(None, |best: Option<(usize, f64)>, cur| match best {
                Some(b) if b.1 >= cur.1 => Some(b),
                _ => Some(cur),
            });

        let limit = if u.departures && !u.arrivals {
            DEPARTURE_ONLY_TAILWIND_LIMIT_KT
        } else {
            TAILWIND_LIMIT_KT
        };
        if let Some((degree, tailwind)) = worst {
            if tailwind > limit {
                out.emit(
                    Code::FlowTailwind,
                    format!(
                        "The ATC flow '{}' allows a {:.0} kt tailwind on runway {} (wind from {:03}).",
                        name, tailwind, u.runway, degree
                    ),
                    [*use_id],
                );
            }
        }
    }
}

pub fn check_flows(ctx: &ValidationContext, col: &Collection, out: &mut Findings) {
    let ends = end_headings(ctx, col);
    let flows: Vec<FlowRules> = col
        .flows
        .iter()
        .filter_map(|&id| FlowRules::read(ctx, id))
        .collect();
    if flows.is_empty() {
        return;
    }

    let mut covered: WindRose = [0; 360];
    for rules in &flows {
        check_flow_rules(rules, ctx, &ends, out);
        check_tailwind(rules, ctx, &ends, out);

        let own = rules.coverage();
        let improves = (0..360).any(|d| own[d] > covered[d]);
        if !improves {
            out.emit(
                Code::FlowUnreachable,
                format!(
                    "The ATC flow '{}' can never be reached: earlier flows already cover all of its winds.",
                    ctx.graph.name(rules.id)
                ),
                [rules.id],
            );
        }
        if rules.is_unconditional() {
            for d in 0..360 {
                covered[d] = covered[d].max(own[d]);
            }
        }
    }

    let flow_ids: Vec<NodeId> = flows.iter().map(|f| f.id).collect();
    for (start, len) in degree_runs(|d| covered[d] < MAX_WIND_KT) {
        let best = (0..len).map(|i| covered[(start + i) % 360]).min().unwrap_or(0);
        let range = if len == 360 {
            "any direction".to_string()
        } else {
            format!("{:03} to {:03} degrees", start, (start + len - 1) % 360)
        };
        out.emit(
            Code::WindCoverageInsufficient,
            format!(
                "No always-active ATC flow covers winds from {} above {} kt.",
                range, best
            ),
            flow_ids.iter().copied(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationConfig;
    use crate::diagnostic::DiagnosticList;
    use proptest::prelude::*;
    use tarmac_scene::entity::{AirportData, RunwayData, Surface};
    use tarmac_scene::SceneGraph;

    struct Field {
        g: SceneGraph,
        apt: NodeId,
    }

    impl Field {
        fn new() -> Self {
            let mut g = SceneGraph::new();
            let apt = g
                .add(
                    g.root(),
                    "Test",
                    Entity::Airport(AirportData {
                        icao: "KXYZ".to_string(),
                        ..Default::default()
                    }),
                )
                .unwrap();
            g.add(
                apt,
                "09/27",
                Entity::Runway(RunwayData {
                    ends: [LatLon::new(-100.0, 40.0), LatLon::new(-99.99, 40.0)],
                    width_m: 30.0,
                    surface: Surface::Asphalt,
                    roughness: 0.25,
                    displaced_m: [0.0, 0.0],
                    blastpad_m: [0.0, 0.0],
                }),
            )
            .unwrap();
            Self { g, apt }
        }

        fn flow(&mut self, name: &str, winds: &[(i32, i32, i32)], runway: &str) -> NodeId {
            let flow = self
                .g
                .add(
                    self.apt,
                    name,
                    Entity::AtcFlow(FlowData {
                        metar_icao: "KXYZ".to_string(),
                        ..Default::default()
                    }),
                )
                .unwrap();
            for &(lo, hi, speed) in winds {
                self.g
                    .add(
                        flow,
                        "wind",
                        Entity::AtcWindRule(WindRuleData {
                            metar_icao: "KXYZ".to_string(),
                            dir_lo_deg: lo,
                            dir_hi_deg: hi,
                            speed_kt: speed,
                        }),
                    )
                    .unwrap();
            }
            self.g
                .add(
                    flow,
                    runway,
                    Entity::AtcRunwayUse(RunwayUseData {
                        runway: runway.to_string(),
                        arrivals: true,
                        departures: true,
                    }),
                )
                .unwrap();
            flow
        }

        fn run(&self) -> DiagnosticList {
            let config = ValidationConfig::default();
            let ctx = ValidationContext::new(&self.g, &config);
            let mut list = DiagnosticList::new();
            let mut out = Findings::new(&mut list, Some(self.apt), config.export_target);
            check_flows(&ctx, &tarmac_scene::collect(&self.g, self.apt), &mut out);
            list
        }
    }

    #[test]
    fn test_rule_degrees_wrap() {
        assert_eq!(rule_degrees(350, 10).collect::<Vec<_>>().len(), 20);
        assert_eq!(rule_degrees(90, 90).count(), 360);
        assert_eq!(rule_degrees(0, 180).last(), Some(179));
    }

    #[test]
    fn test_runs_merge_across_north() {
        let runs = degree_runs(|d| !(10..350).contains(&d));
        assert_eq!(runs, vec![(350, 20)]);
        assert_eq!(degree_runs(|_| true), vec![(0, 360)]);
        assert!(degree_runs(|_| false).is_empty());
    }

    #[test]
    fn test_full_coverage_is_clean() {
        let mut f = Field::new();
        f.flow("West", &[(180, 0, 999)], "27");
        f.flow("East", &[(0, 180, 999)], "09");
        let list = f.run();
        assert_eq!(list.with_code(Code::WindCoverageInsufficient).count(), 0);
        assert_eq!(list.with_code(Code::FlowUnreachable).count(), 0);
    }

    #[test]
    fn test_gap_and_shadowed_flow() {
        let mut f = Field::new();
        f.flow("West", &[(180, 0, 999)], "27");
        let shadowed = f.flow("West again", &[(200, 300, 999)], "27");
        let list = f.run();

        let unreachable: Vec<_> = list.with_code(Code::FlowUnreachable).collect();
        assert_eq!(unreachable.len(), 1);
        assert_eq!(unreachable[0].nodes(), &[shadowed]);

        let gaps: Vec<_> = list.with_code(Code::WindCoverageInsufficient).collect();
        assert_eq!(gaps.len(), 1);
        assert!(gaps[0].message().contains("000 to 179"));
    }

    #[test]
    fn test_calm_flow_without_rules_covers_everything() {
        let mut f = Field::new();
        f.flow("Calm", &[], "27");
        let list = f.run();
        assert_eq!(list.with_code(Code::WindCoverageInsufficient).count(), 0);
    }

    #[test]
    fn test_tailwind() {
        let mut f = Field::new();
        let flow = f.flow("Any", &[(0, 0, 20)], "09");
        let list = f.run();
        let tail: Vec<_> = list.with_code(Code::FlowTailwind).collect();
        assert_eq!(tail.len(), 1);
        assert!(tail[0].message().contains("wind from 270"));
        assert_eq!(f.g.parent(tail[0].nodes()[0]), Some(flow));
    }

    #[test]
    fn test_rule_legality() {
        let mut f = Field::new();
        let flow = f.flow("Bad", &[(0, 400, 10), (0, 90, 0)], "18");
        f.g.add(
            flow,
            "time",
            Entity::AtcTimeRule(TimeRuleData {
                start_zulu: 1800,
                end_zulu: 1200,
            }),
        )
        .unwrap();
        let list = f.run();
        assert_eq!(list.with_code(Code::WindRuleInvalid).count(), 2);
        assert_eq!(list.with_code(Code::TimeRuleInvalid).count(), 1);
        assert_eq!(list.with_code(Code::FlowUnknownRunway).count(), 1);
    }

    proptest! {
        #[test]
        fn prop_gaps_are_complement_of_rules(
            rules in prop::collection::vec((0i32..360, 0i32..360), 1..5)
        ) {
            let mut f = Field::new();
            for (i, &(lo, hi)) in rules.iter().enumerate() {
                f.flow(&format!("Flow {}", i), &[(lo, hi, 999)], "27");
            }

            let mut expected = [true; 360];
            for &(lo, hi) in &rules {
                for d in rule_degrees(lo as usize, hi as usize) {
                    expected[d] = false;
                }
            }

            let mut reported = [false; 360];
            let list = f.run();
            for d in list.with_code(Code::WindCoverageInsufficient) {
                let msg = d.message();
                if msg.contains("any direction") {
                    reported = [true; 360];
                    continue;
                }
                let from: usize = msg[msg.find("from ").unwrap() + 5..][..3].parse().unwrap();
                let to: usize = msg[msg.find(" to ").unwrap() + 4..][..3].parse().unwrap();
                for deg in rule_degrees(from, (to + 1) % 360) {
                    reported[deg] = true;
                }
            }
            prop_assert_eq!(reported.to_vec(), expected.to_vec());
        }
    }
}
