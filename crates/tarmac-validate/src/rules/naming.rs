//! Runway, sealane and helipad naming

use crate::code::Code;
use crate::context::ValidationContext;
use crate::diagnostic::Findings;
use regex::Regex;
use std::sync::LazyLock;
use tarmac_core::{bearing_deg, heading_delta, normalize_deg, LatLon, NodeId};
use tarmac_scene::Entity;

pub const RUNWAY_NAME_HEADING_TOLERANCE_DEG: f64 = 15.0;

/// Above this latitude the grid bearing is accepted as well
pub const GRID_LATITUDE_DEG: f64 = 60.0;

static HELIPAD_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^H[0-9]+$").unwrap());

/// One half of a runway name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndName {
    pub number: u32,
    pub suffix: Option<char>,
}

impl EndName {
    /// Canonical form: two digit number plus suffix, e.g. `09L`
    pub fn canonical(&self) -> String {
        match self.suffix {
            Some(s) => format!("{:02}{}", self.number, s),
            None => format!("{:02}", self.number),
        }
    }
}

/// Parse `"<digits><suffix?>"`
pub fn parse_end(s: &str) -> Option<EndName> {
    let s = s.trim();
    let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if digits_end == 0 || digits_end > 2 {
        return None;
    }
    let number = s[..digits_end].parse().ok()?;
    let mut rest = s[digits_end..].chars();
    let suffix = rest.next();
    if rest.next().is_some() {
        return None;
    }
    Some(EndName { number, suffix })
}

/// Canonical name of a single runway end as written in flows, hot zone tags
/// and reference data
pub fn canonical_end(s: &str) -> Option<String> {
    parse_end(s).map(|e| e.canonical())
}

/// Canonical end names of a two-part runway name, low end first
pub fn runway_end_names(name: &str) -> Option<[String; 2]> {
    let (lo, hi) = name.split_once('/')?;
    Some([parse_end(lo)?.canonical(), parse_end(hi)?.canonical()])
}

fn suffixes_pair(a: Option<char>, b: Option<char>) -> bool {
    matches!(
        (a, b),
        (None, None)
            | (Some('L'), Some('R'))
            | (Some('R'), Some('L'))
            | (Some('C'), Some('C'))
            | (Some('S'), Some('S'))
            | (Some('T'), Some('T'))
            | (Some('W'), Some('W'))
    )
}

/// Everything wrong with a two-part runway or sealane name; empty when legal
pub fn name_problems(name: &str) -> Vec<String> {
    let Some((lo_str, hi_str)) = name.split_once('/') else {
        return vec!["must have two ends separated by '/'".to_string()];
    };
    let (Some(lo), Some(hi)) = (parse_end(lo_str), parse_end(hi_str)) else {
        return vec!["each end must be a one or two digit number with an optional suffix".to_string()];
    };

    let mut problems = Vec::new();
    if !(1..=36).contains(&lo.number) {
        problems.push(format!("low end {} is not between 1 and 36", lo.number));
    }
    if !(19..=36).contains(&hi.number) {
        problems.push(format!("high end {} is not between 19 and 36", hi.number));
    }
    if hi.number != lo.number + 18 {
        problems.push(format!(
            "ends {} and {} are not reciprocal",
            lo.number, hi.number
        ));
    }
    for s in [lo.suffix, hi.suffix].into_iter().flatten() {
        if !matches!(s, 'L' | 'R' | 'C' | 'S' | 'T' | 'W') {
            problems.push(format!("suffix '{}' is not one of L, R, C, S, T, W", s));
        }
    }
    if !suffixes_pair(lo.suffix, hi.suffix) {
        problems.push("suffixes do not pair".to_string());
    }
    problems
}

/// Grid bearing for a true bearing; grid north follows the Greenwich meridian
fn grid_bearing(true_bearing: f64, at: LatLon) -> f64 {
    if at.lat >= 0.0 {
        normalize_deg(true_bearing - at.lon)
    } else {
        normalize_deg(true_bearing + at.lon)
    }
}

/// Whether a named heading agrees with the geometry under any accepted reference
fn heading_matches(ctx: &ValidationContext, implied: f64, start: LatLon, end: LatLon, true_only: bool) -> bool {
    let true_bearing = bearing_deg(start, end);
    if heading_delta(implied, true_bearing) <= RUNWAY_NAME_HEADING_TOLERANCE_DEG {
        return true;
    }
    if true_only {
        return false;
    }
    let magnetic = ctx.magnetic.magnetic(true_bearing, start);
    if heading_delta(implied, magnetic) <= RUNWAY_NAME_HEADING_TOLERANCE_DEG {
        return true;
    }
    start.lat.abs() > GRID_LATITUDE_DEG
        && heading_delta(implied, grid_bearing(true_bearing, start)) <= RUNWAY_NAME_HEADING_TOLERANCE_DEG
}

fn check_two_part(ctx: &ValidationContext, id: NodeId, kind: &str, ends: [LatLon; 2], out: &mut Findings) {
    let name = ctx.graph.name(id);
    let problems = name_problems(name);
    if !problems.is_empty() {
        out.emit(
            Code::RunwayNameInvalid,
            format!("The {} name '{}' is invalid: {}.", kind, name, problems.join("; ")),
            [id],
        );
        return;
    }

    let Some(lo) = name.split_once('/').and_then(|(lo, _)| parse_end(lo)) else {
        return;
    };
    let implied = f64::from(lo.number * 10);
    let true_only = lo.suffix == Some('T');
    if !heading_matches(ctx, implied, ends[0], ends[1], true_only) {
        out.emit(
            Code::RunwayNameHeading,
            format!(
                "The {} '{}' has a heading of {:.0} degrees true, which does not match its name.",
                kind,
                name,
                bearing_deg(ends[0], ends[1])
            ),
            [id],
        );
    }
}

pub fn check_runway_names(ctx: &ValidationContext, runways: &[NodeId], out: &mut Findings) {
    for &id in runways {
        if let Some(Entity::Runway(r)) = ctx.graph.entity(id) {
            check_two_part(ctx, id, "runway", r.ends, out);
        }
    }
}

pub fn check_sealane_names(ctx: &ValidationContext, sealanes: &[NodeId], out: &mut Findings) {
    for &id in sealanes {
        if let Some(Entity::Sealane(s)) = ctx.graph.entity(id) {
            check_two_part(ctx, id, "sealane", s.ends, out);
        }
    }
}

pub fn check_helipad_names(ctx: &ValidationContext, helipads: &[NodeId], out: &mut Findings) {
    for &id in helipads {
        let name = ctx.graph.name(id);
        if !HELIPAD_NAME.is_match(name) {
            out.emit(
                Code::HelipadNameInvalid,
                format!("The helipad name '{}' must be 'H' followed by a number.", name),
                [id],
            );
        }
    }
}
