//! Physical limits on runways, sealanes, helipads and taxiways

use crate::code::Code;
use crate::context::ValidationContext;
use crate::diagnostic::Findings;
use tarmac_core::{distance_m, NodeId};
use tarmac_scene::entity::Surface;
use tarmac_scene::Entity;

pub const MIN_RUNWAY_WIDTH_M: f64 = 5.0;
pub const MIN_RUNWAY_LENGTH_M: f64 = 100.0;
pub const MIN_SEALANE_WIDTH_M: f64 = 5.0;
pub const MIN_HELIPAD_SIDE_M: f64 = 1.0;

fn check_roughness(ctx: &ValidationContext, id: NodeId, roughness: f64, out: &mut Findings) {
    if !(0.0..=1.0).contains(&roughness) {
        out.emit(
            Code::RoughnessOutOfRange,
            format!(
                "The roughness of '{}' is {}, it must be between 0 and 1.",
                ctx.graph.name(id),
                roughness
            ),
            [id],
        );
    }
}

fn check_not_water(ctx: &ValidationContext, id: NodeId, kind: &str, surface: Surface, out: &mut Findings) {
    if surface.is_water() {
        out.emit(
            Code::SurfaceIllegal,
            format!("The {} '{}' cannot have a water surface.", kind, ctx.graph.name(id)),
            [id],
        );
    }
}

pub fn check_runways(ctx: &ValidationContext, runways: &[NodeId], out: &mut Findings) {
    for &id in runways {
        let Some(Entity::Runway(r)) = ctx.graph.entity(id) else {
            continue;
        };
        let name = ctx.graph.name(id);
        let length = r.length_m();

        if r.width_m < MIN_RUNWAY_WIDTH_M {
            out.emit(
                Code::RunwayTooNarrow,
                format!(
                    "The runway '{}' is only {} wide; it must be at least {}.",
                    name,
                    ctx.len_str(r.width_m),
                    ctx.len_str(MIN_RUNWAY_WIDTH_M)
                ),
                [id],
            );
        }
        if length < MIN_RUNWAY_LENGTH_M {
            out.emit(
                Code::RunwayTooShort,
                format!(
                    "The runway '{}' is only {} long; it must be at least {}.",
                    name,
                    ctx.len_str(length),
                    ctx.len_str(MIN_RUNWAY_LENGTH_M)
                ),
                [id],
            );
        }
        check_not_water(ctx, id, "runway", r.surface, out);
        check_roughness(ctx, id, r.roughness, out);

        if r.displaced_m.iter().chain(r.blastpad_m.iter()).any(|d| *d < 0.0) {
            out.emit(
                Code::DisplacedNegative,
                format!("The runway '{}' has a negative displaced threshold or blast pad.", name),
                [id],
            );
        } else if r.displaced_m[0] + r.displaced_m[1] >= length {
            out.emit(
                Code::DisplacedOverlap,
                format!("The displaced thresholds of runway '{}' overlap.", name),
                [id],
            );
        }
    }
}

pub fn check_sealanes(ctx: &ValidationContext, sealanes: &[NodeId], out: &mut Findings) {
    for &id in sealanes {
        let Some(Entity::Sealane(s)) = ctx.graph.entity(id) else {
            continue;
        };
        if s.width_m < MIN_SEALANE_WIDTH_M {
            out.emit(
                Code::SealaneTooNarrow,
                format!(
                    "The sealane '{}' is only {} wide; it must be at least {}.",
                    ctx.graph.name(id),
                    ctx.len_str(s.width_m),
                    ctx.len_str(MIN_SEALANE_WIDTH_M)
                ),
                [id],
            );
        }
        if distance_m(s.ends[0], s.ends[1]) < MIN_RUNWAY_LENGTH_M {
            out.emit(
                Code::RunwayTooShort,
                format!(
                    "The sealane '{}' must be at least {} long.",
                    ctx.graph.name(id),
                    ctx.len_str(MIN_RUNWAY_LENGTH_M)
                ),
                [id],
            );
        }
    }
}

pub fn check_helipads(ctx: &ValidationContext, helipads: &[NodeId], out: &mut Findings) {
    for &id in helipads {
        let Some(Entity::Helipad(h)) = ctx.graph.entity(id) else {
            continue;
        };
        if h.length_m < MIN_HELIPAD_SIDE_M || h.width_m < MIN_HELIPAD_SIDE_M {
            out.emit(
                Code::HelipadTooSmall,
                format!(
                    "The helipad '{}' must be at least {} on each side.",
                    ctx.graph.name(id),
                    ctx.len_str(MIN_HELIPAD_SIDE_M)
                ),
                [id],
            );
        }
        check_not_water(ctx, id, "helipad", h.surface, out);
    }
}

pub fn check_taxiways(ctx: &ValidationContext, taxiways: &[NodeId], out: &mut Findings) {
    for &id in taxiways {
        let Some(Entity::Taxiway(t)) = ctx.graph.entity(id) else {
            continue;
        };
        check_not_water(ctx, id, "taxiway", t.surface, out);
        check_roughness(ctx, id, t.roughness, out);
    }
}
