//! Geometry checks on polygons, chains and raw coordinates

use crate::code::Code;
use crate::context::ValidationContext;
use crate::diagnostic::Findings;
use tarmac_core::geometry::{
    self_intersections, short_sides, uv_degenerate, windings_opposite, GATEWAY_MIN_FACADE_SEGMENT_M,
    MIN_SEGMENT_M,
};
use tarmac_core::{LocalProjection, NodeId};
use tarmac_scene::{Entity, Geometry, PolygonGeometry, Ring};

/// Minimum side length for a node's kind under the current export target
fn min_side_for(ctx: &ValidationContext, entity: &Entity) -> f64 {
    let strict_kind = matches!(
        entity,
        Entity::Facade(_) | Entity::Forest(_) | Entity::LinePlacement(_)
    );
    if strict_kind && ctx.config.export_target.is_gateway() {
        GATEWAY_MIN_FACADE_SEGMENT_M
    } else {
        MIN_SEGMENT_M
    }
}

fn ring_label(index: usize) -> String {
    if index == 0 {
        "outer ring".to_string()
    } else {
        format!("hole {}", index)
    }
}

fn check_polygon(
    ctx: &ValidationContext,
    id: NodeId,
    entity: &Entity,
    poly: &PolygonGeometry,
    out: &mut Findings,
) {
    let name = ctx.graph.name(id);
    let kind = entity.kind_name();
    let proj = LocalProjection::centered_on(
        poly.rings()
            .flat_map(|r| r.points.iter().map(|p| &p.at)),
    );
    let min_side = min_side_for(ctx, entity);
    let outer_pts = poly.outer.project(&proj);

    for (i, ring) in poly.rings().enumerate() {
        if ring.len() < 3 {
            out.emit(
                Code::RingTooFewPoints,
                format!(
                    "The {} of {} '{}' has {} points; at least 3 are needed.",
                    ring_label(i),
                    kind,
                    name,
                    ring.len()
                ),
                [id],
            );
            continue;
        }

        let sides = ring.sides(&proj, true);
        let short = short_sides(&sides, min_side);
        if !short.is_empty() {
            out.emit(
                Code::SegmentTooShort,
                format!(
                    "The {} of {} '{}' has {} side(s) shorter than {}.",
                    ring_label(i),
                    kind,
                    name,
                    short.len(),
                    ctx.len_str(min_side)
                ),
                [id],
            );
        }

        if !self_intersections(&sides, true).is_empty() {
            out.emit(
                Code::SelfIntersecting,
                format!("The {} of {} '{}' intersects itself.", ring_label(i), kind, name),
                [id],
            );
        }

        if i > 0 && outer_pts.len() >= 3 && !windings_opposite(&outer_pts, &ring.project(&proj)) {
            out.emit(
                Code::WindingWrong,
                format!(
                    "The {} of {} '{}' winds the same way as its outer ring.",
                    ring_label(i),
                    kind,
                    name
                ),
                [id],
            );
        }

        if matches!(entity, Entity::DrapedOrtho(_)) {
            check_uv(ctx, id, i, ring, out);
        }
    }
}

fn check_uv(ctx: &ValidationContext, id: NodeId, index: usize, ring: &Ring, out: &mut Findings) {
    let name = ctx.graph.name(id);
    if ring.uv.len() != ring.points.len() {
        out.emit(
            Code::UvDegenerate,
            format!(
                "The {} of orthophoto '{}' has {} UV coordinates for {} points.",
                ring_label(index),
                name,
                ring.uv.len(),
                ring.points.len()
            ),
            [id],
        );
        return;
    }
    let bad = uv_degenerate(&ring.uv);
    if !bad.is_empty() {
        out.emit(
            Code::UvDegenerate,
            format!(
                "The {} of orthophoto '{}' has {} degenerate UV coordinate(s).",
                ring_label(index),
                name,
                bad.len()
            ),
            [id],
        );
    }
}

fn check_chain(ctx: &ValidationContext, id: NodeId, entity: &Entity, ring: &Ring, closed: bool, out: &mut Findings) {
    let name = ctx.graph.name(id);
    let kind = entity.kind_name();
    let needed = if closed { 3 } else { 2 };
    if ring.len() < needed {
        out.emit(
            Code::LineTooFewPoints,
            format!(
                "The {} '{}' has {} points; at least {} are needed.",
                kind,
                name,
                ring.len(),
                needed
            ),
            [id],
        );
        return;
    }
    let proj = LocalProjection::centered_on(ring.points.iter().map(|p| &p.at));
    let min_side = min_side_for(ctx, entity);
    let sides = ring.sides(&proj, closed);
    let short = short_sides(&sides, min_side);
    if !short.is_empty() {
        out.emit(
            Code::SegmentTooShort,
            format!(
                "The {} '{}' has {} segment(s) shorter than {}.",
                kind,
                name,
                short.len(),
                ctx.len_str(min_side)
            ),
            [id],
        );
    }
    if !self_intersections(&sides, closed).is_empty() {
        out.emit(
            Code::SelfIntersecting,
            format!("The {} '{}' crosses itself.", kind, name),
            [id],
        );
    }
}

/// Ring, side and winding checks on every polygon or chain node in `ids`
pub fn check_geometry(ctx: &ValidationContext, ids: impl IntoIterator<Item = NodeId>, out: &mut Findings) {
    for id in ids {
        let Some(entity) = ctx.graph.entity(id) else {
            continue;
        };
        match entity.geometry() {
            Some(Geometry::Polygon(poly)) => check_polygon(ctx, id, entity, poly, out),
            Some(Geometry::Chain { ring, closed }) => check_chain(ctx, id, entity, ring, closed, out),
            _ => {}
        }
    }
}

/// Every position must lie on the globe
pub fn check_coordinates(ctx: &ValidationContext, ids: &[NodeId], out: &mut Findings) {
    for &id in ids {
        let Some(entity) = ctx.graph.entity(id) else {
            continue;
        };
        if entity.locations().iter().any(|p| !p.is_valid()) {
            out.emit(
                Code::CoordinateInvalid,
                format!(
                    "The {} '{}' has a coordinate outside the valid latitude/longitude range.",
                    entity.kind_name(),
                    ctx.graph.name(id)
                ),
                [id],
            );
        }
    }
}
