//! Airport extent and boundary containment

use crate::code::Code;
use crate::context::ValidationContext;
use crate::diagnostic::Findings;
use tarmac_core::geometry::{distance_to_ring, point_in_polygon, point_in_polygon_with_holes};
use tarmac_core::{Bbox2, LatLon, LocalProjection, NodeId, Vec2};
use tarmac_scene::{Collection, Entity, PolygonGeometry};

/// Airports larger than this across are probably misplaced content
pub const MAX_AIRPORT_EXTENT_M: f64 = 20_000.0;

/// How far non-surface content may stray outside the boundary
pub const BOUNDARY_MARGIN_M: f64 = 500.0;

struct Shape {
    outer: Vec<Vec2>,
    holes: Vec<Vec<Vec2>>,
}

impl Shape {
    fn contains(&self, p: Vec2) -> bool {
        point_in_polygon_with_holes(p, &self.outer, &self.holes)
    }

    fn near(&self, p: Vec2) -> bool {
        point_in_polygon(p, &self.outer) || distance_to_ring(p, &self.outer) <= BOUNDARY_MARGIN_M
    }
}

fn all_locations(ctx: &ValidationContext, col: &Collection) -> Vec<LatLon> {
    col.visited
        .iter()
        .flat_map(|&id| ctx.graph.locations(id))
        .collect()
}

pub fn check_extent(ctx: &ValidationContext, col: &Collection, out: &mut Findings) {
    let points = all_locations(ctx, col);
    if points.is_empty() {
        return;
    }
    let proj = LocalProjection::centered_on(points.iter());
    let local: Vec<Vec2> = points.iter().map(|p| proj.to_local(*p)).collect();
    let size = Bbox2::from_points(local.iter()).diagonal();
    if size > MAX_AIRPORT_EXTENT_M {
        out.emit_airport(
            Code::AirportTooLarge,
            format!(
                "The airport's contents span {}; something is probably far from where it belongs.",
                ctx.len_str(size)
            ),
        );
    }
}

/// Outline of an airport surface in local meters. Runways contribute their
/// paved corners, everything else its own positions.
fn surface_points(ctx: &ValidationContext, proj: &LocalProjection, id: NodeId) -> Vec<Vec2> {
    match ctx.graph.entity(id) {
        Some(Entity::Runway(r)) => {
            let a = proj.to_local(r.ends[0]);
            let b = proj.to_local(r.ends[1]);
            let side = (b - a).normalized().perp() * (r.width_m * 0.5);
            vec![a - side, b - side, b + side, a + side]
        }
        Some(Entity::Taxiway(t)) => t.polygon.outer.project(proj),
        _ => ctx
            .graph
            .locations(id)
            .into_iter()
            .map(|p| proj.to_local(p))
            .collect(),
    }
}

/// Landing areas and taxiways must lie inside the boundary. Other located
/// content may reach up to `BOUNDARY_MARGIN_M` past it.
pub fn check_boundary(ctx: &ValidationContext, col: &Collection, out: &mut Findings) {
    let boundaries: Vec<&PolygonGeometry> = col
        .boundaries
        .iter()
        .filter_map(|&id| match ctx.graph.entity(id) {
            Some(Entity::Boundary(b)) => Some(&b.polygon),
            _ => None,
        })
        .collect();
    if boundaries.is_empty() {
        return;
    }

    let anchors: Vec<LatLon> = boundaries.iter().flat_map(|b| b.outer.locations()).collect();
    let proj = LocalProjection::centered_on(anchors.iter());
    let shapes: Vec<Shape> = boundaries
        .iter()
        .map(|b| Shape {
            outer: b.outer.project(&proj),
            holes: b.holes.iter().map(|h| h.project(&proj)).collect(),
        })
        .collect();

    let surfaces: Vec<NodeId> = col
        .runways
        .iter()
        .chain(&col.sealanes)
        .chain(&col.helipads)
        .chain(&col.taxiways)
        .copied()
        .collect();

    for &id in &surfaces {
        let points = surface_points(ctx, &proj, id);
        if points.iter().any(|p| !shapes.iter().any(|s| s.contains(*p))) {
            out.emit(
                Code::OutsideBoundary,
                format!(
                    "The {} '{}' is not inside the airport boundary.",
                    ctx.graph.entity(id).map(|e| e.kind_name()).unwrap_or("item"),
                    ctx.graph.name(id)
                ),
                [id],
            );
        }
    }

    for &id in &col.visited {
        if surfaces.contains(&id) || col.boundaries.contains(&id) {
            continue;
        }
        // Edges are judged through their nodes
        if matches!(
            ctx.graph.entity(id),
            Some(Entity::TaxiRoute(_) | Entity::RoadEdge(_)) | None
        ) {
            continue;
        }
        let far = ctx
            .graph
            .locations(id)
            .into_iter()
            .any(|p| !shapes.iter().any(|s| s.near(proj.to_local(p))));
        if far {
            out.emit(
                Code::FarOutsideBoundary,
                format!(
                    "The {} '{}' is more than {} outside the airport boundary.",
                    ctx.graph.entity(id).map(|e| e.kind_name()).unwrap_or("item"),
                    ctx.graph.name(id),
                    ctx.len_str(BOUNDARY_MARGIN_M)
                ),
                [id],
            );
        }
    }
}
