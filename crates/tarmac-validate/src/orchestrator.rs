//! Validation run driver
//!
//! A run collects the scene, validates each airport in turn, then validates
//! whatever belongs to no airport, and finally writes and presents the
//! report. Checks never abort the run; only infrastructure failures (an
//! unknown node, an unwritable report) surface as `Err`.

use crate::atc::{check_flows, check_frequencies};
use crate::context::ValidationContext;
use crate::diagnostic::{DiagnosticList, Findings, ValidationStatus};
use crate::network::{
    check_components, check_edge_endpoints, check_hot_zones, check_roads, check_route_junctions,
    check_runway_routes, NetworkContext,
};
use crate::report::write_report;
use crate::rules::{
    check_airport, check_boundary, check_coordinates, check_duplicate_names, check_extent, check_geometry,
    check_helipad_names, check_helipads, check_metadata, check_ramps, check_runway_names, check_runways,
    check_sealane_names, check_sealanes, check_taxiways, check_towers, check_trucks,
};
use crate::xref::{check_cifp, check_resources};
use serde::Serialize;
use tarmac_core::{NodeId, Result, TarmacError};
use tarmac_scene::{collect, Collection};

/// Result of one run: the terminal classification and every finding in
/// discovery order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    pub status: ValidationStatus,
    pub diagnostics: DiagnosticList,
}

impl ValidationOutcome {
    /// Whether an export may proceed without acknowledgment
    pub fn is_clean(&self) -> bool {
        self.status == ValidationStatus::Clean
    }

    /// Whether an export must be blocked
    pub fn has_errors(&self) -> bool {
        self.status == ValidationStatus::Errors
    }
}

/// Validate the scene under `root`, or only `airport` when one is given.
///
/// The text report is always written to the configured path. The reporter,
/// if any, is shown the result unless `skip_dialog` is set.
pub fn validate(
    ctx: &ValidationContext,
    root: NodeId,
    airport: Option<NodeId>,
    skip_dialog: bool,
) -> Result<ValidationOutcome> {
    let graph = ctx.graph;
    if graph.node(root).is_none() {
        return Err(TarmacError::NodeNotFound(root.to_string()));
    }
    let airports = match airport {
        Some(id) => {
            if graph.airport(id).is_none() {
                return Err(TarmacError::HierarchyError(format!("Node {} is not an airport", id)));
            }
            vec![id]
        }
        None => collect(graph, root).airports,
    };

    log::info!(
        "Validating {} airport(s) for {:?}",
        airports.len(),
        ctx.config.export_target
    );
    let mut diagnostics = DiagnosticList::new();

    for &apt in &airports {
        validate_airport(ctx, apt, &mut diagnostics);
    }
    if airport.is_none() {
        validate_unowned(ctx, root, &mut diagnostics);
    }

    log::info!("{}", diagnostics.summary());
    write_report(&ctx.config.report_path, graph, &diagnostics)?;
    if !skip_dialog {
        if let Some(reporter) = ctx.reporter {
            reporter.present(graph, &diagnostics)?;
        }
    }

    Ok(ValidationOutcome {
        status: diagnostics.status(),
        diagnostics,
    })
}

/// Duplicate names make runway tags and flow references ambiguous. Returns
/// whether every name is unique.
fn names_unique(ctx: &ValidationContext, col: &Collection, out: &mut Findings) -> bool {
    let landing: Vec<NodeId> = col.runways.iter().chain(&col.sealanes).copied().collect();
    let mut clash = check_duplicate_names(ctx, "runway", &landing, out);
    clash |= check_duplicate_names(ctx, "helipad", &col.helipads, out);
    clash |= check_duplicate_names(ctx, "ramp start", &col.ramps, out);
    clash |= check_duplicate_names(ctx, "ATC flow", &col.flows, out);
    clash |= check_duplicate_names(ctx, "truck parking", &col.truck_parkings, out);
    !clash
}

fn validate_airport(ctx: &ValidationContext, apt: NodeId, diagnostics: &mut DiagnosticList) {
    let graph = ctx.graph;
    let col = collect(graph, apt);
    let icao = graph.airport_icao(apt).unwrap_or("").to_string();
    log::debug!(
        "Airport '{}' ({}): {} nodes, {} runways, {} taxi routes",
        graph.name(apt),
        icao,
        col.visited.len(),
        col.runways.len(),
        col.taxi_routes.len()
    );
    let before = diagnostics.len();
    let mut out = Findings::new(diagnostics, Some(apt), ctx.config.export_target);

    if names_unique(ctx, &col, &mut out) {
        let net = NetworkContext::build(ctx, &col);
        check_edge_endpoints(ctx, &net, &mut out);
        check_route_junctions(ctx, &net, &mut out);
        check_runway_routes(ctx, &net, &mut out);
        check_components(ctx, &net, &mut out);
        check_hot_zones(ctx, &net, &col.ramps, &mut out);
        check_roads(ctx, &net, &mut out);
    } else {
        log::debug!("Skipping network checks for '{}': duplicate names", graph.name(apt));
    }

    check_airport(ctx, apt, &col, &mut out);
    check_runway_names(ctx, &col.runways, &mut out);
    check_sealane_names(ctx, &col.sealanes, &mut out);
    check_helipad_names(ctx, &col.helipads, &mut out);
    check_runways(ctx, &col.runways, &mut out);
    check_sealanes(ctx, &col.sealanes, &mut out);
    check_helipads(ctx, &col.helipads, &mut out);
    check_taxiways(ctx, &col.taxiways, &mut out);
    check_ramps(ctx, &col.ramps, &mut out);
    check_towers(ctx, &col.tower_viewpoints, &mut out);
    check_trucks(ctx, &col.truck_parkings, &col.truck_destinations, &mut out);
    if let Some(data) = graph.airport(apt) {
        check_metadata(apt, data, &mut out);
    }
    check_geometry(ctx, col.polygons().chain(col.chains()), &mut out);
    check_coordinates(ctx, &col.visited, &mut out);

    check_frequencies(ctx, &col, &mut out);
    check_flows(ctx, &col, &mut out);

    check_extent(ctx, &col, &mut out);
    check_boundary(ctx, &col, &mut out);

    check_resources(ctx, col.resource_users(), &mut out);
    check_cifp(ctx, &icao, &col, &mut out);

    log::debug!("Airport '{}': {} finding(s)", graph.name(apt), out.len() - before);
}

/// Geometry and resource checks for everything outside any airport
fn validate_unowned(ctx: &ValidationContext, root: NodeId, diagnostics: &mut DiagnosticList) {
    let graph = ctx.graph;
    let mut col = collect(graph, root);
    col.retain(|id| graph.owning_airport(id).is_none());
    log::debug!("Document-wide pass over {} unowned node(s)", col.visited.len());

    let mut out = Findings::new(diagnostics, None, ctx.config.export_target);
    check_geometry(ctx, col.polygons().chain(col.chains()), &mut out);
    check_coordinates(ctx, &col.visited, &mut out);
    check_resources(ctx, col.resource_users(), &mut out);
}
