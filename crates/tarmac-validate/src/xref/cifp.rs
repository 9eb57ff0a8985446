//! Runway thresholds against published procedure data

use crate::code::Code;
use crate::context::ValidationContext;
use crate::diagnostic::Findings;
use crate::rules::naming::{canonical_end, runway_end_names};
use std::time::Duration;
use tarmac_core::{distance_m, LatLon, LocalProjection, NodeId};
use tarmac_library::{fetch_blocking, load_cifp, CifpData, FetchStatus};
use tarmac_scene::{Collection, Entity};

pub const CIFP_CACHE_DOMAIN: &str = "cifp";

pub const POSITION_TOLERANCE_PAVED_M: f64 = 10.0;
pub const POSITION_TOLERANCE_UNPAVED_M: f64 = 25.0;
pub const POSITION_TOLERANCE_WATER_M: f64 = 50.0;
pub const DISPLACED_TOLERANCE_M: f64 = 10.0;

/// One landing direction as drawn in the scene
struct SceneEnd {
    id: NodeId,
    name: String,
    threshold: LatLon,
    /// `None` for sealanes, which have no displaced thresholds
    displaced_m: Option<f64>,
    tolerance_m: f64,
}

/// Point `offset_m` from `from` toward `to`
fn toward(from: LatLon, to: LatLon, offset_m: f64) -> LatLon {
    if offset_m == 0.0 {
        return from;
    }
    let proj = LocalProjection::new(from);
    let dir = proj.to_local(to).normalized();
    proj.to_geo(dir * offset_m)
}

fn scene_ends(ctx: &ValidationContext, col: &Collection) -> Vec<SceneEnd> {
    let mut ends = Vec::new();
    for &id in col.runways.iter().chain(&col.sealanes) {
        let Some(names) = runway_end_names(ctx.graph.name(id)) else {
            continue;
        };
        match ctx.graph.entity(id) {
            Some(Entity::Runway(r)) => {
                let tolerance_m = if r.surface.is_paved() {
                    POSITION_TOLERANCE_PAVED_M
                } else {
                    POSITION_TOLERANCE_UNPAVED_M
                };
                for (i, name) in names.into_iter().enumerate() {
                    let (here, there) = (r.ends[i], r.ends[1 - i]);
                    ends.push(SceneEnd {
                        id,
                        name,
                        threshold: toward(here, there, r.displaced_m[i]),
                        displaced_m: Some(r.displaced_m[i]),
                        tolerance_m,
                    });
                }
            }
            Some(Entity::Sealane(s)) => {
                for (i, name) in names.into_iter().enumerate() {
                    ends.push(SceneEnd {
                        id,
                        name,
                        threshold: s.ends[i],
                        displaced_m: None,
                        tolerance_m: POSITION_TOLERANCE_WATER_M,
                    });
                }
            }
            _ => {}
        }
    }
    ends
}

/// Compare every runway and sealane end against already loaded data
pub fn compare_cifp(ctx: &ValidationContext, col: &Collection, data: &CifpData, out: &mut Findings) {
    for end in scene_ends(ctx, col) {
        let Some(published) = data
            .runways
            .iter()
            .find(|r| canonical_end(&r.name).as_deref() == Some(end.name.as_str()))
        else {
            log::debug!("No published record for runway end {}", end.name);
            continue;
        };

        let off = distance_m(end.threshold, published.threshold);
        if off > end.tolerance_m {
            out.emit(
                Code::RunwayPositionMismatch,
                format!(
                    "The threshold of runway {} is {} from its published position.",
                    end.name,
                    ctx.len_str(off)
                ),
                [end.id],
            );
        }

        if let Some(displaced) = end.displaced_m {
            if (displaced - published.displaced_m).abs() > DISPLACED_TOLERANCE_M {
                out.emit(
                    Code::DisplacedMismatch,
                    format!(
                        "Runway {} has a displaced threshold of {}; the published value is {}.",
                        end.name,
                        ctx.len_str(displaced),
                        ctx.len_str(published.displaced_m)
                    ),
                    [end.id],
                );
            }
        }
    }
}

/// Fetch the airport's procedure data and compare runway thresholds with it.
/// A fetch or parse failure is one advisory warning on the airport.
pub fn check_cifp(ctx: &ValidationContext, icao: &str, col: &Collection, out: &mut Findings) {
    if !ctx.config.check_cifp || icao.is_empty() {
        return;
    }
    let Some(fetcher) = ctx.cifp else {
        log::debug!("No CIFP fetcher; skipping reference data checks");
        return;
    };
    if col.runways.is_empty() && col.sealanes.is_empty() {
        return;
    }

    let url = ctx.config.cifp_url_for(icao);
    log::info!("Fetching CIFP data for {}", icao);
    let response = fetch_blocking(
        fetcher,
        &url,
        CIFP_CACHE_DOMAIN,
        ctx.config.cifp_max_polls,
        Duration::from_millis(ctx.config.cifp_poll_interval_ms),
    );

    let loaded = match (response.status, response.local_path) {
        (FetchStatus::Available, Some(path)) => load_cifp(&path).map_err(|e| e.to_string()),
        _ => Err(response
            .error
            .unwrap_or_else(|| "no file was returned".to_string())),
    };

    match loaded {
        Ok(data) => compare_cifp(ctx, col, &data, out),
        Err(reason) => {
            log::warn!("CIFP data for {} unavailable: {}", icao, reason);
            out.emit_airport(
                Code::CifpUnavailable,
                format!("Could not check runways against published data for {}: {}", icao, reason),
            );
        }
    }
}
