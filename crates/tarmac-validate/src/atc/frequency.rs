//! ATC frequency band, raster and service checks

use crate::code::Code;
use crate::config::ExportTarget;
use crate::context::ValidationContext;
use crate::diagnostic::Findings;
use std::collections::HashMap;
use tarmac_core::{LatLon, NodeId};
use tarmac_scene::entity::AtcService;
use tarmac_scene::{Collection, Entity};

pub const BAND_LO_KHZ: u32 = 118_000;
pub const BAND_HI_KHZ: u32 = 136_990;

/// Recorded services (ATIS, AWOS) may also broadcast on navaid frequencies
pub const RECORDED_LO_KHZ: u32 = 108_000;
pub const RECORDED_HI_KHZ: u32 = 117_975;

/// Services every airport with ATC flows must provide
pub const REQUIRED_SERVICES: [AtcService; 3] = [AtcService::Tower, AtcService::Ground, AtcService::Delivery];

/// Channel raster a frequency falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Raster {
    /// 25 kHz spacing
    Standard,
    /// 8.33 kHz spacing
    Narrow,
    Illegal,
}

pub fn raster(khz: u32) -> Raster {
    match khz % 25 {
        0 => Raster::Standard,
        5 | 10 | 15 => Raster::Narrow,
        _ => Raster::Illegal,
    }
}

/// Whether a channel is on a raster the export target understands
pub fn raster_legal(khz: u32, target: ExportTarget) -> bool {
    match raster(khz) {
        Raster::Standard => true,
        Raster::Narrow => target.allows_833_spacing(),
        Raster::Illegal => false,
    }
}

pub fn in_band(khz: u32, service: AtcService) -> bool {
    (BAND_LO_KHZ..=BAND_HI_KHZ).contains(&khz)
        || (service == AtcService::Recorded && (RECORDED_LO_KHZ..=RECORDED_HI_KHZ).contains(&khz))
}

/// Rough box around the region that uses 8.33 kHz spacing
pub fn in_europe(at: LatLon) -> bool {
    (34.0..=72.0).contains(&at.lat) && (-25.0..=45.0).contains(&at.lon)
}

fn mhz(khz: u32) -> String {
    format!("{}.{:03}", khz / 1000, khz % 1000)
}

/// A representative position for an airport: the mean of its landing area
/// positions, or of anything it owns when it has none
pub fn airport_position(ctx: &ValidationContext, col: &Collection) -> Option<LatLon> {
    let landing: Vec<LatLon> = col
        .runways
        .iter()
        .chain(&col.sealanes)
        .chain(&col.helipads)
        .flat_map(|&id| ctx.graph.locations(id))
        .collect();
    let points = if landing.is_empty() {
        col.visited
            .iter()
            .flat_map(|&id| ctx.graph.locations(id))
            .collect()
    } else {
        landing
    };
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lon, lat) = points
        .iter()
        .fold((0.0, 0.0), |(lon, lat), p| (lon + p.lon, lat + p.lat));
    Some(LatLon::new(lon / n, lat / n))
}

pub fn check_frequencies(ctx: &ValidationContext, col: &Collection, out: &mut Findings) {
    let target = ctx.config.export_target;
    let position = airport_position(ctx, col);
    let mut groups: Vec<((AtcService, u32), Vec<NodeId>)> = Vec::new();
    let mut index: HashMap<(AtcService, u32), usize> = HashMap::new();

    for &id in &col.frequencies {
        let Some(Entity::AtcFrequency(f)) = ctx.graph.entity(id) else {
            continue;
        };
        let name = ctx.graph.name(id);

        if !in_band(f.khz, f.service) {
            out.emit(
                Code::FrequencyOutOfBand,
                format!(
                    "The {} frequency '{}' ({} MHz) is outside the airband.",
                    f.service.label(),
                    name,
                    mhz(f.khz)
                ),
                [id],
            );
        } else if !raster_legal(f.khz, target) {
            let why = match raster(f.khz) {
                Raster::Narrow => "8.33 kHz spacing is not supported by this export target",
                _ => "it is not on a 25 kHz or 8.33 kHz channel",
            };
            out.emit(
                Code::FrequencyIllegalSpacing,
                format!("The frequency '{}' ({} MHz) is illegal: {}.", name, mhz(f.khz), why),
                [id],
            );
        } else if raster(f.khz) == Raster::Narrow && position.is_some_and(|p| !in_europe(p)) {
            out.emit(
                Code::FrequencyRegion,
                format!(
                    "The frequency '{}' ({} MHz) uses 8.33 kHz spacing, which is only used in Europe.",
                    name,
                    mhz(f.khz)
                ),
                [id],
            );
        }

        let key = (f.service, f.khz);
        match index.get(&key) {
            Some(&i) => groups[i].1.push(id),
            None => {
                index.insert(key, groups.len());
                groups.push((key, vec![id]));
            }
        }
    }

    for ((service, khz), members) in &groups {
        if members.len() > 1 {
            out.emit(
                Code::DuplicateFrequency,
                format!(
                    "The {} frequency {} MHz is listed {} times.",
                    service.label(),
                    mhz(*khz),
                    members.len()
                ),
                members.iter().copied(),
            );
        }
    }

    if !col.flows.is_empty() {
        for service in REQUIRED_SERVICES {
            if !groups.iter().any(|((s, _), _)| *s == service) {
                out.emit_airport(
                    Code::FrequencyMissingService,
                    format!("The airport has ATC flows but no {} frequency.", service.label()),
                );
            }
        }
    }
}
