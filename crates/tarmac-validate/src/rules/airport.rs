//! Airport-level structure plus ramp, tower and ground-truck rules

use crate::code::Code;
use crate::context::ValidationContext;
use crate::diagnostic::Findings;
use tarmac_core::NodeId;
use tarmac_scene::entity::{AirportKind, RampType, TruckType};
use tarmac_scene::{Collection, Entity};

/// Most baggage cars a baggage train may pull
pub const MAX_BAGGAGE_CARS: u32 = 10;

/// Airport identity and the mix of landing areas it owns
pub fn check_airport(ctx: &ValidationContext, airport_id: NodeId, col: &Collection, out: &mut Findings) {
    let Some(airport) = ctx.graph.airport(airport_id) else {
        return;
    };
    let name = ctx.graph.name(airport_id);

    if airport.icao.trim().is_empty() {
        out.emit(
            Code::AirportIcaoEmpty,
            format!("The airport '{}' has an empty ICAO identifier.", name),
            [airport_id],
        );
    }
    if name.trim().is_empty() {
        out.emit(
            Code::AirportNameEmpty,
            format!("The airport '{}' has an empty name.", airport.icao),
            [airport_id],
        );
    }

    if col.runways.is_empty() && col.sealanes.is_empty() && col.helipads.is_empty() {
        out.emit(
            Code::AirportNoRunways,
            format!("The airport '{}' has no runway, sealane or helipad.", name),
            [airport_id],
        );
    }
    match airport.kind {
        AirportKind::Heliport if !col.runways.is_empty() => {
            out.emit(
                Code::HeliportHasRunways,
                format!("The heliport '{}' contains runways; heliports may only have helipads.", name),
                col.runways.iter().copied(),
            );
        }
        AirportKind::Seaport if col.sealanes.is_empty() => {
            out.emit(
                Code::SeaportNoSealanes,
                format!("The seaport '{}' has no sealanes.", name),
                [airport_id],
            );
        }
        _ => {}
    }

    if col.tower_viewpoints.len() > 1 {
        out.emit(
            Code::TooManyTowers,
            format!(
                "The airport '{}' has {} tower viewpoints; only one is used.",
                name,
                col.tower_viewpoints.len()
            ),
            col.tower_viewpoints.iter().copied(),
        );
    }

    if col.boundaries.is_empty() && ctx.config.export_target.is_gateway() {
        out.emit(
            Code::BoundaryMissing,
            format!("The airport '{}' must have an airport boundary.", name),
            [airport_id],
        );
    }
}

fn airline_code_ok(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}

pub fn check_ramps(ctx: &ValidationContext, ramps: &[NodeId], out: &mut Findings) {
    for &id in ramps {
        let Some(Entity::RampPosition(r)) = ctx.graph.entity(id) else {
            continue;
        };
        let name = ctx.graph.name(id);

        if name.trim().is_empty() {
            out.emit(Code::RampNameEmpty, "A ramp start has an empty name.", [id]);
        }
        if !(0.0..360.0).contains(&r.heading) {
            out.emit(
                Code::RampHeadingInvalid,
                format!("The ramp start '{}' has heading {}, it must be in [0, 360).", name, r.heading),
                [id],
            );
        }
        if r.ramp_type == RampType::Gate && r.equipment.is_empty() {
            out.emit(
                Code::RampGateNoEquipment,
                format!("The gate '{}' does not allow any aircraft type.", name),
                [id],
            );
        }
        let bad: Vec<&str> = r
            .airlines
            .split_whitespace()
            .filter(|code| !airline_code_ok(code))
            .collect();
        if !bad.is_empty() {
            out.emit(
                Code::RampAirlineInvalid,
                format!(
                    "The ramp start '{}' lists airline code(s) '{}'; each must be three uppercase letters.",
                    name,
                    bad.join(" ")
                ),
                [id],
            );
        }
    }
}

pub fn check_towers(ctx: &ValidationContext, towers: &[NodeId], out: &mut Findings) {
    for &id in towers {
        let Some(Entity::TowerViewpoint(t)) = ctx.graph.entity(id) else {
            continue;
        };
        if t.height_m <= 0.0 || t.height_m.is_nan() {
            out.emit(
                Code::TowerHeightInvalid,
                format!(
                    "The tower viewpoint '{}' must be higher than the ground.",
                    ctx.graph.name(id)
                ),
                [id],
            );
        }
    }
}

pub fn check_trucks(ctx: &ValidationContext, parkings: &[NodeId], destinations: &[NodeId], out: &mut Findings) {
    for &id in parkings {
        let Some(Entity::TruckParking(t)) = ctx.graph.entity(id) else {
            continue;
        };
        let limit = if t.truck_type == TruckType::BaggageTrain {
            MAX_BAGGAGE_CARS
        } else {
            0
        };
        if t.car_count > limit {
            out.emit(
                Code::TruckCarCountInvalid,
                format!(
                    "The truck parking '{}' has {} cars; at most {} are allowed.",
                    ctx.graph.name(id),
                    t.car_count,
                    limit
                ),
                [id],
            );
        }
    }
    for &id in destinations {
        let Some(Entity::TruckDestination(t)) = ctx.graph.entity(id) else {
            continue;
        };
        if t.truck_types.is_empty() {
            out.emit(
                Code::TruckDestinationEmpty,
                format!(
                    "The truck destination '{}' does not accept any truck type.",
                    ctx.graph.name(id)
                ),
                [id],
            );
        }
    }
}
