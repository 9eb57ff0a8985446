//! Entity payloads carried by scene nodes
//!
//! Each node carries exactly one `Entity` variant. Capabilities shared across
//! variants (polygon geometry, a point location, a library resource) are plain
//! structs composed into the variant payloads and exposed through the
//! accessors on `Entity`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tarmac_core::geometry::Side;
use tarmac_core::{LatLon, LocalProjection, NodeId, Vec2};

/// Pavement surface codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    #[default]
    Asphalt,
    Concrete,
    Turf,
    Dirt,
    Gravel,
    DryLakebed,
    Water,
    SnowIce,
    Transparent,
}

impl Surface {
    pub fn is_paved(&self) -> bool {
        matches!(self, Surface::Asphalt | Surface::Concrete)
    }

    pub fn is_water(&self) -> bool {
        matches!(self, Surface::Water)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AirportKind {
    #[default]
    Airport,
    Seaport,
    Heliport,
}

/// A vertex with optional bezier handles `[incoming, outgoing]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RingPointDef", into = "RingPointDef")]
pub struct RingPoint {
    pub at: LatLon,
    pub handles: Option<[LatLon; 2]>,
}

impl RingPoint {
    pub fn new(at: LatLon) -> Self {
        Self { at, handles: None }
    }

    pub fn curved(at: LatLon, incoming: LatLon, outgoing: LatLon) -> Self {
        Self {
            at,
            handles: Some([incoming, outgoing]),
        }
    }
}

/// File form of a ring point: a bare `[lon, lat]` pair, or a table with handles
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RingPointDef {
    Plain(LatLon),
    Curved { at: LatLon, handles: [LatLon; 2] },
}

impl From<RingPointDef> for RingPoint {
    fn from(def: RingPointDef) -> Self {
        match def {
            RingPointDef::Plain(at) => RingPoint::new(at),
            RingPointDef::Curved { at, handles } => RingPoint {
                at,
                handles: Some(handles),
            },
        }
    }
}

impl From<RingPoint> for RingPointDef {
    fn from(p: RingPoint) -> Self {
        match p.handles {
            Some(handles) => RingPointDef::Curved { at: p.at, handles },
            None => RingPointDef::Plain(p.at),
        }
    }
}

/// A sequence of vertices: a polygon ring, or an open chain for lines.
///
/// `uv` is the texture-space layer used by draped orthophotos; when present it
/// has one entry per vertex.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub points: Vec<RingPoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uv: Vec<[f64; 2]>,
}

impl Ring {
    pub fn from_points(points: impl IntoIterator<Item = LatLon>) -> Self {
        Self {
            points: points.into_iter().map(RingPoint::new).collect(),
            uv: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn locations(&self) -> impl Iterator<Item = LatLon> + '_ {
        self.points.iter().map(|p| p.at)
    }

    pub fn project(&self, proj: &LocalProjection) -> Vec<Vec2> {
        self.points.iter().map(|p| proj.to_local(p.at)).collect()
    }

    /// Sides of the sequence in local meters; a closed ring gets a final
    /// side back to the first vertex
    pub fn sides(&self, proj: &LocalProjection, closed: bool) -> Vec<Side> {
        let n = self.points.len();
        if n < 2 {
            return Vec::new();
        }
        let count = if closed { n } else { n - 1 };
        (0..count)
            .map(|i| {
                let a = &self.points[i];
                let b = &self.points[(i + 1) % n];
                let p0 = proj.to_local(a.at);
                let p1 = proj.to_local(b.at);
                let c0 = a.handles.map(|h| proj.to_local(h[1])).unwrap_or(p0);
                let c1 = b.handles.map(|h| proj.to_local(h[0])).unwrap_or(p1);
                Side::bezier(p0, c0, c1, p1)
            })
            .collect()
    }
}

/// Outer ring plus holes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonGeometry {
    pub outer: Ring,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holes: Vec<Ring>,
}

impl PolygonGeometry {
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }
}

/// Geometry capability of an entity, borrowed from its payload
#[derive(Debug, Clone, Copy)]
pub enum Geometry<'a> {
    Point(LatLon),
    Segment(LatLon, LatLon),
    Polygon(&'a PolygonGeometry),
    Chain { ring: &'a Ring, closed: bool },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirportData {
    pub icao: String,
    #[serde(default)]
    pub kind: AirportKind,
    #[serde(default)]
    pub metadata: IndexMap<String, String>,
}

fn default_roughness() -> f64 {
    0.25
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayData {
    pub ends: [LatLon; 2],
    pub width_m: f64,
    #[serde(default)]
    pub surface: Surface,
    #[serde(default = "default_roughness")]
    pub roughness: f64,
    #[serde(default)]
    pub displaced_m: [f64; 2],
    #[serde(default)]
    pub blastpad_m: [f64; 2],
}

impl RunwayData {
    pub fn length_m(&self) -> f64 {
        tarmac_core::distance_m(self.ends[0], self.ends[1])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SealaneData {
    pub ends: [LatLon; 2],
    pub width_m: f64,
    #[serde(default)]
    pub buoys: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelipadData {
    pub location: LatLon,
    #[serde(default)]
    pub heading: f64,
    pub length_m: f64,
    pub width_m: f64,
    #[serde(default)]
    pub surface: Surface,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxiwayData {
    pub polygon: PolygonGeometry,
    #[serde(default)]
    pub surface: Surface,
    #[serde(default = "default_roughness")]
    pub roughness: f64,
    #[serde(default)]
    pub heading: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryData {
    pub polygon: PolygonGeometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearData {
    pub line: Ring,
    #[serde(default)]
    pub closed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSide {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowData {
    #[serde(default)]
    pub metar_icao: String,
    #[serde(default)]
    pub visibility_sm: f64,
    #[serde(default)]
    pub ceiling_ft: f64,
    #[serde(default)]
    pub pattern_runway: Option<String>,
    #[serde(default)]
    pub pattern_side: PatternSide,
}

/// Winds from `[dir_lo_deg, dir_hi_deg)` up to `speed_kt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindRuleData {
    #[serde(default)]
    pub metar_icao: String,
    pub dir_lo_deg: i32,
    pub dir_hi_deg: i32,
    pub speed_kt: i32,
}

/// Active between two zulu times written as `hhmm`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRuleData {
    pub start_zulu: u32,
    pub end_zulu: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayUseData {
    /// Runway end this rule uses, e.g. `27R`
    pub runway: String,
    #[serde(default)]
    pub arrivals: bool,
    #[serde(default)]
    pub departures: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtcService {
    Recorded,
    Unicom,
    Delivery,
    Ground,
    Tower,
    Approach,
    Departure,
    Center,
}

impl AtcService {
    pub fn label(&self) -> &'static str {
        match self {
            AtcService::Recorded => "ATIS/AWOS",
            AtcService::Unicom => "Unicom",
            AtcService::Delivery => "Delivery",
            AtcService::Ground => "Ground",
            AtcService::Tower => "Tower",
            AtcService::Approach => "Approach",
            AtcService::Departure => "Departure",
            AtcService::Center => "Center",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyData {
    pub service: AtcService,
    /// Channel in kHz, e.g. `118_100` for 118.100 MHz
    pub khz: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RampType {
    #[default]
    Misc,
    Gate,
    TieDown,
    Hangar,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RampOperation {
    #[default]
    None,
    GeneralAviation,
    Airline,
    Cargo,
    Military,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    Heavy,
    Jets,
    Turboprops,
    Props,
    Helos,
    Fighters,
}

/// ICAO aerodrome reference code letter, by wingspan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WidthClass {
    #[default]
    A,
    B,
    C,
    D,
    E,
    F,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RampData {
    pub location: LatLon,
    #[serde(default)]
    pub heading: f64,
    #[serde(default)]
    pub ramp_type: RampType,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    #[serde(default)]
    pub width: WidthClass,
    #[serde(default)]
    pub operation: RampOperation,
    /// Space separated three-letter airline codes
    #[serde(default)]
    pub airlines: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerData {
    pub location: LatLon,
    pub height_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindsockData {
    pub location: LatLon,
    #[serde(default)]
    pub lit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruckType {
    BaggageLoader,
    BaggageTrain,
    CrewCar,
    CrewFerry,
    CrewLimo,
    FuelJet,
    FuelLiner,
    FuelProp,
    FoodTruck,
    Gpu,
    Pushback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckParkingData {
    pub location: LatLon,
    #[serde(default)]
    pub heading: f64,
    pub truck_type: TruckType,
    /// Baggage cars behind a baggage train
    #[serde(default)]
    pub car_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckDestinationData {
    pub location: LatLon,
    #[serde(default)]
    pub heading: f64,
    #[serde(default)]
    pub truck_types: Vec<TruckType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteNodeData {
    pub location: LatLon,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    #[default]
    Aircraft,
    GroundTruck,
}

/// A taxi route edge between two route nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxiRouteData {
    pub source: NodeId,
    pub target: NodeId,
    /// Set when the edge is part of a runway
    #[serde(default)]
    pub runway: Option<String>,
    #[serde(default)]
    pub one_way: bool,
    #[serde(default)]
    pub width: WidthClass,
    #[serde(default)]
    pub vehicle: VehicleClass,
    /// Runway ends for which this edge is in the departure hot zone
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub hot_departure: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub hot_arrival: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub hot_ils: BTreeSet<String>,
}

impl TaxiRouteData {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            target,
            runway: None,
            one_way: false,
            width: WidthClass::default(),
            vehicle: VehicleClass::default(),
            hot_departure: BTreeSet::new(),
            hot_arrival: BTreeSet::new(),
            hot_ils: BTreeSet::new(),
        }
    }

    pub fn with_runway(mut self, runway: impl Into<String>) -> Self {
        self.runway = Some(runway.into());
        self
    }

    pub fn with_width(mut self, width: WidthClass) -> Self {
        self.width = width;
        self
    }

    /// The endpoint opposite `node`, if `node` is an endpoint at all
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if node == self.source {
            Some(self.target)
        } else if node == self.target {
            Some(self.source)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadData {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub road_type: u32,
    #[serde(default)]
    pub width_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectData {
    pub location: LatLon,
    #[serde(default)]
    pub heading: f64,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacadeData {
    pub polygon: PolygonGeometry,
    #[serde(default)]
    pub height_m: f64,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestData {
    pub polygon: PolygonGeometry,
    #[serde(default)]
    pub density: f64,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrthoData {
    pub polygon: PolygonGeometry,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrapedPolygonData {
    pub polygon: PolygonGeometry,
    #[serde(default)]
    pub heading: f64,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePlacementData {
    pub line: Ring,
    #[serde(default)]
    pub closed: bool,
    pub resource: String,
}

/// The closed set of node kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entity {
    Root,
    Group,
    Airport(AirportData),
    Runway(RunwayData),
    Sealane(SealaneData),
    Helipad(HelipadData),
    Taxiway(TaxiwayData),
    Boundary(BoundaryData),
    LinearFeature(LinearData),
    AtcFlow(FlowData),
    AtcWindRule(WindRuleData),
    AtcTimeRule(TimeRuleData),
    AtcRunwayUse(RunwayUseData),
    AtcFrequency(FrequencyData),
    RampPosition(RampData),
    TowerViewpoint(TowerData),
    Windsock(WindsockData),
    TruckParking(TruckParkingData),
    TruckDestination(TruckDestinationData),
    RouteNode(RouteNodeData),
    TaxiRoute(TaxiRouteData),
    RoadEdge(RoadData),
    ObjectPlacement(ObjectData),
    Facade(FacadeData),
    Forest(ForestData),
    DrapedOrtho(OrthoData),
    DrapedPolygon(DrapedPolygonData),
    LinePlacement(LinePlacementData),
}

impl Entity {
    /// Short human readable kind name used in messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Entity::Root => "root",
            Entity::Group => "group",
            Entity::Airport(_) => "airport",
            Entity::Runway(_) => "runway",
            Entity::Sealane(_) => "sealane",
            Entity::Helipad(_) => "helipad",
            Entity::Taxiway(_) => "taxiway",
            Entity::Boundary(_) => "airport boundary",
            Entity::LinearFeature(_) => "linear feature",
            Entity::AtcFlow(_) => "ATC flow",
            Entity::AtcWindRule(_) => "wind rule",
            Entity::AtcTimeRule(_) => "time rule",
            Entity::AtcRunwayUse(_) => "runway use",
            Entity::AtcFrequency(_) => "ATC frequency",
            Entity::RampPosition(_) => "ramp start",
            Entity::TowerViewpoint(_) => "tower viewpoint",
            Entity::Windsock(_) => "windsock",
            Entity::TruckParking(_) => "truck parking",
            Entity::TruckDestination(_) => "truck destination",
            Entity::RouteNode(_) => "taxi route node",
            Entity::TaxiRoute(_) => "taxi route",
            Entity::RoadEdge(_) => "road",
            Entity::ObjectPlacement(_) => "object",
            Entity::Facade(_) => "facade",
            Entity::Forest(_) => "forest",
            Entity::DrapedOrtho(_) => "orthophoto",
            Entity::DrapedPolygon(_) => "draped polygon",
            Entity::LinePlacement(_) => "line",
        }
    }

    /// Geometry carried directly by the payload.
    ///
    /// Graph edges (taxi routes, roads) reference other nodes for their
    /// geometry and return `None`; see `SceneGraph::edge_endpoints`.
    pub fn geometry(&self) -> Option<Geometry<'_>> {
        match self {
            Entity::Runway(r) => Some(Geometry::Segment(r.ends[0], r.ends[1])),
            Entity::Sealane(s) => Some(Geometry::Segment(s.ends[0], s.ends[1])),
            Entity::Helipad(h) => Some(Geometry::Point(h.location)),
            Entity::Taxiway(t) => Some(Geometry::Polygon(&t.polygon)),
            Entity::Boundary(b) => Some(Geometry::Polygon(&b.polygon)),
            Entity::LinearFeature(l) => Some(Geometry::Chain {
                ring: &l.line,
                closed: l.closed,
            }),
            Entity::RampPosition(r) => Some(Geometry::Point(r.location)),
            Entity::TowerViewpoint(t) => Some(Geometry::Point(t.location)),
            Entity::Windsock(w) => Some(Geometry::Point(w.location)),
            Entity::TruckParking(t) => Some(Geometry::Point(t.location)),
            Entity::TruckDestination(t) => Some(Geometry::Point(t.location)),
            Entity::RouteNode(n) => Some(Geometry::Point(n.location)),
            Entity::ObjectPlacement(o) => Some(Geometry::Point(o.location)),
            Entity::Facade(f) => Some(Geometry::Polygon(&f.polygon)),
            Entity::Forest(f) => Some(Geometry::Polygon(&f.polygon)),
            Entity::DrapedOrtho(o) => Some(Geometry::Polygon(&o.polygon)),
            Entity::DrapedPolygon(p) => Some(Geometry::Polygon(&p.polygon)),
            Entity::LinePlacement(l) => Some(Geometry::Chain {
                ring: &l.line,
                closed: l.closed,
            }),
            Entity::Root
            | Entity::Group
            | Entity::Airport(_)
            | Entity::AtcFlow(_)
            | Entity::AtcWindRule(_)
            | Entity::AtcTimeRule(_)
            | Entity::AtcRunwayUse(_)
            | Entity::AtcFrequency(_)
            | Entity::TaxiRoute(_)
            | Entity::RoadEdge(_) => None,
        }
    }

    /// Library resource referenced by the payload
    pub fn resource(&self) -> Option<&str> {
        match self {
            Entity::ObjectPlacement(o) => Some(&o.resource),
            Entity::Facade(f) => Some(&f.resource),
            Entity::Forest(f) => Some(&f.resource),
            Entity::DrapedOrtho(o) => Some(&o.resource),
            Entity::DrapedPolygon(p) => Some(&p.resource),
            Entity::LinePlacement(l) => Some(&l.resource),
            _ => None,
        }
    }

    /// Every geodetic position the payload carries
    pub fn locations(&self) -> Vec<LatLon> {
        match self.geometry() {
            Some(Geometry::Point(p)) => vec![p],
            Some(Geometry::Segment(a, b)) => vec![a, b],
            Some(Geometry::Polygon(poly)) => poly.rings().flat_map(|r| r.locations()).collect(),
            Some(Geometry::Chain { ring, .. }) => ring.locations().collect(),
            None => Vec::new(),
        }
    }

    pub fn is_airport(&self) -> bool {
        matches!(self, Entity::Airport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_point_forms() {
        #[derive(Deserialize)]
        struct Wrapper {
            points: Vec<RingPoint>,
        }
        let w: Wrapper = toml::from_str(
            r#"
points = [
    [1.0, 2.0],
    { at = [3.0, 4.0], handles = [[2.5, 4.0], [3.5, 4.0]] },
]
"#,
        )
        .unwrap();
        assert_eq!(w.points[0], RingPoint::new(LatLon::new(1.0, 2.0)));
        assert_eq!(
            w.points[1].handles,
            Some([LatLon::new(2.5, 4.0), LatLon::new(3.5, 4.0)])
        );
    }

    #[test]
    fn test_ring_sides_closed_and_open() {
        let ring = Ring::from_points([
            LatLon::new(0.0, 0.0),
            LatLon::new(0.001, 0.0),
            LatLon::new(0.001, 0.001),
        ]);
        let proj = LocalProjection::new(LatLon::new(0.0, 0.0));
        assert_eq!(ring.sides(&proj, true).len(), 3);
        assert_eq!(ring.sides(&proj, false).len(), 2);
        assert!(!ring.sides(&proj, true)[0].is_curved());
    }

    #[test]
    fn test_curved_side_uses_handles() {
        let ring = Ring {
            points: vec![
                RingPoint::curved(
                    LatLon::new(0.0, 0.0),
                    LatLon::new(0.0, 0.0),
                    LatLon::new(0.0, 0.001),
                ),
                RingPoint::new(LatLon::new(0.001, 0.0)),
            ],
            uv: Vec::new(),
        };
        let proj = LocalProjection::new(LatLon::new(0.0, 0.0));
        let sides = ring.sides(&proj, false);
        assert!(sides[0].is_curved());
    }

    #[test]
    fn test_entity_capabilities() {
        let obj = Entity::ObjectPlacement(ObjectData {
            location: LatLon::new(1.0, 2.0),
            heading: 0.0,
            resource: "lib/tower.obj".to_string(),
        });
        assert_eq!(obj.resource(), Some("lib/tower.obj"));
        assert_eq!(obj.locations(), vec![LatLon::new(1.0, 2.0)]);
        assert_eq!(obj.kind_name(), "object");
        assert!(Entity::Group.geometry().is_none());
    }

    #[test]
    fn test_entity_tagged_toml() {
        let e: Entity = toml::from_str(
            r#"
type = "atc_frequency"
service = "tower"
khz = 118100
"#,
        )
        .unwrap();
        assert_eq!(
            e,
            Entity::AtcFrequency(FrequencyData {
                service: AtcService::Tower,
                khz: 118_100
            })
        );
    }

    #[test]
    fn test_route_other_end() {
        let r = TaxiRouteData::new(NodeId(1), NodeId(2));
        assert_eq!(r.other_end(NodeId(1)), Some(NodeId(2)));
        assert_eq!(r.other_end(NodeId(2)), Some(NodeId(1)));
        assert_eq!(r.other_end(NodeId(3)), None);
    }
}
