//! Diagnostic category codes
//!
//! Codes below `WARNINGS_START_HERE` are errors, codes at or above it are
//! warnings. The strictest export target may promote the codes listed in
//! `Code::GATEWAY_PROMOTED` to errors; nothing is ever demoted.

use crate::config::ExportTarget;
use serde::{Deserialize, Serialize};
use std::fmt;

/// First warning code
pub const WARNINGS_START_HERE: u16 = 1000;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Taxonomy bucket of a code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Structural,
    Geometric,
    NumericRange,
    Referential,
    Topological,
    Advisory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u16)]
pub enum Code {
    // Structural
    AirportIcaoEmpty = 1,
    AirportNameEmpty = 2,
    AirportNoRunways = 3,
    HeliportHasRunways = 4,
    BoundaryMissing = 5,
    DuplicateName = 6,
    RunwayNameInvalid = 7,
    HelipadNameInvalid = 8,
    RampNameEmpty = 9,
    FlowNameEmpty = 10,
    MetadataInvalid = 11,
    FlowNoRunwayUse = 12,

    // Numeric range
    RunwayTooNarrow = 100,
    RunwayTooShort = 101,
    HelipadTooSmall = 102,
    SealaneTooNarrow = 103,
    SurfaceIllegal = 104,
    RoughnessOutOfRange = 105,
    DisplacedNegative = 106,
    DisplacedOverlap = 107,
    FrequencyOutOfBand = 108,
    FrequencyIllegalSpacing = 109,
    FrequencyMissingService = 110,
    WindRuleInvalid = 111,
    TimeRuleInvalid = 112,
    FlowMinimaInvalid = 113,
    RampHeadingInvalid = 114,
    RampAirlineInvalid = 115,
    RampGateNoEquipment = 116,
    TowerHeightInvalid = 117,
    TruckCarCountInvalid = 118,
    TruckDestinationEmpty = 119,
    CoordinateInvalid = 120,

    // Geometric
    RingTooFewPoints = 200,
    SegmentTooShort = 201,
    SelfIntersecting = 202,
    WindingWrong = 203,
    UvDegenerate = 204,
    LineTooFewPoints = 205,

    // Referential
    ResourceMissing = 300,
    ResourceWrongType = 301,
    ResourceNotDefault = 302,
    ResourceDeprecated = 303,
    ResourcePrivate = 304,
    FlowUnknownRunway = 305,
    RouteUnknownRunway = 306,
    HotZoneUnknownRunway = 307,
    OutsideBoundary = 308,
    RouteEndpointInvalid = 309,

    // Topological
    RunwayRouteNotContinuous = 400,
    RunwayRouteLoop = 401,
    RunwayRouteSplit = 402,
    RunwayRouteTightTurn = 403,
    RunwayRouteOffCenter = 404,
    RunwayRouteMisaligned = 405,
    RunwayRouteSpan = 406,
    HotZoneMissing = 407,
    RouteZeroLength = 408,
    RouteDuplicate = 409,
    RouteNotJoined = 410,
    RouteTJunction = 411,
    RoadZeroLength = 412,
    RoadDuplicate = 413,

    // Warnings
    RunwayNameHeading = 1000,
    MetadataUnknownKey = 1001,
    MetadataEmptyValue = 1002,
    MetadataUrl = 1003,
    DuplicateFrequency = 1004,
    FrequencyRegion = 1005,
    FlowUnreachable = 1006,
    WindCoverageInsufficient = 1007,
    FlowTailwind = 1008,
    FlowNoMetar = 1009,
    RouteNetworkDisconnected = 1010,
    RouteSegmentShort = 1011,
    RoadNotJoined = 1012,
    HotZoneRamp = 1013,
    RunwayPositionMismatch = 1014,
    DisplacedMismatch = 1015,
    CifpUnavailable = 1016,
    AirportTooLarge = 1017,
    FarOutsideBoundary = 1018,
    TooManyTowers = 1019,
    SeaportNoSealanes = 1020,
}

impl Code {
    /// Warnings that become errors under `ExportTarget::Gateway`
    pub const GATEWAY_PROMOTED: &'static [Code] = &[
        Code::RunwayNameHeading,
        Code::FlowUnreachable,
        Code::WindCoverageInsufficient,
        Code::RouteNetworkDisconnected,
        Code::RunwayPositionMismatch,
        Code::DisplacedMismatch,
    ];

    pub fn value(self) -> u16 {
        self as u16
    }

    /// Severity from the code range alone
    pub fn base_severity(self) -> Severity {
        if self.value() < WARNINGS_START_HERE {
            Severity::Error
        } else {
            Severity::Warning
        }
    }

    pub fn severity(self, target: ExportTarget) -> Severity {
        if target == ExportTarget::Gateway && Self::GATEWAY_PROMOTED.contains(&self) {
            Severity::Error
        } else {
            self.base_severity()
        }
    }

    pub fn category(self) -> Category {
        match self.value() {
            0..=99 => Category::Structural,
            100..=199 => Category::NumericRange,
            200..=299 => Category::Geometric,
            300..=399 => Category::Referential,
            400..=999 => Category::Topological,
            _ => match self {
                Code::RouteNetworkDisconnected
                | Code::RouteSegmentShort
                | Code::RoadNotJoined
                | Code::HotZoneRamp => Category::Topological,
                Code::RunwayPositionMismatch | Code::DisplacedMismatch | Code::FarOutsideBoundary => {
                    Category::Referential
                }
                _ => Category::Advisory,
            },
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_from_range() {
        assert_eq!(Code::DuplicateName.base_severity(), Severity::Error);
        assert_eq!(Code::RoadDuplicate.base_severity(), Severity::Error);
        assert_eq!(Code::RunwayNameHeading.base_severity(), Severity::Warning);
        assert_eq!(Code::SeaportNoSealanes.base_severity(), Severity::Warning);
    }

    #[test]
    fn test_gateway_only_promotes() {
        for code in Code::GATEWAY_PROMOTED {
            assert_eq!(code.base_severity(), Severity::Warning);
            assert_eq!(code.severity(ExportTarget::Gateway), Severity::Error);
            assert_eq!(code.severity(ExportTarget::XPlane1200), Severity::Warning);
        }
        // Errors stay errors and unlisted warnings stay warnings
        assert_eq!(Code::DuplicateName.severity(ExportTarget::Gateway), Severity::Error);
        assert_eq!(Code::FlowTailwind.severity(ExportTarget::Gateway), Severity::Warning);
    }

    #[test]
    fn test_categories() {
        assert_eq!(Code::DuplicateName.category(), Category::Structural);
        assert_eq!(Code::FrequencyOutOfBand.category(), Category::NumericRange);
        assert_eq!(Code::WindingWrong.category(), Category::Geometric);
        assert_eq!(Code::ResourceMissing.category(), Category::Referential);
        assert_eq!(Code::RouteEndpointInvalid.category(), Category::Referential);
        assert_eq!(Code::RunwayRouteSplit.category(), Category::Topological);
        assert_eq!(Code::RouteNetworkDisconnected.category(), Category::Topological);
        assert_eq!(Code::CifpUnavailable.category(), Category::Advisory);
    }
}
