//! Per-entity rule checks
//!
//! Each check reads a slice of node ids from a `Collection` bucket and
//! appends zero or more findings. No check aborts the pass.

pub mod airport;
pub mod boundary;
pub mod duplicates;
pub mod metadata;
pub mod naming;
pub mod physical;
pub mod polygon;

pub use airport::{check_airport, check_ramps, check_towers, check_trucks};
pub use boundary::{check_boundary, check_extent, BOUNDARY_MARGIN_M, MAX_AIRPORT_EXTENT_M};
pub use duplicates::{check_duplicate_names, group_by_name};
pub use metadata::check_metadata;
pub use naming::{
    canonical_end, check_helipad_names, check_runway_names, check_sealane_names, runway_end_names,
};
pub use physical::{check_helipads, check_runways, check_sealanes, check_taxiways};
pub use polygon::{check_coordinates, check_geometry};
