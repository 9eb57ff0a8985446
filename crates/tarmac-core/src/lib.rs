//! Tarmac Core - Foundational types for the Tarmac scenery validator
//!
//! This crate provides the types every other Tarmac crate depends on:
//! - `NodeId` - Scene graph node identifiers
//! - `LatLon`, `Vec2`, `Bbox2` - Geodetic and planar coordinates
//! - `LocalProjection` - Geodetic to local-meters projection
//! - `geometry` - Pure planar predicates (winding, intersection, containment)
//! - Error types and Result alias

mod error;
pub mod geometry;
mod id;
mod projection;
mod types;

pub use error::{Result, TarmacError};
pub use id::NodeId;
pub use projection::{
    bearing_deg, distance_m, heading_delta, normalize_deg, LocalProjection, DEG_TO_MTR_LAT,
    MTR_TO_FT,
};
pub use types::{Bbox2, LatLon, Vec2};
