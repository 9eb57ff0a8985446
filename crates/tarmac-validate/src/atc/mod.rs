//! ATC frequency legality and flow coverage

pub mod flow;
pub mod frequency;

pub use flow::{check_flows, degree_runs, rule_degrees, FlowRules, WindRose, MAX_WIND_KT};
pub use frequency::{airport_position, check_frequencies, in_band, raster, raster_legal, Raster};
