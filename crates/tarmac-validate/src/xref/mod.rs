//! Cross-reference checks against the outside world: the art asset library
//! and published runway data

mod cifp;
mod resources;

pub use cifp::{check_cifp, compare_cifp, DISPLACED_TOLERANCE_M, POSITION_TOLERANCE_PAVED_M};
pub use resources::{check_resources, resource_kind};
