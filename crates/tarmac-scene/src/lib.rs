//! Tarmac Scene - airport scene graph and TOML scene files
//!
//! This crate holds the scene graph the validator reads, the entity sum type
//! carried by its nodes, loading and saving of scene files, and the scene
//! collector that sorts a subtree into typed buckets.

pub mod collect;
pub mod entity;
mod format;
mod graph;
mod loader;
mod saver;

pub use collect::{collect, Collection};
pub use entity::{Entity, Geometry, PolygonGeometry, Ring, RingPoint};
pub use format::{NodeDef, SceneFile, SceneMetadata};
pub use graph::{Node, SceneGraph};
pub use loader::{build_graph, load_scene, load_scene_string};
pub use saver::{graph_to_scene_file, save_scene, save_scene_string};
