//! Scene file format definitions

use crate::entity::Entity;
use serde::{Deserialize, Serialize};

/// Root structure of a scene TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    pub scene: SceneMetadata,
    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeDef>,
}

/// Scene metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneMetadata {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// One `[[node]]` table.
///
/// `id` is local to the file; taxi route and road endpoints refer to these
/// ids. Nodes without a parent hang off the scene root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDef {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u32>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(flatten)]
    pub entity: Entity,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl SceneFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            scene: SceneMetadata {
                name: name.into(),
                version: default_version(),
                description: None,
            },
            nodes: Vec::new(),
        }
    }
}
