//! Library resource type definitions

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The kind of art asset a scene entity expects behind its resource path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Object,
    Facade,
    Forest,
    DrapedPolygon,
    Line,
    Orthophoto,
}

impl ResourceKind {
    /// File extensions (lowercase, no dot) legal for this kind
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ResourceKind::Object => &["obj", "agp"],
            ResourceKind::Facade => &["fac"],
            ResourceKind::Forest => &["for"],
            ResourceKind::DrapedPolygon => &["pol"],
            ResourceKind::Line => &["lin"],
            ResourceKind::Orthophoto => &["pol", "dds", "png", "jpg", "tif"],
        }
    }

    pub fn accepts(&self, path: &str) -> bool {
        extension_of(path)
            .map(|ext| self.extensions().contains(&ext.as_str()))
            .unwrap_or(false)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Object => "object",
            ResourceKind::Facade => "facade",
            ResourceKind::Forest => "forest",
            ResourceKind::DrapedPolygon => "draped polygon",
            ResourceKind::Line => "line",
            ResourceKind::Orthophoto => "orthophoto",
        }
    }
}

/// Lowercase extension of a virtual or local path
pub fn extension_of(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// What a resource path resolved to
#[derive(Debug, Clone, PartialEq)]
pub struct AssetInfo {
    /// Virtual path as written in the scene
    pub path: String,
    /// The file that backs it
    pub local_path: PathBuf,
}

/// One exported path in a library catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryExport {
    /// Virtual path scenery refers to
    pub path: String,
    /// File backing the path, relative to the catalog root
    pub file: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub private: bool,
}

/// Library catalog header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryMeta {
    pub name: String,
    /// Directory the export files live in; relative to the catalog file
    #[serde(default)]
    pub root: Option<String>,
}

/// TOML catalog file: a `[library]` header plus `[[export]]` entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryFile {
    pub library: LibraryMeta,
    #[serde(default, rename = "export")]
    pub exports: Vec<LibraryExport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_extensions() {
        assert!(ResourceKind::Object.accepts("lib/airport/tower.obj"));
        assert!(ResourceKind::Object.accepts("lib/airport/Jetway.AGP"));
        assert!(!ResourceKind::Object.accepts("lib/airport/hangar.fac"));
        assert!(ResourceKind::Orthophoto.accepts("ortho/apron.dds"));
        assert!(ResourceKind::Orthophoto.accepts("ortho/apron.pol"));
        assert!(!ResourceKind::Forest.accepts("trees"));
    }

    #[test]
    fn test_library_file_serde() {
        let toml_str = r#"
[library]
name = "Default Airport Library"

[[export]]
path = "lib/airport/tower.obj"
file = "objects/tower.obj"
default = true

[[export]]
path = "lib/airport/old_tower.obj"
file = "objects/old_tower.obj"
default = true
deprecated = true
"#;
        let file: LibraryFile = toml::from_str(toml_str).unwrap();
        assert_eq!(file.library.name, "Default Airport Library");
        assert_eq!(file.exports.len(), 2);
        assert!(file.exports[1].deprecated);
        assert!(!file.exports[0].private);
    }
}
