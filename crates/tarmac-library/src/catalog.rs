//! Library catalog and the resource lookup traits the validator consumes

use crate::types::{AssetInfo, LibraryExport, LibraryFile};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tarmac_core::{Result, TarmacError};

/// Resolves a resource path written in a scene to the asset behind it
pub trait ResourceManager {
    fn resolve(&self, path: &str) -> Option<AssetInfo>;
}

/// Answers library membership questions about virtual paths
pub trait LibraryManager {
    /// Whether the path is exported by a default (shipped) library
    fn is_default(&self, path: &str) -> bool;
    fn is_deprecated(&self, path: &str) -> bool;
    fn is_private(&self, path: &str) -> bool;
    fn local_path(&self, path: &str) -> Option<PathBuf>;
}

#[derive(Debug, Clone)]
struct Export {
    local_path: PathBuf,
    default: bool,
    deprecated: bool,
    private: bool,
}

/// Catalog of exported library paths and package-local files
#[derive(Debug, Default)]
pub struct LibraryCatalog {
    exports: HashMap<String, Export>,
}

impl LibraryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a single TOML catalog file
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut catalog = Self::new();
        catalog.add_file(path)?;
        Ok(catalog)
    }

    /// Add the exports of a TOML catalog file
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        self.add_string(&content, base).map_err(|e| {
            TarmacError::LibraryError(format!("Failed to load {}: {}", path.display(), e))
        })
    }

    /// Add the exports of a TOML catalog held in memory; `base` anchors relative roots
    pub fn add_string(&mut self, content: &str, base: &Path) -> Result<()> {
        let file: LibraryFile = toml::from_str(content)?;
        let root = match &file.library.root {
            Some(r) => base.join(r),
            None => base.to_path_buf(),
        };
        log::debug!(
            "Library '{}': {} exports",
            file.library.name,
            file.exports.len()
        );
        for export in file.exports {
            let local = root.join(&export.file);
            self.register(export, local);
        }
        Ok(())
    }

    /// Register every file under a scenery package directory as a local,
    /// non-default resource addressed by its package-relative path
    pub fn add_package<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            log::warn!("Scenery package {} does not exist", dir.display());
            return Ok(());
        }
        self.scan_package(dir, dir)
    }

    fn scan_package(&mut self, root: &Path, dir: &Path) -> Result<()> {
        let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
        entries.sort_by_key(|e| e.path());

        for entry in entries {
            let path = entry.path();
            if path.is_dir() {
                self.scan_package(root, &path)?;
                continue;
            }
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let virtual_path = relative
                .components()
                .filter_map(|c| c.as_os_str().to_str())
                .collect::<Vec<_>>()
                .join("/");
            if virtual_path.is_empty() {
                continue;
            }
            self.register(
                LibraryExport {
                    path: virtual_path,
                    file: String::new(),
                    default: false,
                    deprecated: false,
                    private: false,
                },
                path,
            );
        }
        Ok(())
    }

    /// Register one export. When a path is exported more than once the first
    /// backing file wins and the flags accumulate.
    pub fn register(&mut self, export: LibraryExport, local_path: PathBuf) {
        match self.exports.get_mut(&export.path) {
            Some(existing) => {
                log::debug!("Path '{}' exported more than once", export.path);
                existing.default |= export.default;
                existing.deprecated |= export.deprecated;
                existing.private |= export.private;
            }
            None => {
                self.exports.insert(
                    export.path,
                    Export {
                        local_path,
                        default: export.default,
                        deprecated: export.deprecated,
                        private: export.private,
                    },
                );
            }
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.exports.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.exports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }
}

impl ResourceManager for LibraryCatalog {
    fn resolve(&self, path: &str) -> Option<AssetInfo> {
        self.exports.get(path).map(|e| AssetInfo {
            path: path.to_string(),
            local_path: e.local_path.clone(),
        })
    }
}

impl LibraryManager for LibraryCatalog {
    fn is_default(&self, path: &str) -> bool {
        self.exports.get(path).map(|e| e.default).unwrap_or(false)
    }

    fn is_deprecated(&self, path: &str) -> bool {
        self.exports.get(path).map(|e| e.deprecated).unwrap_or(false)
    }

    fn is_private(&self, path: &str) -> bool {
        self.exports.get(path).map(|e| e.private).unwrap_or(false)
    }

    fn local_path(&self, path: &str) -> Option<PathBuf> {
        self.exports.get(path).map(|e| e.local_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
[library]
name = "Default Airport Library"
root = "lib"

[[export]]
path = "lib/airport/tower.obj"
file = "objects/tower.obj"
default = true

[[export]]
path = "lib/airport/old_hangar.fac"
file = "facades/old_hangar.fac"
default = true
deprecated = true

[[export]]
path = "lib/airport/secret.obj"
file = "objects/secret.obj"
private = true
"#;

    #[test]
    fn test_catalog_flags() {
        let mut catalog = LibraryCatalog::new();
        catalog.add_string(CATALOG, Path::new("/libs")).unwrap();

        assert_eq!(catalog.len(), 3);
        assert!(catalog.is_default("lib/airport/tower.obj"));
        assert!(!catalog.is_deprecated("lib/airport/tower.obj"));
        assert!(catalog.is_deprecated("lib/airport/old_hangar.fac"));
        assert!(catalog.is_private("lib/airport/secret.obj"));
        assert!(!catalog.is_default("lib/airport/secret.obj"));
        assert_eq!(
            catalog.local_path("lib/airport/tower.obj"),
            Some(PathBuf::from("/libs/lib/objects/tower.obj"))
        );
    }

    #[test]
    fn test_resolve_unknown_path() {
        let catalog = LibraryCatalog::new();
        assert!(catalog.resolve("lib/nothing.obj").is_none());
        assert!(!catalog.is_default("lib/nothing.obj"));
    }

    #[test]
    fn test_repeated_export_accumulates_flags() {
        let mut catalog = LibraryCatalog::new();
        let export = |deprecated| LibraryExport {
            path: "lib/a.obj".to_string(),
            file: "a.obj".to_string(),
            default: true,
            deprecated,
            private: false,
        };
        catalog.register(export(false), PathBuf::from("first/a.obj"));
        catalog.register(export(true), PathBuf::from("second/a.obj"));
        assert!(catalog.is_deprecated("lib/a.obj"));
        assert_eq!(catalog.local_path("lib/a.obj"), Some(PathBuf::from("first/a.obj")));
    }

    #[test]
    fn test_package_scan() {
        let dir = std::env::temp_dir().join(format!("tarmac_pkg_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(dir.join("objects")).unwrap();
        fs::write(dir.join("objects").join("shed.obj"), "A\n800\nOBJ\n").unwrap();
        fs::write(dir.join("apron.pol"), "A\n850\nDRAPED_POLYGON\n").unwrap();

        let mut catalog = LibraryCatalog::new();
        catalog.add_package(&dir).unwrap();
        assert!(catalog.contains("objects/shed.obj"));
        assert!(catalog.contains("apron.pol"));
        assert!(!catalog.is_default("apron.pol"));

        let info = catalog.resolve("objects/shed.obj").unwrap();
        assert!(info.local_path.ends_with("shed.obj"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_catalog_file() {
        let dir = std::env::temp_dir().join(format!("tarmac_lib_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("library.toml");
        fs::write(&path, CATALOG).unwrap();

        let catalog = LibraryCatalog::load_file(&path).unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(LibraryCatalog::load_file(dir.join("missing.toml")).is_err());

        let _ = fs::remove_dir_all(&dir);
    }
}
