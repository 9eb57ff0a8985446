//! Error types for Tarmac

use thiserror::Error;

/// The main error type for Tarmac operations
///
/// Validation findings are never errors; they are reported as diagnostics.
/// This type covers infrastructure failures only.
#[derive(Debug, Error)]
pub enum TarmacError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Invalid hierarchy: {0}")]
    HierarchyError(String),

    #[error("Scene error: {0}")]
    SceneError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Library error: {0}")]
    LibraryError(String),

    #[error("Fetch error: {0}")]
    FetchError(String),

    #[error("CIFP parse error at line {line}: {message}")]
    CifpParseError { line: usize, message: String },

    #[error("Report error: {0}")]
    ReportError(String),
}

/// Result type alias for Tarmac operations
pub type Result<T> = std::result::Result<T, TarmacError>;

impl From<toml::de::Error> for TarmacError {
    fn from(err: toml::de::Error) -> Self {
        TarmacError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for TarmacError {
    fn from(err: toml::ser::Error) -> Self {
        TarmacError::TomlSerError(err.to_string())
    }
}
