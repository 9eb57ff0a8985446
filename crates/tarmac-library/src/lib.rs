//! Tarmac Library - the outside world the validator consults
//!
//! - `LibraryCatalog` - resource resolution and library membership
//!   (`ResourceManager`, `LibraryManager`)
//! - `HttpCache` - background-downloading file cache (`CifpFetcher`)
//! - `cifp` - runway records from published procedure data

mod catalog;
pub mod cifp;
mod fetch;
mod types;

pub use catalog::{LibraryCatalog, LibraryManager, ResourceManager};
pub use cifp::{load_cifp, parse_cifp, CifpData, CifpRunway};
pub use fetch::{cache_key, fetch_blocking, CifpFetcher, FetchResponse, FetchStatus, HttpCache};
pub use types::{extension_of, AssetInfo, LibraryExport, LibraryFile, LibraryMeta, ResourceKind};
