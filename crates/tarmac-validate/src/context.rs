//! Per-run validation context

use crate::config::ValidationConfig;
use crate::report::Reporter;
use tarmac_core::{normalize_deg, LatLon};
use tarmac_library::{CifpFetcher, LibraryManager, ResourceManager};
use tarmac_scene::SceneGraph;

/// Magnetic declination source; positive declination is east
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MagneticModel {
    pub declination_deg: f64,
}

impl MagneticModel {
    pub fn uniform(declination_deg: f64) -> Self {
        Self { declination_deg }
    }

    pub fn declination_at(&self, _at: LatLon) -> f64 {
        self.declination_deg
    }

    /// Magnetic heading for a true heading at a position
    pub fn magnetic(&self, true_heading: f64, at: LatLon) -> f64 {
        normalize_deg(true_heading - self.declination_at(at))
    }
}

/// Everything one validation run reads: the scene, the settings, and the
/// optional outside collaborators. Checks without their collaborator are
/// skipped.
pub struct ValidationContext<'a> {
    pub graph: &'a SceneGraph,
    pub config: &'a ValidationConfig,
    pub resources: Option<&'a dyn ResourceManager>,
    pub library: Option<&'a dyn LibraryManager>,
    pub cifp: Option<&'a dyn CifpFetcher>,
    pub reporter: Option<&'a dyn Reporter>,
    pub magnetic: MagneticModel,
}

impl<'a> ValidationContext<'a> {
    pub fn new(graph: &'a SceneGraph, config: &'a ValidationConfig) -> Self {
        Self {
            graph,
            config,
            resources: None,
            library: None,
            cifp: None,
            reporter: None,
            magnetic: MagneticModel::default(),
        }
    }

    pub fn with_resources(mut self, resources: &'a dyn ResourceManager) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn with_library(mut self, library: &'a dyn LibraryManager) -> Self {
        self.library = Some(library);
        self
    }

    pub fn with_cifp(mut self, cifp: &'a dyn CifpFetcher) -> Self {
        self.cifp = Some(cifp);
        self
    }

    pub fn with_reporter(mut self, reporter: &'a dyn Reporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn with_magnetic(mut self, magnetic: MagneticModel) -> Self {
        self.magnetic = magnetic;
        self
    }

    /// Format a distance in the configured display units
    pub fn len_str(&self, meters: f64) -> String {
        self.config.units.length(meters)
    }
}
