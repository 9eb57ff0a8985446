//! Layered validation configuration
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `TARMAC_EXPORT_TARGET`, `TARMAC_CIFP_URL`,
//!    `TARMAC_REPORT_PATH`
//! 2. Project-local: `.tarmac/config.toml`
//! 3. Global: `~/.tarmac/config.toml`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tarmac_core::{Result, TarmacError, MTR_TO_FT};

/// Simulator version the scenery is exported for. Later variants are newer;
/// `Gateway` is the strictest profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportTarget {
    XPlane900,
    XPlane1000,
    XPlane1021,
    XPlane1050,
    XPlane1100,
    XPlane1130,
    #[default]
    XPlane1200,
    Gateway,
}

impl ExportTarget {
    pub fn is_gateway(self) -> bool {
        self == ExportTarget::Gateway
    }

    /// Whether 8.33 kHz channel spacing is understood by this target
    pub fn allows_833_spacing(self) -> bool {
        self >= ExportTarget::XPlane1130
    }
}

impl FromStr for ExportTarget {
    type Err = TarmacError;

    fn from_str(s: &str) -> Result<Self> {
        let target = match s.trim().to_ascii_lowercase().as_str() {
            "xplane900" => ExportTarget::XPlane900,
            "xplane1000" => ExportTarget::XPlane1000,
            "xplane1021" => ExportTarget::XPlane1021,
            "xplane1050" => ExportTarget::XPlane1050,
            "xplane1100" => ExportTarget::XPlane1100,
            "xplane1130" => ExportTarget::XPlane1130,
            "xplane1200" => ExportTarget::XPlane1200,
            "gateway" => ExportTarget::Gateway,
            other => {
                return Err(TarmacError::ConfigError(format!(
                    "Unknown export target '{}'",
                    other
                )))
            }
        };
        Ok(target)
    }
}

/// Units used when formatting distances in messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn length(self, meters: f64) -> String {
        match self {
            Units::Metric => format!("{:.1} m", meters),
            Units::Imperial => format!("{:.0} ft", meters * MTR_TO_FT),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cifp_url() -> String {
    "https://gateway.x-plane.com/cifp/{icao}.dat".to_string()
}

fn default_max_polls() -> u32 {
    10
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_report_path() -> PathBuf {
    PathBuf::from("validation_report.txt")
}

/// Settings for one validation run. Built once, read-only during the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub export_target: ExportTarget,
    #[serde(default = "default_true")]
    pub check_resources: bool,
    #[serde(default)]
    pub check_cifp: bool,
    /// URL template; `{icao}` is replaced by the airport id
    #[serde(default = "default_cifp_url")]
    pub cifp_url: String,
    #[serde(default = "default_max_polls")]
    pub cifp_max_polls: u32,
    #[serde(default = "default_poll_interval_ms")]
    pub cifp_poll_interval_ms: u64,
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
    #[serde(default)]
    pub units: Units,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            export_target: ExportTarget::default(),
            check_resources: true,
            check_cifp: false,
            cifp_url: default_cifp_url(),
            cifp_max_polls: default_max_polls(),
            cifp_poll_interval_ms: default_poll_interval_ms(),
            report_path: default_report_path(),
            units: Units::default(),
        }
    }
}

/// On-disk layer: every field optional so a layer only overrides what it sets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigLayer {
    #[serde(default)]
    export_target: Option<ExportTarget>,
    #[serde(default)]
    check_resources: Option<bool>,
    #[serde(default)]
    check_cifp: Option<bool>,
    #[serde(default)]
    cifp_url: Option<String>,
    #[serde(default)]
    cifp_max_polls: Option<u32>,
    #[serde(default)]
    cifp_poll_interval_ms: Option<u64>,
    #[serde(default)]
    report_path: Option<PathBuf>,
    #[serde(default)]
    units: Option<Units>,
}

impl ValidationConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Layer 1: Global config (~/.tarmac/config.toml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config.merge(Self::load_layer(&global_path)?);
            }
        }

        // Layer 2: Project-local config (.tarmac/config.toml)
        let local_path = PathBuf::from(".tarmac/config.toml");
        if local_path.exists() {
            config.merge(Self::load_layer(&local_path)?);
        }

        // Layer 3: Environment variable overrides
        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Load config from a specific file path only (for testing)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge(Self::load_layer(path)?);
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// The CIFP URL for one airport
    pub fn cifp_url_for(&self, icao: &str) -> String {
        self.cifp_url.replace("{icao}", icao)
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".tarmac").join("config.toml"))
    }

    fn load_layer(path: &Path) -> Result<ConfigLayer> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            TarmacError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    fn merge(&mut self, layer: ConfigLayer) {
        if let Some(v) = layer.export_target {
            self.export_target = v;
        }
        if let Some(v) = layer.check_resources {
            self.check_resources = v;
        }
        if let Some(v) = layer.check_cifp {
            self.check_cifp = v;
        }
        if let Some(v) = layer.cifp_url {
            self.cifp_url = v;
        }
        if let Some(v) = layer.cifp_max_polls {
            self.cifp_max_polls = v;
        }
        if let Some(v) = layer.cifp_poll_interval_ms {
            self.cifp_poll_interval_ms = v;
        }
        if let Some(v) = layer.report_path {
            self.report_path = v;
        }
        if let Some(v) = layer.units {
            self.units = v;
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(target) = std::env::var("TARMAC_EXPORT_TARGET") {
            self.export_target = target.parse()?;
        }
        if let Ok(url) = std::env::var("TARMAC_CIFP_URL") {
            self.cifp_url = url;
        }
        if let Ok(path) = std::env::var("TARMAC_REPORT_PATH") {
            self.report_path = PathBuf::from(path);
        }
        Ok(())
    }
}
