//! Tarmac Validate - airport scenery validation engine
//!
//! `validate` walks a scene graph airport by airport and reports everything
//! that would stop the scenery from loading or routing correctly: bad names,
//! out-of-range values, broken polygons, disconnected taxi networks, runway
//! hot zones, ATC frequency and wind coverage problems, and references to
//! missing library art or misplaced runway thresholds.
//!
//! Findings are `Diagnostic`s tagged with a `Code`; their severity depends
//! only on the code and the configured `ExportTarget`.

pub mod atc;
mod code;
mod config;
mod context;
mod diagnostic;
pub mod network;
mod orchestrator;
mod report;
pub mod rules;
pub mod xref;

pub use code::{Category, Code, Severity, WARNINGS_START_HERE};
pub use config::{ExportTarget, Units, ValidationConfig};
pub use context::{MagneticModel, ValidationContext};
pub use diagnostic::{Diagnostic, DiagnosticList, Findings, ValidationStatus};
pub use orchestrator::{validate, ValidationOutcome};
pub use report::{render_json, render_text, report_line, write_report, JsonReporter, LogReporter, Reporter, NO_AIRPORT};
