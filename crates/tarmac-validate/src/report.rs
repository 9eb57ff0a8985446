//! Rendering and presenting a finished diagnostic list

use crate::code::Severity;
use crate::diagnostic::{Diagnostic, DiagnosticList};
use std::fs;
use std::path::Path;
use tarmac_core::{Result, TarmacError};
use tarmac_scene::SceneGraph;

/// Label used for findings that belong to no airport
pub const NO_AIRPORT: &str = "(no airport)";

/// Shows a finished run to the user. Called once per run, after the report
/// file is written, unless the caller asked to skip it.
pub trait Reporter {
    fn present(&self, graph: &SceneGraph, diagnostics: &DiagnosticList) -> Result<()>;
}

fn airport_label<'g>(graph: &'g SceneGraph, d: &Diagnostic) -> &'g str {
    d.airport()
        .and_then(|id| graph.airport_icao(id))
        .filter(|icao| !icao.is_empty())
        .unwrap_or(NO_AIRPORT)
}

/// One report line: `<icao>: <message>`, with ` (warning only)` appended to
/// warnings
pub fn report_line(graph: &SceneGraph, d: &Diagnostic) -> String {
    let suffix = match d.severity() {
        Severity::Warning => " (warning only)",
        Severity::Error => "",
    };
    format!("{}: {}{}", airport_label(graph, d), d.message(), suffix)
}

pub fn render_text(graph: &SceneGraph, diagnostics: &DiagnosticList) -> String {
    let mut out = String::new();
    for d in diagnostics {
        out.push_str(&report_line(graph, d));
        out.push('\n');
    }
    out
}

pub fn render_json(graph: &SceneGraph, diagnostics: &DiagnosticList) -> Result<String> {
    let items: Vec<serde_json::Value> = diagnostics
        .iter()
        .map(|d| {
            serde_json::json!({
                "airport": airport_label(graph, d),
                "code": d.code(),
                "value": d.code().value(),
                "severity": d.severity(),
                "category": d.category(),
                "message": d.message(),
                "nodes": d.nodes(),
            })
        })
        .collect();

    let output = serde_json::json!({
        "status": diagnostics.status(),
        "summary": diagnostics.summary(),
        "errors": diagnostics.error_count(),
        "warnings": diagnostics.warning_count(),
        "diagnostics": items,
    });

    serde_json::to_string_pretty(&output)
        .map_err(|e| TarmacError::ReportError(format!("Failed to render report: {}", e)))
}

/// Write the text report, replacing any previous one
pub fn write_report(path: &Path, graph: &SceneGraph, diagnostics: &DiagnosticList) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            TarmacError::ReportError(format!("Cannot create {}: {}", parent.display(), e))
        })?;
    }
    fs::write(path, render_text(graph, diagnostics))
        .map_err(|e| TarmacError::ReportError(format!("Cannot write {}: {}", path.display(), e)))?;
    log::info!("Wrote validation report to {}", path.display());
    Ok(())
}

/// Presents findings through the `log` facade, one record per line
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn present(&self, graph: &SceneGraph, diagnostics: &DiagnosticList) -> Result<()> {
        log::info!("{}", diagnostics.summary());
        for d in diagnostics {
            match d.severity() {
                Severity::Error => log::error!("{}", report_line(graph, d)),
                Severity::Warning => log::warn!("{}", report_line(graph, d)),
            }
        }
        Ok(())
    }
}

/// Writes the JSON rendering next to the text report
#[derive(Debug, Clone)]
pub struct JsonReporter {
    pub path: std::path::PathBuf,
}

impl Reporter for JsonReporter {
    fn present(&self, graph: &SceneGraph, diagnostics: &DiagnosticList) -> Result<()> {
        let json = render_json(graph, diagnostics)?;
        fs::write(&self.path, json).map_err(|e| {
            TarmacError::ReportError(format!("Cannot write {}: {}", self.path.display(), e))
        })
    }
}
