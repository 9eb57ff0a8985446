//! Diagnostics and the per-run diagnostic list

use crate::code::{Category, Code, Severity};
use crate::config::ExportTarget;
use serde::Serialize;
use tarmac_core::NodeId;

/// One finding: a message, its code, and the nodes it implicates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    message: String,
    code: Code,
    severity: Severity,
    nodes: Vec<NodeId>,
    airport: Option<NodeId>,
}

impl Diagnostic {
    /// Build a diagnostic; `None` when `nodes` is empty
    pub fn new(
        message: impl Into<String>,
        code: Code,
        nodes: Vec<NodeId>,
        airport: Option<NodeId>,
        target: ExportTarget,
    ) -> Option<Self> {
        if nodes.is_empty() {
            return None;
        }
        Some(Self {
            message: message.into(),
            code,
            severity: code.severity(target),
            nodes,
            airport,
        })
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn category(&self) -> Category {
        self.code.category()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn airport(&self) -> Option<NodeId> {
        self.airport
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Terminal classification of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Clean,
    WarningsOnly,
    Errors,
}

/// Append-only diagnostics in discovery order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DiagnosticList {
    items: Vec<Diagnostic>,
}

impl DiagnosticList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.items.len() - self.error_count()
    }

    pub fn with_code(&self, code: Code) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.code == code)
    }

    pub fn status(&self) -> ValidationStatus {
        if self.items.is_empty() {
            ValidationStatus::Clean
        } else if self.error_count() > 0 {
            ValidationStatus::Errors
        } else {
            ValidationStatus::WarningsOnly
        }
    }

    /// Get a human-readable summary
    pub fn summary(&self) -> String {
        if self.items.is_empty() {
            return "No problems found.".to_string();
        }
        format!(
            "{} problem(s): {} error(s), {} warning(s)",
            self.items.len(),
            self.error_count(),
            self.warning_count()
        )
    }
}

impl<'a> IntoIterator for &'a DiagnosticList {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Sink the checks write into, bound to one airport (or none)
pub struct Findings<'a> {
    list: &'a mut DiagnosticList,
    airport: Option<NodeId>,
    target: ExportTarget,
}

impl<'a> Findings<'a> {
    pub fn new(list: &'a mut DiagnosticList, airport: Option<NodeId>, target: ExportTarget) -> Self {
        Self {
            list,
            airport,
            target,
        }
    }

    pub fn airport(&self) -> Option<NodeId> {
        self.airport
    }

    pub fn target(&self) -> ExportTarget {
        self.target
    }

    /// Record a finding. With no implicated nodes the airport is blamed; with
    /// no airport either the finding cannot be attributed and is dropped.
    pub fn emit(&mut self, code: Code, message: impl Into<String>, nodes: impl IntoIterator<Item = NodeId>) {
        let mut nodes: Vec<NodeId> = nodes.into_iter().collect();
        if nodes.is_empty() {
            nodes.extend(self.airport);
        }
        let message = message.into();
        match Diagnostic::new(message, code, nodes, self.airport, self.target) {
            Some(d) => self.list.push(d),
            None => log::warn!("Dropping {} finding with no node to attach it to", code),
        }
    }

    /// Record a finding against the airport itself
    pub fn emit_airport(&mut self, code: Code, message: impl Into<String>) {
        self.emit(code, message, Vec::<NodeId>::new());
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_node_set_is_rejected() {
        assert!(Diagnostic::new("x", Code::DuplicateName, vec![], None, ExportTarget::default()).is_none());
    }

    #[test]
    fn test_findings_fall_back_to_airport() {
        let mut list = DiagnosticList::new();
        let mut out = Findings::new(&mut list, Some(NodeId(3)), ExportTarget::default());
        out.emit_airport(Code::AirportNoRunways, "no runways");
        out.emit(Code::DuplicateName, "dup", [NodeId(4), NodeId(5)]);
        assert_eq!(list.as_slice()[0].nodes(), &[NodeId(3)]);
        assert_eq!(list.as_slice()[1].nodes(), &[NodeId(4), NodeId(5)]);
        assert_eq!(list.as_slice()[1].airport(), Some(NodeId(3)));
    }

    #[test]
    fn test_unattributable_finding_is_dropped() {
        let mut list = DiagnosticList::new();
        let mut out = Findings::new(&mut list, None, ExportTarget::default());
        out.emit_airport(Code::AirportNoRunways, "no runways");
        assert!(list.is_empty());
    }

    #[test]
    fn test_status() {
        let mut list = DiagnosticList::new();
        assert_eq!(list.status(), ValidationStatus::Clean);
        {
            let mut out = Findings::new(&mut list, Some(NodeId(1)), ExportTarget::XPlane1200);
            out.emit_airport(Code::FlowUnreachable, "unreachable");
        }
        assert_eq!(list.status(), ValidationStatus::WarningsOnly);
        {
            let mut out = Findings::new(&mut list, Some(NodeId(1)), ExportTarget::Gateway);
            out.emit_airport(Code::FlowUnreachable, "unreachable");
        }
        assert_eq!(list.status(), ValidationStatus::Errors);
        assert_eq!(list.summary(), "2 problem(s): 1 error(s), 1 warning(s)");
    }
}
