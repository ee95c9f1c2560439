use std::cell::RefCell;

use serde::Serialize;

/// What went wrong, coarse enough to assert on in tests.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ContextUnavailable,
    ObjectCreation,
    VertexCompile,
    FragmentCompile,
    Link,
    Validate,
    FrameFailed,
}

/// A developer-facing message, optionally carrying the driver's info log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub info_log: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            info_log: None,
        }
    }

    pub fn with_info_log(mut self, info_log: Option<String>) -> Self {
        self.info_log = info_log.filter(|log| !log.trim().is_empty());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.info_log {
            Some(log) => write!(f, "{}: {}", self.message, log.trim_end()),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Console-style diagnostic stream. Reporting never fails and never aborts
/// the caller.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Emits a trace event and forwards to the sink.
pub fn report(sink: &dyn DiagnosticSink, diagnostic: Diagnostic) {
    tracing::warn!(
        kind = ?diagnostic.kind,
        info_log = diagnostic.info_log.as_deref().unwrap_or(""),
        "{}",
        diagnostic.message
    );
    sink.report(diagnostic);
}

/// In-memory sink, used headless and in tests.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: RefCell<Vec<Diagnostic>>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.entries.borrow().iter().map(|d| d.kind).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries.borrow_mut().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::{Diagnostic, DiagnosticKind, DiagnosticLog, report};
    use pretty_assertions::assert_eq;

    #[test]
    fn records_in_order() {
        let log = DiagnosticLog::new();
        report(&log, Diagnostic::new(DiagnosticKind::Link, "Error linking program"));
        report(&log, Diagnostic::new(DiagnosticKind::Validate, "Error validating program"));
        assert_eq!(
            log.kinds(),
            vec![DiagnosticKind::Link, DiagnosticKind::Validate]
        );
    }

    #[test]
    fn drain_clears_entries() {
        let log = DiagnosticLog::new();
        report(&log, Diagnostic::new(DiagnosticKind::FrameFailed, "m"));
        assert_eq!(log.drain().len(), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn blank_info_log_is_dropped() {
        let d = Diagnostic::new(DiagnosticKind::VertexCompile, "Error compiling vertex shader")
            .with_info_log(Some("  \n".to_string()));
        assert_eq!(d.info_log, None);
        assert_eq!(d.to_string(), "Error compiling vertex shader");
    }

    #[test]
    fn display_appends_info_log() {
        let d = Diagnostic::new(DiagnosticKind::FragmentCompile, "Error compiling fragment shader")
            .with_info_log(Some("ERROR: 0:4: syntax error\n".to_string()));
        assert_eq!(
            d.to_string(),
            "Error compiling fragment shader: ERROR: 0:4: syntax error"
        );
    }
}
