//! Severity-tagged diagnostics for modeling problems.
//!
//! Ordinary modeling issues (a wire naming a pin that does not exist, two
//! constraints fighting over an orientation) are reported here and layout
//! proceeds best-effort; only unclassified solver defects abort a solve.

use std::fmt;

/// How serious a reported problem is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A single report from discovery, registration or solving.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Info => write!(f, "info: {}", self.message),
            Severity::Warning => write!(f, "warning: {}", self.message),
            Severity::Error => write!(f, "error: {}", self.message),
        }
    }
}

/// Receiver for diagnostics emitted while building and solving a circuit.
/// Object-safe so presences can take `&mut dyn DiagnosticSink`.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);

    fn info(&mut self, message: &str) {
        self.report(Diagnostic {
            severity: Severity::Info,
            message: message.to_string(),
        });
    }

    fn warning(&mut self, message: &str) {
        self.report(Diagnostic {
            severity: Severity::Warning,
            message: message.to_string(),
        });
    }

    fn error(&mut self, message: &str) {
        self.report(Diagnostic {
            severity: Severity::Error,
            message: message.to_string(),
        });
    }
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Info => log::info!("{}", diagnostic.message),
            Severity::Warning => log::warn!("{}", diagnostic.message),
            Severity::Error => log::error!("{}", diagnostic.message),
        }
    }
}

/// Collects diagnostics for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of collected diagnostics at the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_counts_by_severity() {
        let mut sink = CollectingSink::new();
        sink.info("layout has no constraints");
        sink.warning("pin X5[a] is not defined");
        sink.warning("conflicting orientation for X5[b]");

        assert_eq!(sink.count(Severity::Info), 1);
        assert_eq!(sink.count(Severity::Warning), 2);
        assert_eq!(sink.count(Severity::Error), 0);
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic {
            severity: Severity::Warning,
            message: "something odd".into(),
        };
        assert_eq!(diagnostic.to_string(), "warning: something odd");
    }
}
