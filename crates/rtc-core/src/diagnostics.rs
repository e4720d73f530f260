//! Warning/error reporting for the import pipeline.
//!
//! Importers never log directly: they report into a [`DiagnosticsSink`] handed
//! to them. [`Diagnostics`] collects entries for inspection (tests, reports);
//! [`TracingSink`] forwards them to `tracing`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// One reported problem, tied to the record it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Id of the structure, controller or trigger concerned.
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{level} [{}]: {}", self.subject, self.message)
    }
}

pub trait DiagnosticsSink {
    fn report(&mut self, diagnostic: Diagnostic);

    fn warn(&mut self, subject: &str, message: String) {
        self.report(Diagnostic {
            severity: Severity::Warning,
            subject: subject.to_string(),
            message,
        });
    }

    fn error(&mut self, subject: &str, message: String) {
        self.report(Diagnostic {
            severity: Severity::Error,
            subject: subject.to_string(),
            message,
        });
    }
}

/// In-memory collector.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn count_for(&self, subject: &str) -> usize {
        self.entries.iter().filter(|d| d.subject == subject).count()
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl DiagnosticsSink for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }
}

/// Forwards every diagnostic to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => {
                tracing::warn!(subject = %diagnostic.subject, "{}", diagnostic.message)
            }
            Severity::Error => {
                tracing::error!(subject = %diagnostic.subject, "{}", diagnostic.message)
            }
        }
    }
}

impl<S: DiagnosticsSink + ?Sized> DiagnosticsSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}
