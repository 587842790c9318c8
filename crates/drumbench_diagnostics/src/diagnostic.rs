//! Structured diagnostic messages with severity, codes, notes, and help.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A structured diagnostic message.
///
/// Each diagnostic carries a severity and code, a one-line message, and
/// optional notes (context such as the preceding state or applied inputs)
/// and help lines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// Explanatory context lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Actionable suggestions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub help: Vec<String>,
}

impl Diagnostic {
    /// Creates a diagnostic with the given severity, code, and message.
    pub fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Creates a new note diagnostic.
    pub fn note(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Note, code, message)
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_builder() {
        let diag = Diagnostic::error(DiagnosticCode::VALUE_MISMATCH, "seq_out mismatch")
            .with_note("previous seq_out = 0x40")
            .with_help("check the rotate direction");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.notes, vec!["previous seq_out = 0x40"]);
        assert_eq!(diag.help.len(), 1);
    }

    #[test]
    fn warning_and_note_constructors() {
        let w = Diagnostic::warning(DiagnosticCode::SHORT_PLAYBACK, "short image");
        assert_eq!(w.severity, Severity::Warning);
        let n = Diagnostic::note(DiagnosticCode::PRIORITY_OBSERVED, "raw wins");
        assert_eq!(n.severity, Severity::Note);
    }

    #[test]
    fn serde_skips_empty_notes() {
        let diag = Diagnostic::error(DiagnosticCode::VALUE_MISMATCH, "x");
        let json = serde_json::to_string(&diag).unwrap();
        assert!(!json.contains("notes"));
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, diag);
    }
}
