//! Thread-safe diagnostic accumulator with a storage cap.

use crate::diagnostic::Diagnostic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// A thread-safe accumulator for diagnostics emitted while a phase runs.
///
/// Only the first `limit` diagnostics are stored; later ones are counted as
/// suppressed.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    suppressed: AtomicUsize,
    limit: usize,
}

impl DiagnosticSink {
    /// Creates a new sink that stores every diagnostic.
    pub fn new() -> Self {
        Self::with_limit(usize::MAX)
    }

    /// Creates a new sink that stores at most `limit` diagnostics.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            suppressed: AtomicUsize::new(0),
            limit,
        }
    }

    /// Emits a diagnostic into the sink.
    pub fn emit(&self, diag: Diagnostic) {
        let mut diagnostics = self
            .diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if diagnostics.len() < self.limit {
            diagnostics.push(diag);
        } else {
            self.suppressed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Returns how many diagnostics were dropped because the limit was reached.
    pub fn suppressed_count(&self) -> usize {
        self.suppressed.load(Ordering::Relaxed)
    }

    /// Takes all stored diagnostics, leaving the sink empty.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self
            .diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *diagnostics)
    }

    /// Returns a snapshot of the stored diagnostics without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::DiagnosticCode;

    fn make_error() -> Diagnostic {
        Diagnostic::error(DiagnosticCode::VALUE_MISMATCH, "test mismatch")
    }

    fn make_note() -> Diagnostic {
        Diagnostic::note(DiagnosticCode::PRIORITY_OBSERVED, "test note")
    }

    #[test]
    fn empty_sink() {
        let sink = DiagnosticSink::new();
        assert_eq!(sink.suppressed_count(), 0);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn emit_stores_every_severity() {
        let sink = DiagnosticSink::new();
        sink.emit(make_error());
        sink.emit(make_note());
        assert_eq!(sink.diagnostics().len(), 2);
    }

    #[test]
    fn limit_caps_storage() {
        let sink = DiagnosticSink::with_limit(2);
        for _ in 0..5 {
            sink.emit(make_error());
        }
        assert_eq!(sink.diagnostics().len(), 2);
        assert_eq!(sink.suppressed_count(), 3);
    }

    #[test]
    fn take_all_drains() {
        let sink = DiagnosticSink::new();
        sink.emit(make_error());
        sink.emit(make_note());
        assert_eq!(sink.take_all().len(), 2);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let sink = Arc::new(DiagnosticSink::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let sink = Arc::clone(&sink);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    sink.emit(make_error());
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(sink.diagnostics().len(), 800);
        assert_eq!(sink.suppressed_count(), 0);
    }
}
