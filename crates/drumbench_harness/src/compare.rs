//! Per-phase check accounting.

use crate::phases::{Phase, PhaseResult};
use crate::tally::Tally;
use drumbench_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};

/// Counts checks for one phase and collects a capped list of mismatch reports.
pub struct Comparator {
    phase: Phase,
    tally: Tally,
    sink: DiagnosticSink,
}

impl Comparator {
    /// Creates a comparator that stores at most `max_mismatches` reports, or
    /// every report when `None`.
    pub fn new(phase: Phase, max_mismatches: Option<usize>) -> Self {
        Self {
            phase,
            tally: Tally::new(),
            sink: DiagnosticSink::with_limit(max_mismatches.unwrap_or(usize::MAX)),
        }
    }

    /// Records one check. On failure `report` builds the diagnostic; it is
    /// not called when the check passes.
    pub fn check(&mut self, ok: bool, report: impl FnOnce() -> Diagnostic) -> bool {
        self.tally.record(ok);
        if !ok {
            let diag = report();
            tracing::debug!(phase = self.phase.name(), "{}", diag.message);
            self.sink.emit(diag);
        }
        ok
    }

    /// Returns the running tally.
    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Closes the phase.
    pub fn finish(self) -> PhaseResult {
        let mut result = PhaseResult::new(self.phase);
        result.tally = self.tally;
        result.suppressed = self.sink.suppressed_count();
        result.diagnostics = self.sink.take_all();
        result
    }
}

/// Builds the standard mismatch report: `"{label}: {signal} expected E, observed O"`.
pub fn mismatch(
    code: DiagnosticCode,
    label: &str,
    signal: &str,
    expected: &str,
    observed: &str,
) -> Diagnostic {
    Diagnostic::error(
        code,
        format!("{label}: {signal} expected {expected}, observed {observed}"),
    )
}
