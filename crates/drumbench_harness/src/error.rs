//! Error types for bench setup and harness failures.

use drumbench_common::InternalError;
use drumbench_config::ConfigError;
use drumbench_diagnostics::{Diagnostic, DiagnosticCode};
use drumbench_sim::SimError;

/// Errors that stop a bench run.
///
/// Mismatches between a device and its oracle are never errors; they are
/// counted in the phase tally. An `Err` means either the bench could not be
/// set up or the harness found itself inconsistent.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// A device port could not be driven or read, or a memory image is unavailable.
    #[error("setup failed: {0}")]
    Setup(#[from] SimError),

    /// The bench configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The harness detected a defect in itself.
    #[error(transparent)]
    Internal(#[from] InternalError),

    /// A phase name was not recognized.
    #[error("unknown phase '{0}'")]
    UnknownPhase(String),
}

impl HarnessError {
    /// Returns `true` for failures that happen before any check runs.
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            HarnessError::Setup(_) | HarnessError::Config(_) | HarnessError::UnknownPhase(_)
        )
    }

    /// Renders this failure as an `S001` setup or `I001` internal diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = if self.is_setup() {
            DiagnosticCode::SETUP_FAILED
        } else {
            DiagnosticCode::INTERNAL_INCONSISTENCY
        };
        let diag = Diagnostic::error(code, self.to_string());
        match self {
            HarnessError::Setup(
                SimError::ImageNotFound { .. }
                | SimError::ImageIo { .. }
                | SimError::ImageParse { .. }
                | SimError::EmptyImage { .. },
            ) => diag.with_help("check the [images] section of drumbench.toml"),
            HarnessError::Setup(_) => {
                diag.with_help("the device model and its stimulus disagree on ports")
            }
            HarnessError::Config(_) => diag.with_help("check drumbench.toml"),
            HarnessError::Internal(_) => diag
                .with_note("no phase result can be trusted after this point")
                .with_help("this is a defect in drumbench, not in the device under test"),
            HarnessError::UnknownPhase(_) => {
                diag.with_help("run `drumbench list` for the available phases")
            }
        }
    }
}
