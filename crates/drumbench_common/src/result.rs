//! Result and error types for harness defects.

/// The result type for operations that can only fail because of a harness bug.
///
/// A mismatch between a device and its oracle is not an error: it is counted
/// and reported. `Err` means the harness itself is inconsistent and its score
/// can no longer be trusted.
pub type BenchResult<T> = Result<T, InternalError>;

/// An internal consistency failure indicating a defect in the harness, not in
/// the device under test.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal harness error: {message}")]
pub struct InternalError {
    /// Description of the inconsistency.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Creates the error raised when a tally reports more passes than checks.
    pub fn tally_overflow(scope: &str, passed: u64, total: u64) -> Self {
        Self::new(format!(
            "{scope} tally reports {passed} passed out of {total} checks"
        ))
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
