//! Finalizer error types.

use crate::UpstreamError;

/// Result type for finalizers.
pub type FinalizationResult<T> = Result<T, FinalizationError>;

/// Reasons a finalizer could not produce its output.
#[derive(Debug, Clone, derive_more::Display)]
pub enum FinalizationErrorKind {
    /// The completion API call failed
    #[display("Upstream failure: {}", _0)]
    Upstream(UpstreamError),
    /// The prompt template references a field that was not collected
    #[display("Template references unknown field '{}'", _0)]
    Template(String),
    /// Any other finalizer failure
    #[display("{}", _0)]
    Other(String),
}

/// Finalization error with location tracking.
///
/// The dialog engine reports this once as a generic failure reply and never
/// retries; the session is torn down regardless.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Finalization Error: {} at line {} in {}", kind, line, file)]
pub struct FinalizationError {
    /// The kind of error that occurred
    pub kind: FinalizationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl FinalizationError {
    /// Create a new finalization error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: FinalizationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<UpstreamError> for FinalizationError {
    #[track_caller]
    fn from(err: UpstreamError) -> Self {
        Self::new(FinalizationErrorKind::Upstream(err))
    }
}
