//! Session store error types.

/// Result type for session store operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Kinds of session errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SessionErrorKind {
    /// The conversant already has a dialog in progress
    #[display("Session already active for conversant {}", _0)]
    AlreadyActive(String),
    /// No live session for the conversant
    #[display("No active session for conversant {}", _0)]
    NotFound(String),
    /// No dialog registered under the requested kind
    #[display("Unknown dialog kind: {}", _0)]
    UnknownDialog(String),
}

/// Session error with location tracking.
///
/// # Examples
///
/// ```
/// use slotwise_error::{SessionError, SessionErrorKind};
///
/// let err = SessionError::new(SessionErrorKind::AlreadyActive("42".to_string()));
/// assert!(format!("{}", err).contains("already active"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Session Error: {} at line {} in {}", kind, line, file)]
pub struct SessionError {
    /// The kind of error that occurred
    pub kind: SessionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SessionError {
    /// Create a new session error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SessionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// True when this error reports a dialog-start collision.
    pub fn is_already_active(&self) -> bool {
        matches!(self.kind, SessionErrorKind::AlreadyActive(_))
    }
}
