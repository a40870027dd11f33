//! Slot input validation errors.

/// Result type for slot validators.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Reasons a slot answer was rejected.
///
/// The display text is shown to the conversant as part of the re-prompt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Answer is not one of the enumerated choices.
    #[display("Please answer with one of: {}.", accepted.join(", "))]
    InvalidEnum {
        /// Accepted spellings, in configured order
        accepted: Vec<String>,
    },
    /// Answer does not have the expected shape (number, range, ...).
    #[display("{}", _0)]
    InvalidFormat(String),
}

/// Validation error with location tracking.
///
/// # Examples
///
/// ```
/// use slotwise_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::InvalidEnum {
///     accepted: vec!["low".to_string(), "high".to_string()],
/// });
/// assert_eq!(err.kind.to_string(), "Please answer with one of: low, high.");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The kind of error that occurred
    pub kind: ValidationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an [`ValidationErrorKind::InvalidFormat`] error.
    #[track_caller]
    pub fn format(message: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::InvalidFormat(message.into()))
    }
}
