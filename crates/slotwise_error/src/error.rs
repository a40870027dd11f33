//! Top-level error wrapper types.

use crate::{
    ChannelError, ConfigError, DefinitionError, FinalizationError, SessionError, UpstreamError,
    ValidationError,
};

/// Every error a slotwise crate can produce.
///
/// # Examples
///
/// ```
/// use slotwise_error::{SlotwiseError, UpstreamError, UpstreamErrorKind};
///
/// let upstream = UpstreamError::new(UpstreamErrorKind::EmptyResponse);
/// let err: SlotwiseError = upstream.into();
/// assert!(format!("{}", err).contains("no content"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum SlotwiseErrorKind {
    /// Slot validation error
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Session store error
    #[from(SessionError)]
    Session(SessionError),
    /// Finalizer error
    #[from(FinalizationError)]
    Finalization(FinalizationError),
    /// Completion API error
    #[from(UpstreamError)]
    Upstream(UpstreamError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Message channel error
    #[from(ChannelError)]
    Channel(ChannelError),
    /// Dialog definition error
    #[from(DefinitionError)]
    Definition(DefinitionError),
}

/// Slotwise error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Slotwise Error: {}", _0)]
pub struct SlotwiseError(Box<SlotwiseErrorKind>);

impl SlotwiseError {
    /// Create a new error from a kind.
    pub fn new(kind: SlotwiseErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SlotwiseErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to SlotwiseErrorKind
impl<T> From<T> for SlotwiseError
where
    T: Into<SlotwiseErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for slotwise operations.
pub type SlotwiseResult<T> = std::result::Result<T, SlotwiseError>;
