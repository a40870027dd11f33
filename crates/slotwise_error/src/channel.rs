//! Message channel error types.

/// Result type for message channel operations.
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Kinds of message channel errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ChannelErrorKind {
    /// Reading the next inbound event failed
    #[display("Failed to receive message: {}", _0)]
    Receive(String),
    /// Delivering a reply failed
    #[display("Failed to send reply: {}", _0)]
    Send(String),
    /// The channel has been shut down
    #[display("Channel closed")]
    Closed,
}

/// Channel error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Channel Error: {} at line {} in {}", kind, line, file)]
pub struct ChannelError {
    /// The kind of error that occurred
    pub kind: ChannelErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ChannelError {
    /// Create a new channel error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ChannelErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<std::io::Error> for ChannelError {
    #[track_caller]
    fn from(e: std::io::Error) -> Self {
        Self::new(ChannelErrorKind::Receive(e.to_string()))
    }
}
