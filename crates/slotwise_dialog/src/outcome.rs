//! Result of feeding one message to the engine.

use slotwise_error::ValidationErrorKind;

/// What the engine did with an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOutcome {
    /// No active session; the host should route the message elsewhere.
    NotHandled,
    /// Session started or advanced; `reply` is the prompt for `slot_index`.
    Prompted {
        /// Prompt to send
        reply: String,
        /// Slot now awaiting an answer
        slot_index: usize,
    },
    /// Answer rejected; session unchanged.
    Reprompted {
        /// Validation message followed by the prompt
        reply: String,
        /// Slot still awaiting an answer
        slot_index: usize,
        /// Why the answer was rejected
        error: ValidationErrorKind,
    },
    /// Start refused because a session is already in progress.
    AlreadyActive {
        /// Notice to send
        reply: String,
    },
    /// Session cancelled and discarded.
    Cancelled {
        /// Notice to send
        reply: String,
    },
    /// All slots filled; finalizer output.
    Completed {
        /// Finalizer output
        reply: String,
    },
    /// All slots filled but the finalizer failed; session torn down.
    FinalizationFailed {
        /// Generic failure notice
        reply: String,
    },
}

impl EngineOutcome {
    /// Text to send to the conversant, if any.
    pub fn reply(&self) -> Option<&str> {
        match self {
            Self::NotHandled => None,
            Self::Prompted { reply, .. }
            | Self::Reprompted { reply, .. }
            | Self::AlreadyActive { reply }
            | Self::Cancelled { reply }
            | Self::Completed { reply }
            | Self::FinalizationFailed { reply } => Some(reply),
        }
    }

    /// Whether the engine consumed the message.
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::NotHandled)
    }

    /// Whether this outcome ended the session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Cancelled { .. } | Self::Completed { .. } | Self::FinalizationFailed { .. }
        )
    }
}
