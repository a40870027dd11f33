//! Boundary traits.

use async_trait::async_trait;
use slotwise_core::{CollectedFields, ConversantId, DialogKind, InboundMessage, OutboundReply, Session};
use slotwise_error::{ChannelResult, FinalizationResult, SessionResult, UpstreamError};

/// Maps a conversant to at most one active [`Session`].
///
/// Implementations must make [`SessionStore::update`] atomic with respect to
/// other calls for the same conversant.
pub trait SessionStore: Send + Sync {
    /// Snapshot of the live session, if any. No side effects.
    fn get(&self, id: &ConversantId) -> Option<Session>;

    /// Create a session at slot 0.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyActive` if a live session exists; the existing session
    /// is left untouched.
    fn create(&self, id: &ConversantId, kind: &DialogKind) -> SessionResult<Session>;

    /// Apply `mutator` to the live session in place and return its result.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no live session.
    fn update<R, F>(&self, id: &ConversantId, mutator: F) -> SessionResult<R>
    where
        F: FnOnce(&mut Session) -> R;

    /// Remove the session. Removing an absent session is a no-op.
    fn remove(&self, id: &ConversantId) -> Option<Session>;
}

/// Caller-supplied logic invoked once all slots are filled.
///
/// The output is opaque to the dialog engine and is sent to the conversant as-is.
#[async_trait]
pub trait Finalizer: Send + Sync {
    /// Produce the dialog output from the completed record.
    async fn finalize(
        &self,
        kind: &DialogKind,
        collected: &CollectedFields,
    ) -> FinalizationResult<String>;
}

/// Text completion API.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Complete a single user prompt.
    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError>;

    /// Model identifier used for completions.
    fn model_name(&self) -> &str;
}

/// Image generation API.
#[async_trait]
pub trait ImageClient: Send + Sync {
    /// Generate one image for `prompt` and return its URL.
    async fn generate_image(&self, prompt: &str) -> Result<String, UpstreamError>;
}

/// Transport that delivers inbound messages and accepts replies.
#[async_trait]
pub trait MessageChannel: Send + Sync {
    /// Next inbound message, or `None` once the channel is exhausted.
    async fn recv(&self) -> ChannelResult<Option<InboundMessage>>;

    /// Deliver a reply.
    async fn send(&self, reply: OutboundReply) -> ChannelResult<()>;

    /// Channel name for logging (e.g., "console").
    fn name(&self) -> &str;
}
