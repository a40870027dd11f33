//! Trait definitions for the slotwise dialog bot.
//!
//! These are the seams between the dialog core and its collaborators:
//!
//! - [`SessionStore`] - per-conversant session state
//! - [`Finalizer`] - turns a completed record into the dialog's output
//! - [`CompletionClient`] / [`ImageClient`] - the third-party model API, used by
//!   finalizers and command handlers, never by the engine itself
//! - [`MessageChannel`] - the transport delivering inbound text and accepting replies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{CompletionClient, Finalizer, ImageClient, MessageChannel, SessionStore};
