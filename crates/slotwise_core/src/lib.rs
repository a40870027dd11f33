//! Core data types for the slotwise dialog bot.
//!
//! This crate provides the vocabulary shared by every other slotwise crate:
//! conversant and dialog identifiers, inbound/outbound message envelopes,
//! slot definitions with their validators, and the per-conversant [`Session`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod identity;
mod message;
mod session;
mod slot;
mod trigger;
mod validator;

pub use identity::{ConversantId, DialogKind};
pub use message::{InboundMessage, OutboundReply};
pub use session::{CollectedFields, Session};
pub use slot::{SlotDefinition, SlotSequence};
pub use trigger::Trigger;
pub use validator::{FreeText, Numeric, OneOf, Validator};
