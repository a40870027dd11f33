//! Slot-filling dialog engine.
//!
//! The engine drives a linear question/answer exchange per conversant:
//!
//! ```text
//! NoSession --start--> AwaitingSlot(0) --valid--> AwaitingSlot(1) ... --valid--> Complete --> NoSession
//!                           |   ^                                                  |
//!                           +---+ invalid (re-prompt, no change)                   +-- finalizer runs once
//! any state --cancel--> NoSession
//! ```
//!
//! - [`DialogRegistry`]: dialog kinds mapped to slot sequences and finalizers
//! - [`DialogEngine`]: applies inbound messages to sessions in a [`SessionStore`]
//! - [`EngineOutcome`]: what happened, and what to reply
//!
//! [`SessionStore`]: slotwise_interface::SessionStore

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod outcome;
mod registry;
mod settings;

pub use engine::DialogEngine;
pub use outcome::EngineOutcome;
pub use registry::{DialogDefinition, DialogRegistry};
pub use settings::{EngineSettings, EngineSettingsBuilder};
