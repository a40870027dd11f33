//! Session storage for the slotwise dialog engine.
//!
//! - [`InMemorySessionStore`]: process-local sessions with idle expiry and a
//!   capacity bound
//! - [`ConversantLocks`]: async per-conversant mutexes that serialize message
//!   handling for one conversant without blocking others

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod locks;
mod store;

pub use config::{SessionStoreConfig, SessionStoreConfigBuilder};
pub use locks::{ConversantGuard, ConversantLocks};
pub use store::InMemorySessionStore;
