//! Error types for the slotwise dialog bot.
//!
//! This crate provides the foundation error types used throughout the slotwise workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Only two failures are ever shown to a conversant: [`SessionErrorKind::AlreadyActive`]
//! and [`FinalizationError`]. Validation failures are turned into re-prompts by the
//! dialog engine and never propagate.
//!
//! # Examples
//!
//! ```
//! use slotwise_error::{ConfigError, SlotwiseResult};
//!
//! fn load() -> SlotwiseResult<String> {
//!     Err(ConfigError::new("missing [[dialogs]] table"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod channel;
mod config;
mod definition;
mod error;
mod finalization;
mod session;
mod upstream;
mod validation;

pub use channel::{ChannelError, ChannelErrorKind, ChannelResult};
pub use config::ConfigError;
pub use definition::{DefinitionError, DefinitionErrorKind};
pub use error::{SlotwiseError, SlotwiseErrorKind, SlotwiseResult};
pub use finalization::{FinalizationError, FinalizationErrorKind, FinalizationResult};
pub use session::{SessionError, SessionErrorKind, SessionResult};
pub use upstream::{UpstreamError, UpstreamErrorKind};
pub use validation::{ValidationError, ValidationErrorKind, ValidationResult};
