//! Slot-filling personal trainer bot.
//!
//! Wires the dialog engine to a rule-table router, per-conversant dispatch and
//! an OpenAI-compatible completion client:
//!
//! ```text
//! MessageChannel ──recv──▶ Dispatcher ──(one FIFO worker per conversant)──▶ BotHandler
//!                                                                             │
//!                     ┌─── start trigger ──▶ DialogEngine::start ◀────────────┤
//!                     ├─── active session ─▶ DialogEngine::handle ◀───────────┤
//!                     └─── otherwise ──────▶ Router: command / relay / reply ◀┘
//! ```
//!
//! Configuration is a TOML file; see [`BotConfig`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod channel;
mod config;
mod dispatcher;
mod finalizer;
mod handler;
mod observability;
mod router;
mod runtime;

pub use channel::{ConsoleChannel, MemoryChannel, parse_console_line};
pub use config::{
    BotConfig, BotSettings, CommandAction, CommandConfig, DialogConfig, FinalizerConfig,
    SlotConfig, ValidatorConfig,
};
pub use dispatcher::{Dispatch, Dispatcher, DispatcherConfig, DispatcherConfigBuilder};
pub use finalizer::{PlanFinalizer, SummaryFinalizer, render_template, template_placeholders};
pub use handler::{BotHandler, MessageHandler};
pub use observability::init_tracing;
pub use router::{Action, Router, Rule};
pub use runtime::{BotRuntime, BotRuntimeBuilder, build_registry};
