//! Session store configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`InMemorySessionStore`](crate::InMemorySessionStore).
///
/// # Examples
///
/// ```
/// use slotwise_store::{SessionStoreConfig, SessionStoreConfigBuilder};
///
/// let config = SessionStoreConfigBuilder::default()
///     .idle_ttl_secs(600u64)
///     .max_sessions(50usize)
///     .build()
///     .unwrap();
/// assert_eq!(*config.max_sessions(), 50);
///
/// let defaults = SessionStoreConfig::default().with_max_sessions(10);
/// assert_eq!(*defaults.idle_ttl_secs(), 1800);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct SessionStoreConfig {
    /// Idle time after which a session expires (seconds, 0 disables expiry)
    #[serde(default = "default_idle_ttl")]
    idle_ttl_secs: u64,

    /// Maximum number of live sessions
    #[serde(default = "default_max_sessions")]
    max_sessions: usize,
}

fn default_idle_ttl() -> u64 {
    1800 // 30 minutes
}

fn default_max_sessions() -> usize {
    10_000
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: default_idle_ttl(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl SessionStoreConfig {
    /// Idle TTL as a duration, `None` when expiry is disabled.
    pub fn idle_ttl(&self) -> Option<Duration> {
        (self.idle_ttl_secs > 0).then(|| Duration::from_secs(self.idle_ttl_secs))
    }
}
