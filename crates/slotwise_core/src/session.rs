//! Per-conversant dialog session.

use crate::{ConversantId, DialogKind};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::Instant;

/// Validated answers keyed by field name.
///
/// Only the dialog engine inserts into this map, and only after the slot's
/// validator accepted the answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectedFields(BTreeMap<String, String>);

impl CollectedFields {
    /// Value stored for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether `field` has been collected.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Number of collected fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing has been collected yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(field, value)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    fn insert(&mut self, field: String, value: String) {
        self.0.insert(field, value);
    }
}

impl<K, V> FromIterator<(K, V)> for CollectedFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// In-progress dialog state for one conversant.
///
/// Invariants:
/// - `slot_index` only grows, one step per recorded answer
/// - `collected` gains exactly one field per step and never shrinks
/// - `dialog_kind` is fixed at creation
#[derive(Debug, Clone, Getters)]
pub struct Session {
    /// Who is being interviewed
    conversant_id: ConversantId,
    /// Which slot sequence governs this session
    dialog_kind: DialogKind,
    /// Position of the slot awaiting an answer
    slot_index: usize,
    /// Validated answers so far
    collected: CollectedFields,
    /// When the session was created
    created_at: Instant,
    /// Last time the session was read for or mutated by a message
    last_activity: Instant,
}

impl Session {
    /// Create a fresh session at slot 0.
    pub fn new(conversant_id: ConversantId, dialog_kind: DialogKind) -> Self {
        let now = Instant::now();
        Self {
            conversant_id,
            dialog_kind,
            slot_index: 0,
            collected: CollectedFields::default(),
            created_at: now,
            last_activity: now,
        }
    }

    /// Store a validated answer and advance to the next slot.
    pub fn record(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        tracing::trace!(
            conversant = %self.conversant_id,
            slot_index = self.slot_index,
            field = %field,
            "Recording slot value"
        );
        self.collected.insert(field, value.into());
        self.slot_index += 1;
        self.touch();
    }

    /// Refresh the activity timestamp without changing dialog state.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Time since the last activity.
    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }

    /// Whether the session has been idle longer than `ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.idle_for() > ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_advances_and_collects() {
        let mut session = Session::new("1".into(), "plan".into());
        session.record("age", "25");
        session.record("height", "180");

        assert_eq!(*session.slot_index(), 2);
        assert_eq!(session.collected().get("age"), Some("25"));
        assert_eq!(session.collected().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_follows_last_activity() {
        let mut session = Session::new("1".into(), "plan".into());
        tokio::time::advance(Duration::from_secs(20)).await;
        assert!(session.is_expired(Duration::from_secs(10)));

        session.touch();
        assert!(!session.is_expired(Duration::from_secs(10)));
    }
}
