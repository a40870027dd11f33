//! Identifier newtypes.

use serde::{Deserialize, Serialize};

/// Opaque identifier of the party being interviewed.
///
/// # Examples
///
/// ```
/// use slotwise_core::ConversantId;
///
/// let id = ConversantId::from("chat-1001");
/// assert_eq!(id.to_string(), "chat-1001");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct ConversantId(String);

impl ConversantId {
    /// Create a conversant id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConversantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ConversantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifies which slot sequence a session follows.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct DialogKind(String);

impl DialogKind {
    /// Create a dialog kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    /// Borrow the raw kind name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DialogKind {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

impl From<String> for DialogKind {
    fn from(kind: String) -> Self {
        Self(kind)
    }
}
