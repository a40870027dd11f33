//! Text predicates used for dialog start, cancellation, and routing.

use serde::{Deserialize, Serialize};

/// A declarative predicate over inbound text.
///
/// Deserializes from an externally tagged table, e.g. `{ command = "/plan" }`.
///
/// # Examples
///
/// ```
/// use slotwise_core::Trigger;
///
/// let plan = Trigger::command("/plan");
/// assert!(plan.matches("/plan"));
/// assert!(plan.matches("  /PLAN@trainer_bot "));
/// assert!(!plan.matches("/planner"));
///
/// let chest = Trigger::Contains("chest".to_string());
/// assert!(chest.matches("Any good Chest exercises?"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Exact command match, ignoring case, surrounding whitespace and a
    /// trailing `@botname` mention
    Command(String),
    /// Text starts with the given prefix (case-insensitive)
    Prefix(String),
    /// Text contains the given fragment (case-insensitive)
    Contains(String),
}

impl Trigger {
    /// Shorthand for [`Trigger::Command`].
    pub fn command(command: impl Into<String>) -> Self {
        Self::Command(command.into())
    }

    /// Test the predicate against inbound text.
    pub fn matches(&self, text: &str) -> bool {
        let text = text.trim();
        match self {
            Self::Command(command) => {
                let head = text.split_whitespace().next().unwrap_or_default();
                let head = head.split_once('@').map_or(head, |(cmd, _)| cmd);
                text.split_whitespace().count() == 1 && head.eq_ignore_ascii_case(command)
            }
            Self::Prefix(prefix) => text
                .get(..prefix.len())
                .is_some_and(|start| start.eq_ignore_ascii_case(prefix)),
            Self::Contains(fragment) => text
                .to_lowercase()
                .contains(&fragment.to_lowercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_rejects_trailing_arguments() {
        assert!(!Trigger::command("/plan").matches("/plan now"));
    }

    #[test]
    fn prefix_handles_short_and_multibyte_text() {
        let trigger = Trigger::Prefix("hello".to_string());
        assert!(trigger.matches("Hello there"));
        assert!(!trigger.matches("he"));
        assert!(!trigger.matches("héllo"));
    }

    #[test]
    fn deserializes_from_inline_table() {
        #[derive(Deserialize)]
        struct Wrapper {
            trigger: Trigger,
        }
        let parsed: Wrapper = serde_json::from_str(r#"{"trigger":{"command":"/cancel"}}"#)
            .expect("valid trigger");
        assert_eq!(parsed.trigger, Trigger::command("/cancel"));
    }
}
