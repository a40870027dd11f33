//! Engine behaviour settings.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use slotwise_core::Trigger;

/// Cancel triggers and the user-visible notices the engine sends.
///
/// # Examples
///
/// ```
/// use slotwise_core::Trigger;
/// use slotwise_dialog::{EngineSettings, EngineSettingsBuilder};
///
/// let settings = EngineSettingsBuilder::default()
///     .cancel_triggers(vec![Trigger::command("/stop")])
///     .build()
///     .unwrap();
/// assert!(settings.is_cancel("/stop"));
/// assert!(!settings.is_cancel("/cancel"));
///
/// assert!(EngineSettings::default().is_cancel("/cancel"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(default, setter(into))]
#[serde(default)]
pub struct EngineSettings {
    /// Messages that abort an active dialog
    cancel_triggers: Vec<Trigger>,
    /// Reply after a cancellation
    cancelled_notice: String,
    /// Reply to a cancel trigger when no dialog is active
    nothing_to_cancel_notice: String,
    /// Reply when a conversant tries to start a second dialog
    already_active_notice: String,
    /// Reply when the finalizer fails
    finalization_failed_notice: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            cancel_triggers: vec![Trigger::command("/cancel")],
            cancelled_notice: "Okay, I've cancelled that. Start again whenever you like."
                .to_string(),
            nothing_to_cancel_notice: "There's nothing to cancel right now.".to_string(),
            already_active_notice:
                "You already have an in-progress session; finish it or send /cancel.".to_string(),
            finalization_failed_notice:
                "Sorry, something went wrong while preparing your result. Please try again later."
                    .to_string(),
        }
    }
}

impl EngineSettings {
    /// Whether `text` matches any cancel trigger.
    pub fn is_cancel(&self, text: &str) -> bool {
        self.cancel_triggers.iter().any(|t| t.matches(text))
    }
}
