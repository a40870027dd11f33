//! TOML configuration for the bot.
//!
//! A config file declares dialogs (slots, validators, finalizer), commands and
//! runtime tuning. Completion credentials come from the environment and are
//! layered on top of the optional `[completion]` table.

use crate::finalizer::template_placeholders;
use crate::DispatcherConfig;
use serde::{Deserialize, Serialize};
use slotwise_completion::CompletionConfig;
use slotwise_core::{
    FreeText, Numeric, OneOf, SlotDefinition, SlotSequence, Trigger, Validator,
};
use slotwise_dialog::EngineSettings;
use slotwise_error::{ConfigError, DefinitionError, SlotwiseResult};
use slotwise_store::SessionStoreConfig;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Complete bot configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Replies and fallback behaviour
    pub bot: BotSettings,
    /// Completion API settings; environment variables take precedence
    pub completion: CompletionConfig,
    /// Session store tuning
    pub store: SessionStoreConfig,
    /// Per-conversant worker tuning
    pub dispatcher: DispatcherConfig,
    /// Cancel triggers and engine notices
    pub engine: EngineSettings,
    /// Slot-filling dialogs, matched before commands
    pub dialogs: Vec<DialogConfig>,
    /// One-shot commands, matched in order
    pub commands: Vec<CommandConfig>,
}

impl BotConfig {
    /// Load bot configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> SlotwiseResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> SlotwiseResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> SlotwiseResult<()> {
        let mut kinds = HashSet::new();
        for dialog in &self.dialogs {
            if !kinds.insert(dialog.kind.as_str()) {
                return Err(ConfigError::new(format!(
                    "Dialog '{}' is declared more than once",
                    dialog.kind
                ))
                .into());
            }
            for slot in &dialog.slots {
                slot.validator.check(&dialog.kind, &slot.field)?;
            }
            let sequence = dialog.sequence()?;
            if let FinalizerConfig::Completion { template } = &dialog.finalizer {
                let fields: HashSet<&str> = sequence.field_names().collect();
                if let Some(unknown) = template_placeholders(template)
                    .into_iter()
                    .find(|name| !fields.contains(name))
                {
                    return Err(ConfigError::new(format!(
                        "Dialog '{}' template references unknown field '{}'",
                        dialog.kind, unknown
                    ))
                    .into());
                }
            }
        }
        if *self.dispatcher.queue_capacity() == 0 {
            return Err(ConfigError::new("dispatcher.queue_capacity must be at least 1").into());
        }
        Ok(())
    }

    /// Whether any dialog or command needs the completion API.
    pub fn needs_completion(&self) -> bool {
        self.bot.relay_free_text
            || self
                .dialogs
                .iter()
                .any(|d| matches!(d.finalizer, FinalizerConfig::Completion { .. }))
            || self
                .commands
                .iter()
                .any(|c| matches!(c.action, CommandAction::Complete { .. }))
    }

    /// Whether any command needs the image API.
    pub fn needs_images(&self) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c.action, CommandAction::Image { .. }))
    }
}

/// Bot-level replies and fallback behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotSettings {
    /// Reply when a command or relay call to the API fails
    pub failure_notice: String,
    /// Relay unmatched text to the completion API
    pub relay_free_text: bool,
    /// Reply to unmatched text when relaying is off; silence when absent
    pub fallback_notice: Option<String>,
    /// Reply when a conversant's queue is full and the message is dropped
    pub busy_notice: Option<String>,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            failure_notice: "Sorry, I couldn't reach the trainer service. Please try again later."
                .to_string(),
            relay_free_text: true,
            fallback_notice: None,
            busy_notice: Some(
                "I'm still working on your earlier messages. Please wait a moment.".to_string(),
            ),
        }
    }
}

/// One slot-filling dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogConfig {
    /// Dialog kind, unique across the file
    pub kind: String,
    /// Message that starts the dialog
    pub trigger: Trigger,
    /// Line sent before the first prompt
    #[serde(default)]
    pub intro: Option<String>,
    /// How the completed record is turned into a reply
    pub finalizer: FinalizerConfig,
    /// Ordered questions
    pub slots: Vec<SlotConfig>,
}

impl DialogConfig {
    /// Build the immutable slot sequence.
    pub fn sequence(&self) -> Result<SlotSequence, DefinitionError> {
        let slots = self
            .slots
            .iter()
            .map(|slot| {
                SlotDefinition::new(
                    slot.field.clone(),
                    slot.prompt.clone(),
                    slot.validator.build(),
                )
            })
            .collect();
        let sequence = SlotSequence::new(self.kind.as_str(), slots)?;
        Ok(match &self.intro {
            Some(intro) => sequence.with_intro(intro.clone()),
            None => sequence,
        })
    }
}

/// One question in a dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Field name in the collected record
    pub field: String,
    /// Question text
    pub prompt: String,
    /// Answer check; free text when omitted
    #[serde(default)]
    pub validator: ValidatorConfig,
}

/// Declarative validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidatorConfig {
    /// Any text
    #[default]
    FreeText,
    /// Whole number with optional inclusive bounds
    Integer {
        /// Lower bound
        #[serde(default)]
        min: Option<i64>,
        /// Upper bound
        #[serde(default)]
        max: Option<i64>,
    },
    /// Decimal number with optional inclusive bounds
    Number {
        /// Lower bound
        #[serde(default)]
        min: Option<f64>,
        /// Upper bound
        #[serde(default)]
        max: Option<f64>,
    },
    /// One of a fixed set of tokens
    OneOf {
        /// Accepted spellings
        choices: Vec<String>,
    },
}

impl ValidatorConfig {
    /// Instantiate the validator.
    pub fn build(&self) -> Arc<dyn Validator> {
        match self {
            Self::FreeText => Arc::new(FreeText),
            Self::Integer { min, max } => Arc::new(bounded(
                Numeric::integer(),
                min.map(|v| v as f64),
                max.map(|v| v as f64),
            )),
            Self::Number { min, max } => Arc::new(bounded(Numeric::decimal(), *min, *max)),
            Self::OneOf { choices } => Arc::new(OneOf::new(choices.iter().cloned())),
        }
    }

    fn check(&self, dialog: &str, field: &str) -> Result<(), ConfigError> {
        let inverted = match self {
            Self::Integer {
                min: Some(min),
                max: Some(max),
            } => min > max,
            Self::Number {
                min: Some(min),
                max: Some(max),
            } => min > max,
            Self::OneOf { choices } if choices.is_empty() => {
                return Err(ConfigError::new(format!(
                    "Dialog '{}' field '{}' has no choices",
                    dialog, field
                )));
            }
            _ => false,
        };
        if inverted {
            return Err(ConfigError::new(format!(
                "Dialog '{}' field '{}' has min greater than max",
                dialog, field
            )));
        }
        Ok(())
    }
}

fn bounded(numeric: Numeric, min: Option<f64>, max: Option<f64>) -> Numeric {
    let numeric = match min {
        Some(min) => numeric.with_min(min),
        None => numeric,
    };
    match max {
        Some(max) => numeric.with_max(max),
        None => numeric,
    }
}

/// How a dialog's completed record becomes a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FinalizerConfig {
    /// Render `template` with `{field}` placeholders and send it to the completion API
    Completion {
        /// Prompt template
        template: String,
    },
    /// Echo the collected answers
    Summary {
        /// First line of the summary
        #[serde(default)]
        heading: Option<String>,
    },
}

/// A one-shot command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Message that runs the command
    pub trigger: Trigger,
    /// What the command does
    pub action: CommandAction,
}

/// Command behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandAction {
    /// Send a fixed prompt to the completion API
    Complete {
        /// Prompt text
        prompt: String,
    },
    /// Generate an illustration and reply with its URL
    Image {
        /// Image description
        prompt: String,
    },
    /// Reply with fixed text
    Reply {
        /// Reply text
        text: String,
    },
}
