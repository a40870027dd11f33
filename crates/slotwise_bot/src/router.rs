//! Ordered rule table for messages outside a dialog.

use crate::config::{BotConfig, CommandAction};
use slotwise_core::{DialogKind, Trigger};
use tracing::debug;

/// What to do with a routed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Start the named dialog
    StartDialog(DialogKind),
    /// Send a fixed prompt to the completion API
    Complete(String),
    /// Generate an image for a fixed prompt
    Image(String),
    /// Reply with fixed text
    Reply(String),
    /// Send the user's own text to the completion API
    Relay,
    /// Do nothing
    Ignore,
}

/// A trigger paired with its action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    trigger: Trigger,
    action: Action,
}

impl Rule {
    /// Create a rule.
    pub fn new(trigger: Trigger, action: Action) -> Self {
        Self { trigger, action }
    }

    /// The rule's trigger.
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// The rule's action.
    pub fn action(&self) -> &Action {
        &self.action
    }
}

/// First-match rule table with a fallback action.
///
/// # Examples
///
/// ```
/// use slotwise_bot::{Action, Router, Rule};
/// use slotwise_core::Trigger;
///
/// let router = Router::new(Action::Relay)
///     .with_rule(Rule::new(Trigger::command("/plan"), Action::StartDialog("plan".into())))
///     .with_rule(Rule::new(Trigger::command("/help"), Action::Reply("Try /plan".into())));
///
/// assert_eq!(router.route("/PLAN"), &Action::StartDialog("plan".into()));
/// assert_eq!(router.route("what should I eat?"), &Action::Relay);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    rules: Vec<Rule>,
    fallback: Action,
}

impl Router {
    /// Create an empty router.
    pub fn new(fallback: Action) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Append a rule; earlier rules win.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Dialog triggers first, then commands, then the configured fallback.
    pub fn from_config(config: &BotConfig) -> Self {
        let fallback = if config.bot.relay_free_text {
            Action::Relay
        } else {
            config
                .bot
                .fallback_notice
                .clone()
                .map_or(Action::Ignore, Action::Reply)
        };

        let dialogs = config.dialogs.iter().map(|dialog| {
            Rule::new(
                dialog.trigger.clone(),
                Action::StartDialog(dialog.kind.as_str().into()),
            )
        });
        let commands = config.commands.iter().map(|command| {
            let action = match &command.action {
                CommandAction::Complete { prompt } => Action::Complete(prompt.clone()),
                CommandAction::Image { prompt } => Action::Image(prompt.clone()),
                CommandAction::Reply { text } => Action::Reply(text.clone()),
            };
            Rule::new(command.trigger.clone(), action)
        });

        dialogs
            .chain(commands)
            .fold(Self::new(fallback), Self::with_rule)
    }

    /// Action of the first matching rule, or the fallback.
    pub fn route(&self, text: &str) -> &Action {
        match self.rules.iter().find(|rule| rule.trigger.matches(text)) {
            Some(rule) => {
                debug!(action = ?rule.action, "Matched rule");
                &rule.action
            }
            None => &self.fallback,
        }
    }

    /// Dialog started by `text`, if any.
    pub fn dialog_for(&self, text: &str) -> Option<&DialogKind> {
        match self.route(text) {
            Action::StartDialog(kind) => Some(kind),
            _ => None,
        }
    }

    /// Configured rules in match order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Action for unmatched text.
    pub fn fallback(&self) -> &Action {
        &self.fallback
    }
}
