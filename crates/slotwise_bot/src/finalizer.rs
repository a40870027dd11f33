//! Finalizers that turn a completed record into the dialog's reply.

use async_trait::async_trait;
use slotwise_core::{CollectedFields, DialogKind};
use slotwise_error::{FinalizationError, FinalizationErrorKind, FinalizationResult};
use slotwise_interface::{CompletionClient, Finalizer};
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Field names referenced as `{name}` in a template, in order of appearance.
///
/// Braces that do not enclose an identifier are left alone.
///
/// # Examples
///
/// ```
/// use slotwise_bot::template_placeholders;
///
/// let names = template_placeholders("Plan for a {age} year old aiming to {goal}. {not a field}");
/// assert_eq!(names, ["age", "goal"]);
/// ```
pub fn template_placeholders(template: &str) -> Vec<&str> {
    placeholder_spans(template)
        .map(|(start, end)| &template[start + 1..end - 1])
        .collect()
}

/// Substitute every `{field}` placeholder with its collected value.
///
/// # Errors
///
/// Returns `Template` when a placeholder names a field that was not collected.
pub fn render_template(template: &str, collected: &CollectedFields) -> FinalizationResult<String> {
    let mut rendered = String::with_capacity(template.len());
    let mut cursor = 0;
    for (start, end) in placeholder_spans(template) {
        let name = &template[start + 1..end - 1];
        let value = collected.get(name).ok_or_else(|| {
            FinalizationError::new(FinalizationErrorKind::Template(name.to_string()))
        })?;
        rendered.push_str(&template[cursor..start]);
        rendered.push_str(value);
        cursor = end;
    }
    rendered.push_str(&template[cursor..]);
    Ok(rendered)
}

fn placeholder_spans(template: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    template.match_indices('{').filter_map(move |(start, _)| {
        let rest = &template[start + 1..];
        let len = rest.find('}')?;
        let name = &rest[..len];
        let is_ident = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        is_ident.then_some((start, start + len + 2))
    })
}

/// Renders a prompt template and relays it to the completion API.
pub struct PlanFinalizer {
    template: String,
    client: Arc<dyn CompletionClient>,
}

impl PlanFinalizer {
    /// Create a finalizer for `template`.
    pub fn new(template: impl Into<String>, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            template: template.into(),
            client,
        }
    }

    /// The prompt template.
    pub fn template(&self) -> &str {
        &self.template
    }
}

#[async_trait]
impl Finalizer for PlanFinalizer {
    #[instrument(skip(self, collected), fields(dialog = %kind, model = %self.client.model_name()))]
    async fn finalize(
        &self,
        kind: &DialogKind,
        collected: &CollectedFields,
    ) -> FinalizationResult<String> {
        let prompt = render_template(&self.template, collected)?;
        debug!(prompt_len = prompt.len(), "Requesting plan");
        self.client.complete(&prompt).await.map_err(|e| {
            error!(error = %e, "Plan generation failed");
            FinalizationError::from(e)
        })
    }
}

/// Echoes the collected answers, one `field: value` line each.
#[derive(Debug, Clone, Default)]
pub struct SummaryFinalizer {
    heading: Option<String>,
}

impl SummaryFinalizer {
    /// Create a summary finalizer with an optional first line.
    pub fn new(heading: Option<String>) -> Self {
        Self { heading }
    }
}

#[async_trait]
impl Finalizer for SummaryFinalizer {
    async fn finalize(
        &self,
        _kind: &DialogKind,
        collected: &CollectedFields,
    ) -> FinalizationResult<String> {
        let lines = collected
            .iter()
            .map(|(field, value)| format!("{}: {}", field, value));
        Ok(self
            .heading
            .iter()
            .cloned()
            .chain(lines)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
