//! Slot definitions and ordered slot sequences.

use crate::{DialogKind, FreeText, Validator};
use derive_getters::Getters;
use slotwise_error::{DefinitionError, DefinitionErrorKind};
use std::collections::HashSet;
use std::sync::Arc;

/// One question/answer unit of a dialog.
#[derive(Debug, Clone, Getters)]
pub struct SlotDefinition {
    /// Field name the answer is stored under
    field: String,
    /// Question sent to the conversant
    prompt: String,
    /// Checks and normalizes the answer
    validator: Arc<dyn Validator>,
}

impl SlotDefinition {
    /// Create a slot with a custom validator.
    pub fn new(
        field: impl Into<String>,
        prompt: impl Into<String>,
        validator: Arc<dyn Validator>,
    ) -> Self {
        Self {
            field: field.into(),
            prompt: prompt.into(),
            validator,
        }
    }

    /// Create a slot that accepts any answer.
    pub fn free_text(field: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(field, prompt, Arc::new(FreeText))
    }
}

/// The ordered slots of one dialog kind.
///
/// Field names are unique and the sequence is never empty. A sequence is
/// immutable once built; share it behind an `Arc`.
///
/// # Examples
///
/// ```
/// use slotwise_core::{SlotDefinition, SlotSequence};
///
/// let plan = SlotSequence::new(
///     "plan",
///     vec![
///         SlotDefinition::free_text("age", "How old are you?"),
///         SlotDefinition::free_text("goal", "What is your goal?"),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(plan.len(), 2);
/// assert_eq!(plan.slot(1).unwrap().field(), "goal");
///
/// let dup = SlotSequence::new(
///     "plan",
///     vec![
///         SlotDefinition::free_text("age", "How old are you?"),
///         SlotDefinition::free_text("age", "Really?"),
///     ],
/// );
/// assert!(dup.is_err());
/// ```
#[derive(Debug, Clone, Getters)]
pub struct SlotSequence {
    /// Dialog kind this sequence belongs to
    kind: DialogKind,
    /// Optional line sent before the first prompt
    intro: Option<String>,
    #[getter(skip)]
    slots: Vec<SlotDefinition>,
}

impl SlotSequence {
    /// Build a sequence, rejecting empty sequences and duplicate field names.
    #[track_caller]
    pub fn new(
        kind: impl Into<DialogKind>,
        slots: Vec<SlotDefinition>,
    ) -> Result<Self, DefinitionError> {
        let kind = kind.into();
        if slots.is_empty() {
            return Err(DefinitionError::new(DefinitionErrorKind::EmptySequence(
                kind.to_string(),
            )));
        }

        let mut seen = HashSet::new();
        for slot in &slots {
            if !seen.insert(slot.field.as_str()) {
                return Err(DefinitionError::new(DefinitionErrorKind::DuplicateField {
                    dialog: kind.to_string(),
                    field: slot.field.clone(),
                }));
            }
        }

        Ok(Self {
            kind,
            intro: None,
            slots,
        })
    }

    /// Attach a line sent before the first prompt.
    pub fn with_intro(mut self, intro: impl Into<String>) -> Self {
        self.intro = Some(intro.into());
        self
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the sequence has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot at position `index`.
    pub fn slot(&self, index: usize) -> Option<&SlotDefinition> {
        self.slots.get(index)
    }

    /// Iterate slots in order.
    pub fn iter(&self) -> impl Iterator<Item = &SlotDefinition> {
        self.slots.iter()
    }

    /// Field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.field.as_str())
    }

    /// Text that opens the dialog: the intro (if any) followed by the first prompt.
    pub fn opening(&self) -> String {
        let first = &self.slots[0].prompt;
        match &self.intro {
            Some(intro) => format!("{}\n{}", intro, first),
            None => first.clone(),
        }
    }
}
