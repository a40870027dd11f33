//! Dialog kinds and their definitions.

use derive_getters::Getters;
use slotwise_core::{DialogKind, SlotSequence};
use slotwise_error::{DefinitionError, DefinitionErrorKind};
use slotwise_interface::Finalizer;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A slot sequence paired with the finalizer that consumes its record.
#[derive(Clone, Getters)]
pub struct DialogDefinition {
    /// Ordered slots
    sequence: Arc<SlotSequence>,
    /// Invoked once with the completed record
    finalizer: Arc<dyn Finalizer>,
}

impl DialogDefinition {
    /// Pair a sequence with its finalizer.
    pub fn new(sequence: SlotSequence, finalizer: Arc<dyn Finalizer>) -> Self {
        Self {
            sequence: Arc::new(sequence),
            finalizer,
        }
    }

    /// Dialog kind of the sequence.
    pub fn kind(&self) -> &DialogKind {
        self.sequence.kind()
    }
}

impl fmt::Debug for DialogDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogDefinition")
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

/// Registry of dialog definitions, configured once at startup.
#[derive(Debug, Clone, Default)]
pub struct DialogRegistry {
    dialogs: HashMap<DialogKind, DialogDefinition>,
}

impl DialogRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dialog.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateDialog` if the kind is already registered.
    #[tracing::instrument(skip_all, fields(dialog = %definition.kind(), slots = definition.sequence().len()))]
    pub fn register(&mut self, definition: DialogDefinition) -> Result<(), DefinitionError> {
        let kind = definition.kind().clone();
        if self.dialogs.contains_key(&kind) {
            return Err(DefinitionError::new(DefinitionErrorKind::DuplicateDialog(
                kind.to_string(),
            )));
        }
        tracing::debug!("Registering dialog");
        self.dialogs.insert(kind, definition);
        Ok(())
    }

    /// Look up a dialog by kind.
    pub fn get(&self, kind: &DialogKind) -> Option<&DialogDefinition> {
        self.dialogs.get(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&DialogKind> {
        let mut kinds: Vec<_> = self.dialogs.keys().collect();
        kinds.sort();
        kinds
    }

    /// Number of registered dialogs.
    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }
}
