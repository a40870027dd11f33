//! The dialog state machine.

use crate::{DialogRegistry, EngineOutcome, EngineSettings};
use slotwise_core::{CollectedFields, ConversantId, DialogKind, InboundMessage};
use slotwise_error::{SessionError, SessionErrorKind, SessionResult, ValidationErrorKind};
use slotwise_interface::SessionStore;
use slotwise_store::ConversantLocks;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Result of applying one answer under the store lock.
enum Step {
    Advanced { slot_index: usize },
    Rejected { slot_index: usize, error: ValidationErrorKind },
    Complete { collected: CollectedFields },
    Desynced { slot_index: usize },
}

/// Drives slot-filling dialogs for many conversants.
///
/// Handling for one conversant is serialized with [`ConversantLocks`], and each
/// answer is applied through a single atomic [`SessionStore::update`], so two
/// rapid messages can never both advance the same slot.
pub struct DialogEngine<S: SessionStore> {
    store: Arc<S>,
    registry: DialogRegistry,
    settings: EngineSettings,
    locks: ConversantLocks,
}

impl<S: SessionStore> DialogEngine<S> {
    /// Creates a new dialog engine.
    pub fn new(store: Arc<S>, registry: DialogRegistry, settings: EngineSettings) -> Self {
        Self {
            store,
            registry,
            settings,
            locks: ConversantLocks::new(),
        }
    }

    /// Session store backing this engine.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Registered dialogs.
    pub fn registry(&self) -> &DialogRegistry {
        &self.registry
    }

    /// Engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Start a dialog, surfacing a start collision as an error.
    ///
    /// Returns the opening text (intro and first prompt).
    ///
    /// # Errors
    ///
    /// - `UnknownDialog` if `kind` is not registered
    /// - `AlreadyActive` if the conversant already has a session; that
    ///   session is left unchanged
    #[instrument(skip(self), fields(conversant = %id, dialog = %kind))]
    pub async fn try_start(&self, id: &ConversantId, kind: &DialogKind) -> SessionResult<String> {
        let _guard = self.locks.acquire(id).await;

        let definition = self.registry.get(kind).ok_or_else(|| {
            SessionError::new(SessionErrorKind::UnknownDialog(kind.to_string()))
        })?;

        self.store.create(id, kind)?;
        info!("Dialog started");
        Ok(definition.sequence().opening())
    }

    /// Start a dialog, turning a start collision into a user-facing notice.
    ///
    /// # Errors
    ///
    /// Returns `UnknownDialog` if `kind` is not registered.
    pub async fn start(&self, id: &ConversantId, kind: &DialogKind) -> SessionResult<EngineOutcome> {
        match self.try_start(id, kind).await {
            Ok(reply) => Ok(EngineOutcome::Prompted {
                reply,
                slot_index: 0,
            }),
            Err(e) if e.is_already_active() => {
                debug!(conversant = %id, "Start refused, session already active");
                Ok(EngineOutcome::AlreadyActive {
                    reply: self.settings.already_active_notice().clone(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Cancel the conversant's dialog, discarding collected data.
    ///
    /// Returns whether a session was active.
    #[instrument(skip(self), fields(conversant = %id))]
    pub async fn cancel(&self, id: &ConversantId) -> bool {
        let _guard = self.locks.acquire(id).await;
        let cancelled = self.store.remove(id).is_some();
        if cancelled {
            info!("Dialog cancelled");
        }
        cancelled
    }

    /// Whether the conversant currently has a live session.
    pub fn is_active(&self, id: &ConversantId) -> bool {
        self.store.get(id).is_some()
    }

    /// Apply one inbound message to the sender's session.
    ///
    /// Never fails: invalid answers are re-prompted and finalizer failures
    /// become a generic notice. Returns [`EngineOutcome::NotHandled`] when the
    /// sender has no session.
    #[instrument(skip(self, message), fields(conversant = %message.conversant_id))]
    pub async fn handle(&self, message: &InboundMessage) -> EngineOutcome {
        let id = &message.conversant_id;
        let _guard = self.locks.acquire(id).await;

        let Some(session) = self.store.get(id) else {
            return EngineOutcome::NotHandled;
        };

        // Cancel outranks literal slot input.
        if self.settings.is_cancel(&message.text) {
            self.store.remove(id);
            info!(slot_index = session.slot_index(), "Dialog cancelled");
            return EngineOutcome::Cancelled {
                reply: self.settings.cancelled_notice().clone(),
            };
        }

        let Some(definition) = self.registry.get(session.dialog_kind()) else {
            error!(dialog = %session.dialog_kind(), "Session references unregistered dialog, discarding");
            self.store.remove(id);
            return EngineOutcome::NotHandled;
        };
        let sequence = Arc::clone(definition.sequence());

        let step = self.store.update(id, |session| {
            let slot_index = *session.slot_index();
            let Some(slot) = sequence.slot(slot_index) else {
                return Step::Desynced { slot_index };
            };

            match slot.validator().validate(&message.text) {
                Ok(value) => {
                    session.record(slot.field().clone(), value);
                    if *session.slot_index() == sequence.len() {
                        Step::Complete {
                            collected: session.collected().clone(),
                        }
                    } else {
                        Step::Advanced {
                            slot_index: *session.slot_index(),
                        }
                    }
                }
                Err(e) => {
                    session.touch();
                    Step::Rejected {
                        slot_index,
                        error: e.kind,
                    }
                }
            }
        });

        let step = match step {
            Ok(step) => step,
            Err(e) => {
                // Expired between the read and the update.
                debug!(error = %e, "Session vanished before update");
                return EngineOutcome::NotHandled;
            }
        };

        match step {
            Step::Advanced { slot_index } => {
                debug!(slot_index, "Slot filled, advancing");
                let reply = sequence
                    .slot(slot_index)
                    .map(|slot| slot.prompt().clone())
                    .unwrap_or_default();
                EngineOutcome::Prompted { reply, slot_index }
            }
            Step::Rejected { slot_index, error } => {
                debug!(slot_index, error = %error, "Answer rejected, re-prompting");
                let prompt = sequence
                    .slot(slot_index)
                    .map(|slot| slot.prompt().as_str())
                    .unwrap_or_default();
                EngineOutcome::Reprompted {
                    reply: format!("{}\n{}", error, prompt),
                    slot_index,
                    error,
                }
            }
            Step::Complete { collected } => {
                self.store.remove(id);
                info!(fields = collected.len(), "All slots filled, finalizing");
                match definition
                    .finalizer()
                    .finalize(session.dialog_kind(), &collected)
                    .await
                {
                    Ok(reply) => EngineOutcome::Completed { reply },
                    Err(e) => {
                        error!(error = %e, "Finalizer failed");
                        EngineOutcome::FinalizationFailed {
                            reply: self.settings.finalization_failed_notice().clone(),
                        }
                    }
                }
            }
            Step::Desynced { slot_index } => {
                warn!(slot_index, slots = sequence.len(), "Session past end of sequence, discarding");
                self.store.remove(id);
                EngineOutcome::NotHandled
            }
        }
    }
}
