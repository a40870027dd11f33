//! Per-message handling: dialog engine first, then the rule table.

use crate::router::{Action, Router};
use async_trait::async_trait;
use slotwise_core::{ConversantId, InboundMessage, OutboundReply};
use slotwise_dialog::DialogEngine;
use slotwise_interface::{CompletionClient, ImageClient, SessionStore};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// Produces at most one reply per inbound message.
#[async_trait]
pub trait MessageHandler: Send + Sync + 'static {
    /// Handle one message.
    async fn handle(&self, message: &InboundMessage) -> Option<OutboundReply>;
}

/// The trainer bot's message handler.
pub struct BotHandler<S: SessionStore> {
    engine: DialogEngine<S>,
    router: Router,
    completion: Option<Arc<dyn CompletionClient>>,
    images: Option<Arc<dyn ImageClient>>,
    failure_notice: String,
}

impl<S: SessionStore> BotHandler<S> {
    /// Create a handler.
    pub fn new(engine: DialogEngine<S>, router: Router, failure_notice: impl Into<String>) -> Self {
        Self {
            engine,
            router,
            completion: None,
            images: None,
            failure_notice: failure_notice.into(),
        }
    }

    /// Use `client` for commands and free-text relay.
    pub fn with_completion(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.completion = Some(client);
        self
    }

    /// Use `client` for image commands.
    pub fn with_images(mut self, client: Arc<dyn ImageClient>) -> Self {
        self.images = Some(client);
        self
    }

    /// The dialog engine.
    pub fn engine(&self) -> &DialogEngine<S> {
        &self.engine
    }

    /// The rule table.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Route and answer one message.
    ///
    /// A start trigger always goes to the engine so that a second start during
    /// an active dialog yields the already-active notice. A cancel trigger is
    /// never treated as a start and never routed to the rule table.
    #[instrument(skip(self, message), fields(conversant = %message.conversant_id))]
    pub async fn respond(&self, message: &InboundMessage) -> Option<OutboundReply> {
        let id = &message.conversant_id;
        let is_cancel = self.engine.settings().is_cancel(&message.text);

        if let Some(kind) = self.router.dialog_for(&message.text).filter(|_| !is_cancel) {
            return match self.engine.start(id, kind).await {
                Ok(outcome) => outcome.reply().map(|text| OutboundReply::text(id.clone(), text)),
                Err(e) => {
                    error!(error = %e, dialog = %kind, "Failed to start dialog");
                    Some(OutboundReply::text(id.clone(), self.failure_notice.clone()))
                }
            };
        }

        let outcome = self.engine.handle(message).await;
        if let Some(reply) = outcome.reply() {
            return Some(OutboundReply::text(id.clone(), reply));
        }
        if is_cancel {
            debug!("Cancel trigger with no active dialog");
            let notice = self.engine.settings().nothing_to_cancel_notice();
            return Some(OutboundReply::text(id.clone(), notice.clone()));
        }

        match self.router.route(&message.text) {
            Action::Complete(prompt) => Some(self.complete(id, prompt).await),
            Action::Relay => {
                let text = message.text.trim();
                if text.is_empty() {
                    return None;
                }
                Some(self.complete(id, text).await)
            }
            Action::Image(prompt) => Some(self.image(id, prompt).await),
            Action::Reply(text) => Some(OutboundReply::text(id.clone(), text.clone())),
            Action::Ignore | Action::StartDialog(_) => None,
        }
    }

    async fn complete(&self, id: &ConversantId, prompt: &str) -> OutboundReply {
        let Some(client) = &self.completion else {
            warn!("No completion client configured");
            return OutboundReply::text(id.clone(), self.failure_notice.clone());
        };
        match client.complete(prompt).await {
            Ok(text) => {
                debug!(reply_len = text.len(), "Completion succeeded");
                OutboundReply::text(id.clone(), text)
            }
            Err(e) => {
                error!(error = %e, "Completion failed");
                OutboundReply::text(id.clone(), self.failure_notice.clone())
            }
        }
    }

    async fn image(&self, id: &ConversantId, prompt: &str) -> OutboundReply {
        let Some(client) = &self.images else {
            warn!("No image client configured");
            return OutboundReply::text(id.clone(), self.failure_notice.clone());
        };
        match client.generate_image(prompt).await {
            Ok(url) => OutboundReply::image(id.clone(), url),
            Err(e) => {
                error!(error = %e, "Image generation failed");
                OutboundReply::text(id.clone(), self.failure_notice.clone())
            }
        }
    }
}

#[async_trait]
impl<S: SessionStore + 'static> MessageHandler for BotHandler<S> {
    async fn handle(&self, message: &InboundMessage) -> Option<OutboundReply> {
        self.respond(message).await
    }
}
