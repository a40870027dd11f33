//! Wiring from configuration to a running bot.

use crate::config::{BotConfig, FinalizerConfig};
use crate::dispatcher::{Dispatch, Dispatcher};
use crate::finalizer::{PlanFinalizer, SummaryFinalizer};
use crate::handler::BotHandler;
use crate::router::Router;
use slotwise_dialog::{DialogDefinition, DialogEngine, DialogRegistry};
use slotwise_error::{ConfigError, SlotwiseResult};
use slotwise_core::{ConversantId, OutboundReply};
use slotwise_interface::{CompletionClient, Finalizer, ImageClient, MessageChannel};
use slotwise_store::InMemorySessionStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Build the dialog registry described by `config`.
///
/// # Errors
///
/// Returns a configuration error if a completion finalizer is configured but
/// no completion client is available, or a definition error for invalid or
/// duplicate dialogs.
pub fn build_registry(
    config: &BotConfig,
    completion: Option<&Arc<dyn CompletionClient>>,
) -> SlotwiseResult<DialogRegistry> {
    let mut registry = DialogRegistry::new();
    for dialog in &config.dialogs {
        let finalizer: Arc<dyn Finalizer> = match &dialog.finalizer {
            FinalizerConfig::Completion { template } => {
                let client = completion.ok_or_else(|| {
                    ConfigError::new(format!(
                        "Dialog '{}' needs a completion client",
                        dialog.kind
                    ))
                })?;
                Arc::new(PlanFinalizer::new(template.clone(), Arc::clone(client)))
            }
            FinalizerConfig::Summary { heading } => {
                Arc::new(SummaryFinalizer::new(heading.clone()))
            }
        };
        registry.register(DialogDefinition::new(dialog.sequence()?, finalizer))?;
    }
    Ok(registry)
}

/// Builder for [`BotRuntime`].
pub struct BotRuntimeBuilder {
    config: BotConfig,
    completion: Option<Arc<dyn CompletionClient>>,
    images: Option<Arc<dyn ImageClient>>,
}

impl BotRuntimeBuilder {
    /// Use `client` for completions.
    pub fn completion(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.completion = Some(client);
        self
    }

    /// Use `client` for images.
    pub fn images(mut self, client: Arc<dyn ImageClient>) -> Self {
        self.images = Some(client);
        self
    }

    /// Assemble the store, engine, router and dispatcher.
    pub fn build(self, channel: Arc<dyn MessageChannel>) -> SlotwiseResult<BotRuntime> {
        let config = self.config;
        let registry = build_registry(&config, self.completion.as_ref())?;
        let store = Arc::new(InMemorySessionStore::new(config.store.clone()));
        let engine = DialogEngine::new(Arc::clone(&store), registry, config.engine.clone());

        let mut handler = BotHandler::new(
            engine,
            Router::from_config(&config),
            config.bot.failure_notice.clone(),
        );
        if let Some(client) = self.completion {
            handler = handler.with_completion(client);
        }
        if let Some(client) = self.images {
            handler = handler.with_images(client);
        }

        let dispatcher =
            Dispatcher::new(Arc::new(handler), Arc::clone(&channel), &config.dispatcher);
        Ok(BotRuntime {
            dispatcher,
            store,
            channel,
            busy_notice: config.bot.busy_notice.clone(),
            reap_interval: Duration::from_secs(*config.dispatcher.reap_interval_secs()),
        })
    }
}

/// A configured bot bound to a message channel.
pub struct BotRuntime {
    dispatcher: Dispatcher<BotHandler<InMemorySessionStore>>,
    store: Arc<InMemorySessionStore>,
    channel: Arc<dyn MessageChannel>,
    busy_notice: Option<String>,
    reap_interval: Duration,
}

impl BotRuntime {
    /// Start building a runtime from `config`.
    pub fn builder(config: BotConfig) -> BotRuntimeBuilder {
        BotRuntimeBuilder {
            config,
            completion: None,
            images: None,
        }
    }

    /// The session store.
    pub fn store(&self) -> &Arc<InMemorySessionStore> {
        &self.store
    }

    /// Pump the channel until it is exhausted, then drain all workers.
    #[instrument(skip(self), fields(channel = %self.channel.name()))]
    pub async fn run(self) -> SlotwiseResult<()> {
        info!("Bot runtime started");
        let reaper = (!self.reap_interval.is_zero())
            .then(|| spawn_reaper(Arc::clone(&self.store), self.reap_interval));

        let result = loop {
            match self.channel.recv().await {
                Ok(Some(message)) => {
                    let id = message.conversant_id.clone();
                    if self.dispatcher.dispatch(message) == Dispatch::QueueFull {
                        self.notify_busy(id).await;
                    }
                }
                Ok(None) => break Ok(()),
                Err(e) => {
                    error!(error = %e, "Channel receive failed");
                    break Err(e.into());
                }
            }
        };

        self.dispatcher.shutdown().await;
        if let Some(reaper) = reaper {
            reaper.abort();
        }
        info!("Bot runtime stopped");
        result
    }

    async fn notify_busy(&self, id: ConversantId) {
        let Some(notice) = &self.busy_notice else {
            return;
        };
        if let Err(e) = self.channel.send(OutboundReply::text(id, notice.clone())).await {
            warn!(error = %e, "Failed to deliver busy notice");
        }
    }
}

fn spawn_reaper(
    store: Arc<InMemorySessionStore>,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await;
        loop {
            interval.tick().await;
            let purged = store.purge_expired();
            debug!(purged, "Reaper sweep");
        }
    })
}
