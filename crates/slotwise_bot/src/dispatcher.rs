//! Per-conversant worker tasks.
//!
//! Each conversant with pending messages gets one worker task fed by a bounded
//! FIFO queue, so one conversant's messages are handled strictly in arrival
//! order while different conversants proceed concurrently. A worker that stays
//! idle for `worker_idle_secs` retires; the next message spawns a fresh one.
//!
//! Queue sends and worker retirement both happen under the worker-map lock, so
//! a message is never left in the queue of a worker that has decided to exit.
//! Sends never wait: a conversant whose queue is full has the message dropped
//! while everyone else keeps flowing.

use crate::handler::MessageHandler;
use derive_getters::Getters;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use slotwise_core::{ConversantId, InboundMessage};
use slotwise_interface::MessageChannel;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, instrument, warn};

/// Dispatcher tuning.
///
/// # Examples
///
/// ```
/// use slotwise_bot::{DispatcherConfig, DispatcherConfigBuilder};
///
/// let config = DispatcherConfigBuilder::default()
///     .queue_capacity(4usize)
///     .build()
///     .unwrap();
/// assert_eq!(*config.queue_capacity(), 4);
/// assert_eq!(*DispatcherConfig::default().worker_idle_secs(), 300);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct DispatcherConfig {
    /// Pending messages per conversant; further messages are dropped
    #[serde(default = "default_queue_capacity")]
    queue_capacity: usize,

    /// Idle time after which a worker exits (seconds)
    #[serde(default = "default_worker_idle")]
    worker_idle_secs: u64,

    /// Interval between expired-session sweeps (seconds, 0 disables)
    #[serde(default = "default_reap_interval")]
    reap_interval_secs: u64,
}

fn default_queue_capacity() -> usize {
    32
}

fn default_worker_idle() -> u64 {
    300 // 5 minutes
}

fn default_reap_interval() -> u64 {
    60
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            worker_idle_secs: default_worker_idle(),
            reap_interval_secs: default_reap_interval(),
        }
    }
}

/// Result of [`Dispatcher::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The message is queued for its conversant's worker.
    Queued,
    /// The conversant already has `queue_capacity` pending messages; this one
    /// was dropped.
    QueueFull,
}

#[derive(Debug)]
struct WorkerSlot {
    tx: mpsc::Sender<InboundMessage>,
    generation: u64,
}

struct Shared<H> {
    handler: Arc<H>,
    channel: Arc<dyn MessageChannel>,
    workers: Mutex<HashMap<ConversantId, WorkerSlot>>,
    idle: Duration,
}

impl<H> Shared<H> {
    fn is_current(
        &self,
        workers: &HashMap<ConversantId, WorkerSlot>,
        id: &ConversantId,
        generation: u64,
    ) -> bool {
        workers.get(id).is_some_and(|slot| slot.generation == generation)
    }
}

/// Fans inbound messages out to per-conversant workers.
pub struct Dispatcher<H: MessageHandler> {
    shared: Arc<Shared<H>>,
    tasks: Mutex<JoinSet<()>>,
    capacity: usize,
    next_generation: AtomicU64,
}

impl<H: MessageHandler> Dispatcher<H> {
    /// Create a dispatcher that sends replies through `channel`.
    pub fn new(
        handler: Arc<H>,
        channel: Arc<dyn MessageChannel>,
        config: &DispatcherConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                handler,
                channel,
                workers: Mutex::new(HashMap::new()),
                idle: Duration::from_secs(config.worker_idle_secs),
            }),
            tasks: Mutex::new(JoinSet::new()),
            capacity: config.queue_capacity.max(1),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Queue a message behind any earlier messages from the same conversant.
    ///
    /// Never waits: when that conversant's queue is full the message is not
    /// queued and [`Dispatch::QueueFull`] is returned, so one slow conversant
    /// cannot hold up the others.
    #[instrument(skip(self, message), fields(conversant = %message.conversant_id))]
    pub fn dispatch(&self, message: InboundMessage) -> Dispatch {
        self.reap_finished();
        let id = message.conversant_id.clone();
        let mut workers = self.shared.workers.lock();

        if let Some(slot) = workers.get(&id) {
            match slot.tx.try_reserve() {
                Ok(permit) => {
                    permit.send(message);
                    return Dispatch::Queued;
                }
                Err(TrySendError::Full(())) => {
                    warn!(capacity = self.capacity, "Conversant queue full; message dropped");
                    return Dispatch::QueueFull;
                }
                Err(TrySendError::Closed(())) => warn!("Replacing dead worker"),
            }
        }

        let slot = self.spawn_worker(id.clone());
        if let Err(e) = slot.tx.try_send(message) {
            error!(error = %e, "Fresh worker queue rejected message");
            return Dispatch::QueueFull;
        }
        workers.insert(id, slot);
        Dispatch::Queued
    }

    /// Number of live workers.
    pub fn active_workers(&self) -> usize {
        self.shared.workers.lock().len()
    }

    /// Stop accepting work, let workers drain their queues, and wait for them.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        let drained = std::mem::take(&mut *self.shared.workers.lock());
        info!(workers = drained.len(), "Shutting down dispatcher");
        drop(drained);

        let mut tasks = std::mem::take(&mut *self.tasks.lock());
        while let Some(result) = tasks.join_next().await {
            log_task_result(result);
        }
    }

    fn spawn_worker(&self, id: ConversantId) -> WorkerSlot {
        let (tx, rx) = mpsc::channel(self.capacity);
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        debug!(conversant = %id, generation, "Spawning worker");
        self.tasks
            .lock()
            .spawn(run_worker(Arc::clone(&self.shared), id, generation, rx));
        WorkerSlot { tx, generation }
    }

    fn reap_finished(&self) {
        let mut tasks = self.tasks.lock();
        while let Some(result) = tasks.try_join_next() {
            log_task_result(result);
        }
    }
}

fn log_task_result(result: Result<(), JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            error!(error = %e, "Worker panicked");
        } else {
            debug!(error = %e, "Worker cancelled");
        }
    }
}

async fn run_worker<H: MessageHandler>(
    shared: Arc<Shared<H>>,
    id: ConversantId,
    generation: u64,
    mut rx: mpsc::Receiver<InboundMessage>,
) {
    loop {
        let message = match tokio::time::timeout(shared.idle, rx.recv()).await {
            Ok(Some(message)) => message,
            Ok(None) => break,
            Err(_) => {
                let next = {
                    let mut workers = shared.workers.lock();
                    match rx.try_recv() {
                        Ok(message) => Some(message),
                        Err(_) => {
                            if shared.is_current(&workers, &id, generation) {
                                workers.remove(&id);
                            }
                            None
                        }
                    }
                };
                match next {
                    Some(message) => message,
                    None => {
                        debug!(conversant = %id, "Worker idle; retiring");
                        break;
                    }
                }
            }
        };

        if let Some(reply) = shared.handler.handle(&message).await {
            if let Err(e) = shared.channel.send(reply).await {
                error!(conversant = %id, error = %e, "Failed to deliver reply");
            }
        }
    }
}
