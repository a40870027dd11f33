//! Per-conversant async locks.

use parking_lot::Mutex;
use slotwise_core::ConversantId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = HashMap<ConversantId, Arc<AsyncMutex<()>>>;

/// Async mutexes keyed by conversant.
///
/// Holding a [`ConversantGuard`] serializes handling for one conversant while
/// leaving every other conversant free to proceed. A key's entry is dropped
/// once its last holder or waiter lets go, so the map only tracks conversants
/// with in-flight work.
///
/// # Example
///
/// ```
/// use slotwise_store::ConversantLocks;
///
/// # tokio_test::block_on(async {
/// let locks = ConversantLocks::new();
/// let id = "chat-1".into();
///
/// let guard = locks.acquire(&id).await;
/// assert_eq!(locks.len(), 1);
/// drop(guard);
/// assert!(locks.is_empty());
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConversantLocks {
    inner: Arc<Mutex<LockMap>>,
}

impl ConversantLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`.
    pub async fn acquire(&self, id: &ConversantId) -> ConversantGuard {
        let lock = {
            let mut map = self.inner.lock();
            Arc::clone(map.entry(id.clone()).or_default())
        };

        let guard = lock.lock_owned().await;
        ConversantGuard {
            guard: Some(guard),
            id: id.clone(),
            locks: Arc::clone(&self.inner),
        }
    }

    /// Number of conversants with a holder or waiter.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// True when no conversant is locked.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

/// Exclusive access to one conversant; released on drop.
#[derive(Debug)]
pub struct ConversantGuard {
    guard: Option<OwnedMutexGuard<()>>,
    id: ConversantId,
    locks: Arc<Mutex<LockMap>>,
}

impl ConversantGuard {
    /// Conversant this guard protects.
    pub fn conversant_id(&self) -> &ConversantId {
        &self.id
    }
}

impl Drop for ConversantGuard {
    fn drop(&mut self) {
        // Release the async lock before inspecting the reference count.
        self.guard.take();

        let mut map = self.locks.lock();
        if map
            .get(&self.id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            map.remove(&self.id);
        }
    }
}
