use slotwise_core::ConversantId;
use slotwise_store::ConversantLocks;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[tokio::test]
async fn same_conversant_is_serialized() {
    let locks = ConversantLocks::new();
    let active = Arc::new(AtomicUsize::new(0));
    let max_seen = Arc::new(AtomicUsize::new(0));
    let id = ConversantId::from("a");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let locks = locks.clone();
        let active = Arc::clone(&active);
        let max_seen = Arc::clone(&max_seen);
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            let _guard = locks.acquire(&id).await;
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            max_seen.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            active.fetch_sub(1, Ordering::SeqCst);
        }));
    }
    for handle in handles {
        handle.await.expect("task");
    }

    assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    assert!(locks.is_empty());
}

#[tokio::test]
async fn different_conversants_do_not_block_each_other() {
    let locks = ConversantLocks::new();
    let _a = locks.acquire(&ConversantId::from("a")).await;

    let b = tokio::time::timeout(
        Duration::from_millis(100),
        locks.acquire(&ConversantId::from("b")),
    )
    .await
    .expect("b must not wait on a");

    assert_eq!(b.conversant_id().as_str(), "b");
    assert_eq!(locks.len(), 2);
}

#[tokio::test]
async fn entry_survives_while_waiter_is_queued() {
    let locks = ConversantLocks::new();
    let id = ConversantId::from("a");
    let first = locks.acquire(&id).await;

    let waiter = {
        let locks = locks.clone();
        let id = id.clone();
        tokio::spawn(async move {
            let _guard = locks.acquire(&id).await;
        })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    drop(first);
    assert!(locks.len() <= 1);
    waiter.await.expect("waiter");
    assert!(locks.is_empty());
}
