//! Per-conversant ordering and worker lifecycle.

use async_trait::async_trait;
use slotwise_bot::{Dispatch, Dispatcher, DispatcherConfig, MemoryChannel, MessageHandler};
use slotwise_core::{ConversantId, InboundMessage, OutboundReply};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

/// Echoes each message after a delay that shrinks with the message number, so
/// later messages would overtake earlier ones without per-conversant FIFO.
#[derive(Default)]
struct SlowEcho {
    handled: AtomicUsize,
}

#[async_trait]
impl MessageHandler for SlowEcho {
    async fn handle(&self, message: &InboundMessage) -> Option<OutboundReply> {
        let n: u64 = message.text.parse().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(50u64.saturating_sub(n * 5))).await;
        self.handled.fetch_add(1, Ordering::SeqCst);
        Some(OutboundReply::text(
            message.conversant_id.clone(),
            message.text.clone(),
        ))
    }
}

/// Holds messages from "slow" until released, echoes everything else at once.
#[derive(Default)]
struct Stalled {
    release: Notify,
}

#[async_trait]
impl MessageHandler for Stalled {
    async fn handle(&self, message: &InboundMessage) -> Option<OutboundReply> {
        if message.conversant_id.as_str() == "slow" {
            self.release.notified().await;
        }
        Some(OutboundReply::text(
            message.conversant_id.clone(),
            message.text.clone(),
        ))
    }
}

/// Panics on "boom", echoes everything else.
struct Explosive;

#[async_trait]
impl MessageHandler for Explosive {
    async fn handle(&self, message: &InboundMessage) -> Option<OutboundReply> {
        if message.text == "boom" {
            panic!("handler failure");
        }
        Some(OutboundReply::text(
            message.conversant_id.clone(),
            message.text.clone(),
        ))
    }
}

fn texts(channel: &MemoryChannel, id: &str) -> Vec<String> {
    channel
        .sent_to(&ConversantId::from(id))
        .into_iter()
        .map(|r| r.text)
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn messages_are_handled_in_order_per_conversant() {
    let channel = Arc::new(MemoryChannel::default());
    let handler = Arc::new(SlowEcho::default());
    let dispatcher = Dispatcher::new(
        handler.clone(),
        channel.clone(),
        &DispatcherConfig::default().with_queue_capacity(8),
    );

    for n in 0..8 {
        for id in ["a", "b", "c"] {
            let queued = dispatcher.dispatch(InboundMessage::new(id, n.to_string()));
            assert_eq!(queued, Dispatch::Queued);
        }
    }
    dispatcher.shutdown().await;

    let expected: Vec<String> = (0..8).map(|n| n.to_string()).collect();
    for id in ["a", "b", "c"] {
        assert_eq!(texts(&channel, id), expected, "conversant {}", id);
    }
    assert_eq!(handler.handled.load(Ordering::SeqCst), 24);
    assert_eq!(dispatcher.active_workers(), 0);
}

#[tokio::test(start_paused = true)]
async fn idle_workers_retire_and_respawn() {
    let channel = Arc::new(MemoryChannel::default());
    let dispatcher = Dispatcher::new(
        Arc::new(SlowEcho::default()),
        channel.clone(),
        &DispatcherConfig::default().with_worker_idle_secs(10),
    );

    dispatcher.dispatch(InboundMessage::new("a", "1"));
    assert_eq!(dispatcher.active_workers(), 1);

    tokio::time::sleep(Duration::from_secs(11)).await;
    for _ in 0..100 {
        if dispatcher.active_workers() == 0 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(dispatcher.active_workers(), 0);
    assert_eq!(texts(&channel, "a"), ["1"]);

    dispatcher.dispatch(InboundMessage::new("a", "2"));
    assert_eq!(dispatcher.active_workers(), 1);
    dispatcher.shutdown().await;
    assert_eq!(texts(&channel, "a"), ["1", "2"]);
}

#[tokio::test]
async fn panicking_handler_does_not_stop_the_conversant() {
    let channel = Arc::new(MemoryChannel::default());
    let dispatcher = Dispatcher::new(
        Arc::new(Explosive),
        channel.clone(),
        &DispatcherConfig::default(),
    );

    dispatcher.dispatch(InboundMessage::new("a", "boom"));
    dispatcher.dispatch(InboundMessage::new("b", "fine"));

    // Wait for the panicked worker to finish.
    for _ in 0..100 {
        tokio::task::yield_now().await;
    }
    dispatcher.dispatch(InboundMessage::new("a", "after"));
    dispatcher.shutdown().await;

    assert_eq!(texts(&channel, "a"), ["after"]);
    assert_eq!(texts(&channel, "b"), ["fine"]);
}

#[tokio::test]
async fn full_queue_does_not_hold_up_other_conversants() {
    let channel = Arc::new(MemoryChannel::default());
    let handler = Arc::new(Stalled::default());
    let dispatcher = Dispatcher::new(
        handler.clone(),
        channel.clone(),
        &DispatcherConfig::default().with_queue_capacity(1),
    );

    assert_eq!(dispatcher.dispatch(InboundMessage::new("slow", "1")), Dispatch::Queued);
    assert_eq!(dispatcher.dispatch(InboundMessage::new("slow", "2")), Dispatch::QueueFull);
    assert_eq!(dispatcher.dispatch(InboundMessage::new("fast", "hi")), Dispatch::Queued);

    tokio::time::timeout(Duration::from_secs(1), async {
        while texts(&channel, "fast").is_empty() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("fast conversant answered while slow one is stalled");
    assert!(texts(&channel, "slow").is_empty());

    handler.release.notify_one();
    dispatcher.shutdown().await;
    assert_eq!(texts(&channel, "slow"), ["1"]);
    assert_eq!(texts(&channel, "fast"), ["hi"]);
}
