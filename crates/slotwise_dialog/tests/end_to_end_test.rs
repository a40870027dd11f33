//! Message-level scenarios: a start trigger plus a stream of answers.

use async_trait::async_trait;
use slotwise_core::{
    CollectedFields, DialogKind, InboundMessage, Numeric, SlotDefinition, SlotSequence, Trigger,
};
use slotwise_dialog::{DialogDefinition, DialogEngine, DialogRegistry, EngineOutcome, EngineSettings};
use slotwise_error::FinalizationResult;
use slotwise_interface::{Finalizer, SessionStore};
use slotwise_store::InMemorySessionStore;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Capture(Mutex<Vec<CollectedFields>>);

#[async_trait]
impl Finalizer for Capture {
    async fn finalize(&self, _: &DialogKind, collected: &CollectedFields) -> FinalizationResult<String> {
        self.0.lock().expect("lock").push(collected.clone());
        Ok("done".to_string())
    }
}

/// Minimal host: start trigger first, then the engine.
async fn feed(
    engine: &DialogEngine<InMemorySessionStore>,
    trigger: &Trigger,
    id: &str,
    text: &str,
) -> EngineOutcome {
    let message = InboundMessage::new(id, text);
    if trigger.matches(text) {
        return engine
            .start(&message.conversant_id, &"plan".into())
            .await
            .expect("registered dialog");
    }
    engine.handle(&message).await
}

fn build(age: SlotDefinition, capture: Arc<Capture>) -> DialogEngine<InMemorySessionStore> {
    let sequence = SlotSequence::new(
        "plan",
        vec![
            age,
            SlotDefinition::free_text("height", "Height?"),
            SlotDefinition::free_text("weight", "Weight?"),
            SlotDefinition::free_text("activity", "Activity?"),
            SlotDefinition::free_text("goal", "Goal?"),
        ],
    )
    .expect("sequence");
    let mut registry = DialogRegistry::new();
    registry
        .register(DialogDefinition::new(sequence, capture))
        .expect("register");
    DialogEngine::new(
        Arc::new(InMemorySessionStore::default()),
        registry,
        EngineSettings::default(),
    )
}

#[tokio::test]
async fn plan_with_permissive_validators() {
    let capture = Arc::new(Capture::default());
    let engine = build(SlotDefinition::free_text("age", "Age?"), capture.clone());
    let trigger = Trigger::command("/plan");

    let mut last = EngineOutcome::NotHandled;
    for text in ["/plan", "25", "180", "75", "moderate", "lose weight"] {
        last = feed(&engine, &trigger, "alice", text).await;
    }

    assert_eq!(last, EngineOutcome::Completed { reply: "done".to_string() });
    let calls = capture.0.lock().expect("lock").clone();
    assert_eq!(calls.len(), 1);
    let expected: CollectedFields = [
        ("age", "25"),
        ("height", "180"),
        ("weight", "75"),
        ("activity", "moderate"),
        ("goal", "lose weight"),
    ]
    .into_iter()
    .collect();
    assert_eq!(calls[0], expected);
}

#[tokio::test]
async fn plan_with_numeric_age() {
    let capture = Arc::new(Capture::default());
    let engine = build(
        SlotDefinition::new("age", "Age?", Arc::new(Numeric::integer())),
        capture,
    );
    let trigger = Trigger::command("/plan");

    feed(&engine, &trigger, "bob", "/plan").await;
    let rejected = feed(&engine, &trigger, "bob", "xyz").await;
    assert!(matches!(rejected, EngineOutcome::Reprompted { slot_index: 0, .. }));
    assert_eq!(*engine.store().get(&"bob".into()).unwrap().slot_index(), 0);

    let accepted = feed(&engine, &trigger, "bob", "25").await;
    assert_eq!(
        accepted,
        EngineOutcome::Prompted {
            reply: "Height?".to_string(),
            slot_index: 1
        }
    );
}

#[tokio::test]
async fn plan_twice_is_already_active() {
    let capture = Arc::new(Capture::default());
    let engine = build(SlotDefinition::free_text("age", "Age?"), capture);
    let trigger = Trigger::command("/plan");

    feed(&engine, &trigger, "carol", "/plan").await;
    let second = feed(&engine, &trigger, "carol", "/plan").await;

    assert!(matches!(second, EngineOutcome::AlreadyActive { .. }));
    assert_eq!(*engine.store().get(&"carol".into()).unwrap().slot_index(), 0);
}
