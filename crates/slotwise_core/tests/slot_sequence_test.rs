use slotwise_core::{
    CollectedFields, Numeric, OneOf, SlotDefinition, SlotSequence, Validator,
};
use slotwise_error::DefinitionErrorKind;
use std::sync::Arc;

fn intake() -> SlotSequence {
    SlotSequence::new(
        "plan",
        vec![
            SlotDefinition::new("age", "How old are you?", Arc::new(Numeric::integer())),
            SlotDefinition::free_text("height", "How tall are you (cm)?"),
            SlotDefinition::free_text("weight", "How much do you weigh (kg)?"),
            SlotDefinition::new(
                "activity",
                "How active are you?",
                Arc::new(OneOf::new(["sedentary", "light", "moderate", "active"])),
            ),
            SlotDefinition::free_text("goal", "What is your goal?"),
        ],
    )
    .expect("valid sequence")
}

#[test]
fn sequence_preserves_order() {
    let sequence = intake();
    let fields: Vec<_> = sequence.field_names().collect();
    assert_eq!(fields, ["age", "height", "weight", "activity", "goal"]);
    assert_eq!(sequence.kind().as_str(), "plan");
    assert_eq!(sequence.len(), 5);
    assert!(!sequence.is_empty());
}

#[test]
fn empty_sequence_is_rejected() {
    let err = SlotSequence::new("empty", vec![]).unwrap_err();
    assert_eq!(err.kind, DefinitionErrorKind::EmptySequence("empty".to_string()));
}

#[test]
fn duplicate_field_is_rejected() {
    let err = SlotSequence::new(
        "plan",
        vec![
            SlotDefinition::free_text("goal", "Goal?"),
            SlotDefinition::free_text("goal", "Goal again?"),
        ],
    )
    .unwrap_err();

    assert_eq!(
        err.kind,
        DefinitionErrorKind::DuplicateField {
            dialog: "plan".to_string(),
            field: "goal".to_string(),
        }
    );
}

#[test]
fn opening_includes_intro() {
    let sequence = intake().with_intro("Let's build your plan.");
    assert_eq!(sequence.opening(), "Let's build your plan.\nHow old are you?");
    assert_eq!(intake().opening(), "How old are you?");
}

#[test]
fn slot_validators_are_applied_per_slot() {
    let sequence = intake();
    let age = sequence.slot(0).expect("age slot");
    assert!(age.validator().validate("xyz").is_err());

    let activity = sequence.slot(3).expect("activity slot");
    assert_eq!(activity.validator().validate("ACTIVE").unwrap(), "active");
}

#[test]
fn collected_fields_from_pairs() {
    let collected: CollectedFields = [("goal", "lose weight"), ("age", "25")].into_iter().collect();
    let fields: Vec<_> = collected.iter().map(|(k, _)| k).collect();
    assert_eq!(fields, ["age", "goal"]);
}
