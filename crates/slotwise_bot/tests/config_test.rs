//! Loading and validating bot configuration files.

use slotwise_bot::{BotConfig, CommandAction, FinalizerConfig, ValidatorConfig};
use slotwise_core::{Trigger, Validator};
use slotwise_error::SlotwiseErrorKind;
use std::io::Write;

const BUNDLED: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/slotwise.toml");

const MINIMAL: &str = r#"
[[dialogs]]
kind = "plan"
trigger = { command = "/plan" }
finalizer = { type = "summary" }

[[dialogs.slots]]
field = "age"
prompt = "How old are you?"
validator = { type = "integer", min = 10, max = 120 }

[[dialogs.slots]]
field = "goal"
prompt = "What is your goal?"
"#;

fn config_error(toml: &str) -> String {
    let err = BotConfig::from_toml(toml).unwrap_err();
    match err.kind() {
        SlotwiseErrorKind::Config(e) => e.message.clone(),
        other => panic!("expected config error, got {}", other),
    }
}

#[test]
fn bundled_config_loads() {
    let config = BotConfig::from_file(BUNDLED).expect("bundled config");

    assert_eq!(config.dialogs.len(), 1);
    let plan = &config.dialogs[0];
    assert_eq!(plan.kind, "plan");
    assert_eq!(plan.trigger, Trigger::command("/plan"));
    assert!(matches!(plan.finalizer, FinalizerConfig::Completion { .. }));

    let sequence = plan.sequence().expect("sequence");
    assert_eq!(
        sequence.field_names().collect::<Vec<_>>(),
        ["age", "height", "weight", "activity", "goal"]
    );
    assert!(sequence.opening().ends_with("How old are you?"));

    assert!(config.commands.iter().any(|c| c.action
        == CommandAction::Complete {
            prompt: "Create a beginner-friendly workout plan.".to_string()
        }));
    assert!(config.needs_completion());
    assert!(config.needs_images());
    assert_eq!(*config.store.idle_ttl_secs(), 1800);
}

#[test]
fn missing_sections_use_defaults() {
    let config = BotConfig::from_toml(MINIMAL).expect("config");
    assert!(config.commands.is_empty());
    assert!(config.bot.relay_free_text);
    assert_eq!(*config.dispatcher.queue_capacity(), 32);
    assert!(config.engine.is_cancel("/cancel"));
    assert_eq!(config.dialogs[0].slots[1].validator, ValidatorConfig::FreeText);
}

#[test]
fn validators_are_built_from_config() {
    let config = BotConfig::from_toml(MINIMAL).expect("config");
    let age = config.dialogs[0].slots[0].validator.build();
    assert_eq!(age.validate(" 42 ").unwrap(), "42");
    assert!(age.validate("200").is_err());
    assert!(age.validate("4.5").is_err());
}

#[test]
fn from_file_reads_temp_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(MINIMAL.as_bytes()).expect("write");
    let config = BotConfig::from_file(file.path()).expect("config");
    assert_eq!(config.dialogs[0].kind, "plan");
}

#[test]
fn missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = BotConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err.kind(), SlotwiseErrorKind::Config(_)));
}

#[test]
fn template_must_reference_known_fields() {
    let toml = MINIMAL.replace(
        r#"finalizer = { type = "summary" }"#,
        r#"finalizer = { type = "completion", template = "Plan for {age} to {weight}" }"#,
    );
    assert!(config_error(&toml).contains("unknown field 'weight'"));
}

#[test]
fn duplicate_dialog_kinds_are_rejected() {
    let toml = format!("{}\n{}", MINIMAL, MINIMAL);
    assert!(config_error(&toml).contains("more than once"));
}

#[test]
fn duplicate_fields_are_a_definition_error() {
    let toml = MINIMAL.replace(r#"field = "goal""#, r#"field = "age""#);
    let err = BotConfig::from_toml(&toml).unwrap_err();
    assert!(matches!(err.kind(), SlotwiseErrorKind::Definition(_)));
}

#[test]
fn inverted_bounds_are_rejected() {
    let toml = MINIMAL.replace("min = 10, max = 120", "min = 120, max = 10");
    assert!(config_error(&toml).contains("min greater than max"));
}

#[test]
fn empty_choices_are_rejected() {
    let toml = MINIMAL.replace(
        r#"validator = { type = "integer", min = 10, max = 120 }"#,
        r#"validator = { type = "one_of", choices = [] }"#,
    );
    assert!(config_error(&toml).contains("no choices"));
}

#[test]
fn zero_queue_capacity_is_rejected() {
    let toml = format!("[dispatcher]\nqueue_capacity = 0\n{}", MINIMAL);
    assert!(config_error(&toml).contains("queue_capacity"));
}

#[test]
fn malformed_toml_is_a_config_error() {
    assert!(config_error("[[dialogs]\nkind = ").contains("Failed to parse config"));
}
