//! Rule-table routing.

use slotwise_bot::{Action, BotConfig, Router, Rule};
use slotwise_core::{DialogKind, Trigger};

const CONFIG: &str = r#"
[bot]
relay_free_text = false
fallback_notice = "Try /plan or /workout."

[[dialogs]]
kind = "plan"
trigger = { command = "/plan" }
finalizer = { type = "summary" }
[[dialogs.slots]]
field = "goal"
prompt = "Goal?"

[[commands]]
trigger = { command = "/plan" }
action = { type = "reply", text = "shadowed by the dialog" }

[[commands]]
trigger = { command = "/workout" }
action = { type = "complete", prompt = "Create a beginner-friendly workout plan." }

[[commands]]
trigger = { command = "/workout_photo" }
action = { type = "image", prompt = "Beginner workout exercises illustration" }

[[commands]]
trigger = { contains = "protein" }
action = { type = "reply", text = "Aim for protein at every meal." }
"#;

fn router() -> Router {
    Router::from_config(&BotConfig::from_toml(CONFIG).expect("config"))
}

#[test]
fn dialog_triggers_precede_commands() {
    let router = router();
    assert_eq!(router.route("/plan"), &Action::StartDialog("plan".into()));
    assert_eq!(router.dialog_for("/Plan@trainer_bot"), Some(&DialogKind::from("plan")));
    assert_eq!(router.rules().len(), 5);
}

#[test]
fn commands_match_exactly() {
    let router = router();
    assert_eq!(
        router.route("/workout"),
        &Action::Complete("Create a beginner-friendly workout plan.".to_string())
    );
    assert_eq!(
        router.route("/workout_photo"),
        &Action::Image("Beginner workout exercises illustration".to_string())
    );
    assert!(router.dialog_for("/workout").is_none());
}

#[test]
fn contains_rules_match_free_text() {
    assert_eq!(
        router().route("How much Protein do I need?"),
        &Action::Reply("Aim for protein at every meal.".to_string())
    );
}

#[test]
fn unmatched_text_uses_fallback_notice() {
    assert_eq!(
        router().route("hello"),
        &Action::Reply("Try /plan or /workout.".to_string())
    );
}

#[test]
fn fallback_defaults_to_relay_then_ignore() {
    let relay = Router::from_config(&BotConfig::default());
    assert_eq!(relay.fallback(), &Action::Relay);

    let mut config = BotConfig::default();
    config.bot.relay_free_text = false;
    assert_eq!(Router::from_config(&config).fallback(), &Action::Ignore);
}

#[test]
fn first_matching_rule_wins() {
    let router = Router::new(Action::Ignore)
        .with_rule(Rule::new(
            Trigger::Prefix("/w".to_string()),
            Action::Reply("prefix".to_string()),
        ))
        .with_rule(Rule::new(
            Trigger::command("/workout"),
            Action::Reply("command".to_string()),
        ));
    assert_eq!(router.route("/workout"), &Action::Reply("prefix".to_string()));
}
