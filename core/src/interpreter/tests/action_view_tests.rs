//! Tests for action and view states
//!
//! Suspension, event consumption, structured events and one-shot error tags

use super::helpers::{graph_from_json, start};
use crate::interpreter::{step, ContextMap, Event, StepOutcome, Val};
use maplit::btreemap;

const STATES: &str = r#"{
    "states": {
        "PasswordEntryView": {"type": "view", "interface": "password-entry", "expose": ["username", "attempts_note"]},
        "verifyPasswordAction": {"type": "action"},
        "SetupPasswordView": {"type": "view", "interface": "setup-password", "expose": ["password_verified"]},
        "lockBranch": {"type": "switch", "expression": "locked"},
        "LockedView": {"type": "view", "interface": "locked"}
    }
}"#;

const TRANSITIONS: &str = r#"{
    "transitions": {
        "PasswordEntryView": {
            "submit_password": "verifyPasswordAction"
        },
        "verifyPasswordAction": {
            "success": {"target": "SetupPasswordView", "context": {"password_verified": true}},
            "invalidPassword": {"target": "PasswordEntryView", "error_id": "AUTH_0013"},
            "recheck": "lockBranch",
            "throttled": {"target": "verifyPasswordAction", "error_id": "AUTH_0099"}
        },
        "lockBranch": {
            "true": "LockedView",
            "null": "PasswordEntryView"
        },
        "SetupPasswordView": {
            "done": null
        }
    }
}"#;

#[test]
fn test_view_suspends_with_exposed_context() {
    let graph = graph_from_json(STATES, TRANSITIONS);
    let (mut cursor, mut context) = start("PasswordEntryView", &[("username", "JDoe")]);

    let outcome = step(&graph, &mut cursor, &mut context, None).unwrap();

    let StepOutcome::View(view) = outcome else {
        unreachable!("Expected view, got {:?}", outcome);
    };
    assert_eq!(view.interface, "password-entry");
    assert_eq!(
        view.context,
        btreemap! {
            "username".to_string() => Val::from("JDoe"),
            "attempts_note".to_string() => Val::Null,
        }
    );
    assert_eq!(view.error_id, None);

    // Suspending again without an event renders the same view
    let again = step(&graph, &mut cursor, &mut context, None).unwrap();
    assert_eq!(again.as_view(), Some(&view));
}

#[test]
fn test_action_suspends_until_outcome() {
    let graph = graph_from_json(STATES, TRANSITIONS);
    let (mut cursor, mut context) = start("PasswordEntryView", &[]);

    step(&graph, &mut cursor, &mut context, None).unwrap();
    let outcome = step(&graph, &mut cursor, &mut context, Some("submit_password".into())).unwrap();
    assert_eq!(
        outcome,
        StepOutcome::ActionPending {
            state_id: "verifyPasswordAction".to_string()
        }
    );

    // No outcome reported yet: still pending, nothing advances on its own
    let outcome = step(&graph, &mut cursor, &mut context, None).unwrap();
    assert_eq!(outcome.state_id(), Some("verifyPasswordAction"));

    let outcome = step(&graph, &mut cursor, &mut context, Some("success".into())).unwrap();
    let view = outcome.as_view().unwrap();
    assert_eq!(view.state_id, "SetupPasswordView");
    assert_eq!(view.context["password_verified"], Val::Bool(true));
}

#[test]
fn test_error_tag_is_shown_exactly_once() {
    let graph = graph_from_json(STATES, TRANSITIONS);
    let (mut cursor, mut context) = start("verifyPasswordAction", &[]);

    let outcome = step(&graph, &mut cursor, &mut context, None).unwrap();
    assert_eq!(outcome.state_id(), Some("verifyPasswordAction"));

    let outcome = step(&graph, &mut cursor, &mut context, Some("invalidPassword".into())).unwrap();
    let view = outcome.as_view().unwrap();
    assert_eq!(view.state_id, "PasswordEntryView");
    assert_eq!(view.error_id.as_deref(), Some("AUTH_0013"));
    assert_eq!(cursor.pending_error, None);

    // Re-render without a new tag: the old one is gone
    let outcome = step(&graph, &mut cursor, &mut context, None).unwrap();
    assert_eq!(outcome.as_view().unwrap().error_id, None);
}

#[test]
fn test_error_tag_survives_action_suspend() {
    let graph = graph_from_json(STATES, TRANSITIONS);
    let (mut cursor, mut context) = start("verifyPasswordAction", &[]);
    step(&graph, &mut cursor, &mut context, None).unwrap();

    // Self-loop with a tag: the action suspends again without showing it
    let outcome = step(&graph, &mut cursor, &mut context, Some("throttled".into())).unwrap();
    assert!(matches!(outcome, StepOutcome::ActionPending { .. }));
    assert_eq!(cursor.pending_error.as_deref(), Some("AUTH_0099"));

    // The next transition carries no tag, so the first view shows the old one
    let outcome = step(&graph, &mut cursor, &mut context, Some("recheck".into())).unwrap();
    let view = outcome.as_view().unwrap();
    assert_eq!(view.state_id, "PasswordEntryView");
    assert_eq!(view.error_id.as_deref(), Some("AUTH_0099"));
}

#[test]
fn test_newer_error_tag_replaces_unseen_one() {
    let graph = graph_from_json(STATES, TRANSITIONS);
    let (mut cursor, mut context) = start("verifyPasswordAction", &[]);
    step(&graph, &mut cursor, &mut context, None).unwrap();

    step(&graph, &mut cursor, &mut context, Some("throttled".into())).unwrap();
    let outcome = step(&graph, &mut cursor, &mut context, Some("invalidPassword".into())).unwrap();
    assert_eq!(outcome.as_view().unwrap().error_id.as_deref(), Some("AUTH_0013"));
}

#[test]
fn test_outcome_keys_are_case_insensitive() {
    let graph = graph_from_json(STATES, TRANSITIONS);
    let (mut cursor, mut context) = start("verifyPasswordAction", &[]);
    step(&graph, &mut cursor, &mut context, None).unwrap();

    let outcome = step(&graph, &mut cursor, &mut context, Some("INVALIDPASSWORD".into())).unwrap();
    assert_eq!(outcome.state_id(), Some("PasswordEntryView"));
}

#[test]
fn test_structured_event_on_action_merges_before_resolving() {
    let graph = graph_from_json(STATES, TRANSITIONS);
    let (mut cursor, mut context) = start("verifyPasswordAction", &[]);
    step(&graph, &mut cursor, &mut context, None).unwrap();

    // Without the fact, recheck routes back to the password view
    let event = Event::with_context("recheck", btreemap! { "locked".to_string() => Val::Bool(true) });
    let outcome = step(&graph, &mut cursor, &mut context, Some(event)).unwrap();

    assert_eq!(outcome.state_id(), Some("LockedView"));
    assert_eq!(context.get("locked"), Some(&Val::Bool(true)));
}

#[test]
fn test_structured_event_on_view() {
    let graph = graph_from_json(STATES, TRANSITIONS);
    let (mut cursor, mut context) = start("PasswordEntryView", &[]);
    step(&graph, &mut cursor, &mut context, None).unwrap();

    let event: Event = serde_json::from_str(
        r#"{"outcome": "submit_password", "context": {"username": "jdoe"}}"#,
    )
    .unwrap();
    let outcome = step(&graph, &mut cursor, &mut context, Some(event)).unwrap();

    assert_eq!(outcome.state_id(), Some("verifyPasswordAction"));
    assert_eq!(context.get("username"), Some(&Val::from("jdoe")));
}

#[test]
fn test_structured_event_without_updates_behaves_like_bare_key() {
    let graph = graph_from_json(STATES, TRANSITIONS);
    let (mut cursor, mut context) = start("verifyPasswordAction", &[]);
    step(&graph, &mut cursor, &mut context, None).unwrap();

    let event = Event::with_context("recheck", ContextMap::new());
    let outcome = step(&graph, &mut cursor, &mut context, Some(event)).unwrap();
    assert_eq!(outcome.state_id(), Some("PasswordEntryView"));
}

#[test]
fn test_null_target_at_root_finishes() {
    let graph = graph_from_json(STATES, TRANSITIONS);
    let (mut cursor, mut context) = start("SetupPasswordView", &[]);
    step(&graph, &mut cursor, &mut context, None).unwrap();

    let outcome = step(&graph, &mut cursor, &mut context, Some("done".into())).unwrap();
    assert_eq!(outcome, StepOutcome::Finished);
    assert!(cursor.is_finished());

    // Stepping a finished session stays finished
    let outcome = step(&graph, &mut cursor, &mut context, Some("done".into())).unwrap();
    assert_eq!(outcome, StepOutcome::Finished);
}
