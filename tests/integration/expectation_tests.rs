//! Integration tests for call-count expectations and scenario verification

use crate::fixtures::stub;
use stubkit::config::VerificationConfig;
use stubkit::mock::{ReturnSelf, Value};
use stubkit::{consecutive, expected, overrides, Scenario, ScenarioStatus, StubError, TestCase};

fn scenario(name: &str) -> Scenario {
    Scenario::with_config(
        name,
        &VerificationConfig {
            verify_on_drop: false,
        },
    )
}

// ── Immediate upper-bound failures ──────────────────────────────────

#[test]
fn test_once_allows_a_single_call() {
    let dummy = stub()
        .make("DummyClass", overrides! { "helloWorld" => expected::once("bye") }, None)
        .unwrap();

    assert_eq!(dummy.call("helloWorld", &[]).unwrap(), Value::from("bye"));
    let err = dummy.call("helloWorld", &[]).unwrap_err();
    assert!(err.is_expectation_failure());
    assert!(err.to_string().contains("was not expected to be called more than once"));
}

#[test]
fn test_never_fails_on_first_call() {
    let dummy = stub()
        .make("DummyClass", overrides! { "goodByeWorld" => expected::never() }, None)
        .unwrap();

    let err = dummy.call("goodByeWorld", &[]).unwrap_err();
    assert!(err.is_expectation_failure());
    // Other methods are untouched.
    assert_eq!(dummy.call("helloWorld", &[]).unwrap(), Value::from("hello world"));
}

#[test]
fn test_exactly_allows_count_calls() {
    let dummy = stub()
        .make("DummyClass", overrides! { "helloWorld" => expected::exactly(3, "hi") }, None)
        .unwrap();

    for _ in 0..3 {
        assert_eq!(dummy.call("helloWorld", &[]).unwrap(), Value::from("hi"));
    }
    assert!(dummy.call("helloWorld", &[]).is_err());
}

#[test]
fn test_with_checks_arguments_on_each_call() {
    let account = stub()
        .make(
            "Account",
            overrides! { "deposit" => expected::at_least_once(1).with([50]) },
            None,
        )
        .unwrap();

    assert_eq!(account.call("deposit", &[Value::from(50)]).unwrap(), Value::from(1));
    let err = account.call("deposit", &[Value::from(60)]).unwrap_err();
    assert!(err.to_string().contains("does not match expected value"));
    assert!(account.call("deposit", &[]).is_err());
}

// ── Deferred lower-bound verification ───────────────────────────────

#[test]
fn test_at_least_once_uncalled_fails_at_teardown() {
    let scenario = scenario("uncalled");
    stub()
        .make(
            "DummyClass",
            overrides! { "helloWorld" => expected::at_least_once("x") },
            Some(&scenario),
        )
        .unwrap();

    let err = scenario.teardown().unwrap_err();
    assert!(err
        .to_string()
        .contains("Expected invocation of DummyClass::helloWorld at least once but it never occurred."));
}

#[test]
fn test_at_least_once_called_passes_teardown() {
    let scenario = scenario("called");
    let dummy = stub()
        .make(
            "DummyClass",
            overrides! { "helloWorld" => expected::at_least_once("x") },
            Some(&scenario),
        )
        .unwrap();

    for _ in 0..4 {
        assert_eq!(dummy.call("helloWorld", &[]).unwrap(), Value::from("x"));
    }
    assert!(scenario.teardown().is_ok());
}

#[test]
fn test_without_scenario_lower_bounds_are_never_checked() {
    let dummy = stub()
        .make("DummyClass", overrides! { "helloWorld" => expected::once(()) }, None)
        .unwrap();
    drop(dummy);
}

#[test]
fn test_exactly_undercalled_reports_counts() {
    let scenario = scenario("undercalled");
    let dummy = stub()
        .make_empty(
            "DummyClass",
            overrides! { "helloWorld" => expected::exactly(2, ()) },
            Some(&scenario),
        )
        .unwrap();
    dummy.call("helloWorld", &[]).unwrap();

    match scenario.verify() {
        Err(StubError::Verification { failures, .. }) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(
                failures[0].to_string(),
                "Method DummyClass::helloWorld was expected to be called 2 times, actually called 1 times."
            );
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_failed_test_skips_verification() {
    let scenario = scenario("failed");
    stub()
        .make("DummyClass", overrides! { "helloWorld" => expected::once(()) }, Some(&scenario))
        .unwrap();
    assert!(scenario.finish(ScenarioStatus::Skipped).is_ok());
}

// ── Replies ─────────────────────────────────────────────────────────

#[test]
fn test_expectation_with_sequence_reply() {
    let dummy = stub()
        .make(
            "DummyClass",
            overrides! { "helloWorld" => expected::exactly(2, consecutive(["a", "b"])) },
            None,
        )
        .unwrap();
    assert_eq!(dummy.call("helloWorld", &[]).unwrap(), Value::from("a"));
    assert_eq!(dummy.call("helloWorld", &[]).unwrap(), Value::from("b"));
}

#[test]
fn test_expectation_with_fluent_reply() {
    let dummy = stub()
        .make("DummyClass", overrides! { "setCheckMe" => expected::once(ReturnSelf) }, None)
        .unwrap();
    let returned = dummy.call("setCheckMe", &[Value::from(1)]).unwrap();
    assert!(returned.as_object().unwrap().ptr_eq(&dummy));
}

// ── TestCase lifecycle ──────────────────────────────────────────────

#[test]
fn test_test_case_verifies_on_finish() {
    let test = TestCase::new("test_case", stub());
    let dummy = test
        .make("DummyClass", overrides! { "goodByeWorld" => expected::once("ciao") })
        .unwrap();
    test.construct_empty("Account", vec![], overrides! { "balance" => expected::never() })
        .unwrap();

    assert_eq!(dummy.call("goodByeWorld", &[]).unwrap(), Value::from("ciao"));
    assert_eq!(test.scenario().assertion_count(), 2);
    test.finish(ScenarioStatus::Passed).unwrap();
}

#[test]
#[should_panic(expected = "Expectation failed in scenario \"dropped\"")]
fn test_unverified_scenario_panics_on_drop() {
    let test = TestCase::new("dropped", stub());
    test.make("DummyClass", overrides! { "helloWorld" => expected::at_least_once(()) })
        .unwrap();
}
