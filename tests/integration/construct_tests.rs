//! Integration tests for the constructor-running entry points

use crate::fixtures::{stub, take_events};
use stubkit::mock::Value;
use stubkit::{overrides, StubError};

#[test]
fn test_construct_stubs() {
    let stub = stub();

    let dummy = stub
        .construct(
            "DummyClass",
            vec![Value::from("!")],
            overrides! { "helloWorld" => "bye" },
            None,
        )
        .unwrap();
    assert_eq!(dummy.call("getCheckMe", &[]).unwrap(), Value::from("constructed: !"));
    assert_eq!(dummy.call("helloWorld", &[]).unwrap(), Value::from("bye"));
    assert_eq!(dummy.call("goodByeWorld", &[]).unwrap(), Value::from("good bye"));

    let dummy = stub
        .construct_empty(
            "DummyClass",
            vec![Value::from("!")],
            overrides! { "helloWorld" => "bye" },
            None,
        )
        .unwrap();
    assert!(dummy.call("getCheckMe", &[]).unwrap().is_null());
    assert_eq!(dummy.call("helloWorld", &[]).unwrap(), Value::from("bye"));
    assert!(dummy.call("goodByeWorld", &[]).unwrap().is_null());

    let dummy = stub
        .construct_empty_except(
            "DummyClass",
            "getCheckMe",
            vec![Value::from("!")],
            overrides! { "helloWorld" => "bye" },
            None,
        )
        .unwrap();
    assert_eq!(dummy.call("getCheckMe", &[]).unwrap(), Value::from("constructed: !"));
    assert_eq!(dummy.call("helloWorld", &[]).unwrap(), Value::from("bye"));
    assert!(dummy.call("goodByeWorld", &[]).unwrap().is_null());
    assert!(dummy.call("exceptionalMethod", &[]).unwrap().is_null());
}

#[test]
fn test_construct_runs_constructor_once() {
    take_events();
    let account = stub()
        .construct(
            "Account",
            vec![Value::from("Alice"), Value::from(100)],
            overrides! {},
            None,
        )
        .unwrap();

    assert_eq!(take_events(), vec!["Account opened for \"Alice\"".to_string()]);
    assert_eq!(account.call("balance", &[]).unwrap(), Value::from(100));
    assert_eq!(account.get("ownerName").unwrap(), Value::from("Alice"));
}

#[test]
fn test_overrides_are_applied_after_constructor() {
    let account = stub()
        .construct(
            "Account",
            vec![Value::from("Alice"), Value::from(100)],
            overrides! { "ownerName" => "Bob" },
            None,
        )
        .unwrap();

    assert_eq!(account.get("ownerName").unwrap(), Value::from("Bob"));
    assert_eq!(account.call("deposit", &[Value::from(1)]).unwrap(), Value::from(101));
}

#[test]
fn test_construct_accepts_abstract_class() {
    let shape = stub()
        .construct("Shape", vec![], overrides! { "area" => 3.5, "label" => "square" }, None)
        .unwrap();
    assert_eq!(
        shape.call("describe", &[]).unwrap(),
        Value::from("\"square\" with area 3.5")
    );
}

#[test]
fn test_construct_missing_class() {
    let err = stub()
        .construct_empty("Ghost", vec![], overrides! {}, None)
        .unwrap_err();
    assert!(matches!(err, StubError::ClassNotFound(_)));
}
