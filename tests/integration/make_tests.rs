//! Integration tests for the constructor-skipping entry points

use crate::fixtures::{self, stub, take_events};
use stubkit::mock::Value;
use stubkit::{overrides, ClassRef, StubError};

// ── make / make_empty / make_empty_except ───────────────────────────

#[test]
fn test_make_stubs() {
    let stub = stub();

    let dummy = stub
        .make("DummyClass", overrides! { "helloWorld" => "bye" }, None)
        .unwrap();
    assert_eq!(dummy.call("helloWorld", &[]).unwrap(), Value::from("bye"));
    assert_eq!(dummy.call("goodByeWorld", &[]).unwrap(), Value::from("good bye"));

    let dummy = stub
        .make_empty("DummyClass", overrides! { "helloWorld" => "bye" }, None)
        .unwrap();
    assert_eq!(dummy.call("helloWorld", &[]).unwrap(), Value::from("bye"));
    assert!(dummy.call("goodByeWorld", &[]).unwrap().is_null());

    let dummy = stub
        .make_empty_except(
            "DummyClass",
            "goodByeWorld",
            overrides! { "helloWorld" => "bye" },
            None,
        )
        .unwrap();
    assert_eq!(dummy.call("helloWorld", &[]).unwrap(), Value::from("bye"));
    assert_eq!(dummy.call("goodByeWorld", &[]).unwrap(), Value::from("good bye"));
    assert!(dummy.call("exceptionalMethod", &[]).unwrap().is_null());
}

#[test]
fn test_make_keeps_unlisted_methods_real() {
    let dummy = stub()
        .make("DummyClass", overrides! { "targetMethod" => false }, None)
        .unwrap();

    assert_eq!(dummy.call("call", &[]).unwrap(), Value::from(true));
    let err = dummy.call("exceptionalMethod", &[]).unwrap_err();
    assert_eq!(err.to_string(), "Catch it!");
}

#[test]
fn test_make_skips_constructor() {
    take_events();
    let account = stub()
        .make("Account", overrides! { "balance" => 42, "ownerName" => "Alice" }, None)
        .unwrap();

    assert_eq!(account.call("balance", &[]).unwrap(), Value::from(42));
    assert_eq!(account.get("ownerName").unwrap(), Value::from("Alice"));
    assert!(take_events().is_empty());
}

#[test]
fn test_make_sets_private_property_without_replacing_methods() {
    let dummy = stub()
        .make("DummyClass", overrides! { "checkMe" => "set" }, None)
        .unwrap();

    assert!(dummy.intercepted_methods().is_empty());
    assert_eq!(dummy.call("getCheckMe", &[]).unwrap(), Value::from("set"));
}

#[test]
fn test_make_empty_except_keeps_real_side_effects() {
    let account = stub()
        .make_empty_except("Account", "deposit", overrides! { "balance" => 10 }, None)
        .unwrap();

    // `balance` is both a method and a property; the method wins.
    assert_eq!(account.call("deposit", &[Value::from(5)]).unwrap(), Value::from(5));
    assert_eq!(account.call("balance", &[]).unwrap(), Value::from(10));
    assert_eq!(account.property("balance"), Some(Value::from(5)));
}

#[test]
fn test_make_empty_except_only_method() {
    let sealed = stub()
        .make_empty_except("Sealed", "ping", overrides! {}, None)
        .unwrap();
    assert_eq!(sealed.call("ping", &[]).unwrap(), Value::from("pong"));
}

// ── Abstract classes and interfaces ─────────────────────────────────

#[test]
fn test_make_abstract_class_replaces_abstract_methods() {
    let shape = stub()
        .make("Shape", overrides! { "area" => 12 }, None)
        .unwrap();

    assert_eq!(
        shape.call("describe", &[]).unwrap(),
        Value::from("\"shape\" with area 12")
    );
}

#[test]
fn test_unbound_abstract_method_returns_null() {
    let shape = stub().make("Shape", overrides! {}, None).unwrap();
    assert!(shape.call("area", &[]).unwrap().is_null());
}

#[test]
fn test_make_rejects_interface() {
    let err = stub().make("Repository", overrides! {}, None).unwrap_err();
    assert!(matches!(err, StubError::InterfaceNotStubbable(ref name) if name == "Repository"));
}

#[test]
fn test_make_empty_implements_interface() {
    let repo = stub()
        .make_empty("Repository", overrides! { "find" => "row" }, None)
        .unwrap();

    assert_eq!(repo.call("find", &[Value::from(1)]).unwrap(), Value::from("row"));
    assert!(repo.call("save", &[]).unwrap().is_null());
    assert!(repo.class().is_a("Repository"));
}

// ── Class references ────────────────────────────────────────────────

#[test]
fn test_missing_class_is_resolution_error() {
    let err = stub()
        .make_empty("NoSuchClass", overrides! {}, None)
        .unwrap_err();
    assert!(matches!(err, StubError::ClassNotFound(ref name) if name == "NoSuchClass"));
    assert_eq!(err.to_string(), "Stubbed class NoSuchClass doesn't exist.");
}

#[test]
fn test_class_ref_from_factory() {
    let class = ClassRef::factory(|| "DummyClass".to_string());
    let dummy = stub()
        .make(class, overrides! { "helloWorld" => "from factory" }, None)
        .unwrap();
    assert_eq!(dummy.call("helloWorld", &[]).unwrap(), Value::from("from factory"));
}

#[test]
fn test_class_ref_from_instance() {
    let registry = fixtures::registry();
    let class = registry.get("DummyClass").unwrap();
    let real = stubkit::Instance::new(&class, &[Value::from("x")]).unwrap();

    let dummy = stub()
        .make(&real, overrides! { "goodByeWorld" => "later" }, None)
        .unwrap();
    assert_eq!(dummy.call("goodByeWorld", &[]).unwrap(), Value::from("later"));
    assert_eq!(dummy.call("helloWorld", &[]).unwrap(), Value::from("hello world"));
}

#[test]
fn test_unknown_method_in_make_empty_except_is_ignored() {
    let dummy = stub()
        .make_empty_except("DummyClass", "noSuchMethod", overrides! {}, None)
        .unwrap();
    assert!(dummy.call("helloWorld", &[]).unwrap().is_null());
}
