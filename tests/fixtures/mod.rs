//! Test fixture classes shared by the integration and property suites
//!
//! This module provides a registry with a handful of classes whose real
//! behavior is easy to tell apart from a stubbed one.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use stubkit::mock::{ClassBuilder, ClassRegistry, MockError, Value, Visibility};
use stubkit::Stub;

thread_local! {
    /// Side effects recorded by fixture constructors, e.g. `Account opened`.
    static EVENTS: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

/// Record a constructor side effect
pub fn record_event(event: impl Into<String>) {
    EVENTS.with(|events| events.borrow_mut().push(event.into()));
}

/// Drain the recorded side effects of the current test thread
pub fn take_events() -> Vec<String> {
    EVENTS.with(|events| std::mem::take(&mut *events.borrow_mut()))
}

/// Build the fixture registry
///
/// # Classes
/// * `DummyClass` - constructor stores `constructed: {arg}` in `checkMe`
/// * `DummyOverloadableClass` - routes unknown properties through `__get`/`__set`
/// * `Account` - balance held in a private field, opening logged by the constructor
/// * `Shape` - abstract class with one abstract method
/// * `Repository` - interface
/// * `StrictConfig` - `__set` rejects every name
/// * `Sealed` - discards dynamic properties
pub fn registry() -> ClassRegistry {
    let mut registry = ClassRegistry::new();

    registry.register(
        ClassBuilder::new("DummyClass")
            .property("checkMe", Visibility::Protected, 1)
            .property("properties", Visibility::Protected, vec![Value::from("checkMe")])
            .constructor(|this, args| {
                let arg = match args.first() {
                    Some(Value::Str(s)) => s.clone(),
                    Some(other) => other.export(),
                    None => String::new(),
                };
                this.force_property("checkMe", Value::from(format!("constructed: {}", arg)))
            })
            .method("helloWorld", |_, _| Ok(Value::from("hello world")))
            .method("goodByeWorld", |_, _| Ok(Value::from("good bye")))
            .method("getCheckMe", |this, _| Ok(this.property("checkMe").unwrap_or_default()))
            .method("setCheckMe", |this, args| {
                this.force_property("checkMe", args.first().cloned().unwrap_or_default())?;
                Ok(Value::Null)
            })
            .method("exceptionalMethod", |_, _| {
                Err(MockError::Thrown("Catch it!".to_string()))
            })
            .method("call", |this, _| {
                this.call("targetMethod", &[])?;
                Ok(Value::from(true))
            })
            .method("targetMethod", |_, _| Ok(Value::from(true)))
            .build(),
    );

    registry.register(
        ClassBuilder::new("DummyOverloadableClass")
            .property("checkMe", Visibility::Protected, 1)
            .property("checkMeToo", Visibility::Public, 1)
            .property("data", Visibility::Private, Value::List(Vec::new()))
            .method("helloWorld", |_, _| Ok(Value::from("hello world")))
            .method("getCheckMe", |this, _| Ok(this.property("checkMe").unwrap_or_default()))
            .method("__get", |this, args| {
                let name = args.first().and_then(Value::as_str).unwrap_or_default();
                Ok(this.get_data(name))
            })
            .method("__set", |this, args| {
                let name = args.first().and_then(Value::as_str).unwrap_or_default();
                let value = args.get(1).cloned().unwrap_or_default();
                this.put_data(name, value)
            })
            .method("__isset", |this, args| {
                let name = args.first().and_then(Value::as_str).unwrap_or_default();
                Ok(Value::from(!this.get_data(name).is_null()))
            })
            .build(),
    );

    registry.register(
        ClassBuilder::new("Account")
            .property("ownerName", Visibility::Public, Value::Null)
            .property("balance", Visibility::Private, 0)
            .constructor(|this, args| {
                let owner = args.first().cloned().unwrap_or_default();
                record_event(format!("Account opened for {}", owner.export()));
                this.force_property("ownerName", owner)?;
                this.force_property("balance", args.get(1).cloned().unwrap_or(Value::from(0)))
            })
            .method("balance", |this, _| Ok(this.property("balance").unwrap_or_default()))
            .method("deposit", |this, args| {
                let current = this.property("balance").and_then(|v| v.as_int()).unwrap_or(0);
                let amount = args.first().and_then(Value::as_int).unwrap_or(0);
                this.force_property("balance", Value::from(current + amount))?;
                Ok(Value::from(current + amount))
            })
            .build(),
    );

    registry.register(
        ClassBuilder::abstract_class("Shape")
            .property("label", Visibility::Public, "shape")
            .abstract_method("area")
            .method("describe", |this, _| {
                let area = this.call("area", &[])?;
                Ok(Value::from(format!("{} with area {}", this.get("label")?.export(), area.export())))
            })
            .build(),
    );

    registry.register(
        ClassBuilder::interface("Repository")
            .abstract_method("find")
            .abstract_method("save")
            .build(),
    );

    registry.register(
        ClassBuilder::new("StrictConfig")
            .property("debug", Visibility::Public, false)
            .method("__set", |_, args| {
                let name = args.first().map(Value::export).unwrap_or_default();
                Err(MockError::Thrown(format!("Unknown option {}", name)))
            })
            .build(),
    );

    registry.register(
        ClassBuilder::new("Sealed")
            .method("ping", |_, _| Ok(Value::from("pong")))
            .forbid_dynamic_properties()
            .build(),
    );

    registry
}

/// Stub over the fixture registry
pub fn stub() -> Stub {
    Stub::new(Rc::new(registry()))
}

/// Private `data` bag used by the overloadable fixture, stored as a list of
/// `[name, value]` pairs.
trait DataBag {
    fn get_data(&self, name: &str) -> Value;
    fn put_data(&self, name: &str, value: Value) -> Result<Value, MockError>;
}

impl DataBag for stubkit::Instance {
    fn get_data(&self, name: &str) -> Value {
        let data = self.property("data").unwrap_or_default();
        data.as_list()
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_list)
            .find(|pair| pair.first().and_then(Value::as_str) == Some(name))
            .and_then(|pair| pair.get(1).cloned())
            .unwrap_or_default()
    }

    fn put_data(&self, name: &str, value: Value) -> Result<Value, MockError> {
        let data = self.property("data").unwrap_or_default();
        let mut pairs: Vec<Value> = data
            .as_list()
            .unwrap_or_default()
            .iter()
            .filter(|pair| {
                pair.as_list().and_then(|p| p.first()).and_then(Value::as_str) != Some(name)
            })
            .cloned()
            .collect();
        pairs.push(Value::List(vec![Value::from(name), value]));
        self.force_property("data", Value::List(pairs))?;
        Ok(Value::Null)
    }
}
