use crate::logging;
use crate::overrides::{Override, OverrideMap};
use crate::{Result, StubError};
use std::rc::Rc;
use stubkit_mock::{ClassDef, Instance, InvocationRule, ReturnCallback, ReturnValue, Value};

/// How a single override was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindOutcome {
    /// A matcher was installed on an intercepted method.
    Method,
    /// A declared property was written, regardless of visibility.
    Property,
    /// The value went through the object's public write path.
    Dynamic,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub outcome: BindOutcome,
}

/// Applies an [`OverrideMap`] to an object in place.
pub struct ParameterBinder;

impl ParameterBinder {
    /// Binds every override in order. The first failure aborts the walk;
    /// overrides before it stay applied.
    pub fn bind(instance: &Instance, overrides: &OverrideMap) -> Result<Vec<Binding>> {
        let class = Self::reflection_class(instance);
        let mut bindings = Vec::with_capacity(overrides.len());

        for (name, value) in overrides.iter() {
            let outcome = if class.has_method(name) {
                Self::bind_method(instance, name, value)?;
                BindOutcome::Method
            } else if class.has_property(name) {
                let value = Self::plain_value(&class, name, value)?;
                instance.force_property(name, value)?;
                BindOutcome::Property
            } else {
                let value = Self::plain_value(&class, name, value)?;
                Self::bind_dynamic(instance, &class, name, value)?;
                BindOutcome::Dynamic
            };

            logging::log_override_bound(name, class.name(), outcome);
            bindings.push(Binding {
                name: name.to_string(),
                outcome,
            });
        }

        Ok(bindings)
    }

    /// Members are looked up on the stubbed class, not on a generated proxy.
    fn reflection_class(instance: &Instance) -> Rc<ClassDef> {
        let class = instance.class();
        if class.is_proxy() {
            if let Some(parent) = class.parent() {
                return Rc::clone(parent);
            }
        }
        class
    }

    fn bind_method(instance: &Instance, name: &str, value: &Override) -> Result<()> {
        match value {
            Override::Expected(expectation) => {
                let mut matcher = instance.expects(expectation.rule(), name)?;
                if let Some(args) = expectation.parameters() {
                    matcher = matcher.with(args.to_vec());
                }
                matcher.will(expectation.behavior())?;
            }
            Override::Callback(callback) => {
                instance
                    .expects(InvocationRule::Any, name)?
                    .will(Rc::new(ReturnCallback(callback.clone())))?;
            }
            Override::Sequence(map) => {
                instance
                    .expects(InvocationRule::Any, name)?
                    .will(Rc::new(map.fork()))?;
            }
            Override::Value(literal) => {
                instance
                    .expects(InvocationRule::Any, name)?
                    .will(Rc::new(ReturnValue(literal.clone())))?;
            }
        }
        Ok(())
    }

    fn bind_dynamic(instance: &Instance, class: &ClassDef, name: &str, value: Value) -> Result<()> {
        if !class.has_method("__set") {
            instance.set(name, value)?;
            return Ok(());
        }
        instance.set(name, value).map_err(|source| {
            logging::log_binding_failed(name, class.name());
            StubError::Binding {
                property: name.to_string(),
                class: class.name().to_string(),
                source,
            }
        })
    }

    fn plain_value(class: &ClassDef, name: &str, value: &Override) -> Result<Value> {
        value
            .as_value()
            .cloned()
            .ok_or_else(|| StubError::NotAValue {
                name: name.to_string(),
                class: class.name().to_string(),
                kind: value.kind(),
            })
    }
}
