use crate::invocation::Invocation;
use crate::value::Value;
use crate::{MockError, Result};
use std::fmt;
use std::rc::Rc;

/// What a stubbed method does when it is invoked.
pub trait Behavior {
    fn invoke(&self, invocation: &Invocation) -> Result<Value>;

    fn describe(&self) -> String;
}

/// Shareable closure over call arguments.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(&[Value]) -> Result<Value>>);

impl Callback {
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&[Value]) -> R + 'static,
        R: Into<Value>,
    {
        Self(Rc::new(move |args| Ok(f(args).into())))
    }

    /// Callback that may fail, e.g. to simulate a thrown exception.
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + 'static,
    {
        Self(Rc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.0)(args)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

pub struct ReturnValue(pub Value);

impl Behavior for ReturnValue {
    fn invoke(&self, _invocation: &Invocation) -> Result<Value> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        format!("return user-specified value {}", self.0.export())
    }
}

pub struct ReturnCallback(pub Callback);

impl Behavior for ReturnCallback {
    fn invoke(&self, invocation: &Invocation) -> Result<Value> {
        self.0.call(&invocation.args)
    }

    fn describe(&self) -> String {
        "return result of user defined callback".to_string()
    }
}

/// Returns the object the method was invoked on, for fluent interfaces.
pub struct ReturnSelf;

impl Behavior for ReturnSelf {
    fn invoke(&self, invocation: &Invocation) -> Result<Value> {
        Ok(Value::Object(invocation.object.clone()))
    }

    fn describe(&self) -> String {
        "return the current object".to_string()
    }
}

/// Returns the call argument at the given position, or null when the call had
/// fewer arguments.
pub struct ReturnArgument(pub usize);

impl Behavior for ReturnArgument {
    fn invoke(&self, invocation: &Invocation) -> Result<Value> {
        Ok(invocation.args.get(self.0).cloned().unwrap_or_default())
    }

    fn describe(&self) -> String {
        format!("return argument #{}", self.0)
    }
}

pub struct ThrowError(pub String);

impl Behavior for ThrowError {
    fn invoke(&self, _invocation: &Invocation) -> Result<Value> {
        Err(MockError::Thrown(self.0.clone()))
    }

    fn describe(&self) -> String {
        format!("raise user-specified error {:?}", self.0)
    }
}
