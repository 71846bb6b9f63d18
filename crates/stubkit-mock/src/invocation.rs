use crate::object::Instance;
use crate::value::Value;
use std::fmt;

/// A single call on a mock object, as seen by invocation rules and behaviors.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub object: Instance,
    /// Name of the class the proxy was generated for.
    pub class_name: String,
    pub method: String,
    pub args: Vec<Value>,
}

impl Invocation {
    pub fn new(object: Instance, class_name: impl Into<String>, method: impl Into<String>, args: &[Value]) -> Self {
        Self {
            object,
            class_name: class_name.into(),
            method: method.into(),
            args: args.to_vec(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.args.iter().map(Value::export).collect();
        write!(f, "{}::{}({})", self.class_name, self.method, args.join(", "))
    }
}
