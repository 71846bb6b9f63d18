use std::fmt;
use std::rc::Rc;
use stubkit_mock::{ClassDef, Instance};

/// Anything that identifies a class to stub.
#[derive(Clone)]
pub enum ClassRef {
    Name(String),
    Instance(Instance),
    /// Invoked with no arguments; produces the class name.
    Factory(Rc<dyn Fn() -> String>),
}

impl ClassRef {
    pub fn factory<F>(f: F) -> Self
    where
        F: Fn() -> String + 'static,
    {
        ClassRef::Factory(Rc::new(f))
    }

    /// Canonical class name. Instances report their runtime class, which for
    /// a generated proxy is the proxy class itself.
    pub fn resolve(&self) -> String {
        match self {
            ClassRef::Name(name) => name.clone(),
            ClassRef::Instance(obj) => obj.class_name(),
            ClassRef::Factory(f) => f(),
        }
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassRef::Name(name) => f.debug_tuple("Name").field(name).finish(),
            ClassRef::Instance(obj) => f.debug_tuple("Instance").field(obj).finish(),
            ClassRef::Factory(_) => f.write_str("Factory"),
        }
    }
}

impl From<&str> for ClassRef {
    fn from(name: &str) -> Self {
        ClassRef::Name(name.to_string())
    }
}

impl From<String> for ClassRef {
    fn from(name: String) -> Self {
        ClassRef::Name(name)
    }
}

impl From<Instance> for ClassRef {
    fn from(obj: Instance) -> Self {
        ClassRef::Instance(obj)
    }
}

impl From<&Instance> for ClassRef {
    fn from(obj: &Instance) -> Self {
        ClassRef::Instance(obj.clone())
    }
}

impl From<&Rc<ClassDef>> for ClassRef {
    fn from(class: &Rc<ClassDef>) -> Self {
        ClassRef::Name(class.name().to_string())
    }
}
