use crate::assertions::InvocationRule;
use crate::class::{ClassDef, Visibility};
use crate::invocation::Invocation;
use crate::mock::{CallLogEntry, InvocationHandler, MatcherBuilder};
use crate::storage::PropertyStore;
use crate::value::Value;
use crate::{MockError, Result};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

struct ObjectData {
    id: u64,
    class: Rc<ClassDef>,
    store: PropertyStore,
    handler: Option<Rc<InvocationHandler>>,
}

/// Shared handle to an object. Cloning the handle aliases the object; use
/// [`Instance::duplicate`] for a copy.
#[derive(Clone)]
pub struct Instance(Rc<RefCell<ObjectData>>);

impl Instance {
    fn alloc(class: &Rc<ClassDef>, handler: Option<Rc<InvocationHandler>>) -> Self {
        Self(Rc::new(RefCell::new(ObjectData {
            id: NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed),
            class: Rc::clone(class),
            store: PropertyStore::from_defaults(class.property_defaults()),
            handler,
        })))
    }

    /// Creates an object and runs the nearest constructor with `args`.
    pub fn new(class: &Rc<ClassDef>, args: &[Value]) -> Result<Self> {
        let obj = Self::without_constructor(class)?;
        obj.construct(args)?;
        Ok(obj)
    }

    /// Creates an object with declared properties at their defaults and no
    /// constructor run.
    pub fn without_constructor(class: &Rc<ClassDef>) -> Result<Self> {
        if class.is_interface() || class.is_abstract() {
            return Err(MockError::NotInstantiable(class.name().to_string()));
        }
        Ok(Self::alloc(class, None))
    }

    /// Allocates an object of a generated proxy class. The handler decides
    /// which calls are intercepted.
    pub(crate) fn proxy(class: &Rc<ClassDef>, handler: InvocationHandler) -> Self {
        Self::alloc(class, Some(Rc::new(handler)))
    }

    pub(crate) fn construct(&self, args: &[Value]) -> Result<()> {
        let constructor = self.class().constructor().cloned();
        match constructor {
            Some(body) => body(self, args),
            None => Ok(()),
        }
    }

    pub fn id(&self) -> u64 {
        self.0.borrow().id
    }

    pub fn class(&self) -> Rc<ClassDef> {
        Rc::clone(&self.0.borrow().class)
    }

    pub fn class_name(&self) -> String {
        self.0.borrow().class.name().to_string()
    }

    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_mock(&self) -> bool {
        self.0.borrow().handler.is_some()
    }

    fn handler(&self) -> Option<Rc<InvocationHandler>> {
        self.0.borrow().handler.clone()
    }

    /// Calls a method. Intercepted methods of a proxy dispatch to its
    /// matchers; anything else runs the declared body.
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        if let Some(handler) = self.handler() {
            if handler.intercepts(method) {
                let invocation =
                    Invocation::new(self.clone(), handler.class_name(), method, args);
                return handler.invoke(&invocation);
            }
        }

        let class = self.class();
        let body = match class.find_method(method) {
            Some(def) => def.body.clone().ok_or_else(|| MockError::AbstractMethodCall {
                class: class.name().to_string(),
                method: method.to_string(),
            })?,
            None => {
                return Err(MockError::UndefinedMethod {
                    class: class.name().to_string(),
                    method: method.to_string(),
                })
            }
        };
        body(self, args)
    }

    /// Starts a matcher registration on an intercepted method of a proxy.
    pub fn expects(&self, rule: InvocationRule, method: &str) -> Result<MatcherBuilder> {
        let handler = self.handler().ok_or_else(|| MockError::NotAMock {
            class: self.class_name(),
            method: method.to_string(),
        })?;
        if !handler.intercepts(method) {
            return Err(MockError::MethodNotConfigurable {
                class: handler.class_name().to_string(),
                method: method.to_string(),
            });
        }
        Ok(MatcherBuilder::new(handler, method.to_string(), rule))
    }

    /// Runs deferred verification of every installed matcher. Plain objects
    /// have nothing to verify.
    pub fn verify(&self) -> Result<()> {
        match self.handler() {
            Some(handler) => handler.verify(),
            None => Ok(()),
        }
    }

    pub fn has_expectations(&self) -> bool {
        self.handler().is_some_and(|h| h.has_expectations())
    }

    pub fn intercepted_methods(&self) -> Vec<String> {
        self.handler()
            .map(|h| h.intercepted_methods())
            .unwrap_or_default()
    }

    /// Log of intercepted calls made on this proxy.
    pub fn calls(&self) -> Vec<CallLogEntry> {
        self.handler().map(|h| h.calls()).unwrap_or_default()
    }

    /// Reflective read, ignoring visibility. Falls back to dynamic properties.
    pub fn property(&self, name: &str) -> Option<Value> {
        self.0.borrow().store.get(name).cloned()
    }

    /// Reflective write of a declared property, ignoring visibility.
    pub fn force_property(&self, name: &str, value: Value) -> Result<()> {
        let class = self.class();
        if !class.has_property(name) {
            return Err(MockError::UndefinedProperty {
                class: class.name().to_string(),
                property: name.to_string(),
            });
        }
        self.0.borrow_mut().store.set_declared(name, value);
        Ok(())
    }

    /// Public read: declared public properties, then dynamic properties, then
    /// a `__get` interceptor.
    pub fn get(&self, name: &str) -> Result<Value> {
        let class = self.class();
        if let Some(def) = class.find_property(name) {
            if def.visibility == Visibility::Public {
                return Ok(self.property(name).unwrap_or_default());
            }
            if !class.has_method("__get") {
                return Err(MockError::InaccessibleProperty {
                    class: class.name().to_string(),
                    property: name.to_string(),
                    visibility: def.visibility,
                });
            }
        } else if let Some(value) = self.0.borrow().store.get_dynamic(name) {
            return Ok(value.clone());
        }

        if class.has_method("__get") {
            return self.call("__get", &[Value::from(name)]);
        }
        Err(MockError::UndefinedProperty {
            class: class.name().to_string(),
            property: name.to_string(),
        })
    }

    /// Public write: declared public properties are assigned, anything else
    /// goes through a `__set` interceptor when the class has one. Without an
    /// interceptor undeclared names land in the dynamic side-table, or are
    /// dropped if the class forbids dynamic properties.
    pub fn set(&self, name: &str, value: Value) -> Result<()> {
        let class = self.class();
        let declared = class.find_property(name).map(|def| def.visibility);

        if declared == Some(Visibility::Public) {
            self.0.borrow_mut().store.set_declared(name, value);
            return Ok(());
        }
        if class.has_method("__set") {
            self.call("__set", &[Value::from(name), value])?;
            return Ok(());
        }
        if let Some(visibility) = declared {
            return Err(MockError::InaccessibleProperty {
                class: class.name().to_string(),
                property: name.to_string(),
                visibility,
            });
        }
        if !class.allows_dynamic_properties() {
            warn!(
                class = class.name(),
                property = name,
                "Dynamic property write discarded"
            );
            return Ok(());
        }
        self.0.borrow_mut().store.set_dynamic(name, value);
        Ok(())
    }

    pub fn dynamic_properties(&self) -> Vec<String> {
        self.0.borrow().store.dynamic_names()
    }

    /// Shallow copy: property values are cloned, objects they reference are
    /// shared. A duplicated proxy keeps its interception set and matchers.
    pub fn duplicate(&self) -> Instance {
        let data = self.0.borrow();
        Self(Rc::new(RefCell::new(ObjectData {
            id: NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed),
            class: Rc::clone(&data.class),
            store: data.store.clone(),
            handler: data.handler.as_ref().map(|h| Rc::new(h.duplicate())),
        })))
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(data) => write!(f, "{} Object #{}", data.class.name(), data.id),
            Err(_) => f.write_str("<borrowed object>"),
        }
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}
