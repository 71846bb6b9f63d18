use crate::class::{ClassDef, ClassKind, ConstructorBody, MethodBody, MethodDef, PropertyDef, Visibility};
use crate::object::Instance;
use crate::value::Value;
use crate::Result;
use std::rc::Rc;

/// Fluent builder for [`ClassDef`].
///
/// ```
/// use stubkit_mock::{ClassBuilder, Value, Visibility};
///
/// let account = ClassBuilder::new("Account")
///     .property("ownerName", Visibility::Public, Value::Null)
///     .property("stored", Visibility::Private, 0)
///     .method("balance", |this, _| Ok(this.property("stored").unwrap_or_default()))
///     .build();
/// assert!(account.has_method("balance"));
/// ```
pub struct ClassBuilder {
    name: String,
    kind: ClassKind,
    parent: Option<Rc<ClassDef>>,
    interfaces: Vec<Rc<ClassDef>>,
    methods: Vec<MethodDef>,
    properties: Vec<PropertyDef>,
    constructor: Option<ConstructorBody>,
    dynamic_properties: bool,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Concrete)
    }

    pub fn abstract_class(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Abstract)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Interface)
    }

    fn with_kind(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            constructor: None,
            dynamic_properties: true,
        }
    }

    pub fn extends(mut self, parent: &Rc<ClassDef>) -> Self {
        self.parent = Some(Rc::clone(parent));
        self
    }

    pub fn implements(mut self, iface: &Rc<ClassDef>) -> Self {
        self.interfaces.push(Rc::clone(iface));
        self
    }

    pub fn property(
        mut self,
        name: impl Into<String>,
        visibility: Visibility,
        default: impl Into<Value>,
    ) -> Self {
        self.properties.push(PropertyDef {
            name: name.into(),
            visibility,
            default: default.into(),
        });
        self
    }

    /// Declares a method. Redeclaring a name replaces the earlier body.
    pub fn method<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Instance, &[Value]) -> Result<Value> + 'static,
    {
        let body: MethodBody = Rc::new(body);
        self.push_method(name.into(), Some(body));
        self
    }

    pub fn abstract_method(mut self, name: impl Into<String>) -> Self {
        self.push_method(name.into(), None);
        self
    }

    pub fn constructor<F>(mut self, body: F) -> Self
    where
        F: Fn(&Instance, &[Value]) -> Result<()> + 'static,
    {
        self.constructor = Some(Rc::new(body));
        self
    }

    /// Undeclared property writes on instances of this class are discarded
    /// instead of stored.
    pub fn forbid_dynamic_properties(mut self) -> Self {
        self.dynamic_properties = false;
        self
    }

    fn push_method(&mut self, name: String, body: Option<MethodBody>) {
        match self.methods.iter_mut().find(|m| m.name == name) {
            Some(existing) => existing.body = body,
            None => self.methods.push(MethodDef { name, body }),
        }
    }

    pub fn build(self) -> Rc<ClassDef> {
        // Interface members never carry bodies.
        let methods = if self.kind == ClassKind::Interface {
            self.methods
                .into_iter()
                .map(|m| MethodDef {
                    name: m.name,
                    body: None,
                })
                .collect()
        } else {
            self.methods
        };

        Rc::new(ClassDef {
            name: self.name,
            kind: self.kind,
            parent: self.parent,
            interfaces: self.interfaces,
            methods,
            properties: self.properties,
            constructor: self.constructor,
            dynamic_properties: self.dynamic_properties,
            proxy: false,
        })
    }
}
