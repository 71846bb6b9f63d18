use crate::object::Instance;
use crate::value::Value;
use crate::Result;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

/// Native method body. Receives the object the method was called on and the
/// call arguments.
pub type MethodBody = Rc<dyn Fn(&Instance, &[Value]) -> Result<Value>>;

/// Native constructor body, run against a freshly allocated object.
pub type ConstructorBody = Rc<dyn Fn(&Instance, &[Value]) -> Result<()>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassKind {
    Concrete,
    Abstract,
    Interface,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

#[derive(Clone)]
pub struct MethodDef {
    pub name: String,
    /// `None` for abstract and interface methods.
    pub body: Option<MethodBody>,
}

impl MethodDef {
    pub fn is_abstract(&self) -> bool {
        self.body.is_none()
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("abstract", &self.is_abstract())
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct PropertyDef {
    pub name: String,
    pub visibility: Visibility,
    pub default: Value,
}

/// Reflection view of a class: declared methods and properties, its parent
/// and implemented interfaces.
pub struct ClassDef {
    pub(crate) name: String,
    pub(crate) kind: ClassKind,
    pub(crate) parent: Option<Rc<ClassDef>>,
    pub(crate) interfaces: Vec<Rc<ClassDef>>,
    pub(crate) methods: Vec<MethodDef>,
    pub(crate) properties: Vec<PropertyDef>,
    pub(crate) constructor: Option<ConstructorBody>,
    pub(crate) dynamic_properties: bool,
    pub(crate) proxy: bool,
}

impl ClassDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    pub fn is_abstract(&self) -> bool {
        self.kind == ClassKind::Abstract
    }

    /// True for classes synthesized by a proxy generator.
    pub fn is_proxy(&self) -> bool {
        self.proxy
    }

    pub fn parent(&self) -> Option<&Rc<ClassDef>> {
        self.parent.as_ref()
    }

    pub fn interfaces(&self) -> &[Rc<ClassDef>] {
        &self.interfaces
    }

    /// Whether writes to undeclared properties are stored (true) or dropped.
    pub fn allows_dynamic_properties(&self) -> bool {
        self.dynamic_properties
    }

    /// Method lookup: own declarations, then the parent chain, then interfaces.
    pub fn find_method(&self, name: &str) -> Option<&MethodDef> {
        if let Some(method) = self.methods.iter().find(|m| m.name == name) {
            return Some(method);
        }
        if let Some(method) = self.parent.as_ref().and_then(|p| p.find_method(name)) {
            return Some(method);
        }
        self.interfaces.iter().find_map(|i| i.find_method(name))
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.find_method(name).is_some()
    }

    /// Every method visible on the class, own declarations first, each name
    /// listed once.
    pub fn method_names(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut names = Vec::new();
        self.collect_method_names(&mut seen, &mut names);
        names
    }

    fn collect_method_names(&self, seen: &mut BTreeSet<String>, names: &mut Vec<String>) {
        for method in &self.methods {
            if seen.insert(method.name.clone()) {
                names.push(method.name.clone());
            }
        }
        if let Some(parent) = &self.parent {
            parent.collect_method_names(seen, names);
        }
        for iface in &self.interfaces {
            iface.collect_method_names(seen, names);
        }
    }

    /// Methods that resolve to a declaration without a body.
    pub fn abstract_method_names(&self) -> Vec<String> {
        self.method_names()
            .into_iter()
            .filter(|name| self.find_method(name).is_some_and(MethodDef::is_abstract))
            .collect()
    }

    pub fn find_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .or_else(|| self.parent.as_ref().and_then(|p| p.find_property(name)))
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.find_property(name).is_some()
    }

    /// Declared properties with their default values, parents first so that a
    /// child redeclaration wins.
    pub fn property_defaults(&self) -> Vec<(String, Value)> {
        let mut defaults = self
            .parent
            .as_ref()
            .map(|p| p.property_defaults())
            .unwrap_or_default();
        for prop in &self.properties {
            match defaults.iter_mut().find(|(name, _)| *name == prop.name) {
                Some(slot) => slot.1 = prop.default.clone(),
                None => defaults.push((prop.name.clone(), prop.default.clone())),
            }
        }
        defaults
    }

    /// Nearest constructor along the parent chain.
    pub fn constructor(&self) -> Option<&ConstructorBody> {
        self.constructor
            .as_ref()
            .or_else(|| self.parent.as_ref().and_then(|p| p.constructor()))
    }

    /// True if `name` is this class, one of its ancestors, or an interface
    /// any of them implements.
    pub fn is_a(&self, name: &str) -> bool {
        self.name == name
            || self.parent.as_ref().is_some_and(|p| p.is_a(name))
            || self.interfaces.iter().any(|i| i.is_a(name))
    }

    /// Synthesizes a proxy subclass of `parent` named `proxy_name`.
    pub(crate) fn proxy_of(parent: &Rc<ClassDef>, proxy_name: String) -> ClassDef {
        ClassDef {
            name: proxy_name,
            kind: ClassKind::Concrete,
            parent: Some(Rc::clone(parent)),
            interfaces: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            constructor: None,
            dynamic_properties: parent.dynamic_properties,
            proxy: true,
        }
    }
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("parent", &self.parent.as_ref().map(|p| p.name.clone()))
            .field("methods", &self.methods)
            .field("properties", &self.properties)
            .finish()
    }
}

/// Name-indexed table of known classes.
#[derive(Default)]
pub struct ClassRegistry {
    classes: HashMap<String, Rc<ClassDef>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class, replacing any previous class of the same name.
    pub fn register(&mut self, class: Rc<ClassDef>) -> Rc<ClassDef> {
        self.classes
            .insert(class.name.clone(), Rc::clone(&class));
        class
    }

    pub fn get(&self, name: &str) -> Option<Rc<ClassDef>> {
        self.classes.get(name).cloned()
    }

    /// True for registered concrete or abstract classes.
    pub fn class_exists(&self, name: &str) -> bool {
        self.classes.get(name).is_some_and(|c| !c.is_interface())
    }

    pub fn interface_exists(&self, name: &str) -> bool {
        self.classes.get(name).is_some_and(|c| c.is_interface())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
