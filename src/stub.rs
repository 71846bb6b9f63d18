use crate::binder::ParameterBinder;
use crate::config::Config;
use crate::consecutive::ConsecutiveMap;
use crate::filter::MethodFilter;
use crate::logging;
use crate::overrides::{OverrideMap, Reply};
use crate::resolver::ClassRef;
use crate::scenario::Scenario;
use crate::{Result, StubError};
use std::rc::Rc;
use stubkit_mock::{ClassDef, ClassRegistry, Construction, Instance, MockGenerator, ProxyGenerator, Value};

/// Entry points for building stubs of registered classes.
///
/// Every constructor takes an optional [`Scenario`]; a mock registered with
/// one has its deferred expectations verified when the scenario ends.
/// Without it, only calls beyond an upper bound are caught.
///
/// ```
/// use std::rc::Rc;
/// use stubkit::{overrides, Stub};
/// use stubkit::mock::{ClassBuilder, ClassRegistry, Value, Visibility};
///
/// let mut registry = ClassRegistry::new();
/// registry.register(
///     ClassBuilder::new("User")
///         .property("name", Visibility::Private, Value::Null)
///         .method("save", |_, _| Ok(Value::from(true)))
///         .build(),
/// );
///
/// let stub = Stub::new(Rc::new(registry));
/// let user = stub.make("User", overrides! { "name" => "davert", "save" => false }, None).unwrap();
/// assert_eq!(user.call("save", &[]).unwrap(), Value::from(false));
/// assert_eq!(user.property("name"), Some(Value::from("davert")));
/// ```
#[derive(Clone)]
pub struct Stub {
    registry: Rc<ClassRegistry>,
    generator: Rc<dyn ProxyGenerator>,
    config: Config,
    filter: MethodFilter,
}

impl Stub {
    pub fn new(registry: Rc<ClassRegistry>) -> Self {
        Self::with_config(registry, Config::default())
    }

    pub fn with_config(registry: Rc<ClassRegistry>, config: Config) -> Self {
        Self {
            registry,
            generator: Rc::new(MockGenerator::new()),
            filter: MethodFilter::from_config(&config.binding),
            config,
        }
    }

    /// Replaces the proxy generator.
    pub fn with_generator(mut self, generator: Rc<dyn ProxyGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Instantiates a class without running its constructor. Methods named in
    /// `overrides` are replaced; everything else keeps its implementation.
    /// Abstract methods are always replaced.
    pub fn make(
        &self,
        class: impl Into<ClassRef>,
        overrides: OverrideMap,
        scenario: Option<&Scenario>,
    ) -> Result<Instance> {
        let class = self.resolve(class.into())?;
        if class.is_interface() {
            return Err(StubError::InterfaceNotStubbable(class.name().to_string()));
        }

        let methods = self.replaced_methods(&class, &overrides);
        let mock = self
            .generator
            .generate(&class, methods.as_deref(), Construction::Skip)?;
        self.finish("make", &class, mock, &overrides, scenario)
    }

    /// Creates `count` independent stubs through [`Stub::make`].
    pub fn factory(
        &self,
        class: impl Into<ClassRef>,
        count: usize,
        overrides: OverrideMap,
    ) -> Result<Vec<Instance>> {
        let class = class.into();
        (0..count)
            .map(|_| self.make(class.clone(), overrides.clone(), None))
            .collect()
    }

    /// Instantiates a class with every method replaced by a dummy returning
    /// null. Constructor is not run. Interfaces are accepted.
    pub fn make_empty(
        &self,
        class: impl Into<ClassRef>,
        overrides: OverrideMap,
        scenario: Option<&Scenario>,
    ) -> Result<Instance> {
        let class = self.resolve(class.into())?;
        let methods = self.filter.all_methods(&class);
        let mock = self
            .generator
            .generate(&class, Some(&methods), Construction::Skip)?;
        self.finish("make_empty", &class, mock, &overrides, scenario)
    }

    /// Like [`Stub::make_empty`], but `method` keeps its real implementation.
    pub fn make_empty_except(
        &self,
        class: impl Into<ClassRef>,
        method: &str,
        overrides: OverrideMap,
        scenario: Option<&Scenario>,
    ) -> Result<Instance> {
        let class = self.resolve(class.into())?;
        let methods = self.filter.all_methods_except(&class, method);
        let mock = self
            .generator
            .generate(&class, methods.as_deref(), Construction::Skip)?;
        self.finish("make_empty_except", &class, mock, &overrides, scenario)
    }

    /// Instantiates a class running its constructor with `constructor_args`.
    /// Methods named in `overrides` are replaced.
    pub fn construct(
        &self,
        class: impl Into<ClassRef>,
        constructor_args: Vec<Value>,
        overrides: OverrideMap,
        scenario: Option<&Scenario>,
    ) -> Result<Instance> {
        let class = self.resolve(class.into())?;
        let methods = self.replaced_methods(&class, &overrides);
        let mock = self.generator.generate(
            &class,
            methods.as_deref(),
            Construction::Run(constructor_args),
        )?;
        self.finish("construct", &class, mock, &overrides, scenario)
    }

    /// Runs the constructor with every method replaced by a dummy.
    pub fn construct_empty(
        &self,
        class: impl Into<ClassRef>,
        constructor_args: Vec<Value>,
        overrides: OverrideMap,
        scenario: Option<&Scenario>,
    ) -> Result<Instance> {
        let class = self.resolve(class.into())?;
        let methods = self.filter.all_methods(&class);
        let mock = self.generator.generate(
            &class,
            Some(&methods),
            Construction::Run(constructor_args),
        )?;
        self.finish("construct_empty", &class, mock, &overrides, scenario)
    }

    /// Runs the constructor with every method but `method` replaced.
    pub fn construct_empty_except(
        &self,
        class: impl Into<ClassRef>,
        method: &str,
        constructor_args: Vec<Value>,
        overrides: OverrideMap,
        scenario: Option<&Scenario>,
    ) -> Result<Instance> {
        let class = self.resolve(class.into())?;
        let methods = self.filter.all_methods_except(&class, method);
        let mock = self.generator.generate(
            &class,
            methods.as_deref(),
            Construction::Run(constructor_args),
        )?;
        self.finish("construct_empty_except", &class, mock, &overrides, scenario)
    }

    /// Shallow copy of `instance` with `overrides` applied to the copy only.
    pub fn copy(instance: &Instance, overrides: OverrideMap) -> Result<Instance> {
        let copy = instance.duplicate();
        logging::log_instance_copied(&instance.class_name(), instance.id(), copy.id());
        ParameterBinder::bind(&copy, &overrides)?;
        Ok(copy)
    }

    /// Applies more overrides to an existing stub. Earlier bindings stay in
    /// place; a method bound again answers with its newest binding.
    pub fn update(instance: &Instance, overrides: OverrideMap) -> Result<Instance> {
        ParameterBinder::bind(instance, &overrides)?;
        Ok(instance.clone())
    }

    /// See [`crate::consecutive()`].
    pub fn consecutive<I, R>(replies: I) -> ConsecutiveMap
    where
        I: IntoIterator<Item = R>,
        R: Into<Reply>,
    {
        ConsecutiveMap::new(replies)
    }

    fn resolve(&self, class: ClassRef) -> Result<Rc<ClassDef>> {
        let name = class.resolve();
        if let Some(def) = self.registry.get(&name) {
            return Ok(def);
        }
        // Instances carry their class even when it was never registered,
        // which is always the case for generated proxies.
        match class {
            ClassRef::Instance(obj) => Ok(obj.class()),
            _ => Err(StubError::ClassNotFound(name)),
        }
    }

    fn replaced_methods(&self, class: &ClassDef, overrides: &OverrideMap) -> Option<Vec<String>> {
        let methods: Vec<String> = self
            .filter
            .methods_to_replace(class, overrides)
            .into_iter()
            .map(|(name, _)| name.to_string())
            .collect();
        (!methods.is_empty()).then_some(methods)
    }

    fn finish(
        &self,
        entry: &str,
        class: &ClassDef,
        mock: Instance,
        overrides: &OverrideMap,
        scenario: Option<&Scenario>,
    ) -> Result<Instance> {
        ParameterBinder::bind(&mock, overrides)?;
        logging::log_stub_created(entry, class.name(), &mock.class_name(), overrides.len());
        if let Some(scenario) = scenario {
            scenario.register(&mock);
        }
        Ok(mock)
    }
}
