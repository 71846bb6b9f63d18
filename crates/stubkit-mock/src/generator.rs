use crate::class::ClassDef;
use crate::mock::InvocationHandler;
use crate::object::Instance;
use crate::value::Value;
use crate::{MockError, Result};
use std::collections::BTreeSet;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::debug;

static NEXT_PROXY_SUFFIX: AtomicU32 = AtomicU32::new(0x1a2b_3c4d);

/// Whether the generated proxy runs its constructor.
#[derive(Clone, Debug, PartialEq)]
pub enum Construction {
    Skip,
    Run(Vec<Value>),
}

/// Produces instances of a class whose methods can be intercepted one by one.
pub trait ProxyGenerator {
    /// `methods` lists the methods to intercept. `None` means the generator's
    /// default, which intercepts only methods without a body. Abstract methods
    /// are intercepted either way.
    fn generate(
        &self,
        class: &Rc<ClassDef>,
        methods: Option<&[String]>,
        construction: Construction,
    ) -> Result<Instance>;
}

/// Default generator: synthesizes a `Mock_<Class>_<hex>` subclass per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockGenerator;

impl MockGenerator {
    pub fn new() -> Self {
        Self
    }

    fn proxy_name(class: &ClassDef) -> String {
        let suffix = NEXT_PROXY_SUFFIX.fetch_add(1, Ordering::Relaxed);
        format!("Mock_{}_{:08x}", class.name(), suffix)
    }
}

impl ProxyGenerator for MockGenerator {
    fn generate(
        &self,
        class: &Rc<ClassDef>,
        methods: Option<&[String]>,
        construction: Construction,
    ) -> Result<Instance> {
        let mut intercepted: BTreeSet<String> = class.abstract_method_names().into_iter().collect();
        for method in methods.unwrap_or_default() {
            if !class.has_method(method) {
                return Err(MockError::UndefinedMethod {
                    class: class.name().to_string(),
                    method: method.clone(),
                });
            }
            intercepted.insert(method.clone());
        }

        let proxy_class = Rc::new(ClassDef::proxy_of(class, Self::proxy_name(class)));
        debug!(
            class = class.name(),
            proxy = proxy_class.name(),
            intercepted = intercepted.len(),
            "Generated proxy class"
        );

        let handler = InvocationHandler::new(class.name(), intercepted);
        let instance = Instance::proxy(&proxy_class, handler);
        if let Construction::Run(args) = construction {
            instance.construct(&args)?;
        }
        Ok(instance)
    }
}
