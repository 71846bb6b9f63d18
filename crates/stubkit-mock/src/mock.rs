use crate::assertions::{InvocationCounter, InvocationRule, ParametersRule};
use crate::behavior::Behavior;
use crate::invocation::Invocation;
use crate::value::Value;
use crate::{MockError, Result};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use tracing::{debug, trace};

/// One `expects(..).method(..).with(..).will(..)` registration.
pub struct Matcher {
    method: String,
    counter: InvocationCounter,
    parameters: Option<ParametersRule>,
    behavior: Option<Rc<dyn Behavior>>,
}

impl Matcher {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn rule(&self) -> InvocationRule {
        self.counter.rule()
    }

    pub fn invocation_count(&self) -> usize {
        self.counter.count()
    }

    fn matches(&self, invocation: &Invocation) -> bool {
        self.method == invocation.method
    }

    fn record(&self, invocation: &Invocation) -> Result<()> {
        self.counter.invoked(invocation)?;
        if let Some(parameters) = &self.parameters {
            parameters.apply(invocation)?;
        }
        Ok(())
    }

    fn verify(&self, class_name: &str) -> Result<()> {
        self.counter
            .verify(&format!("{}::{}", class_name, self.method))
    }
}

#[derive(Clone, Debug)]
pub struct CallLogEntry {
    pub method: String,
    pub args_count: usize,
    /// Whether a matcher supplied the return value.
    pub stubbed: bool,
}

/// Per-proxy dispatch state: which methods are intercepted, the matchers
/// installed on them and a log of intercepted calls.
pub struct InvocationHandler {
    class_name: String,
    intercepted: BTreeSet<String>,
    matchers: RefCell<Vec<Rc<Matcher>>>,
    calls: RefCell<Vec<CallLogEntry>>,
}

impl InvocationHandler {
    pub fn new(class_name: impl Into<String>, intercepted: BTreeSet<String>) -> Self {
        Self {
            class_name: class_name.into(),
            intercepted,
            matchers: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Name of the class the proxy stands in for.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn intercepts(&self, method: &str) -> bool {
        self.intercepted.contains(method)
    }

    pub fn intercepted_methods(&self) -> Vec<String> {
        self.intercepted.iter().cloned().collect()
    }

    pub fn add_matcher(&self, matcher: Matcher) -> Result<()> {
        if !self.intercepts(&matcher.method) {
            return Err(MockError::MethodNotConfigurable {
                class: self.class_name.clone(),
                method: matcher.method,
            });
        }
        debug!(
            class = %self.class_name,
            method = %matcher.method,
            rule = %matcher.rule(),
            "Installed matcher"
        );
        self.matchers.borrow_mut().push(Rc::new(matcher));
        Ok(())
    }

    /// Dispatches an intercepted call.
    ///
    /// Every matcher registered for the method counts the call and checks its
    /// parameter rule; the most recently installed matcher with a behavior
    /// supplies the return value. Without one the call returns null.
    pub fn invoke(&self, invocation: &Invocation) -> Result<Value> {
        // Behaviors may call back into this mock, so no borrow is held.
        let matchers: Vec<Rc<Matcher>> = self
            .matchers
            .borrow()
            .iter()
            .filter(|m| m.matches(invocation))
            .cloned()
            .collect();

        let mut failure = None;
        for matcher in &matchers {
            if let Err(e) = matcher.record(invocation) {
                failure.get_or_insert(e);
            }
        }

        let behavior = matchers.iter().rev().find_map(|m| m.behavior.clone());
        self.calls.borrow_mut().push(CallLogEntry {
            method: invocation.method.clone(),
            args_count: invocation.args.len(),
            stubbed: behavior.is_some(),
        });
        trace!(invocation = %invocation, "Intercepted call");

        if let Some(e) = failure {
            return Err(e);
        }
        match behavior {
            Some(behavior) => behavior.invoke(invocation),
            None => Ok(Value::Null),
        }
    }

    /// Deferred verification of every matcher, failing on the first unmet
    /// expectation.
    pub fn verify(&self) -> Result<()> {
        for matcher in self.matchers.borrow().iter() {
            matcher.verify(&self.class_name)?;
        }
        Ok(())
    }

    /// True if any installed matcher carries a count expectation.
    pub fn has_expectations(&self) -> bool {
        self.matchers
            .borrow()
            .iter()
            .any(|m| m.rule().is_expectation())
    }

    pub fn matcher_count(&self) -> usize {
        self.matchers.borrow().len()
    }

    pub fn calls(&self) -> Vec<CallLogEntry> {
        self.calls.borrow().clone()
    }

    /// Copy for a duplicated proxy. Matchers are shared with the original;
    /// the call log starts empty.
    pub(crate) fn duplicate(&self) -> Self {
        Self {
            class_name: self.class_name.clone(),
            intercepted: self.intercepted.clone(),
            matchers: RefCell::new(self.matchers.borrow().clone()),
            calls: RefCell::new(Vec::new()),
        }
    }
}

/// Builder returned by [`crate::Instance::expects`].
pub struct MatcherBuilder {
    handler: Rc<InvocationHandler>,
    method: String,
    rule: InvocationRule,
    parameters: Option<ParametersRule>,
}

impl MatcherBuilder {
    pub(crate) fn new(handler: Rc<InvocationHandler>, method: String, rule: InvocationRule) -> Self {
        Self {
            handler,
            method,
            rule,
            parameters: None,
        }
    }

    pub fn with(mut self, args: Vec<Value>) -> Self {
        self.parameters = Some(ParametersRule::new(args));
        self
    }

    pub fn will(self, behavior: Rc<dyn Behavior>) -> Result<()> {
        self.finish(Some(behavior))
    }

    /// Installs the matcher without a behavior; matched calls return null.
    pub fn install(self) -> Result<()> {
        self.finish(None)
    }

    fn finish(self, behavior: Option<Rc<dyn Behavior>>) -> Result<()> {
        self.handler.add_matcher(Matcher {
            method: self.method,
            counter: InvocationCounter::new(self.rule),
            parameters: self.parameters,
            behavior,
        })
    }
}
