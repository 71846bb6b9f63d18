use crate::config::VerificationConfig;
use crate::logging;
use crate::overrides::OverrideMap;
use crate::resolver::ClassRef;
use crate::stub::Stub;
use crate::{Result, StubError};
use std::cell::{Cell, RefCell};
use stubkit_mock::{Instance, MockError, Value};

/// Outcome reported by the test that owns a [`Scenario`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScenarioStatus {
    Passed,
    Failed,
    Skipped,
}

/// Collects the mocks created during one test and verifies their deferred
/// expectations when the test ends.
///
/// Mocks created without a scenario only enforce upper bounds, since nothing
/// would ever check the lower ones.
pub struct Scenario {
    name: String,
    mocks: RefCell<Vec<Instance>>,
    verified: Cell<bool>,
    verify_on_drop: bool,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, &VerificationConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: &VerificationConfig) -> Self {
        Self {
            name: name.into(),
            mocks: RefCell::new(Vec::new()),
            verified: Cell::new(false),
            verify_on_drop: config.verify_on_drop,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a mock to the set verified by this scenario.
    pub fn register(&self, mock: &Instance) {
        logging::log_mock_registered(&self.name, &mock.class_name());
        self.mocks.borrow_mut().push(mock.clone());
    }

    pub fn mocks(&self) -> usize {
        self.mocks.borrow().len()
    }

    /// Number of registered mocks that carry a call-count expectation.
    pub fn assertion_count(&self) -> usize {
        self.mocks
            .borrow()
            .iter()
            .filter(|mock| mock.has_expectations())
            .count()
    }

    /// Verifies every registered mock, collecting all failures.
    pub fn verify(&self) -> Result<()> {
        self.verified.set(true);
        let mocks = self.mocks.borrow().clone();
        let failures: Vec<MockError> = mocks.iter().filter_map(|m| m.verify().err()).collect();
        logging::log_scenario_verified(&self.name, mocks.len(), failures.len());

        if failures.is_empty() {
            Ok(())
        } else {
            Err(StubError::Verification {
                scenario: self.name.clone(),
                failures,
            })
        }
    }

    /// Verifies and consumes the scenario.
    pub fn teardown(self) -> Result<()> {
        self.verify()
    }

    /// Ends the scenario. Expectations are only checked for passing tests;
    /// a failed or skipped test already has its verdict.
    pub fn finish(self, status: ScenarioStatus) -> Result<()> {
        match status {
            ScenarioStatus::Passed => self.verify(),
            ScenarioStatus::Failed | ScenarioStatus::Skipped => {
                self.verified.set(true);
                logging::log_verification_skipped(&self.name, self.mocks());
                Ok(())
            }
        }
    }
}

impl Drop for Scenario {
    fn drop(&mut self) {
        if !self.verify_on_drop || self.verified.get() || std::thread::panicking() {
            return;
        }
        if let Err(err) = self.verify() {
            panic!(
                "scenario \"{}\" was dropped without `teardown` or `finish`: {}",
                self.name, err
            );
        }
    }
}

/// Test-case helper bundling a [`Stub`] and a [`Scenario`]: every mock made
/// through it is registered for verification.
///
/// ```
/// use std::rc::Rc;
/// use stubkit::{expected, overrides, ScenarioStatus, Stub, TestCase};
/// use stubkit::mock::{ClassBuilder, ClassRegistry, Value};
///
/// let mut registry = ClassRegistry::new();
/// registry.register(
///     ClassBuilder::new("Mailer")
///         .method("send", |_, _| Ok(Value::from(true)))
///         .build(),
/// );
///
/// let test = TestCase::new("sends_once", Stub::new(Rc::new(registry)));
/// let mailer = test.make("Mailer", overrides! { "send" => expected::once(false) }).unwrap();
/// assert_eq!(mailer.call("send", &[]).unwrap(), Value::from(false));
/// test.finish(ScenarioStatus::Passed).unwrap();
/// ```
pub struct TestCase {
    stub: Stub,
    scenario: Scenario,
}

impl TestCase {
    pub fn new(name: impl Into<String>, stub: Stub) -> Self {
        let scenario = Scenario::with_config(name, &stub.config().verification);
        Self { stub, scenario }
    }

    pub fn stub(&self) -> &Stub {
        &self.stub
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn make(&self, class: impl Into<ClassRef>, overrides: OverrideMap) -> Result<Instance> {
        self.stub.make(class, overrides, Some(&self.scenario))
    }

    pub fn make_empty(
        &self,
        class: impl Into<ClassRef>,
        overrides: OverrideMap,
    ) -> Result<Instance> {
        self.stub.make_empty(class, overrides, Some(&self.scenario))
    }

    pub fn make_empty_except(
        &self,
        class: impl Into<ClassRef>,
        method: &str,
        overrides: OverrideMap,
    ) -> Result<Instance> {
        self.stub
            .make_empty_except(class, method, overrides, Some(&self.scenario))
    }

    pub fn construct(
        &self,
        class: impl Into<ClassRef>,
        constructor_args: Vec<Value>,
        overrides: OverrideMap,
    ) -> Result<Instance> {
        self.stub
            .construct(class, constructor_args, overrides, Some(&self.scenario))
    }

    pub fn construct_empty(
        &self,
        class: impl Into<ClassRef>,
        constructor_args: Vec<Value>,
        overrides: OverrideMap,
    ) -> Result<Instance> {
        self.stub
            .construct_empty(class, constructor_args, overrides, Some(&self.scenario))
    }

    pub fn construct_empty_except(
        &self,
        class: impl Into<ClassRef>,
        method: &str,
        constructor_args: Vec<Value>,
        overrides: OverrideMap,
    ) -> Result<Instance> {
        self.stub.construct_empty_except(
            class,
            method,
            constructor_args,
            overrides,
            Some(&self.scenario),
        )
    }

    /// Ends the test with the given status. See [`Scenario::finish`].
    pub fn finish(self, status: ScenarioStatus) -> Result<()> {
        self.scenario.finish(status)
    }
}
