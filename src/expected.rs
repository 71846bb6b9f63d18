//! Call-count expectations for stubbed methods.
//!
//! ```
//! use stubkit::{expected, overrides};
//!
//! let params = overrides! {
//!     "getName" => expected::once("Davert"),
//!     "save" => expected::never(),
//!     "load" => expected::exactly(3, true).with(["users"]),
//! };
//! assert_eq!(params.len(), 3);
//! ```
//!
//! Calls beyond an upper bound fail as they happen. A lower bound that was
//! never reached only fails when the owning scenario verifies its mocks.

use crate::overrides::Reply;
use std::fmt;
use std::rc::Rc;
use stubkit_mock::{Behavior, InvocationRule, Value};

/// Count rule plus reply for one stubbed method, optionally restricted to
/// specific arguments.
#[derive(Clone)]
pub struct Expectation {
    rule: InvocationRule,
    behavior: Rc<dyn Behavior>,
    parameters: Option<Vec<Value>>,
}

impl Expectation {
    pub fn new(rule: InvocationRule, reply: impl Into<Reply>) -> Self {
        Self {
            rule,
            behavior: reply.into().into_behavior(),
            parameters: None,
        }
    }

    pub fn rule(&self) -> InvocationRule {
        self.rule
    }

    pub fn behavior(&self) -> Rc<dyn Behavior> {
        Rc::clone(&self.behavior)
    }

    pub fn parameters(&self) -> Option<&[Value]> {
        self.parameters.as_deref()
    }

    /// Requires calls to pass arguments equal to `args`, position by position.
    pub fn with<I, V>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.parameters = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the reply, keeping the count rule.
    pub fn will(mut self, reply: impl Into<Reply>) -> Self {
        self.behavior = reply.into().into_behavior();
        self
    }
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expectation")
            .field("rule", &self.rule)
            .field("behavior", &self.behavior.describe())
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// The method must not be called; the first call fails immediately.
///
/// The reply defaults to null. Use [`Expectation::will`] to give one:
///
/// ```
/// use stubkit::expected;
/// use stubkit::mock::InvocationRule;
///
/// let guarded = expected::never().will("unreachable");
/// assert_eq!(guarded.rule(), InvocationRule::Exactly(0));
/// ```
pub fn never() -> Expectation {
    Expectation::new(InvocationRule::Exactly(0), ())
}

/// The method must be called exactly once.
///
/// `reply` may be a literal, a [`stubkit_mock::Callback`], a sequence or any
/// behavior such as [`stubkit_mock::ReturnSelf`]. Pass `()` to return null.
pub fn once(reply: impl Into<Reply>) -> Expectation {
    Expectation::new(InvocationRule::Exactly(1), reply)
}

/// The method must be called one or more times.
pub fn at_least_once(reply: impl Into<Reply>) -> Expectation {
    Expectation::new(InvocationRule::AtLeast(1), reply)
}

/// The method must be called exactly `count` times.
pub fn exactly(count: usize, reply: impl Into<Reply>) -> Expectation {
    Expectation::new(InvocationRule::Exactly(count), reply)
}
