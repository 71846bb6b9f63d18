use crate::invocation::Invocation;
use crate::value::Value;
use crate::{MockError, Result};
use std::cell::Cell;
use std::fmt;

/// How many times a stubbed method may or must be called.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvocationRule {
    Any,
    Exactly(usize),
    AtLeast(usize),
}

impl InvocationRule {
    /// Rules other than `Any` take part in deferred verification.
    pub fn is_expectation(&self) -> bool {
        !matches!(self, InvocationRule::Any)
    }
}

impl fmt::Display for InvocationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationRule::Any => write!(f, "invoked zero or more times"),
            InvocationRule::Exactly(n) => write!(f, "invoked {} time(s)", n),
            InvocationRule::AtLeast(n) => write!(f, "invoked at least {} time(s)", n),
        }
    }
}

/// Counts invocations against a rule. The upper bound is enforced on every
/// call; the lower bound only by [`InvocationCounter::verify`].
#[derive(Debug)]
pub struct InvocationCounter {
    rule: InvocationRule,
    count: Cell<usize>,
}

impl InvocationCounter {
    pub fn new(rule: InvocationRule) -> Self {
        Self {
            rule,
            count: Cell::new(0),
        }
    }

    pub fn rule(&self) -> InvocationRule {
        self.rule
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }

    pub fn invoked(&self, invocation: &Invocation) -> Result<()> {
        let count = self.count.get() + 1;
        self.count.set(count);

        if let InvocationRule::Exactly(expected) = self.rule {
            if count > expected {
                let message = match expected {
                    0 => format!("{} was not expected to be called.", invocation),
                    1 => format!(
                        "{} was not expected to be called more than once.",
                        invocation
                    ),
                    n => format!(
                        "{} was not expected to be called more than {} times.",
                        invocation, n
                    ),
                };
                return Err(MockError::ExpectationFailed { message });
            }
        }
        Ok(())
    }

    pub fn verify(&self, method: &str) -> Result<()> {
        let count = self.count.get();
        let message = match self.rule {
            InvocationRule::Any => return Ok(()),
            InvocationRule::Exactly(expected) if count != expected => format!(
                "Method {} was expected to be called {} times, actually called {} times.",
                method, expected, count
            ),
            InvocationRule::AtLeast(1) if count == 0 => format!(
                "Expected invocation of {} at least once but it never occurred.",
                method
            ),
            InvocationRule::AtLeast(expected) if count < expected => format!(
                "Expected invocation of {} at least {} times but it occurred {} time(s).",
                method, expected, count
            ),
            _ => return Ok(()),
        };
        Err(MockError::ExpectationFailed { message })
    }
}

/// Expected argument list for a stubbed method.
#[derive(Clone, Debug)]
pub struct ParametersRule {
    expected: Vec<Value>,
}

impl ParametersRule {
    pub fn new(expected: Vec<Value>) -> Self {
        Self { expected }
    }

    pub fn expected(&self) -> &[Value] {
        &self.expected
    }

    pub fn apply(&self, invocation: &Invocation) -> Result<()> {
        if invocation.args.len() < self.expected.len() {
            return Err(MockError::ExpectationFailed {
                message: format!("Parameter count for invocation {} is too low.", invocation),
            });
        }
        for (i, (expected, actual)) in self.expected.iter().zip(&invocation.args).enumerate() {
            if expected != actual {
                return Err(MockError::ExpectationFailed {
                    message: format!(
                        "Parameter {} for invocation {} does not match expected value.\n\
                         Failed asserting that {} is equal to {}.",
                        i,
                        invocation,
                        actual.export(),
                        expected.export()
                    ),
                });
            }
        }
        Ok(())
    }
}
