//! Dynamic object model and mock-object subsystem behind `stubkit`.
//!
//! Classes are described at runtime with [`ClassBuilder`] and looked up in a
//! [`ClassRegistry`]. A [`ProxyGenerator`] produces [`Instance`]s of a
//! synthesized subclass whose methods can be intercepted individually; each
//! intercepted method dispatches to matchers that count calls, check
//! arguments and run a [`Behavior`].

pub mod assertions;
pub mod behavior;
pub mod builder;
pub mod class;
pub mod generator;
pub mod invocation;
pub mod mock;
pub mod object;
pub mod storage;
pub mod value;

pub use assertions::InvocationRule;
pub use behavior::{
    Behavior, Callback, ReturnArgument, ReturnCallback, ReturnSelf, ReturnValue, ThrowError,
};
pub use builder::ClassBuilder;
pub use class::{ClassDef, ClassKind, ClassRegistry, Visibility};
pub use generator::{Construction, MockGenerator, ProxyGenerator};
pub use invocation::Invocation;
pub use mock::CallLogEntry;
pub use object::Instance;
pub use value::Value;

/// Result type alias for the mock subsystem
pub type Result<T> = std::result::Result<T, MockError>;

/// Errors raised by objects and mocks at runtime
#[derive(Debug, Clone, thiserror::Error)]
pub enum MockError {
    /// A call-count or argument expectation was violated.
    #[error("{message}")]
    ExpectationFailed { message: String },

    #[error("Cannot configure method {class}::{method}(): object is not a mock")]
    NotAMock { class: String, method: String },

    #[error(
        "Trying to configure method \"{method}\" which cannot be configured because it does \
         not exist, has not been specified, is final, or is static ({class})"
    )]
    MethodNotConfigurable { class: String, method: String },

    #[error("Call to undefined method {class}::{method}()")]
    UndefinedMethod { class: String, method: String },

    #[error("Cannot call abstract method {class}::{method}()")]
    AbstractMethodCall { class: String, method: String },

    #[error("Undefined property: {class}::${property}")]
    UndefinedProperty { class: String, property: String },

    #[error("Cannot access {visibility} property {class}::${property}")]
    InaccessibleProperty {
        class: String,
        property: String,
        visibility: Visibility,
    },

    #[error("Cannot instantiate abstract class or interface {0}")]
    NotInstantiable(String),

    /// Raised by user code: method bodies, constructors, callbacks.
    #[error("{0}")]
    Thrown(String),
}

impl MockError {
    pub fn is_expectation_failure(&self) -> bool {
        matches!(self, MockError::ExpectationFailed { .. })
    }
}
