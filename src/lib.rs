//! Test doubles for dynamically described classes.
//!
//! [`Stub`] builds instances of a class with chosen methods replaced and
//! chosen properties preset, from a single [`OverrideMap`]. Values in the
//! map decide how a method answers: a literal, a [`mock::Callback`], a
//! [`consecutive`] sequence, or an [`expected`] call-count expectation.

pub mod binder;
pub mod config;
pub mod consecutive;
pub mod expected;
pub mod filter;
pub mod logging;
pub mod overrides;
pub mod resolver;
pub mod scenario;
pub mod stub;

use miette::Diagnostic;

pub use stubkit_mock as mock;

pub use binder::{BindOutcome, Binding, ParameterBinder};
pub use config::Config;
pub use consecutive::{consecutive, ConsecutiveMap};
pub use expected::Expectation;
pub use filter::MethodFilter;
pub use overrides::{Override, OverrideMap, Reply};
pub use resolver::ClassRef;
pub use scenario::{Scenario, ScenarioStatus, TestCase};
pub use stub::Stub;
pub use stubkit_mock::{Callback, Instance, MockError, Value};

/// Result type alias for stubkit
pub type Result<T> = std::result::Result<T, StubError>;

/// Error types for stub construction and verification
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum StubError {
    #[error("Stubbed class {0} doesn't exist.")]
    #[diagnostic(
        code(stubkit::class_not_found),
        help("Register the class with the ClassRegistry handed to Stub::new before stubbing it.")
    )]
    ClassNotFound(String),

    #[error("Interface {0} cannot be stubbed with make")]
    #[diagnostic(
        code(stubkit::interface_not_stubbable),
        help("Use make_empty for interfaces; every method is then replaced by a dummy.")
    )]
    InterfaceNotStubbable(String),

    #[error(
        "Could not add property {property}, class {class} implements __set method, and no \
         {property} property exists"
    )]
    #[diagnostic(
        code(stubkit::binding_failed),
        help("Declare the property on the class or let its __set accept the name.")
    )]
    Binding {
        property: String,
        class: String,
        #[source]
        source: MockError,
    },

    #[error("Property {class}::${name} cannot be set to a {kind}")]
    #[diagnostic(
        code(stubkit::not_a_value),
        help("Only methods accept callbacks, sequences and expectations; properties take plain values.")
    )]
    NotAValue {
        name: String,
        class: String,
        kind: &'static str,
    },

    #[error(transparent)]
    #[diagnostic(code(stubkit::mock))]
    Mock(#[from] MockError),

    #[error("Expectation failed in scenario \"{scenario}\":\n{}", render_failures(.failures))]
    #[diagnostic(
        code(stubkit::verification_failed),
        help("Each listed method was called fewer times than its expectation requires.")
    )]
    Verification {
        scenario: String,
        failures: Vec<MockError>,
    },

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(stubkit::config_error),
        help("Check that .stubkit.toml is valid TOML with [binding], [verification] and [logging] tables.")
    )]
    Config(String),
}

fn render_failures(failures: &[MockError]) -> String {
    failures
        .iter()
        .map(|failure| format!("  - {}", failure))
        .collect::<Vec<_>>()
        .join("\n")
}
