//! Structured logging utilities for stubkit.
//!
//! Helper functions keep event names and fields consistent across the crate.
//! Nothing is printed unless the caller installs a subscriber, for example via
//! [`init_tracing`].

use crate::binder::BindOutcome;
use crate::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a global `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over the configured level. JSON output is
/// selected by the config or the `STUBKIT_LOG_JSON` environment variable.
/// Returns `false` when a global subscriber was already installed, so test
/// suites can call this from every test.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let level = config.level.as_deref().unwrap_or("info");
    let fallback_filter = format!("stubkit={},stubkit_mock={}", level, level);
    let use_json = config.json.unwrap_or(false) || std::env::var("STUBKIT_LOG_JSON").is_ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| fallback_filter.into());

    if use_json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(json_layer)
            .try_init()
            .is_ok()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .is_ok()
    }
}

/// Log creation of a stub through one of the `Stub` entry points.
pub fn log_stub_created(entry: &str, class: &str, proxy: &str, overrides: usize) {
    tracing::debug!(entry, class, proxy, overrides, "Stub created");
}

/// Log a single override applied by the binder.
pub fn log_override_bound(name: &str, class: &str, outcome: BindOutcome) {
    tracing::debug!(name, class, outcome = ?outcome, "Override bound");
}

pub fn log_binding_failed(name: &str, class: &str) {
    tracing::debug!(name, class, "Override rejected by __set interceptor");
}

/// Log an instance copied by `Stub::copy`.
pub fn log_instance_copied(class: &str, source_id: u64, copy_id: u64) {
    tracing::debug!(class, source_id, copy_id, "Instance copied");
}

pub fn log_mock_registered(scenario: &str, class: &str) {
    tracing::debug!(scenario, class, "Mock registered with scenario");
}

/// Log deferred verification of a scenario.
pub fn log_scenario_verified(scenario: &str, mocks: usize, failures: usize) {
    if failures == 0 {
        tracing::info!(scenario, mocks, "Scenario expectations verified");
    } else {
        tracing::warn!(scenario, mocks, failures, "Scenario expectations failed");
    }
}

pub fn log_verification_skipped(scenario: &str, mocks: usize) {
    tracing::info!(scenario, mocks, "Scenario did not pass, verification skipped");
}
