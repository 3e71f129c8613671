//! Metric names.
//!
//! praxis records through the `metrics` facade and installs no exporter;
//! the host application chooses one.
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `praxis_action_results_total` | Counter | `outcome` |
//!
//! Outcome labels are the failure kind names (`input_validation`,
//! `unexpected`, ...) or `success`.

use metrics::{describe_counter, Unit};

/// Invocations settled, labelled by outcome.
pub const ACTION_RESULTS_TOTAL: &str = "praxis_action_results_total";

/// Registers descriptions with the installed recorder.
///
/// Call after installing an exporter; a no-op without one.
pub fn describe_metrics() {
    describe_counter!(
        ACTION_RESULTS_TOTAL,
        Unit::Count,
        "Action invocations settled, by outcome"
    );
}
