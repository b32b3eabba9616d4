//! Run observer handle threaded through the engine.
//!
//! The engine never looks up a process-wide logger. Callers hand it an
//! observer, and every notable step of a run is reported through it.
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::runner::Report;

/// Hooks fired by the engine while a suite runs.
///
/// All hooks default to no-ops so implementors only override what they need.
/// Hooks are invoked from worker tasks concurrently and must not block.
pub trait RunObserver: Send + Sync {
    fn run_started(&self, _count: usize, _base_url: &str) {}

    fn probe_started(&self, _target: &str) {}

    fn probe_finished(&self, _target: &str, _status: u16, _elapsed: Duration) {}

    fn target_unreachable(&self, _target: &str, _error: &reqwest::Error) {}

    fn run_finished(&self, _report: &Report) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl RunObserver for SilentObserver {}

/// Observer that turns run events into structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn run_started(&self, count: usize, base_url: &str) {
        info!(count, url = base_url, "Starting async test execution");
    }

    fn probe_started(&self, target: &str) {
        info!(endpoint = target, "Pinging target");
    }

    fn probe_finished(&self, target: &str, status: u16, elapsed: Duration) {
        debug!(
            endpoint = target,
            status,
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "Probe finished"
        );
    }

    fn target_unreachable(&self, target: &str, error: &reqwest::Error) {
        warn!(endpoint = target, error = %error, "Failed to reach target");
    }

    fn run_finished(&self, report: &Report) {
        info!(
            total = report.results().len(),
            passed = report.passed_count(),
            "Test execution finished"
        );
    }
}
