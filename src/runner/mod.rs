//! Concurrent execution engine.
//!
//! A run is one dispatcher task, a supervised pool of up to [`MAX_WORKERS`]
//! concurrent workers and the calling task acting as collector. They talk only through bounded channels
//! and a run-scoped cancellation signal, and every spawned task is joined
//! before [`execute`] returns.
mod cancel;
mod collector;
mod dispatcher;
mod job;
mod probe;
mod target;
mod types;
mod worker;


use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, mpsc};
use tracing::warn;

use crate::error::RunError;
use crate::shutdown::ShutdownReceiver;

use cancel::Cancellation;
use collector::{CollectorInputs, collect};
use dispatcher::spawn_dispatcher;
use probe::build_probe_client;
use worker::{WorkerPool, spawn_pool};

pub(crate) use probe::DEFAULT_USER_AGENT;
pub use target::join_url;
pub use types::{Check, CheckResult, Report, RunOptions, Suite};

/// Upper bound on concurrently probing workers, whatever the suite size.
pub const MAX_WORKERS: usize = 10;

/// Number of workers a run over `check_count` checks starts.
#[must_use]
pub fn worker_count(check_count: usize) -> usize {
    check_count.min(MAX_WORKERS)
}

/// Runs every check in `suite` and returns the results in declaration order.
///
/// Raising the sender paired with `shutdown_rx` cancels the run; so does the
/// optional deadline in `options`. Take the receiver before arming whatever
/// raises the signal, so an early signal is not lost. In fail-fast mode the
/// first unreachable target or status mismatch cancels the remaining work.
/// Without fail-fast, mismatches are recorded as failed results and
/// unreachable targets are left out of the report.
///
/// # Errors
///
/// Returns [`RunError::Unreachable`] or [`RunError::ExpectationViolated`] in
/// fail-fast mode, [`RunError::Cancelled`] when the caller cancels or the
/// deadline elapses, [`RunError::WorkersExhausted`] when no worker is left to
/// finish the queue, and [`RunError::BuildClient`] when no HTTP client can be
/// constructed.
pub async fn execute(
    suite: &Suite,
    options: &RunOptions,
    shutdown_rx: ShutdownReceiver,
) -> Result<Report, RunError> {
    let started_at = Utc::now();
    let total = suite.checks.len();
    options.observer.run_started(total, &suite.base_url);

    if total == 0 {
        let report = Report::new(started_at, Vec::new());
        options.observer.run_finished(&report);
        return Ok(report);
    }

    let cancellation = Cancellation::new();
    let clients = (0..worker_count(total))
        .map(|_| build_probe_client())
        .collect::<Result<Vec<_>, _>>()?;

    let (job_tx, job_rx) = mpsc::channel(total);
    let (results_tx, results_rx) = mpsc::channel(total);
    let (errors_tx, errors_rx) = mpsc::channel(total);

    // The pool holds the only result and error senders, so both channels
    // close once its last worker exits.
    let pool = spawn_pool(
        WorkerPool {
            jobs: Arc::new(Mutex::new(job_rx)),
            results_tx,
            errors_tx,
            cancellation: cancellation.clone(),
            fail_fast: options.fail_fast,
            observer: Arc::clone(&options.observer),
        },
        clients,
    );
    let dispatcher = spawn_dispatcher(
        suite.base_url.clone(),
        suite.checks.clone(),
        job_tx,
        cancellation.subscribe(),
    );

    let collected = collect(
        CollectorInputs {
            total,
            fail_fast: options.fail_fast,
            deadline: options.deadline,
            results_rx,
            errors_rx,
            caller_rx: shutdown_rx,
        },
        &cancellation,
    )
    .await;

    cancellation.cancel();
    for handle in [pool, dispatcher] {
        if let Err(err) = handle.await {
            warn!("Engine task failed: {}", err);
        }
    }

    let report = Report::new(started_at, collected?);
    options.observer.run_finished(&report);
    Ok(report)
}
