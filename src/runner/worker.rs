use std::sync::Arc;

use reqwest::Client;
use tokio::sync::{Mutex, mpsc};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, warn};

use crate::error::RunError;
use crate::observer::RunObserver;
use crate::shutdown::{ShutdownReceiver, shutdown_raised, wait_for_shutdown};

use super::cancel::Cancellation;
use super::job::{IndexedResult, Job};
use super::probe::{build_probe_client, probe};

/// Receiving half of the job queue, shared by every worker.
///
/// Only the receive itself happens under the lock; probes run unlocked.
pub(super) type JobQueue = Arc<Mutex<mpsc::Receiver<Job>>>;

/// Why a worker stopped pulling jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum WorkerExit {
    Drained,
    Cancelled,
    Unreachable,
    Aborted,
}

/// Everything the pool hands to the workers it starts.
pub(super) struct WorkerPool {
    pub(super) jobs: JobQueue,
    pub(super) results_tx: mpsc::Sender<IndexedResult>,
    pub(super) errors_tx: mpsc::Sender<RunError>,
    pub(super) cancellation: Cancellation,
    pub(super) fail_fast: bool,
    pub(super) observer: Arc<dyn RunObserver>,
}

struct WorkerContext {
    id: usize,
    jobs: JobQueue,
    results_tx: mpsc::Sender<IndexedResult>,
    errors_tx: mpsc::Sender<RunError>,
    shutdown_rx: ShutdownReceiver,
    client: Client,
    fail_fast: bool,
    observer: Arc<dyn RunObserver>,
}

/// Starts one worker per client and a supervisor that joins them.
///
/// A worker that stops on a transport failure outside fail-fast mode is
/// replaced by a fresh one, so the pool keeps its size until the queue is
/// drained. The returned handle resolves once every worker has exited; the
/// result and error channels close at that point.
pub(super) fn spawn_pool(pool: WorkerPool, clients: Vec<Client>) -> JoinHandle<()> {
    let supervisor_rx = pool.cancellation.subscribe();
    let mut workers = JoinSet::new();
    let mut next_id = 0usize;
    for client in clients {
        let shutdown_rx = pool.cancellation.subscribe();
        start_worker(&pool, &mut workers, next_id, client, shutdown_rx);
        next_id = next_id.saturating_add(1);
    }
    tokio::spawn(supervise(pool, workers, supervisor_rx, next_id))
}

fn start_worker(
    pool: &WorkerPool,
    workers: &mut JoinSet<WorkerExit>,
    id: usize,
    client: Client,
    shutdown_rx: ShutdownReceiver,
) {
    workers.spawn(run_worker(WorkerContext {
        id,
        jobs: Arc::clone(&pool.jobs),
        results_tx: pool.results_tx.clone(),
        errors_tx: pool.errors_tx.clone(),
        shutdown_rx,
        client,
        fail_fast: pool.fail_fast,
        observer: Arc::clone(&pool.observer),
    }));
}

async fn supervise(
    pool: WorkerPool,
    mut workers: JoinSet<WorkerExit>,
    mut supervisor_rx: ShutdownReceiver,
    mut next_id: usize,
) {
    let mut cancelled = false;
    while let Some(joined) = workers.join_next().await {
        let exit = match joined {
            Ok(exit) => exit,
            Err(err) => {
                warn!("Worker task failed: {}", err);
                continue;
            }
        };
        if exit != WorkerExit::Unreachable || pool.fail_fast {
            continue;
        }

        // Subscribe first: a signal raised after the check below still
        // reaches the replacement.
        let shutdown_rx = pool.cancellation.subscribe();
        cancelled = cancelled || shutdown_raised(&mut supervisor_rx);
        if cancelled {
            continue;
        }
        match build_probe_client() {
            Ok(client) => {
                debug!(worker = next_id, "Replacing worker lost to an unreachable target");
                start_worker(&pool, &mut workers, next_id, client, shutdown_rx);
                next_id = next_id.saturating_add(1);
            }
            Err(err) => warn!(error = %err, "Could not replace worker"),
        }
    }
    debug!("Every worker exited");
}

async fn run_worker(mut context: WorkerContext) -> WorkerExit {
    loop {
        let next = tokio::select! {
            biased;
            () = wait_for_shutdown(&mut context.shutdown_rx) => {
                debug!(worker = context.id, "Worker cancelled while idle");
                return WorkerExit::Cancelled;
            }
            job = next_job(&context.jobs) => job,
        };
        let Some(job) = next else {
            debug!(worker = context.id, "Job queue drained, worker exiting");
            return WorkerExit::Drained;
        };

        context.observer.probe_started(&job.target);
        let outcome = tokio::select! {
            biased;
            () = wait_for_shutdown(&mut context.shutdown_rx) => {
                debug!(worker = context.id, endpoint = %job.target, "Probe abandoned on cancellation");
                return WorkerExit::Cancelled;
            }
            outcome = probe(&context.client, &job) => outcome,
        };

        let result = match outcome {
            Ok(result) => result,
            Err(source) => {
                context.observer.target_unreachable(&job.target, &source);
                let error = RunError::Unreachable {
                    target: job.target,
                    source,
                };
                publish_error(&mut context, error).await;
                return WorkerExit::Unreachable;
            }
        };
        context
            .observer
            .probe_finished(&result.target, result.observed_status, result.duration);

        if !result.passed && context.fail_fast {
            let error = RunError::ExpectationViolated {
                target: result.target,
                expected: result.expected_status,
                observed: result.observed_status,
            };
            publish_error(&mut context, error).await;
            return WorkerExit::Aborted;
        }

        let indexed = IndexedResult {
            result,
            index: job.index,
        };
        if !publish_result(&mut context, indexed).await {
            return WorkerExit::Cancelled;
        }
    }
}

async fn next_job(jobs: &JobQueue) -> Option<Job> {
    jobs.lock().await.recv().await
}

async fn publish_result(context: &mut WorkerContext, indexed: IndexedResult) -> bool {
    tokio::select! {
        biased;
        () = wait_for_shutdown(&mut context.shutdown_rx) => false,
        sent = context.results_tx.send(indexed) => sent.is_ok(),
    }
}

async fn publish_error(context: &mut WorkerContext, error: RunError) {
    tokio::select! {
        biased;
        () = wait_for_shutdown(&mut context.shutdown_rx) => {}
        sent = context.errors_tx.send(error) => {
            if sent.is_err() {
                debug!(worker = context.id, "Collector gone, dropping error");
            }
        }
    }
}
