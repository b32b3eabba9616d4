use std::time::Duration;

use tokio::sync::mpsc;
use tracing::warn;

use crate::error::{CancelReason, RunError};
use crate::shutdown::{ShutdownReceiver, wait_for_shutdown};

use super::cancel::{Cancellation, deadline_elapsed};
use super::job::IndexedResult;
use super::types::CheckResult;

/// Pre-sized result storage addressed by job index.
///
/// An empty slot marks a check that never produced a result (unreachable,
/// or never dispatched); [`ResultSlots::compact`] drops those while keeping
/// the survivors in declaration order.
#[derive(Debug)]
pub(super) struct ResultSlots {
    slots: Vec<Option<CheckResult>>,
    completed: usize,
}

impl ResultSlots {
    pub(super) fn new(total: usize) -> Self {
        let mut slots = Vec::with_capacity(total);
        slots.resize_with(total, || None);
        Self {
            slots,
            completed: 0,
        }
    }

    pub(super) fn fill(&mut self, indexed: IndexedResult) {
        match self.slots.get_mut(indexed.index) {
            Some(slot) => {
                *slot = Some(indexed.result);
                self.completed = self.completed.saturating_add(1);
            }
            None => warn!(index = indexed.index, "Result index out of range, dropped"),
        }
    }

    /// Accounts for a check that ended without a result.
    pub(super) const fn skip(&mut self) {
        self.completed = self.completed.saturating_add(1);
    }

    pub(super) fn is_complete(&self) -> bool {
        self.completed >= self.slots.len()
    }

    pub(super) fn unaccounted(&self) -> usize {
        self.slots.len().saturating_sub(self.completed)
    }

    pub(super) fn compact(self) -> Vec<CheckResult> {
        self.slots.into_iter().flatten().collect()
    }
}

pub(super) struct CollectorInputs {
    pub(super) total: usize,
    pub(super) fail_fast: bool,
    pub(super) deadline: Option<Duration>,
    pub(super) results_rx: mpsc::Receiver<IndexedResult>,
    pub(super) errors_rx: mpsc::Receiver<RunError>,
    pub(super) caller_rx: ShutdownReceiver,
}

/// Drains results and errors until every check is accounted for.
///
/// Fail-fast errors, caller cancellation and deadline expiry all raise the
/// run's cancellation signal before returning, so no partial report escapes.
///
/// # Errors
///
/// Returns the first worker error in fail-fast mode,
/// [`RunError::Cancelled`] when the caller cancels or the deadline elapses,
/// and [`RunError::WorkersExhausted`] when every worker is gone while checks
/// are still unaccounted for.
pub(super) async fn collect(
    inputs: CollectorInputs,
    cancellation: &Cancellation,
) -> Result<Vec<CheckResult>, RunError> {
    let CollectorInputs {
        total,
        fail_fast,
        deadline,
        mut results_rx,
        mut errors_rx,
        mut caller_rx,
    } = inputs;

    let mut slots = ResultSlots::new(total);
    let mut results_open = true;
    let mut errors_open = true;
    let deadline = deadline_elapsed(deadline);
    tokio::pin!(deadline);

    while !slots.is_complete() {
        tokio::select! {
            biased;
            () = wait_for_shutdown(&mut caller_rx) => {
                cancellation.cancel();
                return Err(RunError::Cancelled { reason: CancelReason::Requested });
            }
            () = &mut deadline => {
                cancellation.cancel();
                return Err(RunError::Cancelled { reason: CancelReason::DeadlineExceeded });
            }
            received = results_rx.recv(), if results_open => match received {
                Some(indexed) => slots.fill(indexed),
                None => results_open = false,
            },
            received = errors_rx.recv(), if errors_open => match received {
                Some(error) => {
                    if fail_fast {
                        cancellation.cancel();
                        return Err(error);
                    }
                    warn!(error = %error, "Check produced no result");
                    slots.skip();
                }
                None => errors_open = false,
            },
        }

        if !results_open && !errors_open && !slots.is_complete() {
            cancellation.cancel();
            return Err(RunError::WorkersExhausted {
                unaccounted: slots.unaccounted(),
            });
        }
    }

    Ok(slots.compact())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};
    use crate::shutdown::shutdown_channel;

    fn run_async_test<F>(future: F) -> AppResult<()>
    where
        F: std::future::Future<Output = AppResult<()>>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
        runtime.block_on(future)
    }

    fn indexed(index: usize, observed: u16) -> IndexedResult {
        IndexedResult {
            result: CheckResult {
                target: format!("http://svc/{index}"),
                duration: Duration::from_millis(5),
                timeout: None,
                observed_status: observed,
                expected_status: 200,
                passed: observed == 200,
            },
            index,
        }
    }

    struct Harness {
        results_tx: mpsc::Sender<IndexedResult>,
        errors_tx: mpsc::Sender<RunError>,
        inputs: CollectorInputs,
    }

    fn harness(total: usize, fail_fast: bool, caller_rx: ShutdownReceiver) -> Harness {
        let (results_tx, results_rx) = mpsc::channel(total.max(1));
        let (errors_tx, errors_rx) = mpsc::channel(total.max(1));
        Harness {
            results_tx,
            errors_tx,
            inputs: CollectorInputs {
                total,
                fail_fast,
                deadline: None,
                results_rx,
                errors_rx,
                caller_rx,
            },
        }
    }

    fn targets(results: &[CheckResult]) -> Vec<&str> {
        results.iter().map(|result| result.target.as_str()).collect()
    }

    #[test]
    fn restores_declaration_order() -> AppResult<()> {
        run_async_test(async {
            let (_caller_tx, caller_rx) = shutdown_channel();
            let harness = harness(3, false, caller_rx);
            for index in [2, 0, 1] {
                harness
                    .results_tx
                    .send(indexed(index, 200))
                    .await
                    .map_err(|_closed| AppError::validation("send failed"))?;
            }
            let results = collect(harness.inputs, &Cancellation::new())
                .await
                .map_err(|err| AppError::validation(err.to_string()))?;
            let expected = vec!["http://svc/0", "http://svc/1", "http://svc/2"];
            if targets(&results) != expected {
                return Err(AppError::validation(format!(
                    "Unexpected order: {:?}",
                    targets(&results)
                )));
            }
            Ok(())
        })
    }

    #[test]
    fn errors_are_compacted_away_without_fail_fast() -> AppResult<()> {
        run_async_test(async {
            let (_caller_tx, caller_rx) = shutdown_channel();
            let harness = harness(3, false, caller_rx);
            harness
                .results_tx
                .send(indexed(2, 500))
                .await
                .map_err(|_closed| AppError::validation("send failed"))?;
            harness
                .errors_tx
                .send(RunError::ExpectationViolated {
                    target: "http://svc/1".to_owned(),
                    expected: 200,
                    observed: 404,
                })
                .await
                .map_err(|_closed| AppError::validation("send failed"))?;
            harness
                .results_tx
                .send(indexed(0, 200))
                .await
                .map_err(|_closed| AppError::validation("send failed"))?;

            let results = collect(harness.inputs, &Cancellation::new())
                .await
                .map_err(|err| AppError::validation(err.to_string()))?;
            if targets(&results) != vec!["http://svc/0", "http://svc/2"] {
                return Err(AppError::validation(format!(
                    "Unexpected survivors: {:?}",
                    targets(&results)
                )));
            }
            let failed = results.get(1).is_some_and(|result| !result.passed);
            if !failed {
                return Err(AppError::validation("Mismatched result should stay failed"));
            }
            Ok(())
        })
    }

    #[test]
    fn fail_fast_error_cancels_run() -> AppResult<()> {
        run_async_test(async {
            let (_caller_tx, caller_rx) = shutdown_channel();
            let harness = harness(2, true, caller_rx);
            let cancellation = Cancellation::new();
            let mut observer_rx = cancellation.subscribe();
            harness
                .results_tx
                .send(indexed(0, 200))
                .await
                .map_err(|_closed| AppError::validation("send failed"))?;
            harness
                .errors_tx
                .send(RunError::ExpectationViolated {
                    target: "http://svc/1".to_owned(),
                    expected: 200,
                    observed: 503,
                })
                .await
                .map_err(|_closed| AppError::validation("send failed"))?;

            match collect(harness.inputs, &cancellation).await {
                Err(RunError::ExpectationViolated { observed: 503, .. }) => {}
                other => {
                    return Err(AppError::validation(format!(
                        "Expected expectation error, got {:?}",
                        other
                    )));
                }
            }
            if observer_rx.try_recv().is_err() {
                return Err(AppError::validation("Cancellation was not raised"));
            }
            Ok(())
        })
    }

    #[test]
    fn caller_cancellation_returns_requested() -> AppResult<()> {
        run_async_test(async {
            let (caller_tx, caller_rx) = shutdown_channel();
            let harness = harness(2, false, caller_rx);
            drop(caller_tx.send(()));
            match collect(harness.inputs, &Cancellation::new()).await {
                Err(RunError::Cancelled {
                    reason: CancelReason::Requested,
                }) => Ok(()),
                other => Err(AppError::validation(format!(
                    "Expected requested cancellation, got {:?}",
                    other
                ))),
            }
        })
    }

    #[test]
    fn deadline_returns_deadline_exceeded() -> AppResult<()> {
        run_async_test(async {
            let (_caller_tx, caller_rx) = shutdown_channel();
            let mut harness = harness(2, false, caller_rx);
            harness.inputs.deadline = Some(Duration::from_millis(20));
            match collect(harness.inputs, &Cancellation::new()).await {
                Err(RunError::Cancelled {
                    reason: CancelReason::DeadlineExceeded,
                }) => Ok(()),
                other => Err(AppError::validation(format!(
                    "Expected deadline cancellation, got {:?}",
                    other
                ))),
            }
        })
    }

    #[test]
    fn reports_checks_left_behind_by_vanished_workers() -> AppResult<()> {
        run_async_test(async {
            let (_caller_tx, caller_rx) = shutdown_channel();
            let harness = harness(4, false, caller_rx);
            harness
                .results_tx
                .send(indexed(1, 200))
                .await
                .map_err(|_closed| AppError::validation("send failed"))?;
            let Harness {
                results_tx,
                errors_tx,
                inputs,
            } = harness;
            drop(results_tx);
            drop(errors_tx);

            match collect(inputs, &Cancellation::new()).await {
                Err(RunError::WorkersExhausted { unaccounted: 3 }) => Ok(()),
                other => Err(AppError::validation(format!(
                    "Expected three unaccounted checks, got {:?}",
                    other
                ))),
            }
        })
    }

    #[test]
    fn slots_ignore_out_of_range_indexes() -> AppResult<()> {
        let mut slots = ResultSlots::new(1);
        slots.fill(indexed(5, 200));
        if slots.is_complete() {
            return Err(AppError::validation("Out of range result counted"));
        }
        slots.fill(indexed(0, 200));
        if !slots.is_complete() || slots.compact().len() != 1 {
            return Err(AppError::validation("Expected one stored result"));
        }
        Ok(())
    }
}
