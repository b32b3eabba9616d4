use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::shutdown::{ShutdownReceiver, wait_for_shutdown};

use super::job::Job;
use super::target::join_url;
use super::types::Check;

/// Feeds one job per check into the queue, in declaration order.
///
/// The queue is closed when the task returns, which is how idle workers learn
/// there is nothing left to pull. Cancellation is not an error here; whoever
/// raised the signal reports it.
pub(super) fn spawn_dispatcher(
    base_url: String,
    checks: Vec<Check>,
    job_tx: mpsc::Sender<Job>,
    mut shutdown_rx: ShutdownReceiver,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        for (index, check) in checks.into_iter().enumerate() {
            let target = join_url(&base_url, &check.path);
            let job = Job {
                check,
                target,
                index,
            };
            tokio::select! {
                biased;
                () = wait_for_shutdown(&mut shutdown_rx) => {
                    debug!(remaining_from = index, "Dispatcher cancelled");
                    return;
                }
                sent = job_tx.send(job) => {
                    if sent.is_err() {
                        debug!("Job queue closed, dispatcher exiting");
                        return;
                    }
                }
            }
        }
    })
}
