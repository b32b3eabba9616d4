use std::time::Instant;

use futures_util::StreamExt;
use reqwest::Client;

use crate::error::RunError;

use super::job::Job;
use super::types::CheckResult;

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("smokesweep/", env!("CARGO_PKG_VERSION"));

/// Builds the client owned by a single worker.
///
/// No client-wide timeout is set: budgets are applied per request from the
/// check, and everything else is bounded by run cancellation.
pub(super) fn build_probe_client() -> Result<Client, RunError> {
    Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .build()
        .map_err(|source| RunError::BuildClient { source })
}

/// Issues one GET for `job` and records the observed status.
///
/// The elapsed time covers the whole exchange including draining the body.
/// A non-matching status is not an error here; the caller decides what a
/// mismatch means for the run.
pub(super) async fn probe(client: &Client, job: &Job) -> Result<CheckResult, reqwest::Error> {
    let started = Instant::now();
    let mut request = client.get(&job.target);
    if let Some(timeout) = job.check.timeout {
        request = request.timeout(timeout);
    }

    let response = request.send().await?;
    let observed_status = response.status().as_u16();
    drain_response_body(response).await?;
    let duration = started.elapsed();

    Ok(CheckResult {
        target: job.target.clone(),
        duration,
        timeout: job.check.timeout,
        observed_status,
        expected_status: job.check.expected_status,
        passed: observed_status == job.check.expected_status,
    })
}

async fn drain_response_body(response: reqwest::Response) -> Result<(), reqwest::Error> {
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        chunk?;
    }
    Ok(())
}
