use std::fmt;

use thiserror::Error;

/// Why a run was cancelled from outside the worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller raised the shared shutdown signal (Ctrl+C, SIGTERM, ...).
    Requested,
    /// The caller-supplied deadline elapsed before every check finished.
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Requested => f.write_str("cancellation requested"),
            CancelReason::DeadlineExceeded => f.write_str("deadline exceeded"),
        }
    }
}

/// Terminal errors produced by the execution engine.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to reach target {target}: {source}")]
    Unreachable {
        target: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("target {target} expected HTTP {expected} but got {observed}")]
    ExpectationViolated {
        target: String,
        expected: u16,
        observed: u16,
    },
    #[error("run cancelled: {reason}")]
    Cancelled { reason: CancelReason },
    #[error("every worker stopped with {unaccounted} checks unaccounted for")]
    WorkersExhausted { unaccounted: usize },
    #[error("Failed to build HTTP client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },
}

impl RunError {
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, RunError::Cancelled { .. })
    }
}
