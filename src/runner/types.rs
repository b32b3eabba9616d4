use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::observer::{RunObserver, TracingObserver};

/// One declared endpoint expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub path: String,
    pub expected_status: u16,
    /// Request-scoped budget; `None` relies on run cancellation only.
    pub timeout: Option<Duration>,
}

impl Check {
    #[must_use]
    pub fn new(path: impl Into<String>, expected_status: u16) -> Self {
        Self {
            path: path.into(),
            expected_status,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Ordered checks against a single base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suite {
    pub base_url: String,
    pub checks: Vec<Check>,
}

impl Suite {
    #[must_use]
    pub fn new(base_url: impl Into<String>, checks: Vec<Check>) -> Self {
        Self {
            base_url: base_url.into(),
            checks,
        }
    }
}

/// Outcome of one completed probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub target: String,
    pub duration: Duration,
    pub timeout: Option<Duration>,
    pub observed_status: u16,
    pub expected_status: u16,
    pub passed: bool,
}

impl CheckResult {
    /// True when a budget was declared and the probe did not finish under it.
    #[must_use]
    pub fn is_slow(&self) -> bool {
        self.timeout.is_some_and(|timeout| self.duration >= timeout)
    }
}

/// Results of a run, in check declaration order.
#[derive(Debug, Clone)]
pub struct Report {
    started_at: DateTime<Utc>,
    results: Vec<CheckResult>,
}

impl Report {
    #[must_use]
    pub const fn new(started_at: DateTime<Utc>, results: Vec<CheckResult>) -> Self {
        Self {
            started_at,
            results,
        }
    }

    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|result| result.passed).count()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.len().saturating_sub(self.passed_count())
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|result| result.passed)
    }
}

/// Knobs for a single run.
#[derive(Clone)]
pub struct RunOptions {
    /// Abort the whole run on the first unreachable target or status mismatch.
    pub fail_fast: bool,
    /// Overall budget for the run, composed into the cancellation signal.
    pub deadline: Option<Duration>,
    pub observer: Arc<dyn RunObserver>,
}

impl RunOptions {
    #[must_use]
    pub fn new(fail_fast: bool) -> Self {
        Self {
            fail_fast,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            fail_fast: false,
            deadline: None,
            observer: Arc::new(TracingObserver),
        }
    }
}

impl fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOptions")
            .field("fail_fast", &self.fail_fast)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}
