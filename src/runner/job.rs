use super::types::{Check, CheckResult};

/// A check bound to its absolute target and declaration index.
#[derive(Debug)]
pub(super) struct Job {
    pub(super) check: Check,
    pub(super) target: String,
    pub(super) index: usize,
}

/// A probe result tagged with the index of the job that produced it.
#[derive(Debug)]
pub(super) struct IndexedResult {
    pub(super) result: CheckResult,
    pub(super) index: usize,
}
