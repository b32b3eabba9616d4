//! Console rendering of reports and ping verdicts.
use std::io::IsTerminal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crossterm::style::{Color, Stylize};

use crate::error::{AppError, AppResult};
use crate::observer::{RunObserver, TracingObserver};
use crate::ping::Liveness;
use crate::runner::{CheckResult, Report};

const SEPARATOR: &str = "------------------------------";

/// Whether stdout should receive ANSI colors.
#[must_use]
pub fn use_color(no_color: bool) -> bool {
    !no_color && std::io::stdout().is_terminal()
}

fn tag(label: &str, color: Color, use_color: bool) -> String {
    if use_color {
        format!("[{}]", label.with(color))
    } else {
        format!("[{label}]")
    }
}

fn millis(result: &CheckResult) -> u128 {
    result.duration.as_millis()
}

/// Renders one line per result plus a separator and a totals line.
///
/// # Errors
///
/// Returns [`AppError::EmptyReport`] when the report holds no results.
pub fn render_report(report: &Report, use_color: bool) -> AppResult<Vec<String>> {
    if report.is_empty() {
        return Err(AppError::EmptyReport);
    }

    let mut lines = Vec::with_capacity(report.results().len().saturating_add(2));
    lines.push(SEPARATOR.to_owned());
    for result in report.results() {
        if result.passed {
            if result.is_slow() {
                lines.push(format!(
                    "{} {} ({}ms) exceeded threshold",
                    tag("SLOW", Color::Yellow, use_color),
                    result.target,
                    millis(result)
                ));
            }
            lines.push(format!(
                "{} {} ({}ms) OK",
                tag("SUCCESS", Color::Green, use_color),
                result.target,
                millis(result)
            ));
        } else {
            lines.push(format!(
                "{} Target '{}' expected HTTP status {} but got {}",
                tag("FAILED", Color::Red, use_color),
                result.target,
                result.expected_status,
                result.observed_status
            ));
        }
    }
    lines.push(format!(
        "{}/{} checks passed",
        report.passed_count(),
        report.results().len()
    ));
    Ok(lines)
}

#[must_use]
pub fn render_unreachable(target: &str, use_color: bool) -> String {
    format!(
        "{} Failed to reach target {}",
        tag("UNREACHABLE", Color::Red, use_color),
        target
    )
}

#[must_use]
pub fn render_unreachable_total(count: usize) -> String {
    format!("{count} unreachable targets left out of the report")
}

/// Run observer for the terminal: logs like [`TracingObserver`] and prints an
/// `[UNREACHABLE]` line to stdout as soon as a target cannot be reached.
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    use_color: bool,
    unreachable: AtomicUsize,
}

impl ConsoleObserver {
    #[must_use]
    pub const fn new(use_color: bool) -> Self {
        Self {
            use_color,
            unreachable: AtomicUsize::new(0),
        }
    }

    /// Targets reported unreachable so far.
    #[must_use]
    pub fn unreachable_count(&self) -> usize {
        self.unreachable.load(Ordering::SeqCst)
    }
}

impl RunObserver for ConsoleObserver {
    fn run_started(&self, count: usize, base_url: &str) {
        TracingObserver.run_started(count, base_url);
    }

    fn probe_started(&self, target: &str) {
        TracingObserver.probe_started(target);
    }

    fn probe_finished(&self, target: &str, status: u16, elapsed: Duration) {
        TracingObserver.probe_finished(target, status, elapsed);
    }

    fn target_unreachable(&self, target: &str, error: &reqwest::Error) {
        TracingObserver.target_unreachable(target, error);
        self.unreachable.fetch_add(1, Ordering::SeqCst);
        println!("{}", render_unreachable(target, self.use_color));
    }

    fn run_finished(&self, report: &Report) {
        TracingObserver.run_finished(report);
    }
}

#[must_use]
pub fn render_liveness(url: &str, liveness: Liveness, use_color: bool) -> String {
    match liveness {
        Liveness::Live { elapsed, .. } => format!(
            "{} Target {} responded in {}ms",
            tag("LIVE", Color::Green, use_color),
            url,
            elapsed.as_millis()
        ),
        Liveness::Down { status, .. } => format!(
            "{} Target {} returned HTTP status {}",
            tag("DOWN", Color::Red, use_color),
            url,
            status
        ),
    }
}
