//! Single-URL liveness probe.
use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::debug;

use crate::error::PingError;
use crate::runner::DEFAULT_USER_AGENT;

/// Liveness verdict for a pinged URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    /// Answered with a 2xx or 3xx status.
    Live { status: u16, elapsed: Duration },
    /// Answered, but with a 4xx or 5xx status.
    Down { status: u16, elapsed: Duration },
}

impl Liveness {
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Liveness::Live { .. })
    }

    const fn from_status(status: u16, elapsed: Duration) -> Self {
        if status >= 200 && status < 400 {
            Liveness::Live { status, elapsed }
        } else {
            Liveness::Down { status, elapsed }
        }
    }
}

/// Sends one HEAD request to `url` and classifies the answer.
///
/// # Errors
///
/// Returns [`PingError::Unreachable`] when the request fails at the
/// transport level or exceeds `timeout`.
pub async fn ping(url: &str, timeout: Duration) -> Result<Liveness, PingError> {
    let client = Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|source| PingError::BuildClient { source })?;

    debug!(
        url,
        timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        "Checking URL for liveness"
    );
    let started = Instant::now();
    let response = client
        .head(url)
        .send()
        .await
        .map_err(|source| PingError::Unreachable {
            url: url.to_owned(),
            source,
        })?;
    let elapsed = started.elapsed();
    Ok(Liveness::from_status(response.status().as_u16(), elapsed))
}
