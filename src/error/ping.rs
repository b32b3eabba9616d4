use thiserror::Error;

#[derive(Debug, Error)]
pub enum PingError {
    #[error("failed to reach target {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },
}
