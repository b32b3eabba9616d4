use serde::{Deserialize, Serialize};

/// On-disk shape of a suite file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteFile {
    pub url: String,
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub path: String,
    #[serde(rename = "expected-status", alias = "expected_status")]
    pub expected_status: u16,
    #[serde(
        rename = "timeout-ms",
        alias = "timeout_ms",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout_ms: Option<u64>,
}

impl SuiteFile {
    /// Starter suite written by `smokesweep init`.
    #[must_use]
    pub fn starter() -> Self {
        Self {
            url: "http://localhost:8080".to_owned(),
            endpoints: vec![
                EndpointConfig {
                    path: "/".to_owned(),
                    expected_status: 200,
                    timeout_ms: None,
                },
                EndpointConfig {
                    path: "/health".to_owned(),
                    expected_status: 200,
                    timeout_ms: Some(500),
                },
            ],
        }
    }
}
