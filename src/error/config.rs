use std::fmt;
use std::path::PathBuf;

use super::ValidationError;
use thiserror::Error;

/// Serialization formats accepted for suite files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteFormat {
    Yaml,
    Toml,
    Json,
}

impl fmt::Display for SuiteFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuiteFormat::Yaml => f.write_str("YAML"),
            SuiteFormat::Toml => f.write_str("TOML"),
            SuiteFormat::Json => f.write_str("JSON"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read suite '{path}': {source}")]
    ReadSuite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write suite '{path}': {source}")]
    WriteSuite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse YAML suite '{path}': {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Failed to parse TOML suite '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to parse JSON suite '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize {format} suite: {message}")]
    Serialize {
        format: SuiteFormat,
        message: String,
    },
    #[error("Unsupported suite extension '{ext}'. Use .yaml, .yml, .toml, or .json.")]
    UnsupportedExtension { ext: String },
    #[error("Suite file must have a .yaml, .yml, .toml, or .json extension.")]
    MissingExtension,
    #[error("Suite file '{path}' already exists (use --force to overwrite).")]
    AlreadyExists { path: PathBuf },
    #[error("Invalid suite '{path}': {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
