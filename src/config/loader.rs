use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::error::{AppError, AppResult, ConfigError, SuiteFormat, ValidationError};
use crate::runner::{Check, Suite};

use super::types::{EndpointConfig, SuiteFile};

/// Suite file used when `run` is given no path.
pub const DEFAULT_SUITE_FILE: &str = ".smokesweep.yaml";

const MIN_STATUS: u16 = 100;
const MAX_STATUS: u16 = 599;

/// Loads and validates a suite file, converting it into an engine [`Suite`].
///
/// # Errors
///
/// Returns an error when the file cannot be read, has an unsupported
/// extension, fails to parse, or describes an invalid suite.
pub fn load_suite(path: &Path) -> AppResult<Suite> {
    let file = load_suite_file(path)?;
    file.into_suite().map_err(|source| {
        AppError::config(ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    })
}

pub(crate) fn load_suite_file(path: &Path) -> AppResult<SuiteFile> {
    let format = suite_format(path)?;
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadSuite {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    match format {
        SuiteFormat::Yaml => serde_yaml::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseYaml {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        SuiteFormat::Toml => toml::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseToml {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        SuiteFormat::Json => serde_json::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseJson {
                path: path.to_path_buf(),
                source: err,
            })
        }),
    }
}

/// Writes `suite` to `path` in the format implied by its extension.
///
/// # Errors
///
/// Returns an error when the file exists and `force` is not set, the
/// extension is unsupported, or serialization or the write fails.
pub fn write_suite_file(path: &Path, suite: &SuiteFile, force: bool) -> AppResult<()> {
    if path.exists() && !force {
        return Err(AppError::config(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        }));
    }
    let format = suite_format(path)?;
    let content = match format {
        SuiteFormat::Yaml => serde_yaml::to_string(suite).map_err(|err| err.to_string()),
        SuiteFormat::Toml => toml::to_string_pretty(suite).map_err(|err| err.to_string()),
        SuiteFormat::Json => serde_json::to_string_pretty(suite).map_err(|err| err.to_string()),
    }
    .map_err(|message| AppError::config(ConfigError::Serialize { format, message }))?;
    std::fs::write(path, content).map_err(|err| {
        AppError::config(ConfigError::WriteSuite {
            path: path.to_path_buf(),
            source: err,
        })
    })
}

fn suite_format(path: &Path) -> AppResult<SuiteFormat> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => Ok(SuiteFormat::Yaml),
        Some("toml") => Ok(SuiteFormat::Toml),
        Some("json") => Ok(SuiteFormat::Json),
        Some(ext) => Err(AppError::config(ConfigError::UnsupportedExtension {
            ext: ext.to_owned(),
        })),
        None => Err(AppError::config(ConfigError::MissingExtension)),
    }
}

impl SuiteFile {
    /// Validates the file and converts it into an engine [`Suite`].
    ///
    /// # Errors
    ///
    /// Returns an error when the base url is empty, not absolute, or not
    /// http(s), or when an endpoint declares an impossible status or a zero
    /// timeout.
    pub fn into_suite(self) -> Result<Suite, ValidationError> {
        validate_base_url(&self.url)?;
        let checks = self
            .endpoints
            .into_iter()
            .map(EndpointConfig::into_check)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Suite::new(self.url, checks))
    }
}

impl EndpointConfig {
    fn into_check(self) -> Result<Check, ValidationError> {
        if !(MIN_STATUS..=MAX_STATUS).contains(&self.expected_status) {
            return Err(ValidationError::InvalidExpectedStatus {
                path: self.path,
                status: self.expected_status,
            });
        }
        let timeout = match self.timeout_ms {
            Some(0) => return Err(ValidationError::ZeroTimeout { path: self.path }),
            Some(ms) => Some(Duration::from_millis(ms)),
            None => None,
        };
        Ok(Check {
            path: self.path,
            expected_status: self.expected_status,
            timeout,
        })
    }
}

fn validate_base_url(raw: &str) -> Result<(), ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BaseUrlEmpty);
    }
    let url = Url::parse(trimmed).map_err(|err| ValidationError::InvalidBaseUrl {
        url: raw.to_owned(),
        source: err,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(ValidationError::UnsupportedScheme {
            url: raw.to_owned(),
        }),
    }
}
