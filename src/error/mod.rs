mod app;
mod config;
mod ping;
mod run;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::{ConfigError, SuiteFormat};
pub use ping::PingError;
pub use run::{CancelReason, RunError};
pub use validation::ValidationError;
