//! Suite file loading and writing.
mod loader;
pub mod types;


pub use loader::{DEFAULT_SUITE_FILE, load_suite, write_suite_file};
pub use types::{EndpointConfig, SuiteFile};

#[cfg(test)]
pub(crate) use loader::load_suite_file;
