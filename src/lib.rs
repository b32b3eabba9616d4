//! Core library for the `smokesweep` CLI.
//!
//! The heart of the crate is [`runner::execute`], which sweeps a suite of
//! endpoint checks across a bounded pool of workers and returns the results
//! in declaration order. Everything else (suite files, argument parsing,
//! report rendering, logging) feeds the engine or presents what it returns.
pub mod args;
pub mod config;
pub mod error;
pub mod logger;
pub mod observer;
pub mod ping;
pub mod runner;
pub mod shutdown;
pub mod shutdown_handlers;
pub mod summary;
