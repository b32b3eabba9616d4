use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::DEFAULT_SUITE_FILE;

use super::parsers::parse_duration_arg;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "SmokeSweep: a CLI tool for executing smoke tests on REST API services."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long = "verbose", short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long = "no-color", global = true, env = "NO_COLOR")]
    pub no_color: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the smoke tests described by a suite file
    Run(RunArgs),
    /// Check whether a URL is live
    Ping(PingArgs),
    /// Write a starter suite file
    Init(InitArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Suite file (.yaml, .yml, .toml or .json)
    #[arg(default_value = DEFAULT_SUITE_FILE)]
    pub config: PathBuf,

    /// Stop executing tests on the first failure
    #[arg(long = "fail-fast", short = 'f')]
    pub fail_fast: bool,

    /// Abort the whole run after this long (supports ms/s/m/h)
    #[arg(long = "deadline", value_parser = parse_duration_arg)]
    pub deadline: Option<Duration>,
}

#[derive(Debug, Args, Clone)]
pub struct PingArgs {
    /// Target URL
    pub url: String,

    /// Timeout for the ping request (supports ms/s/m/h)
    #[arg(long = "timeout", short = 't', default_value = "5s", value_parser = parse_duration_arg)]
    pub timeout: Duration,
}

#[derive(Debug, Args, Clone)]
pub struct InitArgs {
    /// Where to write the suite; the extension picks the format
    #[arg(default_value = DEFAULT_SUITE_FILE)]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long = "force")]
    pub force: bool,
}
