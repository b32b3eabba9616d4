use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs the global `tracing` subscriber.
///
/// `SMOKESWEEP_LOG` wins over `RUST_LOG`; without either, the `-v` count
/// picks the level (see [`verbosity_level`]). Logs go to stderr so stdout only
/// carries the rendered report.
pub fn init_logging(verbose: u8, no_color: bool) {
    let filter = std::env::var("SMOKESWEEP_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(
            |_| EnvFilter::new(verbosity_level(verbose)),
            |value| {
                EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new(verbosity_level(verbose)))
            },
        );

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

/// Maps the number of `-v` flags to a level: warn, info, debug, then trace.
#[must_use]
pub const fn verbosity_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
