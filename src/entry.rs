use std::sync::Arc;

use clap::Parser;
use tracing::{debug, error, warn};

use smokesweep::args::{Cli, Command, InitArgs, PingArgs, RunArgs};
use smokesweep::config::{SuiteFile, load_suite, write_suite_file};
use smokesweep::error::{AppError, AppResult, ValidationError};
use smokesweep::logger::init_logging;
use smokesweep::ping::ping;
use smokesweep::runner::{RunOptions, execute};
use smokesweep::shutdown::shutdown_channel;
use smokesweep::shutdown_handlers::setup_signal_shutdown_handler;
use smokesweep::summary::{
    ConsoleObserver, render_liveness, render_report, render_unreachable_total, use_color,
};

pub(crate) fn run() -> AppResult<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|source| AppError::validation(ValidationError::RuntimeBuildFailed { source }))?;

    let color = use_color(cli.no_color);
    runtime.block_on(run_async(cli.command, color))
}

async fn run_async(command: Command, color: bool) -> AppResult<()> {
    match command {
        Command::Run(args) => run_suite(args, color).await,
        Command::Ping(args) => run_ping(args, color).await,
        Command::Init(args) => run_init(&args),
    }
}

async fn run_suite(args: RunArgs, color: bool) -> AppResult<()> {
    let suite = load_suite(&args.config)?;
    debug!(config = %args.config.display(), "Config file loaded successfully");

    let observer = Arc::new(ConsoleObserver::new(color));
    let mut options = RunOptions::new(args.fail_fast).with_observer(observer.clone());
    if let Some(deadline) = args.deadline {
        options = options.with_deadline(deadline);
    }

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);
    let outcome = execute(&suite, &options, shutdown_rx).await;
    drop(shutdown_tx.send(()));
    if let Err(err) = signal_handle.await {
        error!("Signal handler failed: {}", err);
    }

    let report = match outcome {
        Ok(report) => report,
        Err(err) if err.is_cancelled() => {
            warn!(error = %err, "Run stopped before every check finished");
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    let unreachable = observer.unreachable_count();
    if !report.is_empty() || unreachable == 0 {
        for line in render_report(&report, color)? {
            println!("{line}");
        }
    }
    if unreachable > 0 {
        println!("{}", render_unreachable_total(unreachable));
        return Err(AppError::TargetsUnreachable { count: unreachable });
    }
    if report.all_passed() {
        Ok(())
    } else {
        Err(AppError::ChecksFailed {
            failed: report.failed_count(),
            total: report.results().len(),
        })
    }
}

async fn run_ping(args: PingArgs, color: bool) -> AppResult<()> {
    let liveness = ping(&args.url, args.timeout).await.inspect_err(|err| {
        error!(url = %args.url, error = %err, "Ping failed");
    })?;
    println!("{}", render_liveness(&args.url, liveness, color));
    Ok(())
}

fn run_init(args: &InitArgs) -> AppResult<()> {
    write_suite_file(&args.path, &SuiteFile::starter(), args.force)?;
    println!("Wrote starter suite to {}", args.path.display());
    Ok(())
}
