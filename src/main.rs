//! dfm - DeepFilter Multimedia
//!
//! Entry point: parses arguments, loads configuration, runs the batch and
//! maps the outcome to a process exit code.

use std::error::Error as _;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, Level};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dfm::batch::{check_output_arity, resolve_inputs, BatchRunner};
use dfm::cli::Args;
use dfm::config::{Config, LoggingConfig};
use dfm::enhance::EnhancerFactory;
use dfm::error::DfmError;
use dfm::media::MediaToolFactory;
use dfm::router::{FileRouter, MediaKind};

/// Exit code reported when the user interrupts the run
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return report_error(&e, args.verbose),
    };
    args.apply_overrides(&mut config);

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = match setup_logging(&config.logging, &args) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // `None` means interrupted; the batch future (and its temp dirs) is dropped by then
    let outcome = tokio::select! {
        result = run(&args, config) => Some(result),
        Ok(()) = tokio::signal::ctrl_c() => None,
    };

    match outcome {
        Some(Ok(code)) => code,
        Some(Err(e)) => report_error(&e, args.verbose),
        None => {
            eprintln!("\n\nInterrupted by user");
            // Do not wait for an in-flight inference task during runtime shutdown
            std::process::exit(EXIT_INTERRUPTED.into());
        }
    }
}

async fn run(args: &Args, config: Config) -> dfm::error::Result<ExitCode> {
    let media = MediaToolFactory::create(config.media.clone());

    if args.check {
        let version = media.version_info().await?;
        println!("{}", version);
        return Ok(ExitCode::SUCCESS);
    }

    check_output_arity(args.input.len(), args.output.as_deref())?;
    let inputs = resolve_inputs(&args.input)?;
    if inputs.is_empty() {
        return Err(DfmError::InvalidArgument("No supported media files found".to_string()));
    }
    debug!("Resolved {} input file(s)", inputs.len());

    if inputs
        .iter()
        .any(|p| matches!(MediaKind::from_path(p), Ok(MediaKind::Video)))
    {
        media.check_availability().await?;
    }

    let enhancer = EnhancerFactory::create(&config.enhance, args.show_progress())?;
    let keep_going = config.batch.keep_going;
    let router = FileRouter::new(config, media, enhancer);

    let report = BatchRunner::new(&router, keep_going, args.show_progress())
        .run(&inputs, args.output.as_deref())
        .await?;

    if report.is_success() {
        info!("Processed {} file(s)", report.total());
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("Error: {} of {} file(s) failed", report.failed.len(), report.total());
        Ok(ExitCode::FAILURE)
    }
}

/// Print the error (and its causes when verbose) and return its exit code
fn report_error(e: &DfmError, verbose: bool) -> ExitCode {
    eprintln!("Error: {}", e);

    if matches!(e, DfmError::InvalidArgument(_) | DfmError::UnsupportedType { .. }) {
        eprintln!("Run 'dfm --help' for usage.");
    }

    if verbose {
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
    }

    ExitCode::from(e.exit_code() as u8)
}

/// Setup logging to the console and, when configured, a rolling log file
fn setup_logging(logging: &LoggingConfig, args: &Args) -> Result<Option<WorkerGuard>> {
    let log_level = if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match &logging.log_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)?;
            let file_appender = rolling::daily(log_dir, "dfm.log");
            let (non_blocking_file, guard) = non_blocking(file_appender);

            let layer = fmt::layer()
                .with_writer(non_blocking_file)
                .with_target(false)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false); // No ANSI colors in file

            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    debug!("Logging initialized at {}", log_level);
    Ok(guard)
}
