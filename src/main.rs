//! CLI entry point for flight_routes.
//!
//! Converts a CSV of historical flights into a per-route JSON dataset and
//! exits non-zero when any input row could not be parsed.

use anyhow::Result;
use clap::Parser;
use flight_routes::pipeline;
use std::ffi::OsStr;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "flight_routes")]
#[command(about = "Partition flight records into per-route JSON columns", long_about = None)]
struct Cli {
    /// CSV file of flight records (may be gzip-compressed with a .gz suffix)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Directory to write the dataset into; recreated on every run
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing();

    let cli = Cli::parse();

    let stats = pipeline::run(&cli.input, &cli.output_dir)?;
    stats.report(&mut std::io::stdout(), &mut std::io::stderr())?;

    Ok(if stats.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Stderr logging (colored on a terminal), plus a JSON rolling log file
/// when `LOG_FILE_PATH` is set. The returned guard flushes the file writer
/// on drop.
fn init_tracing() -> Option<WorkerGuard> {
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(LevelFilter::INFO.into()));

    let mut file_guard = None;
    let json_layer = std::env::var("LOG_FILE_PATH").ok().map(|log_file_path| {
        let path = Path::new(&log_file_path);
        let log_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let log_file_name = path
            .file_name()
            .unwrap_or(OsStr::new("flight_routes.log"));

        let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
        file_guard = Some(guard);

        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(non_blocking_file)
            .with_filter(
                EnvFilter::from_env("RUST_LOG_JSON").add_directive(LevelFilter::DEBUG.into()),
            )
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    file_guard
}
