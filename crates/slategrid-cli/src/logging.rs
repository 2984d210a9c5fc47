use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing::Subscriber;
use tracing_subscriber::{
    Layer,
    filter::{LevelFilter, Targets},
    fmt,
    prelude::*,
    registry::LookupSpan,
};

/// Target prefix shared by the engine library and this binary.
const APP_TARGET: &str = "slategrid";

/// Maps `-v` counts to a level. `--quiet` still lets errors through.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Engine and CLI records follow `level`; the HTTP stack is capped at WARN.
pub fn targets(level: LevelFilter) -> Targets {
    Targets::new()
        .with_target(APP_TARGET, level)
        .with_default(level.min(LevelFilter::WARN))
}

fn file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true)
}

/// Installs the global subscriber: compact records on stderr, plus plain records in
/// `log_file` when given.
///
/// # Errors
///
/// Returns `CliError::Io` if the log file cannot be created and `CliError::Other` if a
/// global subscriber is already installed.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let level = level_filter(verbosity, quiet);
    let file = log_file
        .as_deref()
        .map(File::create)
        .transpose()
        .map_err(CliError::Io)?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(targets(level));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file.map(|file| file_layer(file).with_filter(targets(level))))
        .try_init()
        .map_err(|e| CliError::Other(e.into()))
}
