//! Tracing initialization.
//!
//! Every run writes to the console and, unless disabled, to a fresh
//! `file_organizer_YYYYMMDD_HHMMSS.log` opened for append. Both layers share one
//! filter (the `-v`/`-q` level unless `RUST_LOG` is set) and carry a local
//! timestamp, the level and the message.
//!
//! The file layer goes through `tracing_appender::non_blocking`; the returned
//! [`LoggingGuard`] must be held until exit so buffered lines are flushed.

use chrono::{DateTime, Local};
use std::fmt as stdfmt;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::util::SubscriberInitExt;

/// Local timestamp formatter (YYYY-MM-DD HH:MM:SS,mmm)
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S,%3f"))
    }
}

/// Keeps the file writer alive and remembers where it writes.
#[derive(Debug, Default)]
pub struct LoggingGuard {
    log_file: Option<PathBuf>,
    _worker: Option<WorkerGuard>,
}

impl LoggingGuard {
    /// The log file of this run, if file logging is active.
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

/// Maps `-q` / `-v` flags to a level: quiet is errors only, then info, debug, trace.
pub fn level_from_flags(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Name of the log file for a run started at `started`.
pub fn log_file_name(started: DateTime<Local>) -> String {
    format!("file_organizer_{}.log", started.format("%Y%m%d_%H%M%S"))
}

/// `RUST_LOG` directives when set, otherwise the level from the flags.
fn env_filter(level: LevelFilter) -> EnvFilter {
    filter_from(level, std::env::var("RUST_LOG").ok().as_deref())
}

fn filter_from(level: LevelFilter, directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives.unwrap_or_default())
}

/// Installs the global subscriber.
///
/// With `log_dir` set, a timestamp-named log file is created there. If it
/// cannot be opened the run continues with console logging only and a warning
/// is printed to stderr.
pub fn init_logging(level: LevelFilter, log_dir: Option<&Path>) -> LoggingGuard {
    let console_layer = tsfmt::layer()
        .with_timer(LocalTime)
        .with_level(true)
        .with_target(false)
        .with_writer(io::stderr);

    let file = log_dir.and_then(|dir| match open_log_file(dir) {
        Ok(opened) => Some(opened),
        Err((path, e)) => {
            eprintln!(
                "Failed to open log file {}: {}; logging to console only.",
                path.display(),
                e
            );
            None
        }
    });

    match file {
        Some((path, file)) => {
            let (writer, worker) = tracing_appender::non_blocking(file);
            let file_layer = tsfmt::layer()
                .with_timer(LocalTime)
                .with_level(true)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer);
            let installed = registry()
                .with(env_filter(level))
                .with(console_layer)
                .with(file_layer)
                .try_init();
            if let Err(e) = installed {
                eprintln!("Logging already initialized: {}", e);
            }
            LoggingGuard {
                log_file: Some(path),
                _worker: Some(worker),
            }
        }
        None => {
            if let Err(e) = registry()
                .with(env_filter(level))
                .with(console_layer)
                .try_init()
            {
                eprintln!("Logging already initialized: {}", e);
            }
            LoggingGuard::default()
        }
    }
}

fn open_log_file(dir: &Path) -> Result<(PathBuf, std::fs::File), (PathBuf, io::Error)> {
    let path = dir.join(log_file_name(Local::now()));
    std::fs::create_dir_all(dir).map_err(|e| (path.clone(), e))?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| (path.clone(), e))?;
    let path = std::path::absolute(&path).unwrap_or(path);
    Ok((path, file))
}
