use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "EXHALE_LOG";
const DEFAULT_FILTER: &str = "exhale=info";

/// Route tracing output to a daily log file under `dir`.
///
/// The terminal belongs to the TUI, so nothing is written to stdout or
/// stderr. Keep the returned guard alive until exit or buffered lines are
/// lost. Returns None when the directory cannot be created.
pub fn init_file_logging(dir: &Path) -> Option<WorkerGuard> {
    std::fs::create_dir_all(dir).ok()?;

    let file_appender = tracing_appender::rolling::daily(dir, "exhale.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_line_number(true)
                .with_ansi(false),
        )
        .try_init()
        .ok()?;

    Some(guard)
}

/// Log to stderr; used by the one-shot subcommands.
///
/// Returns false when a global subscriber was already installed.
pub fn init_stderr_logging() -> bool {
    tracing_subscriber::registry()
        .with(filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init()
        .is_ok()
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
