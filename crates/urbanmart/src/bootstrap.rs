use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file name used by dashboard mode when `--log-file` is not given.
pub const LOG_FILE_NAME: &str = "urbanmart.log";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// `~/.urbanmart/`, or `./.urbanmart/` when there is no home directory.
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".urbanmart")
}

/// Ensure `~/.urbanmart/` and `~/.urbanmart/logs/` exist and return the
/// logs directory.
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    ensure_directories_in(&app_dir())
}

fn ensure_directories_in(base: &Path) -> anyhow::Result<PathBuf> {
    let logs = base.join("logs");
    std::fs::create_dir_all(&logs)
        .with_context(|| format!("cannot create {}", logs.display()))?;
    Ok(logs)
}

/// Where log lines go for `mode`: the explicit file if any, otherwise a file
/// under `logs_dir` for the dashboard (stderr would corrupt the screen) and
/// stderr for the printing modes.
pub fn resolve_log_file(mode: &str, explicit: Option<&Path>, logs_dir: &Path) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None if mode == "dashboard" => Some(logs_dir.join(LOG_FILE_NAME)),
        None => None,
    }
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to an [`EnvFilter`] directive.
///
/// Unrecognised names fall back to `info`.
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" | "WARN" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Writes to `log_file` (appending, no ANSI colours) when given, otherwise to
/// stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry().with(filter).with(layer).try_init()?;
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(layer).try_init()?;
        }
    }

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
