//! Tracing setup for CineScope
//!
//! Dual output: the console shows the caller's chosen level while a full
//! debug record of every resolution and session transition lands in a log
//! file, so a misbehaving provider can be diagnosed after the fact.

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Name of the per-run debug log, overwritten on each initialization.
const LOG_FILE_NAME: &str = "cinescope-last-run.log";

/// Initializes global tracing with console and file output.
///
/// The console respects `RUST_LOG` when set, falling back to
/// `console_level`. The file layer always captures `trace` and writes to
/// `cinescope-last-run.log` under `logs_dir` (default `./logs`), creating
/// the directory if needed. Returns the path of the log file.
///
/// Call once per process; a second call fails because the global
/// subscriber is already installed.
///
/// # Errors
/// - `Box<dyn std::error::Error>` - Log directory or file could not be
///   created, or a global subscriber is already set
pub fn init_tracing(
    console_level: Level,
    logs_dir: Option<&Path>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let logs_dir = logs_dir.unwrap_or_else(|| Path::new("logs"));
    create_dir_all(logs_dir)?;
    let log_path = logs_dir.join(LOG_FILE_NAME);
    let log_file = File::create(&log_path)?;

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.to_string()));
    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_filter(console_filter);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(log_file)
        .with_filter(EnvFilter::new("trace"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!(console = %console_level, file = %log_path.display(), "tracing initialized");
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single tracing test: the global subscriber can only be installed once
    // per process.
    #[test]
    fn init_creates_the_log_file_and_captures_debug() {
        let logs_dir = std::env::temp_dir().join(format!(
            "cinescope-tracing-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos(),
        ));

        let log_path = init_tracing(Level::WARN, Some(&logs_dir)).unwrap();
        tracing::debug!("resolution diagnostics land on disk");

        assert!(log_path.exists());
        assert_eq!(
            log_path.file_name().and_then(|name| name.to_str()),
            Some(LOG_FILE_NAME)
        );

        // Second initialization must fail cleanly instead of panicking.
        assert!(init_tracing(Level::WARN, Some(&logs_dir)).is_err());

        let _ = std::fs::remove_dir_all(&logs_dir);
    }
}
