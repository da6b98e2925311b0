// Logging module - Logging infrastructure
use crate::domain::error::{TermLinkError, TermLinkResult};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where log lines go
#[derive(Debug, Clone)]
pub enum LogTarget {
    /// Standard error, for command-line use
    Stderr,
    /// Append to a file, for while the terminal UI owns the screen
    File(PathBuf),
}

/// Default log file for the terminal UI
pub fn default_log_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("termlink")
        .join("termlink.log")
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(log_level: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { log_level };
    format!("termlink={},warn", level)
}

/// Initialize logging system
pub fn init_logging(log_level: &str, verbose: bool, target: &LogTarget) -> TermLinkResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level, verbose)));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match target {
        LogTarget::Stderr => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .try_init(),
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(true)
                        .with_level(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init()
        }
    };

    result.map_err(|e| TermLinkError::Config {
        message: format!("Failed to initialize logging: {}", e),
    })?;

    tracing::info!("TermLink logging system initialized");
    Ok(())
}

fn open_log_file(path: &Path) -> TermLinkResult<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| TermLinkError::Config {
            message: format!("Failed to create log directory {}: {}", parent.display(), e),
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| TermLinkError::Config {
            message: format!("Failed to open log file {}: {}", path.display(), e),
        })
}
