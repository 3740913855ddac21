//! Logging init: append to a log file under the XDG state dir, or fall back to stderr.
//!
//! `RUST_LOG` overrides the built-in filter. `verbose` raises tilefetch's own
//! targets to `trace` and mirrors file output on stderr.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "tilefetch.log";

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "info,tilefetch=trace,tilefetch_core=trace"
    } else {
        "warn,tilefetch=info,tilefetch_core=info"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)))
}

/// `$XDG_STATE_HOME/tilefetch/tilefetch.log`.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tilefetch")?;
    // The prefixed state home is already `$XDG_STATE_HOME/tilefetch`.
    Ok(xdg_dirs.get_state_home().join(LOG_FILE_NAME))
}

/// Opens `path` for appending, creating its parent directories.
fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::OpenOptions::new().create(true).append(true).open(path)
}

/// Initializes logging to [`log_file_path`] and returns that path.
/// An error leaves no subscriber installed, so the caller can use [`init_logging_stderr`].
pub fn init_logging(verbose: bool) -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = open_log_file(&path).with_context(|| format!("open log {}", path.display()))?;

    let writer = if verbose {
        BoxMakeWriter::new(Mutex::new(file).and(io::stderr))
    } else {
        BoxMakeWriter::new(Mutex::new(file))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(writer)
        .with_ansi(false)
        .init();

    tracing::debug!("logging to {}", path.display());
    Ok(path)
}

/// Logs to stderr only.
pub fn init_logging_stderr(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}
