//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins over the level passed in, so a single run can be made
//! noisier without touching the config file.

use std::fs::OpenOptions;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use crate::Result;

fn filter(level: &str, verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { level };
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("barcode_ledger={level}")))
}

/// Log to stderr at `level` (`debug` when `verbose`)
pub fn init_logging(level: &str, verbose: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(level, verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .try_init()
        .ok();

    Ok(())
}

/// Append logs to `log_file` instead of stderr
pub fn init_file_logging(log_file: &Path, level: &str, verbose: bool) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(level, verbose))
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok();

    Ok(())
}
