//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so interactive runs only log when a file is
//! configured (`--log-file` or `APPREG_LOG_DIR`). Subcommands fall back to
//! stderr.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub const LOG_ENV: &str = "APPREG_LOG";
pub const LOG_DIR_ENV: &str = "APPREG_LOG_DIR";
const DEFAULT_FILTER: &str = "appreg=info";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Where log output goes for this run, if anywhere.
pub fn log_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    std::env::var_os(LOG_DIR_ENV)
        .map(PathBuf::from)
        .filter(|d| !d.as_os_str().is_empty())
        .map(|d| d.join(format!("appreg.{}.log", std::process::id())))
}

/// Install the global subscriber. Returns the log file in use.
pub fn init(explicit: Option<&Path>, interactive: bool) -> Result<Option<PathBuf>> {
    if let Some(path) = log_path(explicit) {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create log directory {}", dir.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open log file {}", path.display()))?;
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true);
        tracing_subscriber::registry()
            .with(filter())
            .with(layer)
            .try_init()
            .context("install tracing subscriber")?;
        tracing::info!(path = %path.display(), "logging initialized");
        return Ok(Some(path));
    }

    if !interactive {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .map_err(|e| anyhow::anyhow!("install tracing subscriber: {}", e))?;
    }
    Ok(None)
}
