//! File-backed tracing setup. The terminal is owned by the TUI, so log
//! output goes to a file instead of stderr.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::{Mutex, Once};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Per-target filter directives, e.g. `STUDENT_MANAGEMENT_LOG=student_management=debug`.
pub const LOG_ENV: &str = "STUDENT_MANAGEMENT_LOG";

const DEFAULT_FILTER: &str = "student_management=info";

static INIT: Once = Once::new();

/// Install the global subscriber writing to `path`. Calling it again is a
/// no-op.
pub fn init_tracing(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("failed to create log directory")?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // A subscriber may already be installed by a test harness.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .try_init();
    });

    Ok(())
}
