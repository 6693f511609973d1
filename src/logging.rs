use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV_VAR: &str = "GUTEN_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

/// Filter from `GUTEN_LOG`, falling back to `info` when unset or invalid.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Route tracing output to `path`. The terminal belongs to the UI, so
/// nothing is ever written to stdout or stderr.
pub fn init_file_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .with(env_filter())
        .try_init()?;
    Ok(())
}
