use std::fs;
use std::path::Path;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::common::error::{NormalizeError, Result};

const LOG_FILE_PREFIX: &str = "hospital_jobs.log";
const DEFAULT_DIRECTIVE: &str = "hospital_jobs=info";

/// Initializes logging with console output and daily-rotated JSON files under `log_dir`.
///
/// `RUST_LOG` is honored; without it only this crate logs at `info`. Console output goes to
/// stderr so stdout stays clean for `inspect`.
pub fn init_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let directive = DEFAULT_DIRECTIVE
        .parse()
        .map_err(|e| NormalizeError::Config(format!("invalid log directive: {e}")))?;
    let filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| NormalizeError::Config(format!("logging already initialized: {e}")))?;

    // keep the writer alive for the process lifetime so buffered lines are flushed
    std::mem::forget(guard);
    Ok(())
}
