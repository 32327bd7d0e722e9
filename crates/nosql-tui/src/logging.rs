//! File logging.
//!
//! The terminal belongs to the UI, so log output only goes to a file and
//! only when one is requested. Records from the `log` macros used across
//! both crates are forwarded to the subscriber.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;

use crate::error::{TuiError, TuiResult};

/// Names the log file; unset means no logging.
pub const LOG_FILE_ENV: &str = "NOSQL_TUI_LOG";

/// Install a debug-level subscriber appending to `path`. Without a path
/// nothing is installed and log records are dropped.
pub fn init_logging(path: Option<&Path>) -> TuiResult<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| TuiError::Logging(format!("cannot open {}: {}", path.display(), e)))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_max_level(LevelFilter::DEBUG)
        .try_init()
        .map_err(|e| TuiError::Logging(e.to_string()))?;

    log::info!("nosql-tui {} starting", env!("CARGO_PKG_VERSION"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_path_is_a_no_op() {
        assert!(init_logging(None).is_ok());
    }

    #[test]
    fn test_unwritable_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir").join("tui.log");
        let err = init_logging(Some(&missing)).unwrap_err();
        assert!(matches!(err, TuiError::Logging(_)));
    }
}
