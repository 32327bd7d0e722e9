//! Error types for nosql-tui.

use std::io;
use thiserror::Error;

/// TUI-specific error type.
#[derive(Error, Debug)]
pub enum TuiError {
    /// Terminal I/O error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),

    /// Clipboard access or write failed.
    #[error("{0}")]
    Clipboard(String),

    /// Logger could not be installed.
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Result type alias for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;
