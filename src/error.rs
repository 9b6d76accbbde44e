//! Error types for the log to figure pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, EvoError>;

/// Everything that can abort a run. None of these are transient so nothing is retried.
#[derive(Error, Debug)]
pub enum EvoError {
    #[error("cannot access {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: malformed header: {reason}", .path.display())]
    MalformedHeader {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("{}:{line}: malformed record in field {field}: {reason}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        field: usize,
        reason: String,
    },

    #[error("{}: {total_lines} lines leave no room for records after the {header_lines} line header",
            .path.display())]
    InsufficientData {
        path: PathBuf,
        total_lines: usize,
        header_lines: usize,
    },

    #[error("rendering failed: {0}")]
    Render(String),

    #[error("decoder worker panicked")]
    WorkerPanicked,
}

impl EvoError {
    /// Line the error points at, if it points at one
    pub fn line(&self) -> Option<usize> {
        match *self {
            EvoError::MalformedHeader { line, .. } | EvoError::MalformedRecord { line, .. } => {
                Some(line)
            }
            _ => None,
        }
    }
}
