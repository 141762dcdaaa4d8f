//! Error types for the handwriting metrics crate.
//!
//! Metric computation itself never fails; these cover the edges where raw
//! input is assembled, configured or read from disk.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Stroke layout mismatch: stroke lengths cover {expected} points, got {actual}")]
    StrokeLayout { expected: usize, actual: usize },

    #[error("Stroke {index} has no points")]
    EmptyStroke { index: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Trace parse error on line {line}: {reason}")]
    TraceParse { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
