//! Error types for the skeleton codec.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for chunk reading and writing.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Wrong magic tag or unparseable type spec
    #[error("Invalid format: {0}")]
    Format(String),

    /// A structural assumption about the data does not hold
    #[error("Violation of data structure assumption '{0}'")]
    InvariantViolation(String),

    /// Stream ended before the requested bytes were available
    #[error("Unexpected end of stream at position {position} (requested {requested} bytes)")]
    UnexpectedEof { position: u64, requested: usize },

    /// Abstract chunk operation called on a type that does not provide it
    #[error("{operation} is not implemented for {chunk}")]
    NotImplemented { chunk: &'static str, operation: &'static str },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invariant violation error.
    pub fn violation(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Create a format error.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
