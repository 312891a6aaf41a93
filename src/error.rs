//! Error types for the lexindex library.
//!
//! All fallible operations return [`LexIndexError`] through the [`Result`]
//! alias. The variants follow the three failure domains of the engine:
//! stream I/O, malformed persisted data, and unsupported query syntax.
//!
//! # Examples
//!
//! ```
//! use lexindex::error::{LexIndexError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(LexIndexError::query("dangling '+'"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for lexindex operations.
#[derive(Error, Debug)]
pub enum LexIndexError {
    /// I/O errors (stream not open, short read or write, missing files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed, truncated or mismatched persisted index data.
    #[error("Format error: {0}")]
    Format(String),

    /// Unsupported or ambiguous query syntax.
    #[error("Query error: {0}")]
    Query(String),

    /// Configuration errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with LexIndexError.
pub type Result<T> = std::result::Result<T, LexIndexError>;

impl LexIndexError {
    /// Create a new format error.
    pub fn format<S: Into<String>>(msg: S) -> Self {
        LexIndexError::Format(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        LexIndexError::Query(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        LexIndexError::Config(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        LexIndexError::InvalidArgument(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LexIndexError::Other(msg.into())
    }

    /// Map a decoding I/O failure, turning a premature end of stream into a
    /// format error that names what was being read.
    pub fn from_read(err: io::Error, what: &str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            LexIndexError::Format(format!("truncated data while reading {what}"))
        } else {
            LexIndexError::Io(err)
        }
    }

    /// Whether this error came from malformed persisted data.
    pub fn is_format(&self) -> bool {
        matches!(self, LexIndexError::Format(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = LexIndexError::format("bad magic");
        assert_eq!(error.to_string(), "Format error: bad magic");

        let error = LexIndexError::query("dangling '+'");
        assert_eq!(error.to_string(), "Query error: dangling '+'");

        let error = LexIndexError::config("missing dump path");
        assert_eq!(error.to_string(), "Configuration error: missing dump path");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let lex_error = LexIndexError::from(io_error);

        match lex_error {
            LexIndexError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_unexpected_eof_becomes_format_error() {
        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        let error = LexIndexError::from_read(eof, "posting count");
        assert!(error.is_format());
        assert!(error.to_string().contains("posting count"));

        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert!(!LexIndexError::from_read(denied, "header").is_format());
    }
}
