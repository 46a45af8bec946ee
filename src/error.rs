//! Error types for stylemark library.
//!
//! Encoding and decoding never fail: malformed markup is recovered locally and
//! reported through [`crate::ReadReport`]. These errors come from building a
//! [`crate::StyledText`] by hand or loading one from JSON.

use std::io;
use thiserror::Error;

/// Result type alias for stylemark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for stylemark library.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization of a styled text model failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The range start lies after its end.
    #[error("invalid range {start}..{end}: start > end")]
    InvalidRange { start: usize, end: usize },

    /// The range reaches outside the text.
    #[error("range {start}..{end} is out of bounds for text of len {len}")]
    InvalidBounds { start: usize, end: usize, len: usize },

    /// A range endpoint splits a UTF-8 encoded character.
    #[error("offset {index} is not on a char boundary")]
    NotCharBoundary { index: usize },
}
