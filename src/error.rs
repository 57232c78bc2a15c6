//! Error types for the textscrub library.
//!
//! The text pipeline itself is total over its input and never returns an
//! error; these variants cover the edges that touch the outside world,
//! currently polarity-lexicon loading.

use std::io;
use thiserror::Error;

/// Result type alias for textscrub operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for textscrub library.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading a lexicon file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Lexicon JSON could not be parsed.
    #[error("Lexicon JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Lexicon file declares a format version this build does not understand.
    #[error("Unsupported lexicon version: {0}")]
    UnsupportedLexiconVersion(u32),

    /// Lexicon content failed validation.
    #[error("Invalid lexicon: {0}")]
    InvalidLexicon(String),
}
