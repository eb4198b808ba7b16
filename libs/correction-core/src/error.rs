//! Error types for correction-core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ParseError.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while parsing content files.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing title at line {line}")]
    MissingTitle { line: usize },

    #[error("missing text at line {line}")]
    MissingText { line: usize },

    #[error("missing {field} at line {line}")]
    MissingField { field: &'static str, line: usize },

    #[error("invalid ID format at line {line}: {value}")]
    InvalidId { line: usize, value: String },

    #[error("duplicate ID {id} at line {line}")]
    DuplicateId { id: String, line: usize },

    #[error("unknown category at line {line}: {value}")]
    UnknownCategory { line: usize, value: String },

    #[error("unterminated error marker at line {line}")]
    UnterminatedMarker { line: usize },

    #[error("content outside of a record at line {line}")]
    OrphanLine { line: usize },
}

/// Errors that can occur while building or loading a content store.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: ParseError,
    },

    #[error("flashcard catalog is empty")]
    NoFlashcards,

    #[error("practice text list is empty")]
    NoTexts,

    #[error("duplicate token id {token_id} in text {text_id}")]
    DuplicateToken { text_id: u32, token_id: String },
}
