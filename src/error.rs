//! Error types for the docstruct library.

use std::io;
use thiserror::Error;

/// Result type alias for docstruct operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting document structure.
///
/// Only structural failures surface here. Field-level misses (a bad
/// coordinate, a missing name) degrade to absent values instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input files or writing artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is neither TEI XML nor layout-tool JSON.
    #[error("Unknown input format: expected TEI XML or layout JSON")]
    UnknownFormat,

    /// A required root element or section is absent.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// The XML input is not well formed.
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// The JSON input does not match the expected layout schema.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input bytes are not valid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A layout artifact (content list, middle file) could not be located.
    #[error("Missing artifact: {0}")]
    MissingArtifact(String),

    /// Error during rendering (JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::Encoding(err.to_string())
    }
}
