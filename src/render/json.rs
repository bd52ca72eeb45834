//! JSON rendering for document artifacts.

use crate::error::{Error, Result};
use serde::Serialize;
use std::io::Write;

/// JSON output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Pretty-printed with indentation
    #[default]
    Pretty,
    /// Compact single-line output
    Compact,
}

/// Serialize an artifact to a JSON string.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Serialize an artifact straight into a writer.
pub fn to_json_writer<T, W>(value: &T, writer: W, format: JsonFormat) -> Result<()>
where
    T: Serialize + ?Sized,
    W: Write,
{
    let result = match format {
        JsonFormat::Pretty => serde_json::to_writer_pretty(writer, value),
        JsonFormat::Compact => serde_json::to_writer(writer, value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
