//! Source format detection.
//!
//! Sniffs the first bytes of an artifact to tell the extractor's TEI/XML
//! apart from the layout tool's two JSON files.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Kind of parser artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// TEI/XML from the grammar-based extractor
    Tei,
    /// Flat content list from the layout tool
    ContentList,
    /// Page/block/line/span middle file from the layout tool
    Middle,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Tei => write!(f, "TEI/XML"),
            SourceFormat::ContentList => write!(f, "content list JSON"),
            SourceFormat::Middle => write!(f, "middle JSON"),
        }
    }
}

/// Bytes inspected when sniffing.
const SNIFF_LEN: usize = 4096;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Detect the artifact format of a file.
///
/// # Example
/// ```no_run
/// use docstruct::detect::{detect_source_format_from_path, SourceFormat};
///
/// let format = detect_source_format_from_path("paper.tei.xml").unwrap();
/// assert_eq!(format, SourceFormat::Tei);
/// ```
pub fn detect_source_format_from_path<P: AsRef<Path>>(path: P) -> Result<SourceFormat> {
    let file = File::open(path)?;
    let mut head = Vec::with_capacity(SNIFF_LEN);
    BufReader::new(file)
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)?;
    detect_source_format(&head)
}

/// Detect the artifact format from its leading bytes.
///
/// # Returns
/// * `Err(Error::UnknownFormat)` if the data is none of the known artifacts
pub fn detect_source_format(data: &[u8]) -> Result<SourceFormat> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let head = &data[..data.len().min(SNIFF_LEN)];
    let start = head
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .ok_or(Error::UnknownFormat)?;

    match head[start] {
        b'<' if contains(head, b"TEI") || contains(head, b"teiHeader") => Ok(SourceFormat::Tei),
        b'[' => Ok(SourceFormat::ContentList),
        b'{' if contains(head, b"\"pdf_info\"") => Ok(SourceFormat::Middle),
        _ => Err(Error::UnknownFormat),
    }
}

/// Check if bytes look like TEI/XML.
pub fn is_tei(data: &[u8]) -> bool {
    matches!(detect_source_format(data), Ok(SourceFormat::Tei))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
