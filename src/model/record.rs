//! Back-reference tables shared between layout passes.
//!
//! Image and formula records are populated while walking the layout
//! blocks and read afterwards to back-fill geometry into the figures and
//! formulas collected from the content list.

use super::BBox;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Geometry and section context of one extracted raster image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Stable identifier of the image
    pub id: String,

    /// Location of the image
    pub bbox: Option<BBox>,

    /// Caption text
    pub caption: String,

    /// Location of the caption
    pub ref_bbox: Option<BBox>,

    /// Title of the enclosing section
    pub section_title: String,

    /// Identifier of the enclosing section
    pub section_id: String,
}

/// Image records keyed by image file name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRecords {
    records: HashMap<String, ImageRecord>,
}

impl ImageRecords {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from extracted image file names.
    ///
    /// Each record gets an id derived from its file name, so the same
    /// image keeps the same id across parses.
    pub fn from_file_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut records = Self::new();
        for name in names {
            let key = basename(name.as_ref());
            if key.is_empty() {
                continue;
            }
            records.insert(key, content_id("image", key));
        }
        records
    }

    /// Register an image under its file name with a caller-chosen id.
    pub fn insert(&mut self, name: &str, id: impl Into<String>) {
        self.records.insert(
            basename(name).to_string(),
            ImageRecord {
                id: id.into(),
                ..Default::default()
            },
        );
    }

    /// Look up a record by file name or path.
    pub fn get(&self, name: &str) -> Option<&ImageRecord> {
        self.records.get(basename(name))
    }

    /// Look up a record for update by file name or path.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ImageRecord> {
        self.records.get_mut(basename(name))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over `(file name, record)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ImageRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Geometry and section context of one display formula.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaRecord {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// LaTeX source
    pub content: String,

    /// Location of the formula
    pub bbox: Option<BBox>,

    /// Title of the enclosing section
    pub section_title: String,

    /// Identifier of the enclosing section
    pub section_id: String,
}

/// Formula records keyed by LaTeX content.
pub type FormulaRecords = HashMap<String, FormulaRecord>;

/// A heading hint from the layout tool's content list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTitle {
    /// Heading depth reported by the layout tool
    pub level: u32,

    /// Heading text
    pub text: String,

    /// Page number (1-indexed)
    pub page_number: u32,
}

/// Final path component of a `/` or `\` separated path.
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Stable identifier derived from a kind tag and a content key.
pub fn content_id(kind: &str, key: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(kind.as_bytes());
    hasher.update([0u8]);
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}
