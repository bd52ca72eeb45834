//! Table-of-contents types.

use super::BBox;
use serde::{Deserialize, Serialize};

/// A heading in the reconstructed table of contents.
///
/// Items form a forest; each item exclusively owns its children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueItem {
    /// Heading text as found in the source
    pub title: String,

    /// Heading text with canonical number spacing
    pub formatted_title: String,

    /// Canonical dot-separated order key (`2.1`)
    pub title_order: String,

    /// Nesting depth (`"1"` for top-level headings)
    pub level: String,

    /// Position in reading order
    pub order: usize,

    /// Location of the heading
    pub bbox: Option<BBox>,

    /// Nested headings
    pub child: Vec<CatalogueItem>,
}

impl CatalogueItem {
    /// Number of items in this subtree, including this one.
    pub fn total_items(&self) -> usize {
        1 + self.child.iter().map(Self::total_items).sum::<usize>()
    }

    /// Depth-first iterator over this subtree.
    pub fn iter(&self) -> CatalogueIter<'_> {
        CatalogueIter { stack: vec![self] }
    }
}

/// Depth-first pre-order iterator over a catalogue subtree.
pub struct CatalogueIter<'a> {
    stack: Vec<&'a CatalogueItem>,
}

impl<'a> Iterator for CatalogueIter<'a> {
    type Item = &'a CatalogueItem;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.stack.pop()?;
        self.stack.extend(item.child.iter().rev());
        Some(item)
    }
}
