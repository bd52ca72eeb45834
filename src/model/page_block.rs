//! Line-granular page blocks for full-text rendering.

use super::BBox;
use serde::{Deserialize, Serialize};

/// All blocks of one page, in layout order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBlockData {
    /// Page number (1-indexed)
    pub page_index: u32,

    /// Blocks on the page
    pub page_blocks: Vec<PageBlock>,
}

/// A layout block with its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBlock {
    /// Block type
    #[serde(rename = "type")]
    pub block_type: PageBlockType,

    /// Position on the page (1-based)
    pub index: usize,

    /// Block rectangle
    pub bbox: BBox,

    /// Heading depth for title blocks (0 when unknown)
    pub level: u32,

    /// Lines of the block
    pub texts: Vec<BlockText>,

    /// Whether the layout tool removed lines from this block
    pub lines_deleted: bool,
}

/// Rendering category of a page block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageBlockType {
    /// Heading
    Title,
    /// Running text, captions and anything unclassified
    PlainText,
    /// Figure body
    Figure,
    /// Table body
    Table,
    /// Display formula
    IsolateFormula,
}

/// One rendered line of a block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockText {
    /// Line text
    pub text: String,

    /// Line rectangle
    pub bbox: BBox,

    /// Whether the line continues from the previous page
    pub cross_page: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_type_names() {
        let json = serde_json::to_string(&PageBlockType::IsolateFormula).unwrap();
        assert_eq!(json, "\"isolate_formula\"");
        let json = serde_json::to_string(&PageBlockType::PlainText).unwrap();
        assert_eq!(json, "\"plain_text\"");
    }
}
