//! Serde mirror of the layout tool's JSON artifacts.
//!
//! Only the fields the adapter reads are modelled; everything else in the
//! files is ignored. Missing fields fall back to their defaults so that a
//! single odd block never fails the whole file.

use serde::Deserialize;

/// One entry of the flat, reading-order content list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentListEntry {
    /// Entry type (`text`, `image`, `table`, `equation`, ...)
    #[serde(rename = "type")]
    pub entry_type: String,

    /// Extracted raster file of an image or table
    pub img_path: Option<String>,

    /// Caption lines of an image
    pub img_caption: Vec<String>,

    /// Caption lines of a table
    pub table_caption: Vec<String>,

    /// Text, or `$$`-delimited LaTeX for equations
    pub text: String,

    /// Heading depth; positive for headings
    pub text_level: Option<u32>,

    /// 0-based page index
    pub page_idx: u32,
}

/// Classified content-list entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Image,
    Table,
    Equation,
    Text,
}

impl ContentListEntry {
    /// Classify the entry; unknown types count as text.
    pub fn kind(&self) -> ContentKind {
        match self.entry_type.as_str() {
            "image" => ContentKind::Image,
            "table" => ContentKind::Table,
            "equation" => ContentKind::Equation,
            _ => ContentKind::Text,
        }
    }

    /// Caption lines matching the entry's kind.
    pub fn captions(&self) -> &[String] {
        match self.kind() {
            ContentKind::Table => &self.table_caption,
            _ => &self.img_caption,
        }
    }
}

/// Root of the middle file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MiddleJson {
    pub pdf_info: Vec<MiddlePage>,
}

/// One page of the middle file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MiddlePage {
    /// 0-based page index
    pub page_idx: u32,

    /// Page `[width, height]`
    pub page_size: Option<[f64; 2]>,

    /// Blocks in layout order
    pub para_blocks: Vec<MiddleBlock>,
}

/// A layout block; images and tables nest body and caption blocks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MiddleBlock {
    #[serde(rename = "type")]
    pub block_type: String,

    /// `[x0, y0, x1, y1]`
    pub bbox: [f64; 4],

    pub lines: Vec<MiddleLine>,

    /// Nested body/caption/footnote blocks
    pub blocks: Vec<MiddleBlock>,

    /// Block-specific `[width, height]`, overriding the page's
    pub page_size: Option<[f64; 2]>,

    pub lines_deleted: bool,
}

/// A line of a block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MiddleLine {
    pub bbox: [f64; 4],
    pub spans: Vec<MiddleSpan>,
}

/// A typed run of content within a line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MiddleSpan {
    #[serde(rename = "type")]
    pub span_type: String,

    pub content: String,

    pub bbox: [f64; 4],

    /// Extracted raster file for image and table spans
    pub image_path: String,

    pub cross_page: bool,
}

/// Classified middle block type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Title,
    Text,
    Image,
    Table,
    InterlineEquation,
    Other,
}

impl BlockKind {
    /// Type tag of the body and caption sub-blocks (`image` for `image_body`).
    pub fn tag(self) -> &'static str {
        match self {
            BlockKind::Title => "title",
            BlockKind::Text => "text",
            BlockKind::Image => "image",
            BlockKind::Table => "table",
            BlockKind::InterlineEquation => "interline_equation",
            BlockKind::Other => "",
        }
    }
}

impl MiddleBlock {
    pub fn kind(&self) -> BlockKind {
        match self.block_type.as_str() {
            "title" => BlockKind::Title,
            "text" => BlockKind::Text,
            "image" => BlockKind::Image,
            "table" => BlockKind::Table,
            "interline_equation" => BlockKind::InterlineEquation,
            _ => BlockKind::Other,
        }
    }

    /// Whether this is a `*_body` sub-block.
    pub fn is_body(&self) -> bool {
        self.block_type.ends_with("_body")
    }

    /// Whether this is a `*_caption` sub-block.
    pub fn is_caption(&self) -> bool {
        self.block_type.ends_with("_caption")
    }

    /// Size to resolve this block against: its own, else the page's.
    pub fn size_or(&self, page_size: [f64; 2]) -> [f64; 2] {
        self.page_size.unwrap_or(page_size)
    }

    /// All span contents in reading order.
    pub fn span_contents(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .map(|span| span.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_list_defaults() {
        let entries: Vec<ContentListEntry> = serde_json::from_str(
            r#"[{"type": "text", "text": "Intro", "text_level": 1, "page_idx": 0},
                {"type": "image", "img_path": "images/a.jpg", "img_caption": ["Figure 1"], "page_idx": 2},
                {"type": "discarded"}]"#,
        )
        .unwrap();
        assert_eq!(entries[0].kind(), ContentKind::Text);
        assert_eq!(entries[0].text_level, Some(1));
        assert_eq!(entries[1].kind(), ContentKind::Image);
        assert_eq!(entries[1].captions(), ["Figure 1".to_string()]);
        assert_eq!(entries[2].kind(), ContentKind::Text);
        assert!(entries[2].img_path.is_none());
    }

    #[test]
    fn test_middle_block_kinds() {
        let middle: MiddleJson = serde_json::from_str(
            r#"{"pdf_info": [{"page_idx": 0, "page_size": [612, 792], "para_blocks": [
                {"type": "image", "bbox": [1, 2, 3, 4], "blocks": [
                    {"type": "image_body", "bbox": [1, 2, 3, 4]},
                    {"type": "image_caption", "bbox": [1, 5, 3, 6], "page_size": [100, 200]}
                ]},
                {"type": "interline_equation", "bbox": [0, 0, 1, 1]},
                {"type": "list"}
            ]}]}"#,
        )
        .unwrap();
        let page = &middle.pdf_info[0];
        assert_eq!(page.page_size, Some([612.0, 792.0]));
        assert_eq!(page.para_blocks[0].kind(), BlockKind::Image);
        assert!(page.para_blocks[0].blocks[0].is_body());
        assert!(page.para_blocks[0].blocks[1].is_caption());
        assert_eq!(
            page.para_blocks[0].blocks[1].size_or([612.0, 792.0]),
            [100.0, 200.0]
        );
        assert_eq!(page.para_blocks[1].kind(), BlockKind::InterlineEquation);
        assert_eq!(page.para_blocks[2].kind(), BlockKind::Other);
    }
}
