//! Layout-tool JSON adapter.
//!
//! The layout tool emits two correlated files: a flat content list in
//! reading order and a page/block/line/span "middle" structure with
//! geometry. The content list is read first ([`content_list`]), the middle
//! file second ([`middle`]), and the figures and formulas of the first pass
//! are back-filled from the records the second pass writes.

mod content_list;
mod full_text;
mod middle;
pub mod schema;

pub use schema::{ContentListEntry, MiddleJson};

use crate::assemble::{assemble_layout, ParsedDocument};
use crate::error::{Error, Result};
use crate::model::{BBox, FormulaRecords, ImageRecords};
use crate::parser::ParseOptions;
use content_list::ContentList;
use middle::Middle;

/// Page index and size that block rectangles are resolved against.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PageGeometry {
    /// 0-based page index
    pub page_idx: u32,
    pub size: [f64; 2],
}

impl PageGeometry {
    pub fn new(page_idx: u32, size: [f64; 2]) -> Self {
        Self { page_idx, size }
    }

    /// Geometry for a block that may carry its own page size.
    pub fn for_block(self, block: &schema::MiddleBlock) -> Self {
        Self {
            size: block.size_or(self.size),
            ..self
        }
    }

    pub fn rect(self, rect: [f64; 4]) -> BBox {
        BBox::from_rect(rect, self.page_idx, self.size[0], self.size[1])
    }

    /// 1-based page number.
    pub fn page_number(self) -> u32 {
        self.page_idx + 1
    }
}

/// Output of both passes, ready for assembly.
#[derive(Debug, Default)]
pub(crate) struct LayoutPasses {
    pub content: ContentList,
    pub middle: Middle,
    pub images: ImageRecords,
    pub formulas: FormulaRecords,
}

fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data)
}

/// Decode a content-list file.
pub fn parse_content_list(data: &[u8]) -> Result<Vec<ContentListEntry>> {
    Ok(serde_json::from_slice(strip_bom(data))?)
}

/// Decode a middle file.
pub fn parse_middle(data: &[u8]) -> Result<MiddleJson> {
    Ok(serde_json::from_slice(strip_bom(data))?)
}

fn load_content_list(data: Option<&[u8]>, options: &ParseOptions) -> Result<Vec<ContentListEntry>> {
    let parsed = match data {
        Some(data) => parse_content_list(data),
        None => Err(Error::MissingArtifact("content list".to_string())),
    };

    match parsed {
        Ok(entries) => Ok(entries),
        Err(e) if options.is_lenient() => {
            log::warn!("Content list unusable, continuing without it: {}", e);
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Run both passes and back-fill geometry into the first pass's output.
pub(crate) fn run(
    content_list: Option<&[u8]>,
    middle: &[u8],
    mut images: ImageRecords,
    options: &ParseOptions,
) -> Result<LayoutPasses> {
    let entries = load_content_list(content_list, options)?;
    let middle_json = parse_middle(middle)?;

    let mut content = content_list::parse(&entries, &images);
    let mut formulas = FormulaRecords::new();
    let middle = middle::parse(&middle_json, &mut images, &mut formulas, &content.titles);

    for pending in &mut content.figures {
        let Some(record) = images.get(&pending.image) else {
            continue;
        };
        let figure = &mut pending.figure;
        figure.bbox = record.bbox;
        figure.ref_bbox = record.ref_bbox;
        figure.section_title = record.section_title.clone();
        figure.section_id = record.section_id.clone();
        if figure.ref_content.is_empty() {
            figure.ref_content = record.caption.clone();
        }
    }
    for formula in &mut content.formulas {
        if let Some(record) = formulas.get(&formula.ref_content) {
            formula.bbox = record.bbox;
            formula.section_title = record.section_title.clone();
            formula.section_id = record.section_id.clone();
        }
    }

    Ok(LayoutPasses {
        content,
        middle,
        images,
        formulas,
    })
}

/// Parse the layout tool's artifacts into a finished document.
///
/// `content_list` may be `None` in lenient mode; the middle file is always
/// required.
pub fn parse_document(
    content_list: Option<&[u8]>,
    middle: &[u8],
    images: ImageRecords,
    options: &ParseOptions,
) -> Result<ParsedDocument> {
    let passes = run(content_list, middle, images, options)?;
    Ok(assemble_layout(passes, &options.catalogue))
}
