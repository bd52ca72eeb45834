//! Second pass: the page/block/line/span middle file.
//!
//! Builds paragraphs, page geometry, catalogue candidates and the rendering
//! block stream, and writes geometry into the image and formula records.

use super::schema::{BlockKind, MiddleBlock, MiddleJson, MiddlePage};
use super::{full_text, PageGeometry};
use crate::catalogue::{normalize_title, HeadingCandidate};
use crate::model::{
    content_id, ContentTitle, FigureTable, Formula, FormulaRecord, FormulaRecords, ImageRecords,
    Page, PageBlockData, Paragraph, ParagraphContent, Sentence, Text,
};
use crate::text::{detect_language, join_fragments, split_sentences};
use regex::Regex;
use std::sync::LazyLock;

/// A page or line number glued in front of a numbered heading (`29 1 Intro`).
static LEADING_PAGE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\s+([0-9])").unwrap());

/// Output of the middle pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct Middle {
    pub pages: Vec<Page>,
    pub paragraphs: Vec<Paragraph>,
    pub headings: Vec<HeadingCandidate>,
    pub page_blocks: Vec<PageBlockData>,
}

/// Section context: the last title seen, applied to every block after it.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Section {
    pub title: String,
}

impl Section {
    fn from_title_block(block: &MiddleBlock) -> Self {
        Self {
            title: normalize_title(&heading_text(block)),
        }
    }

    fn id(&self) -> &str {
        &self.title
    }
}

pub(crate) fn parse(
    middle: &MiddleJson,
    images: &mut ImageRecords,
    formulas: &mut FormulaRecords,
    titles: &[ContentTitle],
) -> Middle {
    let mut pass = Middle::default();
    let mut section = Section::default();

    for page in &middle.pdf_info {
        let Some(size) = page.page_size else {
            log::debug!("Page {} has no page size, skipping", page.page_idx);
            continue;
        };
        if page.para_blocks.is_empty() {
            continue;
        }
        let geometry = PageGeometry::new(page.page_idx, size);
        pass.pages
            .push(Page::new(geometry.page_number(), size[0], size[1]));

        let blocks = full_text::page_blocks(page, geometry, titles);
        if !blocks.is_empty() {
            pass.page_blocks.push(PageBlockData {
                page_index: geometry.page_number(),
                page_blocks: blocks,
            });
        }

        for block in &page.para_blocks {
            let (next, content) = fold_block(block, geometry, section, images, formulas);
            section = next;
            if let Some(content) = content {
                pass.paragraphs.push(
                    Paragraph::new(pass.paragraphs.len() + 1, content)
                        .with_section(section.title.trim(), section.id().trim()),
                );
            }
        }

        pass.headings.extend(headings(page, geometry));
    }

    log::debug!(
        "Middle file: {} pages, {} paragraphs, {} headings",
        pass.pages.len(),
        pass.paragraphs.len(),
        pass.headings.len()
    );
    pass
}

/// Process one block, threading the section context through.
fn fold_block(
    block: &MiddleBlock,
    page: PageGeometry,
    section: Section,
    images: &mut ImageRecords,
    formulas: &mut FormulaRecords,
) -> (Section, Option<ParagraphContent>) {
    let geometry = page.for_block(block);
    match block.kind() {
        BlockKind::Title => (Section::from_title_block(block), None),
        BlockKind::Text => (section, text_paragraph(block, geometry)),
        kind @ (BlockKind::Image | BlockKind::Table) => {
            let content = figure_paragraph(block, kind, geometry, &section, images);
            (section, content)
        }
        BlockKind::InterlineEquation => {
            let content = equation_paragraph(block, geometry, &section, formulas);
            (section, content)
        }
        BlockKind::Other => (section, None),
    }
}

fn text_paragraph(block: &MiddleBlock, geometry: PageGeometry) -> Option<ParagraphContent> {
    if block.lines.is_empty() {
        return None;
    }
    let text = join_fragments(block.span_contents()).trim().to_string();
    if text.is_empty() {
        return None;
    }

    let bbox = Some(geometry.rect(block.bbox));
    let sentences = split_sentences(&text, detect_language(&text))
        .into_iter()
        .enumerate()
        .map(|(index, text)| Sentence { text, index, bbox })
        .collect();

    Some(ParagraphContent::Text {
        text: Text {
            text,
            sentences,
            bbox,
        },
    })
}

/// Image or table block: pair the body with its caption and record geometry
/// under the image file name.
fn figure_paragraph(
    block: &MiddleBlock,
    kind: BlockKind,
    geometry: PageGeometry,
    section: &Section,
    images: &mut ImageRecords,
) -> Option<ParagraphContent> {
    let tag = kind.tag();
    let body_type = format!("{}_body", tag);
    let caption_type = format!("{}_caption", tag);

    let Some(body) = block.blocks.iter().find(|b| b.block_type == body_type) else {
        log::debug!("{} block without body on page {}", tag, geometry.page_number());
        return None;
    };
    let caption = block.blocks.iter().find(|b| b.block_type == caption_type);

    let bbox = geometry.for_block(body).rect(body.bbox);
    let ref_bbox = caption.map(|c| geometry.for_block(c).rect(c.bbox));
    let ref_content = caption
        .map(|c| join_fragments(c.span_contents()).trim().to_string())
        .unwrap_or_default();

    let mut id = None;
    let image_spans = body
        .lines
        .iter()
        .flat_map(|line| line.spans.iter())
        .filter(|span| span.span_type == tag && !span.image_path.is_empty());
    for span in image_spans {
        match images.get_mut(&span.image_path) {
            Some(record) => {
                record.bbox = Some(bbox);
                record.ref_bbox = ref_bbox;
                record.caption = ref_content.clone();
                record.section_title = section.title.clone();
                record.section_id = section.id().to_string();
                id.get_or_insert_with(|| record.id.clone());
            }
            None => {
                id.get_or_insert_with(|| content_id("image", &span.image_path));
            }
        }
    }

    let figure_table = FigureTable {
        id: id.unwrap_or_else(|| content_id(tag, &ref_content)),
        ref_content,
        ref_bbox,
        bbox: Some(bbox),
        section_title: section.title.clone(),
        section_id: section.id().to_string(),
    };
    Some(match kind {
        BlockKind::Table => ParagraphContent::Table { figure_table },
        _ => ParagraphContent::Image { figure_table },
    })
}

fn equation_paragraph(
    block: &MiddleBlock,
    geometry: PageGeometry,
    section: &Section,
    formulas: &mut FormulaRecords,
) -> Option<ParagraphContent> {
    let bbox = geometry.rect(block.bbox);
    let mut formula = None;

    let equations = block
        .lines
        .iter()
        .flat_map(|line| line.spans.iter())
        .filter(|span| span.span_type == BlockKind::InterlineEquation.tag());
    for span in equations {
        formulas.insert(
            span.content.clone(),
            FormulaRecord {
                page_number: geometry.page_number(),
                content: span.content.clone(),
                bbox: Some(bbox),
                section_title: section.title.clone(),
                section_id: section.id().to_string(),
            },
        );
        formula = Some(Formula {
            id: content_id("formula", &span.content),
            ref_content: span.content.clone(),
            ref_bbox: None,
            bbox: Some(bbox),
            section_title: section.title.clone(),
            section_id: section.id().to_string(),
        });
    }

    formula.map(|formula| ParagraphContent::Formula { formula })
}

/// Heading text of a title block: trimmed spans joined by spaces, with a
/// glued page number removed.
pub(super) fn heading_text(block: &MiddleBlock) -> String {
    let text = block
        .lines
        .iter()
        .flat_map(|line| line.spans.iter())
        .map(|span| span.content.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    LEADING_PAGE_NUMBER
        .replace(&text, "$1")
        .trim()
        .to_string()
}

/// Catalogue candidates from the page's title blocks.
fn headings(page: &MiddlePage, geometry: PageGeometry) -> Vec<HeadingCandidate> {
    page.para_blocks
        .iter()
        .filter(|b| b.kind() == BlockKind::Title && !b.lines.is_empty())
        .filter_map(|block| {
            let title = heading_text(block);
            (!title.is_empty()).then(|| {
                HeadingCandidate::new(title, Some(geometry.for_block(block).rect(block.bbox)))
            })
        })
        .collect()
}
