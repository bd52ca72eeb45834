//! Line-granular block stream for full-text rendering.
//!
//! Walks the same blocks as the paragraph pass but keeps every line and the
//! layout order as-is. Title blocks get a heading depth from the content
//! list when their text matches one of its headings.

use super::schema::{BlockKind, MiddleBlock, MiddlePage};
use super::PageGeometry;
use crate::model::{BlockText, ContentTitle, PageBlock, PageBlockType};
use crate::text::{join_fragments, normalize_for_compare};

pub(super) fn page_blocks(
    page: &MiddlePage,
    geometry: PageGeometry,
    titles: &[ContentTitle],
) -> Vec<PageBlock> {
    let mut blocks = Vec::new();

    for block in &page.para_blocks {
        let geometry = geometry.for_block(block);
        let block_type = match block.kind() {
            BlockKind::Title => PageBlockType::Title,
            BlockKind::Image => PageBlockType::Figure,
            BlockKind::Table => PageBlockType::Table,
            BlockKind::InterlineEquation => PageBlockType::IsolateFormula,
            BlockKind::Text | BlockKind::Other => PageBlockType::PlainText,
        };

        if matches!(block_type, PageBlockType::Figure | PageBlockType::Table) {
            for sub in &block.blocks {
                let sub_type = if sub.is_body() {
                    block_type
                } else if sub.is_caption() {
                    PageBlockType::PlainText
                } else {
                    continue;
                };
                let index = blocks.len() + 1;
                blocks.push(render_block(sub, sub_type, index, geometry.for_block(sub), &[]));
            }
            continue;
        }

        let index = blocks.len() + 1;
        blocks.push(render_block(block, block_type, index, geometry, titles));
    }
    blocks
}

fn render_block(
    block: &MiddleBlock,
    block_type: PageBlockType,
    index: usize,
    geometry: PageGeometry,
    titles: &[ContentTitle],
) -> PageBlock {
    // Figure and table bodies are images; only their rectangle matters.
    let texts: Vec<BlockText> = if block_type == PageBlockType::Figure
        || block_type == PageBlockType::Table
    {
        Vec::new()
    } else {
        block
            .lines
            .iter()
            .map(|line| BlockText {
                text: join_fragments(line.spans.iter().map(|s| s.content.trim()))
                    .trim()
                    .to_string(),
                bbox: geometry.rect(line.bbox),
                cross_page: line.spans.iter().any(|s| s.cross_page),
            })
            .collect()
    };

    let level = if block_type == PageBlockType::Title {
        texts
            .iter()
            .filter(|t| !t.text.is_empty())
            .find_map(|t| heading_level(&t.text, titles))
            .unwrap_or(0)
    } else {
        0
    };

    PageBlock {
        block_type,
        index,
        bbox: geometry.rect(block.bbox),
        level,
        texts,
        lines_deleted: block.lines_deleted,
    }
}

/// Depth of the first content-list heading sharing a prefix with `line`.
fn heading_level(line: &str, titles: &[ContentTitle]) -> Option<u32> {
    let line = normalize_for_compare(line);
    if line.is_empty() {
        return None;
    }
    titles.iter().find_map(|title| {
        let title_text = normalize_for_compare(&title.text);
        let matches = !title_text.is_empty()
            && (line.starts_with(&title_text) || title_text.starts_with(&line));
        matches.then_some(title.level)
    })
}
