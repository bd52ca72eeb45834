//! Document assembly.
//!
//! Merges adapter output into the persisted artifacts and derives the
//! fields neither source states explicitly: abstract and acknowledgment by
//! keyword, authors by name pattern, title from the first heading and the
//! document language.

use crate::catalogue::{build_catalogue, CatalogueOptions};
use crate::model::{
    Author, BBox, DocumentHeader, DocumentMetadata, FullDocument, ImageRecords, PageBlockData,
    Paragraph, Text, TitledSpan,
};
use crate::parser::layout::LayoutPasses;
use crate::text::detect_language;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Capitalized given name and surname, or a 2-3 character Han name.
static NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z][a-zA-Z.-]+)\s+([A-Z][a-zA-Z.-]+)|(\p{Han})(\p{Han}{1,2})").unwrap()
});

const ABSTRACT_KEYWORDS: &[&str] = &["abstract", "摘要"];
const ACKNOWLEDGMENT_KEYWORDS: &[&str] = &["acknowledgement", "acknowledgment", "致谢"];

/// Everything one parse produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    /// Header, catalogue, references and markers
    pub metadata: DocumentMetadata,

    /// Ordered paragraph stream
    pub document: FullDocument,

    /// Line-granular rendering stream (layout tool only)
    pub page_blocks: Vec<PageBlockData>,

    /// Image records keyed by file name (layout tool only)
    pub image_records: ImageRecords,
}

impl ParsedDocument {
    /// Document title, if any.
    pub fn title(&self) -> Option<&str> {
        self.metadata.title_text()
    }

    /// Number of paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.document.paragraphs.len()
    }
}

/// Abstract and acknowledgment from keyword-matching paragraphs.
///
/// A text paragraph matches when its section title contains a keyword or
/// its text starts with one, case-insensitively. Matching paragraphs are
/// joined; the first one supplies the geometry.
pub fn abstract_and_acknowledgment(
    paragraphs: &[Paragraph],
) -> (Option<TitledSpan>, Option<TitledSpan>) {
    (
        merge_matching(paragraphs, ABSTRACT_KEYWORDS),
        merge_matching(paragraphs, ACKNOWLEDGMENT_KEYWORDS),
    )
}

fn merge_matching(paragraphs: &[Paragraph], keywords: &[&str]) -> Option<TitledSpan> {
    let matching: Vec<&Text> = paragraphs
        .iter()
        .filter_map(|p| {
            let text = p.text().filter(|t| !t.text.trim().is_empty())?;
            let section = p.section_title.to_lowercase();
            let body = text.text.trim_start().to_lowercase();
            keywords
                .iter()
                .any(|k| section.contains(k) || body.starts_with(k))
                .then_some(text)
        })
        .collect();

    let first = matching.first()?;
    let text = matching
        .iter()
        .map(|t| t.text.trim())
        .collect::<Vec<_>>()
        .join(" ");
    Some(TitledSpan::new(text, first.bbox))
}

/// Author names found in free text, all sharing the given geometry.
pub fn extract_authors(text: &str, bbox: Option<BBox>) -> Vec<Author> {
    NAME.captures_iter(text)
        .filter_map(|caps| {
            let (given, surname) = match (caps.get(1), caps.get(2), caps.get(3), caps.get(4)) {
                (Some(given), Some(surname), _, _) => (given.as_str(), surname.as_str()),
                (_, _, Some(surname), Some(given)) => (given.as_str(), surname.as_str()),
                _ => return None,
            };
            Some(Author {
                full_name: caps.get(0)?.as_str().trim().to_string(),
                given_name: given.to_string(),
                surname: surname.to_string(),
                email: String::new(),
                bbox,
            })
        })
        .collect()
}

/// Language code of the paragraph text, empty when there is none.
fn document_language(paragraphs: &[Paragraph]) -> String {
    let text = paragraphs
        .iter()
        .filter_map(|p| p.text())
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    if text.trim().is_empty() {
        return String::new();
    }
    detect_language(&text).code().to_string()
}

/// Assemble the layout tool's passes into a finished document.
pub(crate) fn assemble_layout(passes: LayoutPasses, options: &CatalogueOptions) -> ParsedDocument {
    let LayoutPasses {
        content,
        middle,
        images,
        ..
    } = passes;

    let catalogue = build_catalogue(&middle.headings, options);
    let title = middle
        .headings
        .first()
        .map(|h| TitledSpan::new(h.title.clone(), h.bbox));
    let authors = middle
        .paragraphs
        .iter()
        .find_map(|p| p.text())
        .map(|t| extract_authors(&t.text, t.bbox))
        .unwrap_or_default();
    let (abstract_text, acknowledgment) = abstract_and_acknowledgment(&middle.paragraphs);

    let metadata = DocumentMetadata {
        header: DocumentHeader {
            title,
            authors,
            abstract_text,
            lang: document_language(&middle.paragraphs),
            ..Default::default()
        },
        acknowledgment,
        catalogue: catalogue.items,
        figures_and_tables: content.figures.into_iter().map(|p| p.figure).collect(),
        formulas: content.formulas,
        pages: middle.pages,
        ..Default::default()
    };

    log::debug!(
        "Assembled layout document: {} paragraphs, {} catalogue roots",
        middle.paragraphs.len(),
        metadata.catalogue.len()
    );

    ParsedDocument {
        metadata,
        document: FullDocument::new(middle.paragraphs),
        page_blocks: middle.page_blocks,
        image_records: images,
    }
}

/// Complete a TEI parse: fill abstract, acknowledgment and language from
/// the paragraphs when the markup did not provide them.
pub(crate) fn finish_tei(mut metadata: DocumentMetadata, document: FullDocument) -> ParsedDocument {
    if metadata.header.abstract_text.is_none() || metadata.acknowledgment.is_none() {
        let (abstract_text, acknowledgment) = abstract_and_acknowledgment(&document.paragraphs);
        if metadata.header.abstract_text.is_none() {
            metadata.header.abstract_text = abstract_text;
        }
        if metadata.acknowledgment.is_none() {
            metadata.acknowledgment = acknowledgment;
        }
    }
    if metadata.header.lang.is_empty() {
        metadata.header.lang = document_language(&document.paragraphs);
    }

    ParsedDocument {
        metadata,
        document,
        ..Default::default()
    }
}
