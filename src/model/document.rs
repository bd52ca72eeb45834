//! Document-level types.

use super::{BBox, CatalogueItem, FigureTable, Formula, Page, Paragraph};
use serde::{Deserialize, Serialize};

/// A piece of text with optional geometry (title, abstract, acknowledgment).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitledSpan {
    /// Text content
    pub text: String,

    /// Location of the text, when known
    pub bbox: Option<BBox>,
}

impl TitledSpan {
    /// Create a span from text and optional geometry.
    pub fn new(text: impl Into<String>, bbox: Option<BBox>) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}

/// A document or reference author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// Full display name
    pub full_name: String,

    /// Given (first) name
    pub given_name: String,

    /// Family name
    pub surname: String,

    /// Contact email
    pub email: String,

    /// Location of the name, when known
    pub bbox: Option<BBox>,
}

impl Author {
    /// Whether the author carries neither a name nor an email.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_empty()
            && self.given_name.is_empty()
            && self.surname.is_empty()
            && self.email.is_empty()
    }
}

/// A bibliography entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Positional id (`b0`, `b1`, ...) matching in-text marker targets
    pub ref_idx: String,

    /// Title of the cited work
    pub title: String,

    /// Publication date as written in the source
    pub publish_date: String,

    /// arXiv identifier without the `arXiv:` prefix
    pub arxiv_id: String,

    /// Raw reference string
    pub content_text: String,

    /// Authors of the cited work
    pub authors: Vec<Author>,

    /// Location of the entry in the bibliography
    pub bbox: Option<BBox>,
}

/// An inline citation or figure/table cross-reference occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefMarker {
    /// Target id (`b3`) or display label (`Figure 2`)
    pub ref_idx: String,

    /// Text of the marker as it appears in the body
    pub ref_content: String,

    /// Location of the marker
    pub bbox: Option<BBox>,
}

/// Lightweight header subset of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentHeader {
    /// Version of the tool that produced the source
    pub tool_version: String,

    /// Timestamp recorded by the tool that produced the source
    pub tool_timestamp: String,

    /// Document title
    pub title: Option<TitledSpan>,

    /// Document authors
    pub authors: Vec<Author>,

    /// Abstract
    #[serde(rename = "abstract")]
    pub abstract_text: Option<TitledSpan>,

    /// Publication date as written in the source
    pub date: String,

    /// DOI, when the source records one
    pub doi: String,

    /// arXiv identifier, when the source records one
    pub arxiv_id: String,

    /// MD5 of the source PDF, used to correlate artifacts with the input
    pub file_md5: String,

    /// Language code (`en`, `zh-CN`, ...)
    pub lang: String,
}

/// Document metadata: everything except the paragraph stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Header fields (title, authors, abstract, identifiers)
    #[serde(flatten)]
    pub header: DocumentHeader,

    /// Acknowledgment section
    pub acknowledgment: Option<TitledSpan>,

    /// Reconstructed table of contents (forest)
    pub catalogue: Vec<CatalogueItem>,

    /// Bibliography
    pub references: Vec<Reference>,

    /// Figure and table cross-references found in the body
    pub figure_and_table_markers: Vec<RefMarker>,

    /// Inline citations found in the body
    pub reference_markers: Vec<RefMarker>,

    /// Figures and tables with captions
    pub figures_and_tables: Vec<FigureTable>,

    /// Display formulas
    pub formulas: Vec<Formula>,

    /// Page geometry
    pub pages: Vec<Page>,
}

impl DocumentMetadata {
    /// Document title text, if any.
    pub fn title_text(&self) -> Option<&str> {
        self.header.title.as_ref().map(|t| t.text.as_str())
    }

    /// Total number of catalogue entries, including nested ones.
    pub fn catalogue_len(&self) -> usize {
        self.catalogue.iter().map(CatalogueItem::total_items).sum()
    }
}

/// The ordered paragraph stream of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FullDocument {
    /// Paragraphs in reading order
    pub paragraphs: Vec<Paragraph>,
}

impl FullDocument {
    /// Create a document from paragraphs.
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self { paragraphs }
    }

    /// Check if the document has no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Plain text of all text paragraphs, one per line.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .filter_map(|p| p.text().map(|t| t.text.as_str()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
