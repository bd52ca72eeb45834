//! Paragraph and sentence-level types.

use super::BBox;
use serde::{Deserialize, Serialize};

/// A paragraph in document reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    /// Position in reading order
    pub order: usize,

    /// Paragraph payload, tagged by `type`
    #[serde(flatten)]
    pub content: ParagraphContent,

    /// Title of the enclosing section
    pub section_title: String,

    /// Identifier of the enclosing section
    pub section_id: String,

    /// Inline citations inside the paragraph
    pub references: Vec<RefInfo>,
}

impl Paragraph {
    /// Create a paragraph with no section and no citations.
    pub fn new(order: usize, content: ParagraphContent) -> Self {
        Self {
            order,
            content,
            section_title: String::new(),
            section_id: String::new(),
            references: Vec::new(),
        }
    }

    /// Set the enclosing section.
    pub fn with_section(mut self, title: impl Into<String>, id: impl Into<String>) -> Self {
        self.section_title = title.into();
        self.section_id = id.into();
        self
    }

    /// The paragraph type.
    pub fn kind(&self) -> ParagraphType {
        match self.content {
            ParagraphContent::Text { .. } => ParagraphType::Text,
            ParagraphContent::Image { .. } => ParagraphType::Image,
            ParagraphContent::Table { .. } => ParagraphType::Table,
            ParagraphContent::Formula { .. } => ParagraphType::Formula,
        }
    }

    /// Text payload, for text paragraphs.
    pub fn text(&self) -> Option<&Text> {
        match &self.content {
            ParagraphContent::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Figure or table payload, for image and table paragraphs.
    pub fn figure_table(&self) -> Option<&FigureTable> {
        match &self.content {
            ParagraphContent::Image { figure_table } | ParagraphContent::Table { figure_table } => {
                Some(figure_table)
            }
            _ => None,
        }
    }

    /// Formula payload, for formula paragraphs.
    pub fn formula(&self) -> Option<&Formula> {
        match &self.content {
            ParagraphContent::Formula { formula } => Some(formula),
            _ => None,
        }
    }

    /// Location of the paragraph payload.
    pub fn bbox(&self) -> Option<&BBox> {
        match &self.content {
            ParagraphContent::Text { text } => text.bbox.as_ref(),
            ParagraphContent::Image { figure_table } | ParagraphContent::Table { figure_table } => {
                figure_table.bbox.as_ref()
            }
            ParagraphContent::Formula { formula } => formula.bbox.as_ref(),
        }
    }
}

/// Paragraph type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParagraphType {
    /// Running text
    Text,
    /// Figure with caption
    Image,
    /// Table with caption
    Table,
    /// Display formula
    Formula,
}

/// Paragraph payload. Exactly one payload exists per paragraph type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum ParagraphContent {
    /// Running text
    Text {
        /// Text with sentences
        text: Text,
    },
    /// Figure with caption
    Image {
        /// Figure payload
        #[serde(rename = "figureTable")]
        figure_table: FigureTable,
    },
    /// Table with caption
    Table {
        /// Table payload
        #[serde(rename = "figureTable")]
        figure_table: FigureTable,
    },
    /// Display formula
    Formula {
        /// Formula payload
        formula: Formula,
    },
}

/// Paragraph text split into sentences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// Full paragraph text
    pub text: String,

    /// Sentences in order
    pub sentences: Vec<Sentence>,

    /// Location of the paragraph
    pub bbox: Option<BBox>,
}

/// A sentence within a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    /// Sentence text
    pub text: String,

    /// Position within the paragraph (0-based)
    pub index: usize,

    /// Location of the sentence
    pub bbox: Option<BBox>,
}

/// An inline citation inside a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefInfo {
    /// Marker text (`[12]`)
    pub text: String,

    /// Target reference id without the leading `#`
    pub target: String,

    /// Location of the marker
    pub bbox: Option<BBox>,
}

/// A figure or table with its caption.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigureTable {
    /// Identifier linking to an image record
    pub id: String,

    /// Caption text
    pub ref_content: String,

    /// Location of the caption
    pub ref_bbox: Option<BBox>,

    /// Location of the figure or table body
    pub bbox: Option<BBox>,

    /// Title of the enclosing section
    pub section_title: String,

    /// Identifier of the enclosing section
    pub section_id: String,
}

/// A display formula.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formula {
    /// Formula identifier
    pub id: String,

    /// LaTeX source without display delimiters
    pub ref_content: String,

    /// Location of the formula label, when known
    pub ref_bbox: Option<BBox>,

    /// Location of the formula
    pub bbox: Option<BBox>,

    /// Title of the enclosing section
    pub section_title: String,

    /// Identifier of the enclosing section
    pub section_id: String,
}
