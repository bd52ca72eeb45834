//! Document model types.
//!
//! This module defines the unified representation that both source
//! adapters produce: document metadata, the paragraph stream, the
//! catalogue forest and the line-granular page blocks. All types are
//! plain serializable values.

mod catalogue;
mod document;
mod geometry;
mod page_block;
mod paragraph;
mod record;

pub use catalogue::{CatalogueItem, CatalogueIter};
pub use document::{
    Author, DocumentHeader, DocumentMetadata, FullDocument, RefMarker, Reference, TitledSpan,
};
pub use geometry::{resolve_page, BBox, Page};
pub use page_block::{BlockText, PageBlock, PageBlockData, PageBlockType};
pub use paragraph::{
    FigureTable, Formula, Paragraph, ParagraphContent, ParagraphType, RefInfo, Sentence, Text,
};
pub use record::{
    basename, content_id, ContentTitle, FormulaRecord, FormulaRecords, ImageRecord, ImageRecords,
};
