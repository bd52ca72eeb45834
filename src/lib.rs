//! # docstruct
//!
//! Document-structure extraction for academic PDF parser output.
//!
//! Two unrelated external tools analyse PDFs: a grammar-based extractor
//! that writes TEI/XML, and a layout-detection tool that writes a flat
//! content list plus a page/block/line/span "middle" JSON file. This crate
//! turns either output into one document model: title, authors, abstract,
//! acknowledgment, references, a reconstructed table of contents and an
//! ordered stream of paragraphs, figures, tables and formulas with
//! page-relative geometry.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docstruct::{parse_tei_file, render};
//!
//! fn main() -> docstruct::Result<()> {
//!     let parsed = parse_tei_file("paper.tei.xml")?;
//!
//!     println!("{}", render::catalogue_outline(&parsed.metadata.catalogue));
//!     let json = render::to_json(&parsed.metadata, render::JsonFormat::Pretty)?;
//!     std::fs::write("paper_meta.json", json)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Two sources, one model**: TEI/XML and layout-tool JSON
//! - **Catalogue reconstruction**: numbering normalization and level repair
//! - **Geometry**: every block carries a page-relative bounding box
//! - **CJK support**: Chinese numbering, sentence splitting and names
//! - **Parallel processing**: batch parsing uses Rayon

pub mod assemble;
pub mod catalogue;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod text;

// Re-export commonly used types
pub use assemble::ParsedDocument;
pub use catalogue::{build_catalogue, normalize_title, CatalogueOptions, HeadingCandidate};
pub use detect::{detect_source_format, detect_source_format_from_path, SourceFormat};
pub use error::{Error, Result};
pub use model::{
    Author, BBox, CatalogueItem, DocumentHeader, DocumentMetadata, FigureTable, Formula,
    FullDocument, ImageRecords, Page, PageBlock, PageBlockData, PageBlockType, Paragraph,
    ParagraphContent, ParagraphType, RefInfo, RefMarker, Reference, Sentence, TitledSpan,
};
pub use parser::{ErrorMode, ParseOptions};
pub use render::JsonFormat;

use md5::{Digest, Md5};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// File-name suffix of the persisted metadata artifact.
pub const META_SUFFIX: &str = "_meta.json";

/// File-name suffix of the persisted paragraph stream.
pub const PARAGRAPHS_SUFFIX: &str = "_paragraphs.json";

/// File-name suffix of the persisted page-block stream.
pub const PAGE_BLOCKS_SUFFIX: &str = "_page_blocks.json";

/// Default name of the image directory in an extracted layout-tool output.
pub const DEFAULT_IMAGES_DIR: &str = "images";

/// Parse extractor TEI/XML into metadata and paragraphs.
///
/// # Example
///
/// ```no_run
/// use docstruct::parse_tei;
///
/// let data = std::fs::read("paper.tei.xml").unwrap();
/// let parsed = parse_tei(&data).unwrap();
/// println!("Paragraphs: {}", parsed.paragraph_count());
/// ```
pub fn parse_tei(data: &[u8]) -> Result<ParsedDocument> {
    parse_tei_with_options(data, &ParseOptions::default())
}

/// Parse extractor TEI/XML with custom options.
pub fn parse_tei_with_options(data: &[u8], options: &ParseOptions) -> Result<ParsedDocument> {
    let (metadata, document) = parser::tei::parse_document(data, options)?;
    Ok(assemble::finish_tei(metadata, document))
}

/// Parse only the TEI header: title, authors, identifiers and abstract.
pub fn parse_tei_header(data: &[u8]) -> Result<DocumentHeader> {
    parser::tei::parse_header(data)
}

/// Parse a TEI/XML file.
///
/// # Example
///
/// ```no_run
/// use docstruct::parse_tei_file;
///
/// let parsed = parse_tei_file("paper.tei.xml").unwrap();
/// println!("Title: {:?}", parsed.title());
/// ```
pub fn parse_tei_file<P: AsRef<Path>>(path: P) -> Result<ParsedDocument> {
    let data = fs::read(path)?;
    parse_tei(&data)
}

/// Parse the layout tool's content list and middle file.
///
/// `images` maps extracted image file names to record ids; build it with
/// [`ImageRecords::from_file_names`].
pub fn parse_layout(
    content_list: &[u8],
    middle: &[u8],
    images: ImageRecords,
) -> Result<ParsedDocument> {
    parse_layout_with_options(Some(content_list), middle, images, &ParseOptions::default())
}

/// Parse layout-tool output with custom options.
///
/// A missing content list is accepted in lenient mode.
pub fn parse_layout_with_options(
    content_list: Option<&[u8]>,
    middle: &[u8],
    images: ImageRecords,
    options: &ParseOptions,
) -> Result<ParsedDocument> {
    parser::layout::parse_document(content_list, middle, images, options)
}

/// Parse an extracted layout-tool output directory.
///
/// The directory holds `*content_list*.json`, `*middle*.json` and an
/// `images/` directory of extracted rasters.
///
/// # Example
///
/// ```no_run
/// use docstruct::parse_layout_dir;
///
/// let parsed = parse_layout_dir("output/paper").unwrap();
/// println!("Page blocks: {}", parsed.page_blocks.len());
/// ```
pub fn parse_layout_dir<P: AsRef<Path>>(dir: P) -> Result<ParsedDocument> {
    Extractor::new().parse_layout_dir(dir)
}

/// The artifacts found in a layout-tool output directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutArtifacts {
    /// Content list file, if present
    pub content_list: Option<PathBuf>,
    /// Middle file
    pub middle: PathBuf,
    /// Extracted image file names
    pub image_names: Vec<String>,
}

/// Locate the layout artifacts in `dir`.
///
/// # Returns
/// * `Err(Error::MissingArtifact)` if no middle file exists
pub fn find_layout_artifacts<P: AsRef<Path>>(dir: P, images_dir: &str) -> Result<LayoutArtifacts> {
    let dir = dir.as_ref();
    let mut content_list = None;
    let mut middle = None;

    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    for path in entries {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".json") {
            continue;
        }
        if content_list.is_none() && name.contains("content_list") {
            content_list = Some(path);
        } else if middle.is_none() && name.contains("middle") {
            middle = Some(path);
        }
    }

    let middle = middle.ok_or_else(|| {
        Error::MissingArtifact(format!("middle file in {}", dir.display()))
    })?;

    let images_path = dir.join(images_dir);
    let mut image_names = Vec::new();
    if images_path.is_dir() {
        for entry in fs::read_dir(&images_path)? {
            let path = entry?.path();
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if path.is_file() {
                    image_names.push(name.to_string());
                }
            }
        }
        image_names.sort();
    } else {
        log::debug!("No image directory at {}", images_path.display());
    }

    Ok(LayoutArtifacts {
        content_list,
        middle,
        image_names,
    })
}

/// Hex MD5 of source bytes, used to name persisted artifacts.
pub fn source_hash(data: &[u8]) -> String {
    format!("{:x}", Md5::digest(data))
}

/// Write the persisted artifacts of a parse into `dir`.
///
/// Always writes `<key>_meta.json` and `<key>_paragraphs.json`; the
/// page-block stream is written only when the parse produced one.
pub fn save_artifacts<P: AsRef<Path>>(
    parsed: &ParsedDocument,
    dir: P,
    key: &str,
    format: JsonFormat,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    let meta = dir.join(format!("{}{}", key, META_SUFFIX));
    fs::write(&meta, render::to_json(&parsed.metadata, format)?)?;
    written.push(meta);

    let paragraphs = dir.join(format!("{}{}", key, PARAGRAPHS_SUFFIX));
    fs::write(&paragraphs, render::to_json(&parsed.document, format)?)?;
    written.push(paragraphs);

    if !parsed.page_blocks.is_empty() {
        let blocks = dir.join(format!("{}{}", key, PAGE_BLOCKS_SUFFIX));
        fs::write(&blocks, render::to_json(&parsed.page_blocks, format)?)?;
        written.push(blocks);
    }

    Ok(written)
}

/// Builder for parsing extractor and layout-tool output.
///
/// # Example
///
/// ```no_run
/// use docstruct::{CatalogueOptions, Extractor};
///
/// let parsed = Extractor::new()
///     .lenient()
///     .with_catalogue(CatalogueOptions::new().with_repair(false))
///     .parse_layout_dir("output/paper")?;
/// # Ok::<(), docstruct::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    options: ParseOptions,
    images_dir: String,
}

impl Extractor {
    /// Create a new extractor with default options.
    pub fn new() -> Self {
        Self {
            options: ParseOptions::default(),
            images_dir: DEFAULT_IMAGES_DIR.to_string(),
        }
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Disable parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Set catalogue reconstruction settings.
    pub fn with_catalogue(mut self, catalogue: CatalogueOptions) -> Self {
        self.options = self.options.with_catalogue(catalogue);
        self
    }

    /// Set the image directory name used by [`Extractor::parse_layout_dir`].
    pub fn with_images_dir(mut self, name: impl Into<String>) -> Self {
        self.images_dir = name.into();
        self
    }

    /// The parse options this extractor applies.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse TEI/XML bytes.
    pub fn parse_tei(&self, data: &[u8]) -> Result<ParsedDocument> {
        parse_tei_with_options(data, &self.options)
    }

    /// Parse a TEI/XML file.
    pub fn parse_tei_file<P: AsRef<Path>>(&self, path: P) -> Result<ParsedDocument> {
        let data = fs::read(path)?;
        self.parse_tei(&data)
    }

    /// Parse layout-tool output.
    pub fn parse_layout(
        &self,
        content_list: Option<&[u8]>,
        middle: &[u8],
        images: ImageRecords,
    ) -> Result<ParsedDocument> {
        parse_layout_with_options(content_list, middle, images, &self.options)
    }

    /// Parse an extracted layout-tool output directory.
    pub fn parse_layout_dir<P: AsRef<Path>>(&self, dir: P) -> Result<ParsedDocument> {
        let artifacts = find_layout_artifacts(dir, &self.images_dir)?;
        let content_list = match &artifacts.content_list {
            Some(path) => Some(fs::read(path)?),
            None => None,
        };
        let middle = fs::read(&artifacts.middle)?;
        let images = ImageRecords::from_file_names(&artifacts.image_names);

        self.parse_layout(content_list.as_deref(), &middle, images)
    }

    /// Parse several TEI/XML files, one result per path in input order.
    pub fn parse_tei_batch<P>(&self, paths: &[P]) -> Vec<Result<ParsedDocument>>
    where
        P: AsRef<Path> + Sync,
    {
        if self.options.parallel {
            paths.par_iter().map(|p| self.parse_tei_file(p)).collect()
        } else {
            paths.iter().map(|p| self.parse_tei_file(p)).collect()
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
