//! GROBID TEI/XML adapter.
//!
//! Walks the TEI tree produced by the grammar-based extractor and builds
//! the header, references, catalogue candidates and paragraph stream. The
//! tree is read-only; sentences promoted to catalogue headings are tracked
//! by node id.

mod back;
mod body;
mod header;
mod xml;

use crate::error::{Error, Result};
use crate::model::{DocumentHeader, DocumentMetadata, FullDocument, Page};
use crate::parser::ParseOptions;
use roxmltree::{Document, Node};

/// A validated TEI document: header present, pages collected.
pub(crate) struct TeiDocument<'a, 'input> {
    root: Node<'a, 'input>,
    header: Node<'a, 'input>,
    application: Node<'a, 'input>,
    pages: Vec<Page>,
}

impl<'a, 'input> TeiDocument<'a, 'input> {
    /// Validate the mandatory header structure and collect page geometry.
    fn new(doc: &'a Document<'input>) -> Result<Self> {
        let root = doc.root_element();
        let header = if xml::is(&root, "teiHeader") {
            root
        } else {
            xml::descendants(root, "teiHeader")
                .next()
                .ok_or_else(|| Error::InvalidDocument("missing teiHeader".to_string()))?
        };
        let application = xml::find_first(header, &["appInfo", "application"]).ok_or_else(|| {
            Error::InvalidDocument("missing teiHeader appInfo/application".to_string())
        })?;

        Ok(Self {
            root,
            header,
            application,
            pages: collect_pages(root),
        })
    }
}

fn collect_pages(root: Node) -> Vec<Page> {
    xml::find_all(root, &["facsimile", "surface"])
        .into_iter()
        .filter_map(|surface| {
            let number = surface.attribute("n")?.trim().parse::<u32>().ok()?;
            let width = surface.attribute("lrx")?.trim().parse::<f64>().ok()?;
            let height = surface.attribute("lry")?.trim().parse::<f64>().ok()?;
            Some(Page::new(number, width, height))
        })
        .collect()
}

fn decode(data: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(data)?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

fn open(text: &str) -> Result<Document<'_>> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    Ok(Document::parse_with_options(text, options)?)
}

/// Parse only the header subset (title, authors, identifiers, abstract).
pub fn parse_header(data: &[u8]) -> Result<DocumentHeader> {
    let text = decode(data)?;
    let doc = open(text)?;
    let tei = TeiDocument::new(&doc)?;
    Ok(header::parse(&tei))
}

/// Parse the full document: metadata and paragraph stream.
pub fn parse_document(
    data: &[u8],
    options: &ParseOptions,
) -> Result<(DocumentMetadata, FullDocument)> {
    let text = decode(data)?;
    let doc = open(text)?;
    let tei = TeiDocument::new(&doc)?;

    let header = header::parse(&tei);
    let references = back::references(&tei);
    let acknowledgment = back::acknowledgment(&tei);
    let body = body::parse(&tei, &options.catalogue);

    log::debug!(
        "TEI document: {} pages, {} references, {} paragraphs",
        tei.pages.len(),
        references.len(),
        body.paragraphs.len()
    );

    let metadata = DocumentMetadata {
        header,
        acknowledgment,
        catalogue: body.catalogue,
        references,
        figure_and_table_markers: body.figure_and_table_markers,
        reference_markers: body.reference_markers,
        figures_and_tables: body.figures_and_tables,
        formulas: body.formulas,
        pages: tei.pages,
    };
    Ok((metadata, FullDocument::new(body.paragraphs)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_header_is_invalid() {
        let err = parse_header(b"<TEI><text/></TEI>").unwrap_err();
        assert!(matches!(err, Error::InvalidDocument(_)));
    }

    #[test]
    fn test_missing_application_is_invalid() {
        let xml = b"<TEI><teiHeader><encodingDesc><appInfo/></encodingDesc></teiHeader></TEI>";
        let err = parse_document(xml, &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidDocument(_)));
    }

    #[test]
    fn test_malformed_xml() {
        let err = parse_header(b"<TEI><teiHeader></TEI>").unwrap_err();
        assert!(matches!(err, Error::Xml(_)));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = parse_header(&[0x3c, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }

    #[test]
    fn test_pages_skip_unparsable_surfaces() {
        let xml = r#"<TEI><teiHeader><encodingDesc><appInfo>
            <application version="0.8.0" when="2024-01-01T00:00+0000"/>
            </appInfo></encodingDesc></teiHeader>
            <facsimile>
                <surface n="1" ulx="0" uly="0" lrx="595.3" lry="841.9"/>
                <surface n="x" lrx="1" lry="1"/>
                <surface n="2" lrx="612" lry="792"/>
            </facsimile></TEI>"#;
        let (meta, _) = parse_document(xml.as_bytes(), &ParseOptions::default()).unwrap();
        assert_eq!(meta.pages.len(), 2);
        assert_eq!(meta.pages[0].width, 595.3);
        assert_eq!(meta.pages[1].page_number, 2);
        assert_eq!(meta.header.tool_version, "0.8.0");
    }
}
