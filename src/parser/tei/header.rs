//! TEI header: title, authors, identifiers, date, language and abstract.

use super::xml;
use super::TeiDocument;
use crate::model::{Author, DocumentHeader, Page, TitledSpan};
use roxmltree::Node;

pub(super) fn parse(tei: &TeiDocument) -> DocumentHeader {
    let mut header = DocumentHeader {
        tool_version: tei.application.attribute("version").unwrap_or("").to_string(),
        tool_timestamp: tei.application.attribute("when").unwrap_or("").to_string(),
        title: title(tei),
        abstract_text: abstract_text(tei),
        date: date(tei),
        lang: language(tei),
        ..Default::default()
    };

    header.authors = xml::find_all(tei.header, &["sourceDesc", "biblStruct", "analytic", "author"])
        .into_iter()
        .filter_map(|author| parse_author(author, &tei.pages))
        .collect();

    if let Some(source) = xml::descendants(tei.header, "sourceDesc").next() {
        for idno in xml::descendants(source, "idno") {
            let value = xml::flowing_text(idno);
            if value.is_empty() {
                continue;
            }
            match idno.attribute("type") {
                Some("arXiv") => header.arxiv_id = strip_arxiv_prefix(&value).to_string(),
                Some("DOI") => header.doi = value,
                Some("MD5") => header.file_md5 = value,
                _ => {}
            }
        }
    }

    header
}

fn title(tei: &TeiDocument) -> Option<TitledSpan> {
    let main = xml::find_all(tei.header, &["sourceDesc", "biblStruct", "analytic", "title"])
        .into_iter()
        .find(|t| t.attribute("type") == Some("main"));
    let stmt = xml::find_first(tei.header, &["titleStmt", "title"]);

    [main, stmt].into_iter().flatten().find_map(|node| {
        let text = xml::flowing_text(node);
        (!text.is_empty()).then(|| TitledSpan::new(text, xml::bbox(node, &tei.pages)))
    })
}

fn abstract_text(tei: &TeiDocument) -> Option<TitledSpan> {
    let node = xml::find_first(tei.header, &["profileDesc", "abstract"])?;
    let text = xml::flowing_text(node);
    if text.is_empty() {
        return None;
    }
    Some(TitledSpan::new(text, xml::bbox_or_descendant(node, &tei.pages)))
}

fn date(tei: &TeiDocument) -> String {
    let candidates = [
        xml::find_first(tei.header, &["publicationStmt", "date"]),
        xml::find_first(tei.header, &["sourceDesc", "biblStruct", "monogr", "imprint", "date"]),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(date_value)
        .unwrap_or_default()
}

/// Date text, falling back to the machine-readable `when` attribute.
pub(super) fn date_value(node: Node) -> Option<String> {
    let text = xml::flowing_text(node);
    if !text.is_empty() {
        return Some(text);
    }
    node.attribute("when").map(str::to_string)
}

fn language(tei: &TeiDocument) -> String {
    xml::child(tei.root, "text")
        .and_then(xml::xml_lang)
        .or_else(|| xml::xml_lang(tei.header))
        .unwrap_or("")
        .to_string()
}

/// Strip the `arXiv:` prefix some identifiers carry.
pub(super) fn strip_arxiv_prefix(value: &str) -> &str {
    value.strip_prefix("arXiv:").unwrap_or(value).trim()
}

/// Parse an `author` element.
///
/// Returns `None` when the author has neither a name nor an email.
pub(super) fn parse_author(author: Node, pages: &[Page]) -> Option<Author> {
    let pers_name = xml::descendants(author, "persName").next();
    let email = xml::child(author, "email")
        .map(xml::flowing_text)
        .unwrap_or_default();

    let mut parsed = Author {
        email,
        bbox: pers_name
            .and_then(|p| xml::bbox(p, pages))
            .or_else(|| xml::bbox(author, pages)),
        ..Default::default()
    };

    if let Some(pers_name) = pers_name {
        parsed.given_name = xml::children(pers_name, "forename")
            .map(xml::joined_text)
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        parsed.surname = xml::child(pers_name, "surname")
            .map(xml::joined_text)
            .unwrap_or_default();
        parsed.full_name = xml::joined_text(pers_name);
        if parsed.full_name.is_empty() {
            parsed.full_name = [parsed.given_name.as_str(), parsed.surname.as_str()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
        }
    }

    (!parsed.is_empty()).then_some(parsed)
}
