//! TEI back matter: bibliography and acknowledgment.

use super::header::{date_value, parse_author, strip_arxiv_prefix};
use super::xml;
use super::TeiDocument;
use crate::model::{Reference, TitledSpan};
use roxmltree::Node;

fn back_divs<'a, 'input>(
    tei: &TeiDocument<'a, 'input>,
    kind: &'static str,
) -> Vec<Node<'a, 'input>> {
    xml::find_all(tei.root, &["text", "back"])
        .into_iter()
        .flat_map(|back| xml::descendants(back, "div"))
        .filter(|div| div.attribute("type") == Some(kind))
        .collect()
}

/// Bibliography entries, indexed `b0`, `b1`, ... by position.
pub(super) fn references(tei: &TeiDocument) -> Vec<Reference> {
    back_divs(tei, "references")
        .into_iter()
        .flat_map(|div| xml::find_all(div, &["listBibl", "biblStruct"]))
        .enumerate()
        .map(|(i, bibl)| parse_reference(i, bibl, tei))
        .collect()
}

fn parse_reference(index: usize, bibl: Node, tei: &TeiDocument) -> Reference {
    let title = xml::descendants(bibl, "title")
        .map(xml::flowing_text)
        .find(|t| !t.is_empty())
        .unwrap_or_default();

    let publish_date = xml::find_first(bibl, &["monogr", "imprint", "date"])
        .and_then(date_value)
        .unwrap_or_default();

    let arxiv_id = xml::descendants(bibl, "idno")
        .find(|n| n.attribute("type") == Some("arXiv"))
        .map(|n| strip_arxiv_prefix(&xml::flowing_text(n)).to_string())
        .unwrap_or_default();

    let content_text = xml::descendants(bibl, "note")
        .find(|n| n.attribute("type") == Some("raw_reference"))
        .map(xml::flowing_text)
        .unwrap_or_default();

    Reference {
        ref_idx: format!("b{}", index),
        title,
        publish_date,
        arxiv_id,
        content_text,
        authors: xml::descendants(bibl, "author")
            .filter_map(|a| parse_author(a, &tei.pages))
            .collect(),
        bbox: xml::bbox(bibl, &tei.pages),
    }
}

/// Acknowledgment section: text of its paragraphs, geometry of the first.
pub(super) fn acknowledgment(tei: &TeiDocument) -> Option<TitledSpan> {
    let divs = back_divs(tei, "acknowledgement");
    let div = divs.first()?;

    let paragraphs: Vec<Node> = xml::descendants(*div, "p").collect();
    let text = if paragraphs.is_empty() {
        xml::flowing_text(*div)
    } else {
        paragraphs
            .iter()
            .map(|p| xml::flowing_text(*p))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    };
    if text.is_empty() {
        return None;
    }

    let bbox = paragraphs
        .first()
        .and_then(|p| xml::bbox_or_descendant(*p, &tei.pages))
        .or_else(|| xml::bbox(*div, &tei.pages));
    Some(TitledSpan::new(text, bbox))
}

#[cfg(test)]
mod tests {
    use super::super::{decode, open, TeiDocument};
    use super::*;

    const BACK: &str = r#"<TEI xmlns="http://www.tei-c.org/ns/1.0">
    <teiHeader><encodingDesc><appInfo><application version="0.8.0" when="now"/></appInfo></encodingDesc></teiHeader>
    <text><back>
        <div type="acknowledgement"><div><head>Acknowledgements</head>
            <p coords="3,10,20,30,40">We thank the reviewers.</p><p>And our families.</p></div></div>
        <div type="references"><listBibl>
            <biblStruct xml:id="b0" coords="4,1,2,3,4">
                <analytic><title level="a" type="main">Deep Residual Learning</title>
                    <author><persName><forename type="first">Kaiming</forename><surname>He</surname></persName></author>
                </analytic>
                <monogr><title level="m">CVPR</title><imprint><date type="published" when="2016"/></imprint></monogr>
                <idno type="arXiv">arXiv:1512.03385</idno>
                <note type="raw_reference">K. He et al. Deep residual learning. CVPR 2016.</note>
            </biblStruct>
            <biblStruct xml:id="b1"><monogr><title>Untitled</title><imprint><date>1999</date></imprint></monogr></biblStruct>
        </listBibl></div>
    </back></text></TEI>"#;

    fn with_back<T>(f: impl FnOnce(&TeiDocument) -> T) -> T {
        let text = decode(BACK.as_bytes()).unwrap();
        let doc = open(text).unwrap();
        let tei = TeiDocument::new(&doc).unwrap();
        f(&tei)
    }

    #[test]
    fn test_references() {
        let refs = with_back(references);
        assert_eq!(refs.len(), 2);

        let first = &refs[0];
        assert_eq!(first.ref_idx, "b0");
        assert_eq!(first.title, "Deep Residual Learning");
        assert_eq!(first.publish_date, "2016");
        assert_eq!(first.arxiv_id, "1512.03385");
        assert_eq!(first.authors[0].full_name, "Kaiming He");
        assert!(first.content_text.starts_with("K. He et al."));
        assert_eq!(first.bbox.unwrap().page_number, 4);

        assert_eq!(refs[1].ref_idx, "b1");
        assert_eq!(refs[1].title, "Untitled");
        assert_eq!(refs[1].publish_date, "1999");
        assert!(refs[1].bbox.is_none());
    }

    #[test]
    fn test_acknowledgment() {
        let ack = with_back(acknowledgment).unwrap();
        assert_eq!(ack.text, "We thank the reviewers. And our families.");
        assert_eq!(ack.bbox.unwrap().page_number, 3);
    }
}
