//! TEI body: catalogue, paragraphs, figures, formulas and cross-references.

use super::xml;
use super::TeiDocument;
use crate::catalogue::{
    build_catalogue, starts_with_number, CatalogueOptions, HeadingCandidate, TrailingSentence,
};
use crate::model::{
    content_id, CatalogueItem, FigureTable, Formula, Paragraph, ParagraphContent, RefInfo,
    RefMarker, Sentence, Text,
};
use crate::text::title_case;
use roxmltree::{Node, NodeId};
use std::collections::HashSet;

/// Everything extracted from `text/body` and `text/back`.
#[derive(Debug, Default)]
pub(super) struct Body {
    pub catalogue: Vec<CatalogueItem>,
    pub paragraphs: Vec<Paragraph>,
    pub reference_markers: Vec<RefMarker>,
    pub figure_and_table_markers: Vec<RefMarker>,
    pub figures_and_tables: Vec<FigureTable>,
    pub formulas: Vec<Formula>,
}

pub(super) fn parse(tei: &TeiDocument, options: &CatalogueOptions) -> Body {
    let text = xml::child(tei.root, "text");
    let (catalogue, promoted) = match text.and_then(|t| xml::child(t, "body")) {
        Some(body) => catalogue(body, tei, options),
        None => (Vec::new(), HashSet::new()),
    };

    let mut body = Body {
        catalogue,
        figure_and_table_markers: figure_and_table_markers(tei),
        ..Default::default()
    };
    if let Some(text) = text {
        walk(text, tei, &promoted, &mut body);
    }
    body
}

/// Build the catalogue from `body/div` headings carrying an `n` attribute.
///
/// Returns the forest and the ids of sentences promoted to headings.
fn catalogue(
    body: Node,
    tei: &TeiDocument,
    options: &CatalogueOptions,
) -> (Vec<CatalogueItem>, HashSet<NodeId>) {
    let divs: Vec<Node> = xml::children(body, "div").collect();
    let mut candidates = Vec::new();
    let mut trailing_nodes: Vec<NodeId> = Vec::new();

    for (i, div) in divs.iter().enumerate() {
        let Some(head) = xml::child(*div, "head") else {
            continue;
        };
        let Some(number) = head.attribute("n") else {
            continue;
        };

        let mut candidate =
            HeadingCandidate::new(xml::flowing_text(head), xml::bbox(head, &tei.pages))
                .with_declared_number(number);
        if let Some(sentence) = i.checked_sub(1).and_then(|prev| lone_trailing_sentence(divs[prev]))
        {
            candidate = candidate.with_trailing_sentence(TrailingSentence {
                text: xml::flowing_text(sentence),
                bbox: xml::bbox(sentence, &tei.pages),
                source: trailing_nodes.len(),
            });
            trailing_nodes.push(sentence.id());
        }
        candidates.push(candidate);
    }

    let build = build_catalogue(&candidates, options);
    let promoted = build
        .consumed
        .iter()
        .filter_map(|&i| trailing_nodes.get(i).copied())
        .collect();
    (build.items, promoted)
}

/// The only sentence of a section's last paragraph, if it has exactly one.
fn lone_trailing_sentence<'a, 'input>(div: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    let last = xml::children(div, "p").last()?;
    let mut sentences = xml::children(last, "s");
    let first = sentences.next()?;
    sentences.next().is_none().then_some(first)
}

/// Pre-order walk collecting paragraphs, figures and formulas.
fn walk(text: Node, tei: &TeiDocument, promoted: &HashSet<NodeId>, body: &mut Body) {
    for node in text.descendants().filter(|n| n.is_element()) {
        if xml::ancestor(node, "listBibl").is_some() {
            continue;
        }

        let content = match node.tag_name().name() {
            "p" => text_paragraph(node, tei, promoted),
            "figure" => {
                let figure_table = figure(node, tei);
                body.figures_and_tables.push(figure_table.clone());
                Some(if node.attribute("type") == Some("table") {
                    ParagraphContent::Table { figure_table }
                } else {
                    ParagraphContent::Image { figure_table }
                })
            }
            "formula" if xml::ancestor(node, "p").is_none() => {
                let formula = formula(node, tei);
                body.formulas.push(formula.clone());
                Some(ParagraphContent::Formula { formula })
            }
            _ => None,
        };

        let Some(content) = content else {
            continue;
        };
        let (section_title, section_id) = section_of(node);
        let references = match &content {
            ParagraphContent::Text { .. } => inline_citations(node, tei),
            _ => Vec::new(),
        };
        body.reference_markers
            .extend(references.iter().map(|r| RefMarker {
                ref_idx: r.target.clone(),
                ref_content: r.text.clone(),
                bbox: r.bbox,
            }));

        let mut paragraph = Paragraph::new(body.paragraphs.len() + 1, content)
            .with_section(section_title, section_id);
        paragraph.references = references;
        body.paragraphs.push(paragraph);
    }
}

fn text_paragraph(
    p: Node,
    tei: &TeiDocument,
    promoted: &HashSet<NodeId>,
) -> Option<ParagraphContent> {
    let text = paragraph_text(p);
    if text.is_empty() {
        return None;
    }

    let sentence_nodes: Vec<Node> = xml::descendants(p, "s").collect();
    let sentences: Vec<Sentence> = if sentence_nodes.is_empty() {
        vec![Sentence {
            text: text.clone(),
            index: 0,
            bbox: xml::bbox(p, &tei.pages),
        }]
    } else {
        sentence_nodes
            .iter()
            .filter(|s| !promoted.contains(&s.id()))
            .map(|s| (xml::flowing_text(*s), xml::bbox(*s, &tei.pages)))
            .filter(|(t, _)| !t.is_empty())
            .enumerate()
            .map(|(index, (text, bbox))| Sentence { text, index, bbox })
            .collect()
    };

    // A paragraph whose only sentence became a heading is no longer body text.
    if sentences.is_empty() {
        return None;
    }

    let bbox = xml::bbox(p, &tei.pages).or_else(|| sentences.iter().find_map(|s| s.bbox));
    Some(ParagraphContent::Text {
        text: Text {
            text,
            sentences,
            bbox,
        },
    })
}

/// Paragraph text: own text, else non-`ref` child text, else everything.
fn paragraph_text(p: Node) -> String {
    let own = xml::own_text(p);
    if !own.is_empty() {
        return own;
    }

    let children = p
        .children()
        .filter(|c| c.is_element() && !xml::is(c, "ref"))
        .map(xml::flowing_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if !children.is_empty() {
        return children;
    }

    xml::flowing_text(p)
}

fn inline_citations(p: Node, tei: &TeiDocument) -> Vec<RefInfo> {
    xml::descendants(p, "ref")
        .filter(|r| r.attribute("type") == Some("bibr"))
        .map(|r| RefInfo {
            text: xml::flowing_text(r),
            target: r
                .attribute("target")
                .unwrap_or("")
                .trim()
                .trim_start_matches('#')
                .to_string(),
            bbox: xml::bbox(r, &tei.pages),
        })
        .collect()
}

/// Title and id of the nearest enclosing `div` with a `head`.
fn section_of(node: Node) -> (String, String) {
    let Some(div) = xml::ancestor(node, "div") else {
        return (String::new(), String::new());
    };
    let Some(head) = xml::child(div, "head") else {
        return (String::new(), String::new());
    };

    let mut title = xml::flowing_text(head);
    if let Some(number) = head.attribute("n") {
        let number = number.trim().trim_end_matches('.');
        if !number.is_empty() && !starts_with_number(&title, number) {
            title = format!("{} {}", number, title).trim().to_string();
        }
    }
    let id = xml::xml_id(div)
        .map(str::to_string)
        .unwrap_or_else(|| title.clone());
    (title, id)
}

fn figure(node: Node, tei: &TeiDocument) -> FigureTable {
    let caption = [xml::child(node, "head"), xml::child(node, "figDesc")]
        .into_iter()
        .flatten()
        .map(xml::flowing_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let (section_title, section_id) = section_of(node);

    FigureTable {
        id: xml::xml_id(node)
            .map(str::to_string)
            .unwrap_or_else(|| content_id("figure", &caption)),
        ref_bbox: xml::child(node, "figDesc").and_then(|d| xml::bbox(d, &tei.pages)),
        bbox: xml::bbox(node, &tei.pages)
            .or_else(|| xml::child(node, "graphic").and_then(|g| xml::bbox(g, &tei.pages))),
        ref_content: caption,
        section_title,
        section_id,
    }
}

fn formula(node: Node, tei: &TeiDocument) -> Formula {
    let own = xml::own_text(node);
    let content = if own.is_empty() {
        xml::flowing_text(node)
    } else {
        own
    };
    let (section_title, section_id) = section_of(node);

    Formula {
        id: xml::xml_id(node)
            .map(str::to_string)
            .unwrap_or_else(|| content_id("formula", &content)),
        ref_bbox: xml::child(node, "label").and_then(|l| xml::bbox(l, &tei.pages)),
        bbox: xml::bbox(node, &tei.pages),
        ref_content: content,
        section_title,
        section_id,
    }
}

/// Every `ref[type=figure|table]` in the document, labelled `Figure 2`.
fn figure_and_table_markers(tei: &TeiDocument) -> Vec<RefMarker> {
    xml::descendants(tei.root, "ref")
        .filter_map(|r| {
            let kind = r
                .attribute("type")
                .filter(|t| *t == "figure" || *t == "table")?;
            let value = xml::flowing_text(r);
            Some(RefMarker {
                ref_idx: title_case(&format!("{} {}", kind, value)),
                ref_content: value,
                bbox: xml::bbox(r, &tei.pages),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::{decode, open, TeiDocument};
    use super::*;
    use crate::model::ParagraphType;

    const BODY: &str = r##"<TEI xmlns="http://www.tei-c.org/ns/1.0">
    <teiHeader><encodingDesc><appInfo><application version="0.8.0" when="now"/></appInfo></encodingDesc></teiHeader>
    <facsimile><surface n="1" lrx="612" lry="792"/><surface n="2" lrx="612" lry="792"/></facsimile>
    <text xml:lang="en"><body>
        <div xml:id="sec_intro"><head n="1" coords="1,50,50,100,12">Introduction</head>
            <p><s coords="1,50,70,300,10">Intro text.</s></p>
            <p><s coords="1,50,90,120,10">Method Overview</s></p>
        </div>
        <div><head n="2.1" coords="1,50,110,100,12">Setup</head>
            <p><s>We set up.</s><s>Then we ran.</s></p>
        </div>
        <div><head n="3">3 Results</head>
            <p><s>As shown in Figure <ref type="figure" target="#fig_0">1</ref> and <ref type="bibr" target="#b0" coords="2,1,1,5,5">[1]</ref>.</s></p>
            <figure xml:id="fig_0" coords="2,10,100,200,150"><head>Figure 1</head><figDesc coords="2,10,260,200,20">Overview.</figDesc></figure>
            <figure type="table" xml:id="tab_0"><head>Table 1</head><figDesc>Scores.</figDesc></figure>
            <formula xml:id="formula_0" coords="2,10,300,100,20">E = mc^2<label coords="2,300,300,20,20">(1)</label></formula>
        </div>
    </body>
    <back>
        <div type="acknowledgement"><div><head>Acknowledgements</head><p>We thank everyone.</p></div></div>
        <div type="references"><listBibl><biblStruct xml:id="b0"><monogr><title>Ignored</title></monogr><note><p>not a paragraph</p></note></biblStruct></listBibl></div>
    </back></text></TEI>"##;

    fn with_body<T>(f: impl FnOnce(Body) -> T) -> T {
        let text = decode(BODY.as_bytes()).unwrap();
        let doc = open(text).unwrap();
        let tei = TeiDocument::new(&doc).unwrap();
        f(parse(&tei, &CatalogueOptions::default()))
    }

    #[test]
    fn test_catalogue_with_promoted_parent() {
        with_body(|body| {
            let titles: Vec<&str> = body.catalogue.iter().map(|c| c.title.as_str()).collect();
            assert_eq!(titles, vec!["1 Introduction", "2 Method Overview", "3 Results"]);
            assert_eq!(body.catalogue[1].title_order, "2");
            assert_eq!(body.catalogue[1].child.len(), 1);
            assert_eq!(body.catalogue[1].child[0].title, "2.1 Setup");
            assert_eq!(body.catalogue[1].child[0].title_order, "2.1");
        });
    }

    #[test]
    fn test_declared_number_not_duplicated() {
        with_body(|body| {
            assert_eq!(body.catalogue[2].title, "3 Results");
            assert!(body.paragraphs.iter().all(|p| p.section_title != "3 3 Results"));
        });
    }

    #[test]
    fn test_promoted_sentence_leaves_paragraph_stream() {
        with_body(|body| {
            assert!(body
                .paragraphs
                .iter()
                .all(|p| p.text().map_or(true, |t| t.text != "Method Overview")));
        });
    }

    #[test]
    fn test_paragraph_stream() {
        with_body(|body| {
            let kinds: Vec<ParagraphType> = body.paragraphs.iter().map(|p| p.kind()).collect();
            assert_eq!(
                kinds,
                vec![
                    ParagraphType::Text,
                    ParagraphType::Text,
                    ParagraphType::Text,
                    ParagraphType::Image,
                    ParagraphType::Table,
                    ParagraphType::Formula,
                    ParagraphType::Text,
                ]
            );
            let orders: Vec<usize> = body.paragraphs.iter().map(|p| p.order).collect();
            assert_eq!(orders, vec![1, 2, 3, 4, 5, 6, 7]);

            let intro = &body.paragraphs[0];
            assert_eq!(intro.section_title, "1 Introduction");
            assert_eq!(intro.section_id, "sec_intro");

            let setup = body.paragraphs[1].text().unwrap();
            assert_eq!(setup.text, "We set up. Then we ran.");
            assert_eq!(setup.sentences.len(), 2);
            assert_eq!(setup.sentences[1].index, 1);
            assert_eq!(body.paragraphs[1].section_title, "2.1 Setup");

            let ack = &body.paragraphs[6];
            assert_eq!(ack.text().unwrap().text, "We thank everyone.");
            assert_eq!(ack.section_title, "Acknowledgements");
        });
    }

    #[test]
    fn test_inline_citations() {
        with_body(|body| {
            let paragraph = &body.paragraphs[2];
            assert_eq!(
                paragraph.text().unwrap().text,
                "As shown in Figure 1 and [1]."
            );
            assert_eq!(paragraph.references.len(), 1);
            assert_eq!(paragraph.references[0].target, "b0");
            assert_eq!(paragraph.references[0].text, "[1]");

            assert_eq!(body.reference_markers.len(), 1);
            assert_eq!(body.reference_markers[0].ref_idx, "b0");
            assert_eq!(body.reference_markers[0].bbox.unwrap().page_number, 2);
        });
    }

    #[test]
    fn test_figures_tables_and_formulas() {
        with_body(|body| {
            assert_eq!(body.figures_and_tables.len(), 2);
            let figure = &body.figures_and_tables[0];
            assert_eq!(figure.id, "fig_0");
            assert_eq!(figure.ref_content, "Figure 1 Overview.");
            assert_eq!(figure.section_title, "3 Results");
            assert_eq!(figure.bbox.unwrap().page_number, 2);
            assert!(figure.ref_bbox.is_some());
            assert_eq!(body.figures_and_tables[1].id, "tab_0");

            assert_eq!(body.formulas.len(), 1);
            assert_eq!(body.formulas[0].ref_content, "E = mc^2");
            assert_eq!(body.formulas[0].ref_bbox.unwrap().x0, 300.0);

            assert_eq!(body.figure_and_table_markers.len(), 1);
            assert_eq!(body.figure_and_table_markers[0].ref_idx, "Figure 1");
        });
    }
}
