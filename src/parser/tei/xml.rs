//! Small tree-walking helpers over `roxmltree` nodes.
//!
//! Element names are compared by local name, so the TEI namespace does not
//! need to be spelled out.

use crate::model::{BBox, Page};
use roxmltree::Node;

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Check whether a node is an element with the given local name.
pub(super) fn is(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

/// First element child with the given name.
pub(super) fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is(n, name))
}

/// Element children with the given name.
pub(super) fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |n| is(n, name))
}

/// Descendant elements (excluding the node itself) with the given name.
pub(super) fn descendants<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.descendants().skip(1).filter(move |n| is(n, name))
}

/// All elements matching `.//first/second/...` below `node`, in document order.
pub(super) fn find_all<'a, 'input>(node: Node<'a, 'input>, path: &[&str]) -> Vec<Node<'a, 'input>> {
    let Some((first, rest)) = path.split_first() else {
        return Vec::new();
    };

    let mut current: Vec<Node<'a, 'input>> = node
        .descendants()
        .skip(1)
        .filter(|n| is(n, first))
        .collect();
    for name in rest {
        current = current
            .into_iter()
            .flat_map(|n| n.children().filter(|c| is(c, name)))
            .collect();
    }
    current
}

/// First element matching `.//first/second/...` below `node`.
pub(super) fn find_first<'a, 'input>(node: Node<'a, 'input>, path: &[&str]) -> Option<Node<'a, 'input>> {
    find_all(node, path).into_iter().next()
}

/// Nearest ancestor element (excluding the node itself) with the given name.
pub(super) fn ancestor<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.ancestors().skip(1).find(|n| is(n, name))
}

/// Whole text content with whitespace collapsed to single spaces.
pub(super) fn flowing_text(node: Node) -> String {
    let raw: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    collapse_whitespace(&raw)
}

/// Text of the node's direct text children, whitespace collapsed.
pub(super) fn own_text(node: Node) -> String {
    let raw: String = node
        .children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    collapse_whitespace(&raw)
}

/// Trimmed text pieces of all descendants joined by single spaces.
///
/// Used for structured names where adjacent elements carry no whitespace
/// between them (`<forename>Ada</forename><surname>Lovelace</surname>`).
pub(super) fn joined_text(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub(super) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Geometry of a node from its `coords` attribute.
pub(super) fn bbox(node: Node, pages: &[Page]) -> Option<BBox> {
    node.attribute("coords")
        .and_then(|coords| BBox::from_coords(coords, pages))
}

/// Geometry of the node, or of its first descendant that has any.
pub(super) fn bbox_or_descendant(node: Node, pages: &[Page]) -> Option<BBox> {
    node.descendants().find_map(|n| bbox(n, pages))
}

/// The `xml:id` attribute.
pub(super) fn xml_id<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.attribute((XML_NS, "id"))
}

/// The `xml:lang` attribute, falling back to a plain `lang`.
pub(super) fn xml_lang<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.attribute((XML_NS, "lang"))
        .or_else(|| node.attribute("lang"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<TEI xmlns="http://www.tei-c.org/ns/1.0">
        <a><b coords="1,1,2,3,4"><c>one</c></b><b><c>two</c><c>three</c></b></a>
        <p xml:id="p1">Lead <ref>[1]</ref>, tail.</p>
        <persName><forename>Ada</forename><surname>Lovelace</surname></persName>
    </TEI>"#;

    #[test]
    fn test_find_all_follows_child_chain() {
        let doc = roxmltree::Document::parse(XML).unwrap();
        let found: Vec<String> = find_all(doc.root_element(), &["a", "b", "c"])
            .into_iter()
            .map(flowing_text)
            .collect();
        assert_eq!(found, vec!["one", "two", "three"]);
        assert!(find_first(doc.root_element(), &["b", "missing"]).is_none());
    }

    #[test]
    fn test_text_flavours() {
        let doc = roxmltree::Document::parse(XML).unwrap();
        let p = find_first(doc.root_element(), &["p"]).unwrap();
        assert_eq!(flowing_text(p), "Lead [1], tail.");
        assert_eq!(own_text(p), "Lead , tail.");
        assert_eq!(xml_id(p), Some("p1"));

        let name = find_first(doc.root_element(), &["persName"]).unwrap();
        assert_eq!(joined_text(name), "Ada Lovelace");
        assert_eq!(flowing_text(name), "AdaLovelace");
    }

    #[test]
    fn test_bbox_and_ancestor() {
        let doc = roxmltree::Document::parse(XML).unwrap();
        let a = find_first(doc.root_element(), &["a"]).unwrap();
        assert!(bbox(a, &[]).is_none());
        assert_eq!(bbox_or_descendant(a, &[]).unwrap().x1, 3.0);

        let c = find_first(doc.root_element(), &["c"]).unwrap();
        assert!(is(&ancestor(c, "a").unwrap(), "a"));
        assert!(ancestor(c, "p").is_none());
    }
}
