//! Plain text rendering.

use crate::model::{CatalogueItem, FullDocument, ParagraphContent};

/// Render the paragraph stream as plain text.
///
/// Section titles open each new section; figure, table and formula
/// paragraphs contribute their caption or LaTeX. Blocks are separated by a
/// blank line.
pub fn to_text(doc: &FullDocument) -> String {
    let mut blocks: Vec<&str> = Vec::new();
    let mut section = "";

    for paragraph in &doc.paragraphs {
        if paragraph.section_title != section {
            section = &paragraph.section_title;
            if !section.is_empty() {
                blocks.push(section);
            }
        }

        let body = match &paragraph.content {
            ParagraphContent::Text { text } => text.text.trim(),
            ParagraphContent::Image { figure_table } | ParagraphContent::Table { figure_table } => {
                figure_table.ref_content.trim()
            }
            ParagraphContent::Formula { formula } => formula.ref_content.trim(),
        };
        if !body.is_empty() {
            blocks.push(body);
        }
    }

    blocks.join("\n\n")
}

/// Render a catalogue forest as an indented outline, one heading per line.
pub fn catalogue_outline(items: &[CatalogueItem]) -> String {
    let mut output = String::new();
    for item in items {
        push_outline(&mut output, item, 0);
    }
    output
}

fn push_outline(output: &mut String, item: &CatalogueItem, depth: usize) {
    let title = if item.formatted_title.is_empty() {
        &item.title
    } else {
        &item.formatted_title
    };
    output.push_str(&"  ".repeat(depth));
    output.push_str(title.trim());
    output.push('\n');

    for child in &item.child {
        push_outline(output, child, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FigureTable, Paragraph, Text};

    fn text(order: usize, section: &str, body: &str) -> Paragraph {
        Paragraph::new(
            order,
            ParagraphContent::Text {
                text: Text {
                    text: body.to_string(),
                    sentences: Vec::new(),
                    bbox: None,
                },
            },
        )
        .with_section(section, section)
    }

    #[test]
    fn test_to_text() {
        let figure = Paragraph::new(
            3,
            ParagraphContent::Image {
                figure_table: FigureTable {
                    ref_content: "Figure 1: Overview".to_string(),
                    ..Default::default()
                },
            },
        )
        .with_section("1 Introduction", "1 Introduction");
        let doc = FullDocument::new(vec![
            text(1, "1 Introduction", "Hello, world!"),
            text(2, "1 Introduction", "Second paragraph."),
            figure,
            text(4, "2 Method", "  "),
        ]);

        assert_eq!(
            to_text(&doc),
            "1 Introduction\n\nHello, world!\n\nSecond paragraph.\n\nFigure 1: Overview\n\n2 Method"
        );
    }

    #[test]
    fn test_to_text_empty() {
        assert_eq!(to_text(&FullDocument::default()), "");
    }

    #[test]
    fn test_catalogue_outline() {
        let items = vec![
            CatalogueItem {
                title: "1 Introduction".to_string(),
                formatted_title: "1 Introduction".to_string(),
                child: vec![CatalogueItem {
                    title: "1.1Background".to_string(),
                    formatted_title: "1.1 Background".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            },
            CatalogueItem {
                title: "Conclusion".to_string(),
                ..Default::default()
            },
        ];

        assert_eq!(
            catalogue_outline(&items),
            "1 Introduction\n  1.1 Background\nConclusion\n"
        );
    }
}
