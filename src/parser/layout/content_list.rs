//! First pass: the flat content list.
//!
//! Collects figures, tables and formulas before any geometry is known, and
//! the heading hints used later to tag rendered titles with their depth.

use super::schema::{ContentKind, ContentListEntry};
use crate::model::{basename, content_id, ContentTitle, FigureTable, Formula, ImageRecords};

/// A figure or table waiting for geometry from the middle pass.
#[derive(Debug, Clone)]
pub(crate) struct PendingFigure {
    /// Image file name joining the entry to its record
    pub image: String,
    pub figure: FigureTable,
}

/// Output of the content-list pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct ContentList {
    pub figures: Vec<PendingFigure>,
    pub formulas: Vec<Formula>,
    pub titles: Vec<ContentTitle>,
}

pub(crate) fn parse(entries: &[ContentListEntry], images: &ImageRecords) -> ContentList {
    let mut pass = ContentList::default();

    for entry in entries {
        match entry.kind() {
            ContentKind::Image | ContentKind::Table => {
                if let Some(pending) = figure(entry, images) {
                    pass.figures.push(pending);
                }
            }
            ContentKind::Equation => {
                if let Some(formula) = equation(entry) {
                    pass.formulas.push(formula);
                }
            }
            ContentKind::Text => {
                if let Some(title) = title(entry) {
                    pass.titles.push(title);
                }
            }
        }
    }

    log::debug!(
        "Content list: {} figures/tables, {} formulas, {} titles",
        pass.figures.len(),
        pass.formulas.len(),
        pass.titles.len()
    );
    pass
}

fn figure(entry: &ContentListEntry, images: &ImageRecords) -> Option<PendingFigure> {
    // Caption-only stubs carry no image.
    let path = entry.img_path.as_deref().filter(|p| !p.trim().is_empty())?;
    let image = basename(path).to_string();

    let mut figure = FigureTable {
        ref_content: entry
            .captions()
            .first()
            .map(|c| c.trim().to_string())
            .unwrap_or_default(),
        ..Default::default()
    };
    match images.get(&image) {
        Some(record) => {
            figure.id = record.id.clone();
            figure.ref_bbox = record.ref_bbox;
            figure.section_title = record.section_title.clone();
            figure.section_id = record.section_id.clone();
        }
        None => {
            log::debug!("No image record for {}", image);
            figure.id = content_id("image", &image);
        }
    }

    Some(PendingFigure { image, figure })
}

fn equation(entry: &ContentListEntry) -> Option<Formula> {
    let latex = strip_display_delimiters(&entry.text);
    if latex.is_empty() {
        return None;
    }
    Some(Formula {
        id: content_id("formula", latex),
        ref_content: latex.to_string(),
        ..Default::default()
    })
}

/// Strip the `$$\n ... \n$$` wrapping of display equations.
pub(crate) fn strip_display_delimiters(text: &str) -> &str {
    let text = text.strip_prefix("$$\n").unwrap_or(text);
    text.strip_suffix("\n$$").unwrap_or(text)
}

fn title(entry: &ContentListEntry) -> Option<ContentTitle> {
    let level = entry.text_level.filter(|l| *l > 0)?;
    let text = entry.text.trim();
    if text.is_empty() {
        return None;
    }
    Some(ContentTitle {
        level,
        text: text.to_string(),
        page_number: entry.page_idx + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(json: &str) -> Vec<ContentListEntry> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_figures_join_image_records() {
        let images = ImageRecords::from_file_names(["abc.jpg"]);
        let list = entries(
            r#"[{"type": "image", "img_path": "images/abc.jpg", "img_caption": ["Figure 1: Overview"], "page_idx": 0},
                {"type": "table", "img_path": "images/missing.jpg", "table_caption": ["Table 1"], "page_idx": 1},
                {"type": "image", "img_caption": ["caption only"], "page_idx": 1}]"#,
        );
        let pass = parse(&list, &images);

        assert_eq!(pass.figures.len(), 2);
        assert_eq!(pass.figures[0].image, "abc.jpg");
        assert_eq!(pass.figures[0].figure.id, images.get("abc.jpg").unwrap().id);
        assert_eq!(pass.figures[0].figure.ref_content, "Figure 1: Overview");
        assert_eq!(pass.figures[1].figure.ref_content, "Table 1");
        assert_eq!(pass.figures[1].figure.id, content_id("image", "missing.jpg"));
        assert!(pass.figures[1].figure.bbox.is_none());
    }

    #[test]
    fn test_equations_strip_delimiters() {
        let list = entries(
            r#"[{"type": "equation", "text": "$$\nE = mc^2\n$$", "page_idx": 0},
                {"type": "equation", "text": "", "page_idx": 0}]"#,
        );
        let pass = parse(&list, &ImageRecords::new());
        assert_eq!(pass.formulas.len(), 1);
        assert_eq!(pass.formulas[0].ref_content, "E = mc^2");
    }

    #[test]
    fn test_titles_need_positive_level() {
        let list = entries(
            r#"[{"type": "text", "text": " 1 Introduction ", "text_level": 1, "page_idx": 0},
                {"type": "text", "text": "Body text", "page_idx": 0},
                {"type": "text", "text": "Zero", "text_level": 0, "page_idx": 0},
                {"type": "text", "text": "", "text_level": 2, "page_idx": 0}]"#,
        );
        let pass = parse(&list, &ImageRecords::new());
        assert_eq!(pass.titles.len(), 1);
        assert_eq!(pass.titles[0].text, "1 Introduction");
        assert_eq!(pass.titles[0].page_number, 1);
    }

    #[test]
    fn test_strip_display_delimiters() {
        assert_eq!(strip_display_delimiters("$$\nx\n$$"), "x");
        assert_eq!(strip_display_delimiters("x"), "x");
    }
}
