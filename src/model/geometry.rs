//! Page registry and bounding-box geometry.
//!
//! The TEI extractor encodes geometry as `page,x,y,w,h` attribute strings,
//! the layout tool as `[x0, y0, x1, y1]` arrays with a separate page size.
//! Both are normalized into [`BBox`], which always carries the dimensions
//! of the page it lives on so consumers can rescale without a lookup.

use serde::{Deserialize, Serialize};

/// A page of the source PDF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Page width in the source tool's units
    pub width: f64,

    /// Page height in the source tool's units
    pub height: f64,
}

impl Page {
    /// Create a new page.
    pub fn new(page_number: u32, width: f64, height: f64) -> Self {
        Self {
            page_number,
            width,
            height,
        }
    }
}

/// Look up the dimensions of a page.
///
/// Falls back to the first known page when `page_number` is absent, and to
/// `(0, 0)` when no pages are known at all.
pub fn resolve_page(pages: &[Page], page_number: u32) -> (f64, f64) {
    pages
        .iter()
        .find(|p| p.page_number == page_number)
        .or_else(|| pages.first())
        .map(|p| (p.width, p.height))
        .unwrap_or((0.0, 0.0))
}

/// A page-relative rectangle with the page dimensions attached.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BBox {
    /// Left edge
    pub x0: f64,

    /// Top edge
    pub y0: f64,

    /// Right edge
    pub x1: f64,

    /// Bottom edge
    pub y1: f64,

    /// Page number (1-indexed)
    pub page_number: u32,

    /// Width of the page the box was measured on
    pub origin_width: f64,

    /// Height of the page the box was measured on
    pub origin_height: f64,
}

impl BBox {
    /// Parse a TEI `coords` attribute (`page,x,y,w,h[;page,x,y,w,h...]`).
    ///
    /// Only the first `;`-delimited group is used. Returns `None` when the
    /// group has fewer than five fields or any field fails to parse.
    pub fn from_coords(coords: &str, pages: &[Page]) -> Option<Self> {
        let first = coords.split(';').next()?.trim();
        let fields: Vec<&str> = first.split(',').map(str::trim).collect();
        if fields.len() < 5 {
            return None;
        }

        let page_number = fields[0].parse::<u32>().ok()?;
        let x = fields[1].parse::<f64>().ok()?;
        let y = fields[2].parse::<f64>().ok()?;
        let w = fields[3].parse::<f64>().ok()?;
        let h = fields[4].parse::<f64>().ok()?;

        let (origin_width, origin_height) = resolve_page(pages, page_number);
        Some(Self {
            x0: x,
            y0: y,
            x1: x + w,
            y1: y + h,
            page_number,
            origin_width,
            origin_height,
        })
    }

    /// Build a box from a layout-tool `[x0, y0, x1, y1]` rectangle.
    ///
    /// `page_idx` is the tool's 0-based page index; the box records the
    /// 1-based page number.
    pub fn from_rect(rect: [f64; 4], page_idx: u32, width: f64, height: f64) -> Self {
        Self {
            x0: rect[0],
            y0: rect[1],
            x1: rect[2],
            y1: rect[3],
            page_number: page_idx + 1,
            origin_width: width,
            origin_height: height,
        }
    }

    /// Width of the box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> Vec<Page> {
        vec![Page::new(1, 595.0, 842.0), Page::new(2, 612.0, 792.0)]
    }

    #[test]
    fn test_resolve_page_exact() {
        assert_eq!(resolve_page(&pages(), 2), (612.0, 792.0));
    }

    #[test]
    fn test_resolve_page_falls_back_to_first() {
        assert_eq!(resolve_page(&pages(), 9), (595.0, 842.0));
        assert_eq!(resolve_page(&[], 1), (0.0, 0.0));
    }

    #[test]
    fn test_from_coords() {
        let bbox = BBox::from_coords("2,10.5,20,100,50.25", &pages()).unwrap();
        assert_eq!(bbox.page_number, 2);
        assert_eq!(bbox.x0, 10.5);
        assert_eq!(bbox.y0, 20.0);
        assert_eq!(bbox.x1, 110.5);
        assert_eq!(bbox.y1, 70.25);
        assert_eq!(bbox.origin_width, 612.0);
        assert_eq!(bbox.origin_height, 792.0);
    }

    #[test]
    fn test_from_coords_uses_first_group() {
        let bbox = BBox::from_coords("1,1,2,3,4;2,100,200,300,400", &pages()).unwrap();
        assert_eq!(bbox.page_number, 1);
        assert_eq!(bbox.x1, 4.0);
        assert_eq!(bbox.y1, 6.0);
    }

    #[test]
    fn test_from_coords_rejects_malformed() {
        assert!(BBox::from_coords("1,2,3,4", &pages()).is_none());
        assert!(BBox::from_coords("", &pages()).is_none());
        assert!(BBox::from_coords("a,1,2,3,4", &pages()).is_none());
        assert!(BBox::from_coords("1,1,two,3,4", &pages()).is_none());
    }

    #[test]
    fn test_from_coords_without_pages() {
        let bbox = BBox::from_coords("3,0,0,10,10", &[]).unwrap();
        assert_eq!(bbox.origin_width, 0.0);
        assert_eq!(bbox.origin_height, 0.0);
    }

    #[test]
    fn test_from_rect() {
        let bbox = BBox::from_rect([10.0, 20.0, 30.0, 60.0], 0, 612.0, 792.0);
        assert_eq!(bbox.page_number, 1);
        assert_eq!(bbox.width(), 20.0);
        assert_eq!(bbox.height(), 40.0);
        assert_eq!(bbox.origin_width, 612.0);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_string(&BBox::from_rect([0.0; 4], 0, 1.0, 2.0)).unwrap();
        assert!(json.contains("\"pageNumber\":1"));
        assert!(json.contains("\"originWidth\":1.0"));
        assert!(json.contains("\"originHeight\":2.0"));
    }
}
