//! Integration tests for numbering normalization and catalogue assembly.

use docstruct::catalogue::{split_normalized, to_order_key, NumberingFormat, TrailingSentence};
use docstruct::{build_catalogue, normalize_title, BBox, CatalogueOptions, HeadingCandidate, Page};
use proptest::prelude::*;

fn candidates(titles: &[&str]) -> Vec<HeadingCandidate> {
    titles
        .iter()
        .map(|t| HeadingCandidate::new(*t, None))
        .collect()
}

// ==================== Geometry Tests ====================

#[test]
fn test_coords_yield_corner_points() {
    let pages = vec![Page::new(1, 595.0, 842.0), Page::new(2, 612.0, 792.0)];
    let bbox = BBox::from_coords("2,10.5,20,100,50", &pages).unwrap();

    assert_eq!(bbox.x0, 10.5);
    assert_eq!(bbox.y0, 20.0);
    assert_eq!(bbox.x1, 110.5);
    assert_eq!(bbox.y1, 70.0);
    assert_eq!(bbox.page_number, 2);
    assert_eq!(bbox.origin_width, 612.0);
    assert_eq!(bbox.origin_height, 792.0);
}

#[test]
fn test_coords_use_first_group() {
    let pages = vec![Page::new(1, 595.0, 842.0)];
    let bbox = BBox::from_coords("1,1,2,3,4;2,5,6,7,8", &pages).unwrap();
    assert_eq!(bbox.page_number, 1);
    assert_eq!(bbox.x1, 4.0);
}

#[test]
fn test_coords_unknown_page_falls_back_to_first() {
    let pages = vec![Page::new(1, 595.0, 842.0)];
    let bbox = BBox::from_coords("9,0,0,1,1", &pages).unwrap();
    assert_eq!(bbox.page_number, 9);
    assert_eq!(bbox.origin_width, 595.0);

    let bbox = BBox::from_coords("1,0,0,1,1", &[]).unwrap();
    assert_eq!(bbox.origin_width, 0.0);
}

#[test]
fn test_malformed_coords() {
    assert!(BBox::from_coords("1,2,3,4", &[]).is_none());
    assert!(BBox::from_coords("", &[]).is_none());
    assert!(BBox::from_coords("1,a,3,4,5", &[]).is_none());
}

// ==================== Numbering Tests ====================

#[test]
fn test_normalize_examples() {
    assert_eq!(normalize_title("2.1.Introduction"), "2.1 Introduction");
    assert_eq!(normalize_title("2 Introduction"), "2 Introduction");
    assert_eq!(
        split_normalized("2.1 Introduction"),
        ("2.1".to_string(), "Introduction".to_string())
    );
}

#[test]
fn test_order_keys_across_grammars() {
    assert_eq!(
        to_order_key("十、概述", NumberingFormat::Chinese),
        Some(("10".to_string(), 1))
    );
    assert_eq!(
        to_order_key("IV. Results", NumberingFormat::Roman),
        Some(("4".to_string(), 1))
    );
}

// ==================== Tree Tests ====================

#[test]
fn test_forest_with_two_roots() {
    let items = build_catalogue(
        &candidates(&["1 Intro", "1.1 Background", "1.2 Scope", "3 Results"]),
        &CatalogueOptions::default(),
    )
    .items;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title_order, "1");
    assert_eq!(items[1].title_order, "3");
    let child: Vec<&str> = items[0]
        .child
        .iter()
        .map(|c| c.title_order.as_str())
        .collect();
    assert_eq!(child, vec!["1.1", "1.2"]);
}

#[test]
fn test_level_skip_repair() {
    let items = build_catalogue(
        &candidates(&["1 Intro", "2.1 Method"]),
        &CatalogueOptions::default(),
    )
    .items;

    assert_eq!(items.len(), 2);
    assert_eq!(items[1].title_order, "2");
    assert_eq!(items[1].child[0].title_order, "2.1");
}

#[test]
fn test_level_skip_repair_consumes_sentence() {
    let list = vec![
        HeadingCandidate::new("1 Intro", None),
        HeadingCandidate::new("2.1 Setup", None).with_trailing_sentence(TrailingSentence {
            text: "Experiments".to_string(),
            bbox: None,
            source: 7,
        }),
    ];
    let build = build_catalogue(&list, &CatalogueOptions::default());

    assert_eq!(build.consumed, vec![7]);
    assert_eq!(build.items[1].formatted_title, "2 Experiments");
}

#[test]
fn test_no_rule_fallback_drops_first() {
    let titles = ["Paper Title", "Introduction", "Method", "Discussion", "Conclusion"];
    let items = build_catalogue(&candidates(&titles), &CatalogueOptions::default()).items;

    assert_eq!(items.len(), titles.len() - 1);
    assert!(items.iter().all(|i| i.level == "1"));
    assert_eq!(items[0].title, "Introduction");
}

// ==================== Edge Case Tests ====================

#[test]
fn test_empty_candidates() {
    let build = build_catalogue(&[], &CatalogueOptions::default());
    assert!(build.items.is_empty());
    assert!(build.consumed.is_empty());
}

#[test]
fn test_total_items_counts_nested() {
    let items = build_catalogue(
        &candidates(&["1 A", "1.1 B", "1.1.1 C", "2 D"]),
        &CatalogueOptions::default(),
    )
    .items;
    let total: usize = items.iter().map(|i| i.total_items()).sum();
    assert_eq!(total, 4);

    let orders: Vec<usize> = items[0].iter().map(|i| i.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
}

proptest! {
    #[test]
    fn prop_normalize_is_idempotent(title in "\\PC{0,40}") {
        let once = normalize_title(&title);
        prop_assert_eq!(normalize_title(&once), once);
    }

    #[test]
    fn prop_normalize_numbered_is_idempotent(
        number in "[0-9]{1,3}(\\.[0-9]{1,2}){0,3}\\.?",
        space in "[ \t]{0,3}",
        text in "[A-Za-z][A-Za-z .]{0,20}"
    ) {
        let title = format!("{}{}{}", number, space, text);
        let once = normalize_title(&title);
        prop_assert_eq!(normalize_title(&once), once);
    }

    #[test]
    fn prop_arabic_level_matches_depth(parts in proptest::collection::vec(1u32..30, 1..5)) {
        let key = parts.iter().map(u32::to_string).collect::<Vec<_>>().join(".");
        let title = format!("{} Heading", key);
        prop_assert_eq!(
            to_order_key(&title, NumberingFormat::Arabic),
            Some((key.clone(), parts.len()))
        );
    }
}
