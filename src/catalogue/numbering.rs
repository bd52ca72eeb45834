//! Heading-number grammars.
//!
//! Headings arrive as flat text such as `2.1. Method`, `十、概述` or
//! `IV. Results`. This module detects which numbering grammar a heading
//! uses and converts its number into a canonical dot-separated order key
//! (`2.1`, `10`, `4`) together with a nesting level.

use super::CatalogueOptions;
use regex::Regex;
use std::sync::LazyLock;

static ARABIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[0-9]+(?:\.[0-9]+)*\.?\s*").unwrap());
static CHINESE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[一二三四五六七八九十]+、|（[一二三四五六七八九十0-9]+）)").unwrap()
});
static ROMAN_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[IVXLCDM]+|[A-Z])\.\s*").unwrap());

static NUMBERED_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^([0-9]+(?:\.[0-9]+)*)(\.?)(\s*)(.+)$").unwrap());
static SPLIT_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^([0-9]+(?:\.[0-9]+)*)\.?\s+(.+)$").unwrap());

static ARABIC_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([0-9]+(?:\.[0-9]+)*)\.?\s*").unwrap());
static CHINESE_ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([一二三四五六七八九十]+)、\s*").unwrap());
static CHINESE_BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*（([一二三四五六七八九十0-9]+)）\s*").unwrap());
static ROMAN_NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([IVXLCDM]+)\.\s*").unwrap());
static LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*([A-Z])\.\s*").unwrap());

const CHINESE_NUMERALS: [&str; 20] = [
    "一", "二", "三", "四", "五", "六", "七", "八", "九", "十", "十一", "十二", "十三", "十四",
    "十五", "十六", "十七", "十八", "十九", "二十",
];

const ROMAN_NUMERALS: [&str; 20] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII", "XIII", "XIV", "XV",
    "XVI", "XVII", "XVIII", "XIX", "XX",
];

const LETTERS: [&str; 20] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T",
];

/// Numbering grammar of a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberingFormat {
    /// `1`, `2.1`, `3.2.1.`
    Arabic,
    /// `一、` and bracketed `（一）`
    Chinese,
    /// `IV.` and single letters `B.`
    Roman,
    /// No recognizable numbering
    Unknown,
}

const PARSE_ORDER: [NumberingFormat; 3] = [
    NumberingFormat::Arabic,
    NumberingFormat::Chinese,
    NumberingFormat::Roman,
];

/// Detect the numbering grammar of a heading.
pub fn detect_format(title: &str) -> NumberingFormat {
    if ARABIC_PREFIX.is_match(title) {
        NumberingFormat::Arabic
    } else if CHINESE_PREFIX.is_match(title) {
        NumberingFormat::Chinese
    } else if ROMAN_PREFIX.is_match(title) {
        NumberingFormat::Roman
    } else {
        NumberingFormat::Unknown
    }
}

/// Rewrite an Arabic-numbered heading with exactly one space after the number.
///
/// A dot directly after a multi-level number is dropped (`2.1. Foo` becomes
/// `2.1 Foo`); a dot after a single number is kept (`2. Foo`). Headings
/// without a leading number are only trimmed. The result is a fixed point:
/// normalizing it again yields the same string.
pub fn normalize_title(title: &str) -> String {
    let title = title.trim();
    let Some(caps) = NUMBERED_TITLE.captures(title) else {
        return title.to_string();
    };

    let number = &caps[1];
    let dot = if number.contains('.') { "" } else { &caps[2] };
    format!("{}{} {}", number, dot, caps[4].trim())
}

/// Split a normalized heading into its order key and text.
///
/// Returns an empty key and the whole title when there is no number.
pub fn split_normalized(title: &str) -> (String, String) {
    match SPLIT_TITLE.captures(title) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => (String::new(), title.to_string()),
    }
}

/// Check whether a heading already starts with the given number.
///
/// `2 Results` starts with `2`, `20 Results` does not.
pub fn starts_with_number(title: &str, number: &str) -> bool {
    if number.is_empty() {
        return false;
    }
    title
        .trim_start()
        .strip_prefix(number)
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_ascii_digit()))
}

/// Convert a heading number into an Arabic order key and a level.
///
/// The parser for `preferred` runs first, then the remaining grammars in
/// the fixed order Arabic, Chinese, Roman. Numerals outside the lookup
/// tables (above 20) do not parse.
pub fn to_order_key(title: &str, preferred: NumberingFormat) -> Option<(String, usize)> {
    let preferred = Some(preferred).filter(|f| *f != NumberingFormat::Unknown);
    preferred
        .into_iter()
        .chain(PARSE_ORDER.into_iter().filter(|f| Some(*f) != preferred))
        .find_map(|format| parse_with(title, format))
}

fn parse_with(title: &str, format: NumberingFormat) -> Option<(String, usize)> {
    match format {
        NumberingFormat::Arabic => parse_arabic(title),
        NumberingFormat::Chinese => parse_chinese(title),
        NumberingFormat::Roman => parse_roman(title),
        NumberingFormat::Unknown => None,
    }
}

fn parse_arabic(title: &str) -> Option<(String, usize)> {
    let caps = ARABIC_KEY.captures(title)?;
    let key = caps[1].to_string();
    let level = key.split('.').count();
    Some((key, level))
}

fn parse_chinese(title: &str) -> Option<(String, usize)> {
    if let Some(caps) = CHINESE_ORDINAL.captures(title) {
        return lookup(&CHINESE_NUMERALS, &caps[1]).map(|n| (n, 1));
    }

    let caps = CHINESE_BRACKETED.captures(title)?;
    let numeral = &caps[1];
    if numeral.bytes().all(|b| b.is_ascii_digit()) {
        return Some((numeral.to_string(), 2));
    }
    lookup(&CHINESE_NUMERALS, numeral).map(|n| (n, 2))
}

fn parse_roman(title: &str) -> Option<(String, usize)> {
    if let Some(n) = ROMAN_NUMERAL
        .captures(title)
        .and_then(|caps| lookup(&ROMAN_NUMERALS, &caps[1]))
    {
        return Some((n, 1));
    }

    // Single letters like `C.` also match the numeral pattern, so the
    // letter table is consulted whenever the numeral lookup misses.
    let caps = LETTER.captures(title)?;
    lookup(&LETTERS, &caps[1]).map(|n| (n, 1))
}

fn lookup(table: &[&str], numeral: &str) -> Option<String> {
    table
        .iter()
        .position(|n| *n == numeral)
        .map(|i| (i + 1).to_string())
}

/// Pick the numbering grammar that dominates a set of headings.
///
/// A grammar needs `format_threshold` occurrences to win outright. Below
/// that, documents mixing Arabic and Chinese numbering prefer Chinese, and
/// Roman wins with `mixed_threshold` occurrences.
pub fn dominant_format<'a, I>(titles: I, options: &CatalogueOptions) -> NumberingFormat
where
    I: IntoIterator<Item = &'a str>,
{
    let (mut arabic, mut chinese, mut roman) = (0usize, 0usize, 0usize);
    for title in titles {
        match detect_format(title) {
            NumberingFormat::Arabic => arabic += 1,
            NumberingFormat::Chinese => chinese += 1,
            NumberingFormat::Roman => roman += 1,
            NumberingFormat::Unknown => {}
        }
    }

    let counts = [
        (NumberingFormat::Arabic, arabic),
        (NumberingFormat::Chinese, chinese),
        (NumberingFormat::Roman, roman),
    ];
    let mut best = counts[0];
    for candidate in &counts[1..] {
        if candidate.1 > best.1 {
            best = *candidate;
        }
    }

    let format = if best.1 >= options.format_threshold {
        best.0
    } else if arabic >= options.mixed_threshold && chinese >= options.mixed_threshold {
        if chinese >= options.chinese_priority {
            NumberingFormat::Chinese
        } else {
            NumberingFormat::Arabic
        }
    } else if roman >= options.mixed_threshold {
        NumberingFormat::Roman
    } else {
        NumberingFormat::Unknown
    };

    log::debug!(
        "Numbering counts arabic={} chinese={} roman={}, dominant {:?}",
        arabic,
        chinese,
        roman,
        format
    );
    format
}
