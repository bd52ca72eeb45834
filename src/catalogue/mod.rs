//! Catalogue (table of contents) reconstruction.
//!
//! Both source adapters collect flat heading candidates and hand them to
//! [`build_catalogue`], so catalogue quality does not depend on which tool
//! produced the input.

pub mod numbering;
mod tree;

pub use numbering::{
    detect_format, dominant_format, normalize_title, split_normalized, starts_with_number,
    to_order_key, NumberingFormat,
};
pub use tree::{build_catalogue, CatalogueBuild, HeadingCandidate, TrailingSentence};

/// Options for catalogue reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueOptions {
    /// Occurrences a numbering grammar needs to dominate outright
    pub format_threshold: usize,

    /// Occurrences needed by the mixed-document tie-breaks
    pub mixed_threshold: usize,

    /// Chinese occurrences needed to win an Arabic/Chinese tie
    pub chinese_priority: usize,

    /// Insert synthetic parents for headings whose parent level is missing
    pub repair_skipped_levels: bool,

    /// Fall back to a flat list when no heading carries a number
    pub no_rule_fallback: bool,
}

impl CatalogueOptions {
    /// Create catalogue options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dominance threshold.
    pub fn with_format_threshold(mut self, threshold: usize) -> Self {
        self.format_threshold = threshold;
        self
    }

    /// Enable or disable level-skip repair.
    pub fn with_repair(mut self, repair: bool) -> Self {
        self.repair_skipped_levels = repair;
        self
    }

    /// Enable or disable the flat fallback for unnumbered documents.
    pub fn with_no_rule_fallback(mut self, fallback: bool) -> Self {
        self.no_rule_fallback = fallback;
        self
    }
}

impl Default for CatalogueOptions {
    fn default() -> Self {
        Self {
            format_threshold: 3,
            mixed_threshold: 2,
            chinese_priority: 2,
            repair_skipped_levels: true,
            no_rule_fallback: true,
        }
    }
}
