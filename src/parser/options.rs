//! Parsing options and configuration.

use crate::catalogue::CatalogueOptions;

/// Options for extracting document structure.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Whether batch parsing runs documents in parallel
    pub parallel: bool,

    /// Catalogue reconstruction settings
    pub catalogue: CatalogueOptions,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (tolerate a missing or malformed content list).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable parallel batch processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set catalogue reconstruction settings.
    pub fn with_catalogue(mut self, catalogue: CatalogueOptions) -> Self {
        self.catalogue = catalogue;
        self
    }

    /// Whether lenient mode is enabled.
    pub fn is_lenient(&self) -> bool {
        self.error_mode == ErrorMode::Lenient
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            parallel: true,
            catalogue: CatalogueOptions::default(),
        }
    }
}

/// Error handling mode during parsing.
///
/// Structural failures (missing TEI header, unreadable middle file) are
/// always errors. Lenient mode only relaxes the auxiliary content list of
/// the layout tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail when any required input is unreadable
    #[default]
    Strict,
    /// Continue without the content list when it is unreadable
    Lenient,
}
