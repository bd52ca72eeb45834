//! Source-format adapters.

pub mod layout;
mod options;
pub mod tei;

pub use options::{ErrorMode, ParseOptions};
