//! Output rendering for parsed documents.
//!
//! JSON is the persisted form of every artifact; plain text and the
//! catalogue outline are for inspection.

mod json;
mod text;

pub use json::{to_json, to_json_writer, JsonFormat};
pub use text::{catalogue_outline, to_text};
