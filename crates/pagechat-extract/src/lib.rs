//! Page content extraction.
//!
//! Reduces an arbitrary HTML document to a bounded, relevant text record:
//! noise elements are dropped, a content root is picked by probing an ordered
//! selector list, and the resulting text is normalized and truncated.

pub mod extractor;
pub mod record;
pub mod text;

pub use extractor::{extract, extract_with, try_extract, try_extract_with, Selectors};
pub use record::{PageContentRecord, MAX_CONTENT_CHARS, TRUNCATION_MARKER};
