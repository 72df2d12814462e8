//! # Record Codecs
//!
//! Two encodings for the same records:
//!
//! - [`json`]: a whole collection in one document, used by the JSON backend.
//! - [`markdown`]: one record per file with a frontmatter header, used by the
//!   Markdown backend.
//!
//! Both must round-trip every field: `decode(encode(r)) == r`. Both are also
//! forgiving on read; bad input degrades to default field values instead of
//! failing, so one damaged record never hides the others.

pub mod json;
pub mod markdown;

pub use markdown::{Document, Frontmatter, MarkdownRecord};
