//! Word-processor and plain-text converters
//!
//! - `.txt` ↔ paragraph HTML
//! - `.docx` ↔ HTML

mod docx;
mod text;

pub use docx::{docx_to_html, html_to_docx};
pub use text::{html_to_text, text_to_html};
