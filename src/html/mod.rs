//! HTML side of the editor content
//!
//! - Render a `MarkupTable` as the `<table>` inserted into the document
//! - Read the first table, and block text, back out of serialized content

mod reader;
mod render;

pub use reader::{block_texts, first_table, parse_span, rendered_text, table_from_element};
pub use render::{escape_html, render_table};

/// Elements that start a new line of rendered text
pub(crate) fn is_block(name: &str) -> bool {
    matches!(
        name,
        "p" | "div"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "li"
            | "ul"
            | "ol"
            | "blockquote"
            | "pre"
            | "table"
            | "thead"
            | "tbody"
            | "tfoot"
            | "tr"
            | "td"
            | "th"
            | "hr"
    )
}
