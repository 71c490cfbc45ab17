//! Markup table → HTML string

use crate::config::TableConfig;
use crate::types::{MarkupCell, MarkupTable};
use std::fmt::Write;

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `<table>` with one `<tr>` per row; span attributes only when > 1
pub fn render_table(table: &MarkupTable, config: &TableConfig) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<table border=\"{}\" style=\"{}\">",
        config.border,
        escape_html(&config.style)
    );

    for row in &table.rows {
        html.push_str("<tr>");
        for cell in &row.cells {
            render_cell(&mut html, cell);
        }
        html.push_str("</tr>");
    }

    html.push_str("</table>");
    html
}

fn render_cell(html: &mut String, cell: &MarkupCell) {
    html.push_str("<td");
    if cell.row_span > 1 {
        let _ = write!(html, " rowspan=\"{}\"", cell.row_span);
    }
    if cell.col_span > 1 {
        let _ = write!(html, " colspan=\"{}\"", cell.col_span);
    }
    html.push('>');
    html.push_str(&escape_html(&cell.text));
    html.push_str("</td>");
}
