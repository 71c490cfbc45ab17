//! Serialized editor HTML → tables and text

use super::is_block;
use crate::error::{SheetmarkError, SheetmarkResult};
use crate::types::{MarkupCell, MarkupRow, MarkupTable};
use scraper::{ElementRef, Html, Node, Selector};

/// First `<table>` in document order, if any
pub fn first_table(html: &str) -> SheetmarkResult<Option<MarkupTable>> {
    let fragment = Html::parse_fragment(html);
    let selector = Selector::parse("table")
        .map_err(|e| SheetmarkError::Html(format!("invalid selector: {:?}", e)))?;

    let table = fragment.select(&selector).next().map(table_from_element);
    Ok(table)
}

/// Rows directly under the table or its row groups; nested tables are not descended
pub fn table_from_element(table: ElementRef) -> MarkupTable {
    let mut rows = Vec::new();

    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(row_from_element(child)),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|el| el.value().name() == "tr")
                    .map(row_from_element),
            ),
            _ => {}
        }
    }

    MarkupTable::new(rows)
}

fn row_from_element(tr: ElementRef) -> MarkupRow {
    let cells = tr
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .map(|cell| {
            MarkupCell::spanning(
                rendered_text(cell),
                parse_span(cell.value().attr("rowspan")),
                parse_span(cell.value().attr("colspan")),
            )
        })
        .collect();
    MarkupRow::new(cells)
}

/// Span attribute value; missing, invalid or zero means 1
pub fn parse_span(value: Option<&str>) -> u32 {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|&n| n >= 1)
        .unwrap_or(1)
}

/// Text as a browser would render it: whitespace collapsed, `<br>` and block
/// boundaries as newlines, outer whitespace trimmed
pub fn rendered_text(element: ElementRef) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    out.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_collapsed(out, &text.text),
            Node::Element(el) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = el.name();
                if name == "br" {
                    out.push('\n');
                } else if is_block(name) {
                    if !out.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                    collect_text(child_el, out);
                    if !out.ends_with('\n') {
                        out.push('\n');
                    }
                } else {
                    collect_text(child_el, out);
                }
            }
            _ => {}
        }
    }
}

fn push_collapsed(out: &mut String, text: &str) {
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !out.is_empty() && !out.ends_with(' ') && !out.ends_with('\n') {
                out.push(' ');
            }
        } else {
            out.push(ch);
        }
    }
}

/// Text of each innermost block, in document order. `<p><br></p>` gives an
/// empty entry; content outside any block counts as its own block.
pub fn block_texts(html: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(html);
    let mut blocks = Vec::new();
    collect_blocks(fragment.root_element(), &mut blocks);

    if blocks.len() == 1 && blocks[0].is_empty() {
        blocks.clear();
    }
    blocks
}

fn collect_blocks(element: ElementRef, out: &mut Vec<String>) {
    let has_block_child = element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|el| is_block(el.value().name()));

    if !has_block_child {
        out.push(rendered_text(element));
        return;
    }

    let mut inline = String::new();
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_collapsed(&mut inline, &text.text),
            Node::Element(el) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                if is_block(el.name()) {
                    flush_inline(&mut inline, out);
                    collect_blocks(child_el, out);
                } else {
                    inline.push_str(&rendered_text(child_el));
                }
            }
            _ => {}
        }
    }
    flush_inline(&mut inline, out);
}

fn flush_inline(inline: &mut String, out: &mut Vec<String>) {
    let text = inline.trim();
    if !text.is_empty() {
        out.push(text.to_string());
    }
    inline.clear();
}
