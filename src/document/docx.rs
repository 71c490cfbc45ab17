//! Word document (.docx) ↔ editor HTML
//!
//! Import maps paragraph styles onto headings and list items and run
//! formatting onto `strong`/`em`/`mark`. Embedded pictures become `data:`
//! URIs and merged table cells become `rowspan`/`colspan`. Export walks the
//! editor HTML and rebuilds paragraphs, runs, PNG pictures and tables.

use crate::config::TableConfig;
use crate::error::{SheetmarkError, SheetmarkResult};
use crate::html::{escape_html, is_block, render_table, table_from_element};
use crate::types::{MarkupCell, MarkupRow, MarkupTable};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use docx_rs::{
    read_docx, Bold, BreakType, Docx, DocumentChild, DrawingData, Image, Italic, Paragraph,
    ParagraphChild, Pic, Png, Run, RunChild, Style, StyleType, Table, TableCell, TableCellContent,
    TableChild, TableRow, TableRowChild, VMergeType,
};
use regex::Regex;
use scraper::{ElementRef, Html, Node};
use serde_json::Value;
use std::collections::HashMap;
use std::io::Cursor;
use tracing::debug;

/// `(relationship id, media path, original bytes, PNG preview)` as read
type EmbeddedImages = [(String, String, Image, Png)];

const PNG_SIGNATURE: &[u8] = &[137, 80, 78, 71, 13, 10, 26, 10];

//==============================================================================
// Import: .docx → HTML
//==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Heading1,
    Heading2,
    ListItem,
    Paragraph,
}

/// Style ids compare without spaces or case: "Heading 1" == "Heading1"
fn normalize_style(val: &str) -> String {
    val.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn block_kind(paragraph: &Paragraph) -> BlockKind {
    let style = paragraph
        .property
        .style
        .as_ref()
        .map(|s| normalize_style(&s.val))
        .unwrap_or_default();
    match style.as_str() {
        "heading1" => BlockKind::Heading1,
        "heading2" => BlockKind::Heading2,
        "listparagraph" => BlockKind::ListItem,
        _ => BlockKind::Paragraph,
    }
}

/// Convert .docx bytes to editor HTML
pub fn docx_to_html(bytes: &[u8], table_config: &TableConfig) -> SheetmarkResult<String> {
    let docx = read_docx(bytes).map_err(|e| SheetmarkError::Docx(format!("Failed to parse DOCX: {:?}", e)))?;

    let mut html = String::new();
    let mut in_list = false;

    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => {
                let kind = block_kind(paragraph);
                if kind == BlockKind::ListItem && !in_list {
                    html.push_str("<ul>");
                    in_list = true;
                } else if kind != BlockKind::ListItem && in_list {
                    html.push_str("</ul>");
                    in_list = false;
                }

                let inner = paragraph_html(&paragraph.children, &docx.images);
                let tag = match kind {
                    BlockKind::Heading1 => "h1",
                    BlockKind::Heading2 => "h2",
                    BlockKind::ListItem => "li",
                    BlockKind::Paragraph => "p",
                };
                html.push_str(&format!("<{tag}>{inner}</{tag}>"));
            }
            DocumentChild::Table(table) => {
                if in_list {
                    html.push_str("</ul>");
                    in_list = false;
                }
                html.push_str(&render_table(&docx_table_to_markup(table)?, table_config));
            }
            _ => {}
        }
    }
    if in_list {
        html.push_str("</ul>");
    }

    debug!(bytes = bytes.len(), html = html.len(), "converted docx to html");
    clean_up_html(&html)
}

fn paragraph_html(children: &[ParagraphChild], images: &EmbeddedImages) -> String {
    let mut html = String::new();
    for child in children {
        match child {
            ParagraphChild::Run(run) => html.push_str(&run_html(run, images)),
            ParagraphChild::Hyperlink(link) => html.push_str(&paragraph_html(&link.children, images)),
            _ => {}
        }
    }
    html
}

fn run_html(run: &Run, images: &EmbeddedImages) -> String {
    let mut text = String::new();
    for child in &run.children {
        match child {
            RunChild::Text(t) => text.push_str(&escape_html(&t.text)),
            RunChild::Break(_) => text.push_str("<br>"),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Drawing(drawing) => {
                if let Some(DrawingData::Pic(pic)) = &drawing.data {
                    match image_src(images, &pic.id) {
                        Some(src) => text.push_str(&format!("<img src=\"{}\">", src)),
                        None => debug!(id = %pic.id, "picture has no readable media"),
                    }
                }
            }
            _ => {}
        }
    }

    let props = &run.run_property;
    let style = props
        .style
        .as_ref()
        .map(|s| normalize_style(&s.val))
        .unwrap_or_default();

    let mut open_tags = String::new();
    let mut close_tags = String::new();
    let mut wrap = |tag: &str| {
        open_tags.push_str(&format!("<{tag}>"));
        close_tags.insert_str(0, &format!("</{tag}>"));
    };

    if style == "strong" || props.bold.as_ref().is_some_and(|bold| bold == &Bold::new()) {
        wrap("strong");
    }
    if style == "emphasis" || props.italic.as_ref().is_some_and(|italic| italic == &Italic::new()) {
        wrap("em");
    }
    if style == "highlight" || props.highlight.is_some() {
        wrap("mark");
    }

    format!("{open_tags}{text}{close_tags}")
}

/// `data:` URI for the picture with relationship `id`. Known raster and SVG
/// media keep their bytes; anything else falls back to the PNG preview.
fn image_src(images: &EmbeddedImages, id: &str) -> Option<String> {
    let (_, path, original, preview) = images.iter().find(|(rid, ..)| rid == id)?;
    let (mime, bytes) = match image_mime(path) {
        Some(mime) => (mime, &original.0),
        None if !preview.0.is_empty() => ("image/png", &preview.0),
        None => return None,
    };
    Some(format!("data:{};base64,{}", mime, BASE64_STANDARD.encode(bytes)))
}

fn image_mime(path: &str) -> Option<&'static str> {
    let (_, ext) = path.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Grid span and vertical merge of a Word table cell
fn cell_merge(cell: &TableCell) -> SheetmarkResult<(u32, Option<VMergeType>)> {
    // the property fields are private; their serde form is not
    let property = serde_json::to_value(&cell.property)?;
    let grid_span = property
        .get("gridSpan")
        .and_then(Value::as_u64)
        .and_then(|span| u32::try_from(span).ok())
        .filter(|span| *span > 0)
        .unwrap_or(1);
    let vertical_merge = property
        .get("verticalMerge")
        .and_then(Value::as_str)
        .and_then(|val| val.parse::<VMergeType>().ok())
        .filter(|val| *val != VMergeType::Unsupported);
    Ok((grid_span, vertical_merge))
}

fn cell_text(cell: &TableCell) -> String {
    let lines: Vec<String> = cell
        .children
        .iter()
        .filter_map(|content| match content {
            TableCellContent::Paragraph(p) => Some(paragraph_text(&p.children)),
            _ => None,
        })
        .collect();
    lines.join("\n")
}

/// Word tables keep every grid slot; markup drops the covered ones. A
/// `continue` cell extends the cell above it in the same grid column and
/// emits nothing; `gridSpan` becomes `col_span`.
fn docx_table_to_markup(table: &Table) -> SheetmarkResult<MarkupTable> {
    let mut rows: Vec<MarkupRow> = Vec::new();
    // grid column → (row, cell) of the markup cell a continuation extends
    let mut open: HashMap<usize, (usize, usize)> = HashMap::new();

    for row in &table.rows {
        #[allow(irrefutable_let_patterns)]
        let TableChild::TableRow(row) = row else {
            continue;
        };

        let row_idx = rows.len();
        let mut cells = Vec::new();
        let mut next_open = HashMap::new();
        let mut column = 0usize;

        for cell in &row.cells {
            #[allow(irrefutable_let_patterns)]
            let TableRowChild::TableCell(cell) = cell else {
                continue;
            };

            let (col_span, vertical_merge) = cell_merge(cell)?;
            let continued = match (vertical_merge, open.get(&column)) {
                (Some(VMergeType::Continue), Some(&(r, c))) => {
                    rows[r].cells[c].row_span += 1;
                    next_open.insert(column, (r, c));
                    true
                }
                _ => false,
            };
            if !continued {
                next_open.insert(column, (row_idx, cells.len()));
                cells.push(MarkupCell::spanning(cell_text(cell), 1, col_span));
            }
            column += col_span as usize;
        }

        rows.push(MarkupRow::new(cells));
        open = next_open;
    }
    Ok(MarkupTable::new(rows))
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut text = String::new();
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    if let RunChild::Text(t) = run_child {
                        text.push_str(&t.text);
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => text.push_str(&paragraph_text(&link.children)),
            _ => {}
        }
    }
    text
}

/// Empty paragraphs keep their line, empty inline wrappers go
fn clean_up_html(html: &str) -> SheetmarkResult<String> {
    let empty_paragraph =
        Regex::new(r"<p>\s*</p>").map_err(|e| SheetmarkError::Docx(format!("Regex error: {}", e)))?;
    let empty_inline = Regex::new(r"<(strong|em)></(strong|em)>")
        .map_err(|e| SheetmarkError::Docx(format!("Regex error: {}", e)))?;

    let html = empty_inline.replace_all(html, "");
    let html = empty_paragraph.replace_all(&html, "<p><br></p>");
    Ok(html.into_owned())
}

//==============================================================================
// Export: HTML → .docx
//==============================================================================

#[derive(Debug, Clone, Copy, Default)]
struct RunFormat {
    bold: bool,
    italic: bool,
    highlight: bool,
}

impl RunFormat {
    fn apply(self, mut run: Run) -> Run {
        if self.bold {
            run = run.bold();
        }
        if self.italic {
            run = run.italic();
        }
        if self.highlight {
            run = run.highlight("yellow");
        }
        run
    }
}

enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// Convert editor HTML to .docx bytes
pub fn html_to_docx(html: &str) -> SheetmarkResult<Vec<u8>> {
    let fragment = Html::parse_fragment(html);
    let mut blocks = Vec::new();
    collect_docx_blocks(fragment.root_element(), &mut blocks);

    let mut docx = Docx::new()
        .add_style(
            Style::new("Heading1", StyleType::Paragraph)
                .name("Heading 1")
                .size(32)
                .bold(),
        )
        .add_style(
            Style::new("Heading2", StyleType::Paragraph)
                .name("Heading 2")
                .size(26)
                .bold(),
        )
        .add_style(Style::new("ListParagraph", StyleType::Paragraph).name("List Paragraph"));

    let block_count = blocks.len();
    for block in blocks {
        docx = match block {
            Block::Paragraph(p) => docx.add_paragraph(p),
            Block::Table(t) => docx.add_table(t),
        };
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| SheetmarkError::Docx(format!("Failed to write DOCX: {}", e)))?;

    debug!(blocks = block_count, "converted html to docx");
    Ok(cursor.into_inner())
}

fn collect_docx_blocks(element: ElementRef, blocks: &mut Vec<Block>) {
    let mut pending: Option<Paragraph> = None;

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                if text.text.trim().is_empty() {
                    continue;
                }
                if let Some(run) = text_run(&text.text, RunFormat::default()) {
                    pending = Some(pending.take().unwrap_or_else(Paragraph::new).add_run(run));
                }
            }
            Node::Element(el) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = el.name();
                if !is_block(name) {
                    let mut paragraph = pending.take().unwrap_or_else(Paragraph::new);
                    for run in element_runs(child_el, RunFormat::default()) {
                        paragraph = paragraph.add_run(run);
                    }
                    pending = Some(paragraph);
                    continue;
                }

                if let Some(paragraph) = pending.take() {
                    blocks.push(Block::Paragraph(paragraph));
                }
                match name {
                    "h1" => blocks.push(Block::Paragraph(styled_paragraph(child_el, Some("Heading1")))),
                    "h2" => blocks.push(Block::Paragraph(styled_paragraph(child_el, Some("Heading2")))),
                    "p" | "h3" | "h4" | "h5" | "h6" | "pre" => {
                        blocks.push(Block::Paragraph(styled_paragraph(child_el, None)))
                    }
                    "li" => blocks.push(Block::Paragraph(styled_paragraph(child_el, Some("ListParagraph")))),
                    "table" => blocks.push(Block::Table(docx_table(&table_from_element(child_el)))),
                    "hr" => {}
                    _ => collect_docx_blocks(child_el, blocks),
                }
            }
            _ => {}
        }
    }

    if let Some(paragraph) = pending {
        blocks.push(Block::Paragraph(paragraph));
    }
}

/// Whole element as one paragraph; nested blocks are joined with breaks
fn styled_paragraph(element: ElementRef, style: Option<&str>) -> Paragraph {
    let mut paragraph = Paragraph::new();
    for run in inline_runs(element, RunFormat::default()) {
        paragraph = paragraph.add_run(run);
    }
    match style {
        Some(style) => paragraph.style(style),
        None => paragraph,
    }
}

fn inline_runs(element: ElementRef, format: RunFormat) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut seen_block = false;

    for child in element.children() {
        match child.value() {
            Node::Text(text) => runs.extend(text_run(&text.text, format)),
            Node::Element(el) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                if is_block(el.name()) {
                    if seen_block {
                        runs.push(Run::new().add_break(BreakType::TextWrapping));
                    }
                    seen_block = true;
                }
                runs.extend(element_runs(child_el, format));
            }
            _ => {}
        }
    }
    runs
}

/// Runs for one element and its subtree under inherited `format`
fn element_runs(element: ElementRef, format: RunFormat) -> Vec<Run> {
    let mut nested = format;
    match element.value().name() {
        "br" => return vec![Run::new().add_break(BreakType::TextWrapping)],
        "img" => return image_run(element).into_iter().collect(),
        "strong" | "b" => nested.bold = true,
        "em" | "i" => nested.italic = true,
        "mark" => nested.highlight = true,
        _ => {}
    }
    inline_runs(element, nested)
}

/// Only inline PNG `data:` URIs are embedded; other sources are skipped
fn image_run(element: ElementRef) -> Option<Run> {
    let src = element.value().attr("src")?;
    let Some(data) = src.strip_prefix("data:image/png;base64,") else {
        debug!("skipping image without an inline PNG source");
        return None;
    };
    let bytes = BASE64_STANDARD.decode(data.trim()).ok()?;
    let (width, height) = png_dimensions(&bytes)?;

    let pixels = |name: &str| {
        element
            .value()
            .attr(name)
            .and_then(|v| v.trim().trim_end_matches("px").parse::<u32>().ok())
    };
    let width = pixels("width").unwrap_or(width);
    let height = pixels("height").unwrap_or(height);
    Some(Run::new().add_image(Pic::new_with_dimensions(bytes, width, height)))
}

/// Width and height from the IHDR chunk
fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if !bytes.starts_with(PNG_SIGNATURE) {
        return None;
    }
    let width = u32::from_be_bytes(bytes.get(16..20)?.try_into().ok()?);
    let height = u32::from_be_bytes(bytes.get(20..24)?.try_into().ok()?);
    Some((width, height))
}

fn text_run(text: &str, format: RunFormat) -> Option<Run> {
    if text.is_empty() {
        return None;
    }
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Some(format.apply(Run::new().add_text(" ")));
    }
    // keep the single space a whitespace edge stood for
    let mut value = String::new();
    if text.starts_with(char::is_whitespace) {
        value.push(' ');
    }
    value.push_str(&collapsed);
    if text.ends_with(char::is_whitespace) {
        value.push(' ');
    }
    Some(format.apply(Run::new().add_text(value)))
}

/// Slot in the expanded Word table grid
#[derive(Debug, Clone, PartialEq, Eq)]
enum CellSlot {
    /// Cell carrying content; `restart` opens a vertical merge
    Content { text: String, col_span: u32, restart: bool },
    /// Continuation of a vertical merge from a row above
    Continue { col_span: u32 },
}

/// Place markup cells on the column grid. Word needs an explicit continuation
/// cell under every row a `rowspan` covers.
fn layout_rows(table: &MarkupTable) -> Vec<Vec<CellSlot>> {
    // column → (rows still covered, col_span)
    let mut pending: Vec<Option<(u32, u32)>> = Vec::new();
    let mut out = Vec::with_capacity(table.rows.len());

    for row in &table.rows {
        let mut slots = Vec::new();
        let mut col = 0usize;
        let mut cells = row.cells.iter();

        loop {
            if let Some(Some((remaining, span))) = pending.get(col).copied() {
                slots.push(CellSlot::Continue { col_span: span });
                pending[col] = if remaining > 1 { Some((remaining - 1, span)) } else { None };
                clear_crossed(&mut pending, col, span);
                col += span as usize;
                continue;
            }

            let Some(cell) = cells.next() else {
                // covered columns to the right of the last cell
                match pending.iter().skip(col).position(Option::is_some) {
                    Some(offset) => {
                        let empty_cols = offset;
                        if empty_cols > 0 {
                            slots.push(CellSlot::Content {
                                text: String::new(),
                                col_span: empty_cols as u32,
                                restart: false,
                            });
                        }
                        col += empty_cols;
                        continue;
                    }
                    None => break,
                }
            };

            clear_crossed(&mut pending, col, cell.col_span);
            if cell.row_span > 1 {
                let needed = col + cell.col_span as usize;
                if pending.len() < needed {
                    pending.resize(needed, None);
                }
                pending[col] = Some((cell.row_span - 1, cell.col_span));
            }
            slots.push(CellSlot::Content {
                text: cell.text.clone(),
                col_span: cell.col_span,
                restart: cell.row_span > 1,
            });
            col += cell.col_span as usize;
        }

        out.push(slots);
    }
    out
}

/// A slot spanning columns to the right of `col` ends any rowspan pending
/// there; it can only come from overlapping spans in the source HTML.
fn clear_crossed(pending: &mut [Option<(u32, u32)>], col: usize, span: u32) {
    let end = (col + span as usize).min(pending.len());
    for slot in pending.iter_mut().take(end).skip(col + 1) {
        if slot.take().is_some() {
            debug!(column = col, "dropping rowspan overlapped by a colspan");
        }
    }
}

fn docx_table(table: &MarkupTable) -> Table {
    let rows = layout_rows(table)
        .into_iter()
        .map(|slots| {
            let cells = slots
                .into_iter()
                .map(|slot| match slot {
                    CellSlot::Content { text, col_span, restart } => {
                        let mut paragraph = Paragraph::new();
                        for (i, line) in text.split('\n').enumerate() {
                            let mut run = Run::new();
                            if i > 0 {
                                run = run.add_break(BreakType::TextWrapping);
                            }
                            paragraph = paragraph.add_run(run.add_text(line));
                        }
                        let mut cell = TableCell::new().add_paragraph(paragraph);
                        if col_span > 1 {
                            cell = cell.grid_span(col_span as usize);
                        }
                        if restart {
                            cell = cell.vertical_merge(VMergeType::Restart);
                        }
                        cell
                    }
                    CellSlot::Continue { col_span } => {
                        let mut cell = TableCell::new()
                            .add_paragraph(Paragraph::new())
                            .vertical_merge(VMergeType::Continue);
                        if col_span > 1 {
                            cell = cell.grid_span(col_span as usize);
                        }
                        cell
                    }
                })
                .collect();
            TableRow::new(cells)
        })
        .collect();
    Table::new(rows)
}
