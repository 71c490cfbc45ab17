use crate::error::{SheetmarkError, SheetmarkResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

//==============================================================================
// Sheet coordinate space
//==============================================================================

/// Zero-based (row, column) position in a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoordinate {
    pub row: u32,
    pub column: u32,
}

impl CellCoordinate {
    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

impl From<(u32, u32)> for CellCoordinate {
    fn from((row, column): (u32, u32)) -> Self {
        Self { row, column }
    }
}

/// Axis-aligned rectangle of cells, all bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start_row: u32,
    pub end_row: u32,
    pub start_column: u32,
    pub end_column: u32,
}

impl Range {
    /// Create a range, rejecting inverted bounds
    pub fn new(start_row: u32, end_row: u32, start_column: u32, end_column: u32) -> SheetmarkResult<Self> {
        let range = Self {
            start_row,
            end_row,
            start_column,
            end_column,
        };
        if !range.is_well_formed() {
            return Err(SheetmarkError::InvalidRange(range.to_string()));
        }
        Ok(range)
    }

    /// Range spanning two corners given in any order
    pub fn spanning(a: CellCoordinate, b: CellCoordinate) -> Self {
        Self {
            start_row: a.row.min(b.row),
            end_row: a.row.max(b.row),
            start_column: a.column.min(b.column),
            end_column: a.column.max(b.column),
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.start_row <= self.end_row && self.start_column <= self.end_column
    }

    /// Top-left coordinate
    pub fn origin(&self) -> CellCoordinate {
        CellCoordinate::new(self.start_row, self.start_column)
    }

    /// Counted in `u64`: a range ending at `u32::MAX` may hold 2^32 rows
    pub fn row_count(&self) -> u64 {
        u64::from(self.end_row) - u64::from(self.start_row) + 1
    }

    pub fn column_count(&self) -> u64 {
        u64::from(self.end_column) - u64::from(self.start_column) + 1
    }

    pub fn contains(&self, coord: CellCoordinate) -> bool {
        self.start_row <= coord.row
            && coord.row <= self.end_row
            && self.start_column <= coord.column
            && coord.column <= self.end_column
    }

    pub fn contains_range(&self, other: &Range) -> bool {
        self.contains(other.origin()) && self.contains(CellCoordinate::new(other.end_row, other.end_column))
    }

    /// Smallest range covering both
    pub fn union(&self, other: &Range) -> Range {
        Range {
            start_row: self.start_row.min(other.start_row),
            end_row: self.end_row.max(other.end_row),
            start_column: self.start_column.min(other.start_column),
            end_column: self.end_column.max(other.end_column),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "R{}C{}:R{}C{}",
            self.start_row, self.start_column, self.end_row, self.end_column
        )
    }
}

/// Merged-cell rectangle. Only its origin carries content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergeRegion(pub Range);

impl MergeRegion {
    pub fn new(start_row: u32, end_row: u32, start_column: u32, end_column: u32) -> SheetmarkResult<Self> {
        Range::new(start_row, end_row, start_column, end_column).map(MergeRegion)
    }

    pub fn range(&self) -> &Range {
        &self.0
    }

    pub fn origin(&self) -> CellCoordinate {
        self.0.origin()
    }

    /// (rowSpan, colSpan) emitted at the origin, saturating at `u32::MAX`
    pub fn spans(&self) -> (u32, u32) {
        let clamp = |count: u64| u32::try_from(count).unwrap_or(u32::MAX);
        (clamp(self.0.row_count()), clamp(self.0.column_count()))
    }

    /// Inside the region but not its origin
    pub fn covers(&self, coord: CellCoordinate) -> bool {
        self.0.contains(coord) && coord != self.origin()
    }
}

//==============================================================================
// Cell values
//==============================================================================

/// Scalar cell value as decoded by the spreadsheet codec
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    #[default]
    Empty,
}

impl CellValue {
    /// Display-text projection used at the transcoder boundary
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Boolean(b) => b.to_string(),
            CellValue::Empty => String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

/// Shortest decimal form: `3`, `0.5`, `-2.75`
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        // collapse -0
        return "0".to_string();
    }
    n.to_string()
}

//==============================================================================
// Decoded spreadsheet
//==============================================================================

/// One decoded sheet: used range, sparse cell map and merge list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetGrid {
    pub used_range: Option<Range>,
    cells: HashMap<CellCoordinate, CellValue>,
    pub merges: Vec<MergeRegion>,
}

impl SheetGrid {
    pub fn new(used_range: Option<Range>) -> Self {
        Self {
            used_range,
            cells: HashMap::new(),
            merges: Vec::new(),
        }
    }

    /// Build a grid from rows of values anchored at (0, 0).
    /// The used range covers the longest row; an empty input has no used range.
    pub fn from_rows<I, R, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let mut grid = SheetGrid::default();
        let mut height = 0u32;
        let mut width = 0u32;
        for (r, row) in rows.into_iter().enumerate() {
            height = r as u32 + 1;
            for (c, value) in row.into_iter().enumerate() {
                width = width.max(c as u32 + 1);
                grid.cells.insert(CellCoordinate::new(r as u32, c as u32), value.into());
            }
        }
        if height > 0 && width > 0 {
            grid.used_range = Some(Range {
                start_row: 0,
                end_row: height - 1,
                start_column: 0,
                end_column: width - 1,
            });
        }
        grid
    }

    pub fn with_merge(mut self, merge: MergeRegion) -> Self {
        self.merges.push(merge);
        self
    }

    pub fn set_cell(&mut self, coord: CellCoordinate, value: CellValue) {
        if value.is_empty() {
            self.cells.remove(&coord);
        } else {
            self.cells.insert(coord, value);
        }
    }

    /// Value at `coord`; anything outside the used range reads as absent
    pub fn cell_value(&self, coord: CellCoordinate) -> Option<&CellValue> {
        let range = self.used_range.as_ref()?;
        if !range.contains(coord) {
            return None;
        }
        self.cells.get(&coord)
    }

    pub fn add_merge(&mut self, merge: MergeRegion) {
        self.merges.push(merge);
    }
}

//==============================================================================
// Markup table
//==============================================================================

/// One emitted `<td>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupCell {
    pub text: String,
    pub row_span: u32,
    pub col_span: u32,
}

impl MarkupCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            row_span: 1,
            col_span: 1,
        }
    }

    pub fn spanning(text: impl Into<String>, row_span: u32, col_span: u32) -> Self {
        Self {
            text: text.into(),
            row_span: row_span.max(1),
            col_span: col_span.max(1),
        }
    }

    pub fn is_merged(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupRow {
    pub cells: Vec<MarkupCell>,
}

impl MarkupRow {
    pub fn new(cells: Vec<MarkupCell>) -> Self {
        Self { cells }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupTable {
    pub rows: Vec<MarkupRow>,
}

impl MarkupTable {
    pub fn new(rows: Vec<MarkupRow>) -> Self {
        Self { rows }
    }

    /// Span-free table from rows of text
    pub fn from_text_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| MarkupRow::new(row.into_iter().map(MarkupCell::new).collect()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).sum()
    }
}

//==============================================================================
// Export grid
//==============================================================================

/// Row-major text values ready for the spreadsheet encoder.
/// Rows keep the length they were flattened with; spans are not re-expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueGrid {
    pub rows: Vec<Vec<String>>,
}

impl ValueGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}
