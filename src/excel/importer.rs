//! Excel importer implementation - Excel (.xlsx) → SheetGrid

use crate::error::{SheetmarkError, SheetmarkResult};
use crate::types::{CellCoordinate, CellValue, MergeRegion, Range, SheetGrid};
use calamine::{open_workbook, Data, Dimensions, Reader, Xlsx};
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Excel importer for turning one worksheet into a `SheetGrid`
pub struct ExcelImporter {
    path: PathBuf,
    sheet: usize,
}

impl ExcelImporter {
    /// Create an importer for the first sheet of `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            sheet: 0,
        }
    }

    /// Select the sheet by zero-based index
    pub fn with_sheet(mut self, sheet: usize) -> Self {
        self.sheet = sheet;
        self
    }

    /// Import the selected sheet from the file
    pub fn import(&self) -> SheetmarkResult<SheetGrid> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path)
            .map_err(|e| SheetmarkError::Excel(format!("Failed to open Excel file: {}", e)))?;
        read_sheet(&mut workbook, self.sheet)
    }

    /// Import the selected sheet from raw workbook bytes
    pub fn import_bytes(bytes: &[u8], sheet: usize) -> SheetmarkResult<SheetGrid> {
        let mut workbook = Xlsx::new(Cursor::new(bytes.to_vec()))
            .map_err(|e| SheetmarkError::Excel(format!("Failed to read Excel data: {}", e)))?;
        read_sheet(&mut workbook, sheet)
    }
}

fn read_sheet<RS: Read + Seek>(workbook: &mut Xlsx<RS>, sheet: usize) -> SheetmarkResult<SheetGrid> {
    let sheet_names = workbook.sheet_names();
    if sheet_names.is_empty() {
        debug!("workbook has no sheets");
        return Ok(SheetGrid::default());
    }
    let Some(sheet_name) = sheet_names.get(sheet).cloned() else {
        return Err(SheetmarkError::Excel(format!(
            "Sheet index {} out of range, workbook has {} sheet(s)",
            sheet,
            sheet_names.len()
        )));
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| SheetmarkError::Excel(format!("Failed to read sheet '{}': {}", sheet_name, e)))?;

    workbook
        .load_merged_regions()
        .map_err(|e| SheetmarkError::Excel(format!("Failed to load merged regions: {}", e)))?;
    let merges = workbook
        .worksheet_merge_cells(&sheet_name)
        .unwrap_or(Ok(Vec::new()))
        .map_err(|e| SheetmarkError::Excel(format!("Failed to read merged cells: {}", e)))?;

    let grid = build_grid(&range, &merges);
    info!(
        sheet = %sheet_name,
        used_range = ?grid.used_range,
        merges = grid.merges.len(),
        "imported worksheet"
    );
    Ok(grid)
}

/// Used range is the data range widened to cover every declared merge,
/// matching the sheet dimension Excel itself records.
fn build_grid(range: &calamine::Range<Data>, merges: &[Dimensions]) -> SheetGrid {
    let merges: Vec<MergeRegion> = merges
        .iter()
        .map(|dim| MergeRegion(Range::spanning(dim.start.into(), dim.end.into())))
        .collect();

    let data_range = match (range.start(), range.end()) {
        (Some(start), Some(end)) => Some(Range::spanning(start.into(), end.into())),
        _ => None,
    };
    let used_range = merges
        .iter()
        .map(|m| *m.range())
        .fold(data_range, |acc, r| Some(acc.map_or(r, |a| a.union(&r))));

    let mut grid = SheetGrid::new(used_range);
    if let Some(start) = range.start() {
        for (row, col, data) in range.cells() {
            let coord = CellCoordinate::new(start.0 + row as u32, start.1 + col as u32);
            grid.set_cell(coord, convert_data(data));
        }
    }
    for merge in merges {
        grid.add_merge(merge);
    }
    grid
}

/// Decoded cell → `CellValue`. Date cells keep their serial number.
pub fn convert_data(data: &Data) -> CellValue {
    match data {
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}
