//! Excel exporter implementation

use crate::error::{SheetmarkError, SheetmarkResult};
use crate::types::ValueGrid;
use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::debug;

/// Excel exporter writing a value grid into a single worksheet
pub struct ExcelExporter {
    sheet_name: String,
}

impl ExcelExporter {
    /// Create a new Excel exporter
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }

    /// Export the grid to in-memory .xlsx bytes
    pub fn to_bytes(&self, grid: &ValueGrid) -> SheetmarkResult<Vec<u8>> {
        let mut workbook = self.build_workbook(grid)?;
        let bytes = workbook
            .save_to_buffer()
            .map_err(|e| SheetmarkError::Excel(format!("Failed to encode Excel file: {}", e)))?;

        debug!(sheet = %self.sheet_name, rows = grid.row_count(), bytes = bytes.len(), "encoded workbook");
        Ok(bytes)
    }

    fn build_workbook(&self, grid: &ValueGrid) -> SheetmarkResult<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&self.sheet_name)
            .map_err(|e| SheetmarkError::Excel(format!("Failed to set worksheet name: {}", e)))?;

        write_rows(worksheet, grid)?;
        Ok(workbook)
    }
}

/// Row-major, one string cell per value; empty strings leave the cell blank
fn write_rows(worksheet: &mut Worksheet, grid: &ValueGrid) -> SheetmarkResult<()> {
    for (row_idx, row) in grid.rows.iter().enumerate() {
        let excel_row = u32::try_from(row_idx)
            .map_err(|_| SheetmarkError::Excel(format!("Row {} exceeds worksheet limits", row_idx)))?;

        for (col_idx, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let excel_col = u16::try_from(col_idx).map_err(|_| {
                SheetmarkError::Excel(format!("Column {} exceeds worksheet limits", col_idx))
            })?;

            worksheet
                .write_string(excel_row, excel_col, value)
                .map_err(|e| SheetmarkError::Excel(format!("Failed to write cell: {}", e)))?;
        }
    }
    Ok(())
}
