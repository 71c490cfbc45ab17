//! Spreadsheet codec
//!
//! - Import: Excel (.xlsx) → `SheetGrid` (values, used range, merges)
//! - Export: `ValueGrid` → Excel (.xlsx), one worksheet

mod exporter;
mod importer;

pub use exporter::ExcelExporter;
pub use importer::{convert_data, ExcelImporter};
