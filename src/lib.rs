//! Sheetmark - document import/export for an HTML rich-text editor
//!
//! This library converts between the editor's HTML content and plain text,
//! Word (.docx) and Excel (.xlsx) files. Spreadsheet merges survive import as
//! `rowspan`/`colspan`; export flattens the first table row by row.
//!
//! # Features
//!
//! - Sheet grid → HTML table with merged-cell spans
//! - First HTML table → value grid → .xlsx
//! - .docx ↔ HTML with headings, lists, bold/italic and tables
//! - .txt ↔ paragraphs
//!
//! # Example
//!
//! ```
//! use sheetmark::transcode::{grid_to_markup, markup_to_grid};
//! use sheetmark::types::{MergeRegion, SheetGrid};
//!
//! let grid = SheetGrid::from_rows(vec![vec!["A", "B"], vec!["C", "D"]])
//!     .with_merge(MergeRegion::new(0, 1, 0, 0)?);
//!
//! let table = grid_to_markup(&grid);
//! assert_eq!(table.rows[0].cells[0].row_span, 2);
//! assert_eq!(table.rows[1].cells.len(), 1);
//!
//! let values = markup_to_grid(&table)?;
//! assert_eq!(values.rows[1], vec!["D".to_string()]);
//! # Ok::<(), sheetmark::error::SheetmarkError>(())
//! ```

pub mod cli;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod excel;
pub mod html;
pub mod transcode;
pub mod types;

// Re-export commonly used types
pub use config::SheetmarkConfig;
pub use editor::{EditorDocument, FileKind, ImportOutcome};
pub use error::{SheetmarkError, SheetmarkResult};
pub use types::{
    CellCoordinate, CellValue, MarkupCell, MarkupRow, MarkupTable, MergeRegion, Range, SheetGrid,
    ValueGrid,
};
