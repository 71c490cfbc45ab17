//! Excel import/export through real .xlsx files

use pretty_assertions::assert_eq;
use rust_xlsxwriter::{Format, Workbook};
use sheetmark::config::SheetmarkConfig;
use sheetmark::editor::{EditorDocument, FileKind, ImportOutcome};
use sheetmark::excel::{ExcelExporter, ExcelImporter};
use sheetmark::transcode::grid_to_markup;
use sheetmark::types::{MarkupCell, MergeRegion, Range, ValueGrid};
use std::path::Path;
use tempfile::TempDir;

/// Sheet1: A merged over two rows, B/D beside it, a typed third row.
/// Sheet2: a single cell.
fn write_merged_workbook(path: &Path) {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.merge_range(0, 0, 1, 0, "A", &Format::new()).unwrap();
    sheet.write_string(0, 1, "B").unwrap();
    sheet.write_string(1, 1, "D").unwrap();
    sheet.write_number(2, 0, 3.5).unwrap();
    sheet.write_boolean(2, 1, true).unwrap();

    let second = workbook.add_worksheet();
    second.write_string(0, 0, "second sheet").unwrap();

    workbook.save(path).unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════
// EXCEL IMPORTER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_importer_reads_values_and_merges() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("merged.xlsx");
    write_merged_workbook(&path);

    let grid = ExcelImporter::new(&path).import().unwrap();

    assert_eq!(grid.used_range, Some(Range::new(0, 2, 0, 1).unwrap()));
    assert_eq!(grid.merges, vec![MergeRegion::new(0, 1, 0, 0).unwrap()]);

    let table = grid_to_markup(&grid);
    assert_eq!(
        table.rows[0].cells,
        vec![MarkupCell::spanning("A", 2, 1), MarkupCell::new("B")]
    );
    assert_eq!(table.rows[1].cells, vec![MarkupCell::new("D")]);
    assert_eq!(
        table.rows[2].cells,
        vec![MarkupCell::new("3.5"), MarkupCell::new("true")]
    );
}

#[test]
fn test_importer_selects_sheet_by_index() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("merged.xlsx");
    write_merged_workbook(&path);

    let grid = ExcelImporter::new(&path).with_sheet(1).import().unwrap();
    let table = grid_to_markup(&grid);

    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].cells, vec![MarkupCell::new("second sheet")]);
}

#[test]
fn test_importer_sheet_index_out_of_range() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("merged.xlsx");
    write_merged_workbook(&path);

    assert!(ExcelImporter::new(&path).with_sheet(7).import().is_err());
}

#[test]
fn test_importer_from_bytes_matches_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("merged.xlsx");
    write_merged_workbook(&path);

    let from_file = ExcelImporter::new(&path).import().unwrap();
    let bytes = std::fs::read(&path).unwrap();
    let from_bytes = ExcelImporter::import_bytes(&bytes, 0).unwrap();

    assert_eq!(from_file, from_bytes);
}

#[test]
fn test_empty_sheet_imports_as_empty_table() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.xlsx");
    let mut workbook = Workbook::new();
    workbook.add_worksheet();
    workbook.save(&path).unwrap();

    let grid = ExcelImporter::new(&path).import().unwrap();
    assert!(grid.used_range.is_none());
    assert!(grid_to_markup(&grid).is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// EXCEL EXPORTER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_exporter_round_trips_values() {
    let grid = ValueGrid::new(vec![
        vec!["Name".to_string(), "Qty".to_string()],
        vec!["Apple".to_string(), "3".to_string()],
    ]);
    let bytes = ExcelExporter::new("Sheet1").to_bytes(&grid).unwrap();

    let imported = ExcelImporter::import_bytes(&bytes, 0).unwrap();
    let table = grid_to_markup(&imported);

    assert_eq!(
        table,
        sheetmark::types::MarkupTable::from_text_rows(vec![vec!["Name", "Qty"], vec!["Apple", "3"]])
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// EDITOR FLOW
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_import_then_export_loses_merge_layout() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("merged.xlsx");
    write_merged_workbook(&path);

    let mut document = EditorDocument::new(SheetmarkConfig::default());
    let outcome = document.import_file(&path).unwrap();
    assert!(matches!(outcome, ImportOutcome::Inserted(_)));

    let saved = document
        .save(FileKind::Spreadsheet, &temp_dir.path().join("table"))
        .unwrap();
    assert_eq!(saved, temp_dir.path().join("table.xlsx"));

    let reimported = ExcelImporter::new(&saved).import().unwrap();
    assert!(reimported.merges.is_empty());

    let table = grid_to_markup(&reimported);
    assert_eq!(table.rows[0].cells[0], MarkupCell::new("A"));
    // "D" moved left into the slot the merge used to cover
    assert_eq!(table.rows[1].cells[0], MarkupCell::new("D"));
    assert_eq!(table.rows[1].cells[1], MarkupCell::new(""));
}

#[test]
fn test_export_uses_configured_sheet_name() {
    let mut config = SheetmarkConfig::default();
    config.export.sheet_name = "Data".to_string();
    let document = EditorDocument::with_content(
        "<table><tr><td>x</td></tr></table>",
        config,
    );

    let bytes = document.export_xlsx().unwrap();
    let imported = ExcelImporter::import_bytes(&bytes, 0).unwrap();
    assert_eq!(grid_to_markup(&imported).rows[0].cells[0].text, "x");
}
