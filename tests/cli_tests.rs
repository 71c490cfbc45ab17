//! Binary tests for the sheetmark CLI

#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use predicates::prelude::*;
use rust_xlsxwriter::{Format, Workbook};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn sheetmark() -> Command {
    Command::cargo_bin("sheetmark").unwrap()
}

fn write_merged_workbook(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.merge_range(0, 0, 0, 1, "Header", &Format::new()).unwrap();
    sheet.write_string(1, 0, "left").unwrap();
    sheet.write_string(1, 1, "right").unwrap();
    workbook.save(path).unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════
// IMPORT COMMAND TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_import_text_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("notes.txt");
    fs::write(&input, "hello\nworld").unwrap();

    sheetmark()
        .arg("import")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>hello</p><p>world</p>"));
}

#[test]
fn test_import_xlsx_renders_colspan() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("sheet.xlsx");
    write_merged_workbook(&input);

    sheetmark()
        .arg("import")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("<td colspan=\"2\">Header</td>"))
        .stdout(predicate::str::contains("<tr><td>left</td><td>right</td></tr>"));
}

#[test]
fn test_import_text_then_xlsx_appends_table() {
    let temp_dir = TempDir::new().unwrap();
    let text = temp_dir.path().join("intro.txt");
    let sheet = temp_dir.path().join("sheet.xlsx");
    let output = temp_dir.path().join("page.html");
    fs::write(&text, "Intro").unwrap();
    write_merged_workbook(&sheet);

    sheetmark()
        .arg("import")
        .arg(&text)
        .arg(&sheet)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Import Complete"));

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.starts_with("<p>Intro</p><table"), "{}", html);
}

#[test]
fn test_import_json_reports_spans() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("sheet.xlsx");
    write_merged_workbook(&input);

    sheetmark()
        .arg("import")
        .arg(&input)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"col_span\": 2"));
}

#[test]
fn test_import_unsupported_suffix_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("NOTES.TXT");
    fs::write(&input, "shouting").unwrap();

    sheetmark()
        .arg("import")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file"));
}

#[test]
fn test_import_uses_config_table_attributes() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("sheet.xlsx");
    let config = temp_dir.path().join("sheetmark.yaml");
    write_merged_workbook(&input);
    fs::write(&config, "table:\n  border: 0\n  style: \"width: 50%\"\n").unwrap();

    sheetmark()
        .arg("--config")
        .arg(&config)
        .arg("import")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("<table border=\"0\" style=\"width: 50%\">"));
}

// ═══════════════════════════════════════════════════════════════════════════
// EXPORT COMMAND TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_export_without_table_exits_with_code_2() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("doc.html");
    let output = temp_dir.path().join("table.xlsx");
    fs::write(&input, "<p>no table</p>").unwrap();

    sheetmark()
        .arg("export")
        .arg(&input)
        .arg(&output)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No tables to export"));

    assert!(!output.exists());
}

#[test]
fn test_export_table_to_xlsx() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("doc.html");
    let output = temp_dir.path().join("table.xlsx");
    fs::write(
        &input,
        "<p>before</p><table><tr><td>a</td><td>b</td></tr><tr><td>c</td><td>d</td></tr></table>",
    )
    .unwrap();

    sheetmark()
        .arg("export")
        .arg(&input)
        .arg(&output)
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 rows"));

    assert!(output.exists());
}

#[test]
fn test_export_docx() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("doc.html");
    let output = temp_dir.path().join("doc.docx");
    fs::write(&input, "<h1>Title</h1><p>Body</p>").unwrap();

    sheetmark()
        .arg("export")
        .arg(&input)
        .arg(&output)
        .assert()
        .success();

    let bytes = fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_export_unknown_suffix_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("doc.html");
    fs::write(&input, "<p>x</p>").unwrap();

    sheetmark()
        .arg("export")
        .arg(&input)
        .arg(temp_dir.path().join("doc.pdf"))
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_export_into_directory_uses_default_name() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("doc.html");
    fs::write(&input, "<table><tr><td>a</td></tr></table>").unwrap();

    sheetmark()
        .arg("export")
        .arg(&input)
        .arg(temp_dir.path())
        .arg("--format")
        .arg("xlsx")
        .assert()
        .success()
        .stdout(predicate::str::contains("table.xlsx"));

    assert!(temp_dir.path().join("table.xlsx").exists());
}
