use crate::config::SheetmarkConfig;
use crate::editor::{EditorDocument, FileKind, ImportOutcome};
use anyhow::Context;
use colored::Colorize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Execute the import command
///
/// Files are applied in order to one document, so a `.txt` followed by an
/// `.xlsx` yields the text with the table appended.
pub fn import(
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    json: bool,
    config: SheetmarkConfig,
    verbose: bool,
) -> anyhow::Result<()> {
    // progress lines only when stdout is not the payload
    let chatty = output.is_some();
    if chatty {
        println!("{}", "📥 Sheetmark - Import".bold().green());
        for input in &inputs {
            println!("   Input:  {}", input.display());
        }
        if let Some(ref out) = output {
            println!("   Output: {}\n", out.display());
        }
    }

    let mut document = EditorDocument::new(config);
    let mut tables = Vec::new();

    for input in &inputs {
        let outcome = document
            .import_file(input)
            .with_context(|| format!("Failed to import {}", input.display()))?;

        if chatty && verbose {
            match &outcome {
                ImportOutcome::Replaced => {
                    println!("   📄 {} → replaced content", input.display().to_string().bright_blue())
                }
                ImportOutcome::Inserted(table) => println!(
                    "   📊 {} → table with {} rows, {} cells ({} merged)",
                    input.display().to_string().bright_blue(),
                    table.rows.len(),
                    table.cell_count(),
                    table
                        .rows
                        .iter()
                        .flat_map(|r| &r.cells)
                        .filter(|c| c.is_merged())
                        .count()
                ),
            }
        }

        if let ImportOutcome::Inserted(table) = outcome {
            tables.push(table);
        }
    }

    let payload = if json {
        serde_json::to_string_pretty(&tables)?
    } else {
        document.html().to_string()
    };

    match output {
        Some(path) => {
            fs::write(&path, payload).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{}", "✅ Import Complete!".bold().green());
            println!("   File: {}\n", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(payload.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}

/// Execute the export command
///
/// `format`, or else the output suffix, selects the format. A spreadsheet
/// export of content with no table fails with `NoTableToExport`.
pub fn export(
    input: PathBuf,
    output: PathBuf,
    format: Option<String>,
    config: SheetmarkConfig,
    verbose: bool,
) -> anyhow::Result<()> {
    println!("{}", "📤 Sheetmark - Export".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    let kind = match format.as_deref() {
        Some(ext) => FileKind::from_extension(ext)?,
        None => FileKind::from_path(&output)?,
    };
    let html = fs::read_to_string(&input).with_context(|| format!("Failed to read {}", input.display()))?;
    let document = EditorDocument::with_content(html, config);

    if verbose {
        println!("{}", format!("💾 Writing {} file...", kind).cyan());
        if kind == FileKind::Spreadsheet {
            let grid = document.export_table_grid()?;
            println!(
                "   First table: {} rows, up to {} columns",
                grid.row_count(),
                grid.column_count()
            );
        }
    }

    let saved = document.save(kind, &output)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   File: {}\n", saved.display());
    Ok(())
}
