//! Editor document state and the import/export actions on it
//!
//! The document is the serialized HTML the editing surface holds. Text and
//! Word imports replace it; spreadsheet imports insert a table at the cursor,
//! which here is always the end of the document.

use crate::config::SheetmarkConfig;
use crate::document::{docx_to_html, html_to_docx, html_to_text, text_to_html};
use crate::error::{SheetmarkError, SheetmarkResult};
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::html::{first_table, render_table};
use crate::transcode::{grid_to_markup, markup_to_grid};
use crate::types::{MarkupTable, SheetGrid, ValueGrid};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File kinds the editor reads and writes, chosen by name suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Text,
    Docx,
    Spreadsheet,
}

impl FileKind {
    /// Case-sensitive suffix match: `.txt`, `.docx`, `.xlsx`
    pub fn from_name(name: &str) -> SheetmarkResult<Self> {
        if name.ends_with(".txt") {
            Ok(FileKind::Text)
        } else if name.ends_with(".docx") {
            Ok(FileKind::Docx)
        } else if name.ends_with(".xlsx") {
            Ok(FileKind::Spreadsheet)
        } else {
            Err(SheetmarkError::UnsupportedFile(format!(
                "{} (expected .txt, .docx or .xlsx)",
                name
            )))
        }
    }

    pub fn from_path(path: &Path) -> SheetmarkResult<Self> {
        Self::from_name(&path.to_string_lossy())
    }

    /// Bare extension as typed on a command line: `txt`, `docx`, `xlsx`
    pub fn from_extension(ext: &str) -> SheetmarkResult<Self> {
        Self::from_name(&format!(".{}", ext.trim_start_matches('.')))
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Text => ".txt",
            FileKind::Docx => ".docx",
            FileKind::Spreadsheet => ".xlsx",
        }
    }

    /// Append this kind's suffix unless the name already ends with it
    pub fn ensure_extension(&self, name: &str) -> String {
        if name.ends_with(self.extension()) {
            name.to_string()
        } else {
            format!("{}{}", name, self.extension())
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileKind::Text => "text",
            FileKind::Docx => "docx",
            FileKind::Spreadsheet => "xlsx",
        };
        f.write_str(name)
    }
}

/// What an import did to the document
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    /// Content replaced wholesale
    Replaced,
    /// Table inserted at the cursor
    Inserted(MarkupTable),
}

/// The single piece of editor content state
#[derive(Debug, Clone, Default)]
pub struct EditorDocument {
    html: String,
    config: SheetmarkConfig,
}

impl EditorDocument {
    pub fn new(config: SheetmarkConfig) -> Self {
        Self {
            html: String::new(),
            config,
        }
    }

    pub fn with_content(html: impl Into<String>, config: SheetmarkConfig) -> Self {
        Self {
            html: html.into(),
            config,
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn config(&self) -> &SheetmarkConfig {
        &self.config
    }

    pub fn set_content(&mut self, html: impl Into<String>) {
        self.html = html.into();
    }

    pub fn insert_content(&mut self, html: &str) {
        self.html.push_str(html);
    }

    //--------------------------------------------------------------------------
    // Import
    //--------------------------------------------------------------------------

    /// Import a file; its name picks the converter
    pub fn import_file(&mut self, path: &Path) -> SheetmarkResult<ImportOutcome> {
        let kind = FileKind::from_path(path)?;
        info!(path = %path.display(), kind = %kind, "importing file");

        if kind == FileKind::Spreadsheet {
            let grid = ExcelImporter::new(path)
                .with_sheet(self.config.import.sheet)
                .import()?;
            return Ok(ImportOutcome::Inserted(self.import_sheet(&grid)));
        }

        let bytes = fs::read(path)?;
        self.import_kind(kind, &bytes)
    }

    /// Import raw bytes as uploaded under `name`
    pub fn import_bytes(&mut self, name: &str, bytes: &[u8]) -> SheetmarkResult<ImportOutcome> {
        let kind = FileKind::from_name(name)?;
        debug!(name, kind = %kind, bytes = bytes.len(), "importing upload");
        self.import_kind(kind, bytes)
    }

    fn import_kind(&mut self, kind: FileKind, bytes: &[u8]) -> SheetmarkResult<ImportOutcome> {
        match kind {
            FileKind::Text => {
                self.import_text(&String::from_utf8_lossy(bytes));
                Ok(ImportOutcome::Replaced)
            }
            FileKind::Docx => {
                self.import_docx(bytes)?;
                Ok(ImportOutcome::Replaced)
            }
            FileKind::Spreadsheet => {
                let grid = ExcelImporter::import_bytes(bytes, self.config.import.sheet)?;
                Ok(ImportOutcome::Inserted(self.import_sheet(&grid)))
            }
        }
    }

    pub fn import_text(&mut self, text: &str) {
        self.set_content(text_to_html(text));
    }

    pub fn import_docx(&mut self, bytes: &[u8]) -> SheetmarkResult<()> {
        let html = docx_to_html(bytes, &self.config.table)?;
        self.set_content(html);
        Ok(())
    }

    /// Transcode a decoded sheet and insert its table at the cursor
    pub fn import_sheet(&mut self, grid: &SheetGrid) -> MarkupTable {
        let table = grid_to_markup(grid);
        let html = render_table(&table, &self.config.table);
        self.insert_content(&html);
        table
    }

    //--------------------------------------------------------------------------
    // Export
    //--------------------------------------------------------------------------

    pub fn export_text(&self) -> String {
        html_to_text(&self.html, &self.config.export.text_block_separator)
    }

    pub fn export_docx(&self) -> SheetmarkResult<Vec<u8>> {
        html_to_docx(&self.html)
    }

    /// First table of the document flattened to values
    pub fn export_table_grid(&self) -> SheetmarkResult<ValueGrid> {
        let table = first_table(&self.html)?.ok_or(SheetmarkError::NoTableToExport)?;
        markup_to_grid(&table)
    }

    pub fn export_xlsx(&self) -> SheetmarkResult<Vec<u8>> {
        let grid = self.export_table_grid()?;
        ExcelExporter::new(&self.config.export.sheet_name).to_bytes(&grid)
    }

    pub fn export_bytes(&self, kind: FileKind) -> SheetmarkResult<Vec<u8>> {
        match kind {
            FileKind::Text => Ok(self.export_text().into_bytes()),
            FileKind::Docx => self.export_docx(),
            FileKind::Spreadsheet => self.export_xlsx(),
        }
    }

    /// Default file name for a save of `kind`
    pub fn default_file_name(&self, kind: FileKind) -> &str {
        match kind {
            FileKind::Text => &self.config.export.text_file,
            FileKind::Docx => &self.config.export.document_file,
            FileKind::Spreadsheet => &self.config.export.table_file,
        }
    }

    /// Write the document as `kind`, appending the suffix if `path` lacks it.
    /// A directory receives the default file name for `kind`.
    pub fn save(&self, kind: FileKind, path: &Path) -> SheetmarkResult<PathBuf> {
        let bytes = self.export_bytes(kind)?;
        let target = if path.is_dir() {
            path.join(self.default_file_name(kind))
        } else {
            PathBuf::from(kind.ensure_extension(&path.to_string_lossy()))
        };
        fs::write(&target, bytes)?;
        info!(path = %target.display(), kind = %kind, "saved document");
        Ok(target)
    }
}
