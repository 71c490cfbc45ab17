//! YAML configuration for import/export
//!
//! Every field has a default, so an empty file (or no file) gives the editor's
//! stock behavior.
//!
//! ```yaml
//! table:
//!   border: 1
//!   style: "border-collapse: collapse; width: 100%; font-size: 14px"
//! import:
//!   sheet: 0
//! export:
//!   sheet_name: Sheet1
//!   text_block_separator: "\n\n"
//! ```

use crate::error::SheetmarkResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetmarkConfig {
    pub table: TableConfig,
    pub import: ImportConfig,
    pub export: ExportConfig,
}

/// Attributes of the `<table>` element emitted for spreadsheet imports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub border: u32,
    pub style: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            border: 1,
            style: "border-collapse: collapse; width: 100%; font-size: 14px".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Zero-based index of the workbook sheet to import
    pub sheet: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub sheet_name: String,
    pub table_file: String,
    pub document_file: String,
    pub text_file: String,
    pub text_block_separator: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            table_file: "table.xlsx".to_string(),
            document_file: "document.docx".to_string(),
            text_file: "document.txt".to_string(),
            text_block_separator: "\n\n".to_string(),
        }
    }
}

impl SheetmarkConfig {
    pub fn from_yaml(content: &str) -> SheetmarkResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: &Path) -> SheetmarkResult<Self> {
        debug!(path = %path.display(), "loading config");
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> SheetmarkResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
