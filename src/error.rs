use thiserror::Error;

pub type SheetmarkResult<T> = Result<T, SheetmarkError>;

#[derive(Error, Debug)]
pub enum SheetmarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Export was asked for a spreadsheet but the content holds no table
    #[error("No tables to export")]
    NoTableToExport,

    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    #[error("Excel error: {0}")]
    Excel(String),

    #[error("DOCX error: {0}")]
    Docx(String),

    #[error("HTML error: {0}")]
    Html(String),
}
