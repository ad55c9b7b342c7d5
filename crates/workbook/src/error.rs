use thiserror::Error;

/// Errors that can occur while loading or accessing a workbook
#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("Cannot open workbook '{path}': {message}")]
    Open { path: String, message: String },

    #[error("Cannot read sheet '{name}': {message}")]
    Sheet { name: String, message: String },

    #[error("Sheet already exists: {name}")]
    SheetAlreadyExists { name: String },

    #[error("Sheet not found: {name}")]
    SheetNotFound { name: String },

    #[error("Cannot evaluate formula '{expression}': {message}")]
    Evaluation { expression: String, message: String },

    #[error("Workbook is closed")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WorkbookError>;
