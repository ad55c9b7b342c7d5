use sheetstream_workbook::{CellKind, WorkbookError};
use thiserror::Error;

/// Errors raised while converting a single cell
#[derive(Error, Debug)]
pub enum CellError {
    #[error("Unsupported cell type {0}")]
    UnsupportedCellType(CellKind),

    #[error("Cannot parse '{text}' as a decimal number")]
    InvalidDecimal { text: String },

    #[error("Serial {serial} is not a valid date")]
    InvalidDate { serial: f64 },

    #[error("Formula evaluation failed: {0}")]
    Evaluation(#[from] WorkbookError),
}

/// Errors raised by the workbook parser
#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Workbook contains no rows")]
    EmptyDocument,

    #[error("Malformed offset '{offset}', expected <sheet>::<row>")]
    MalformedOffset { offset: String },

    #[error("Cannot read cell at {sheet}::{row} column {column}: {source}")]
    Cell {
        sheet: String,
        row: u32,
        column: usize,
        #[source]
        source: CellError,
    },

    #[error("Workbook error: {0}")]
    Workbook(#[from] WorkbookError),
}

impl ParserError {
    /// Stable code a pipeline can route errors by.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ParserError::Workbook(_) => "EXCEL_PARSER_00",
            ParserError::MalformedOffset { .. } => "EXCEL_PARSER_01",
            ParserError::Cell {
                source: CellError::InvalidDecimal { .. } | CellError::InvalidDate { .. },
                ..
            } => "EXCEL_PARSER_02",
            ParserError::Cell {
                source: CellError::Evaluation(_),
                ..
            } => "EXCEL_PARSER_03",
            ParserError::EmptyDocument => "EXCEL_PARSER_04",
            ParserError::Cell {
                source: CellError::UnsupportedCellType(_),
                ..
            } => "EXCEL_PARSER_05",
        }
    }

    /// The offending kind when a cell type is not supported.
    #[must_use]
    pub fn unsupported_kind(&self) -> Option<CellKind> {
        match self {
            ParserError::Cell {
                source: CellError::UnsupportedCellType(kind),
                ..
            } => Some(*kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParserError>;
