//! Spreadsheet document model for sheetstream
//!
//! A [`Workbook`] is an ordered collection of named [`Sheet`]s, each holding
//! sparse [`Row`]s of [`Cell`]s. Documents are fully materialized in memory,
//! either built directly or decoded from a file with [`Workbook::open`].
//!
//! # Examples
//!
//! ```
//! use sheetstream_workbook::{Cell, CellKind, Sheet, Workbook};
//!
//! let book = Workbook::new()
//!     .with_sheet(Sheet::from_data(
//!         "Sheet1",
//!         vec![
//!             vec![Cell::text("column1"), Cell::text("column2")],
//!             vec![Cell::number(1.0), Cell::number(2.0)],
//!         ],
//!     ))
//!     .unwrap();
//!
//! let sheet = book.sheet("Sheet1").unwrap();
//! assert_eq!(sheet.row_count(), 2);
//! assert_eq!(sheet.row(1).unwrap().cell_or_blank(0).kind(), CellKind::Numeric);
//! ```

mod book;
mod cell;
mod error;
mod evaluator;
mod sheet;
mod xlsx;

/// Re-export workbook type.
pub use book::Workbook;
/// Re-export cell types.
pub use cell::{CachedResult, Cell, CellKind, Formula, Numeric};
/// Re-export workbook error types.
pub use error::{Result, WorkbookError};
/// Re-export formula evaluation types.
pub use evaluator::{CachedResultEvaluator, FormulaEvaluator};
/// Re-export sheet types.
pub use sheet::{Row, Sheet};
/// Re-export the date epoch so callers need not depend on the formatting crate.
pub use sheetstream_formatting::DateSystem;
