//! Resumable record reader over spreadsheet workbooks
//!
//! [`WorkbookParser`] flattens every sheet of a [`Workbook`] into a single
//! stream of [`Record`]s. Each record carries an offset string of the form
//! `"<sheet>::<row>"` that can be persisted and later handed back to a new
//! parser to pick up where the old one stopped.
//!
//! # Examples
//!
//! ```
//! use bigdecimal::BigDecimal;
//! use sheetstream_reader::{HeaderMode, ReaderSettings, TypedValue, WorkbookParser};
//! use sheetstream_workbook::{Cell, Sheet, Workbook};
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
//! let settings = ReaderSettings::builder()
//!     .with_header(HeaderMode::WithHeader)
//!     .build();
//! let mut parser = WorkbookParser::new(settings, book, "0").unwrap();
//!
//! let record = parser.parse().unwrap().unwrap();
//! assert_eq!(record.offset(), "Sheet1::1");
//! assert_eq!(
//!     record.get("column1").and_then(TypedValue::as_decimal),
//!     Some(&BigDecimal::from(1))
//! );
//!
//! assert!(parser.parse().unwrap().is_none());
//! assert_eq!(parser.offset(), "-1");
//! ```

mod cells;
mod error;
mod offset;
mod parser;
mod record;
mod settings;

pub use cells::{parse_decimal, CellCoercer};
pub use error::{CellError, ParserError, Result};
pub use offset::{Offset, END_OFFSET, START_OFFSET};
pub use parser::{DataParser, WorkbookParser};
pub use record::{Record, TypedValue};
pub use settings::{HeaderMode, ReaderSettings, ReaderSettingsBuilder};

pub use sheetstream_workbook::Workbook;
