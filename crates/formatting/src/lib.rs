//! Display-text rendering for spreadsheet cells.
//!
//! Spreadsheets store numbers as binary doubles and attach a number-format
//! pattern that decides what the user sees. Readers that need an exact
//! decimal take the *displayed* text rather than the double, so this crate
//! reproduces that rendering:
//!
//! - [`format_general`] for cells without an explicit pattern (Excel "General")
//! - [`format_number`] for explicit patterns such as `#,##0.00` or `yyyy-mm-dd`
//! - [`serial_to_datetime`] for turning serial dates into calendar values
//!
//! ```
//! use sheetstream_formatting::{format_general, format_number, DateSystem};
//!
//! assert_eq!(format_general(0.1 + 0.2), "0.3");
//! assert_eq!(format_number("0.00", 0.3, DateSystem::Excel1900), "0.30");
//! ```

mod dates;
mod general;
mod ssf;

pub use dates::{datetime_to_serial, serial_to_datetime, DateSystem};
pub use general::format_general;
pub use ssf::{format_number, is_date_pattern};
