//! Offset codec.
//!
//! An offset names the row a record came from as `<sheet>::<row>`. It is
//! what a pipeline checkpoints and hands back on restart. Two reserved
//! values sit outside that format: `"0"` for the start of the workbook and
//! `"-1"` once every row has been read.

use crate::error::{ParserError, Result};
use std::fmt;
use std::str::FromStr;

const SEPARATOR: &str = "::";

/// Encoded value of [`Offset::Start`].
pub const START_OFFSET: &str = "0";

/// Encoded value of [`Offset::End`].
pub const END_OFFSET: &str = "-1";

/// A position in the traversal order of a workbook
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Offset {
    /// Before the first row.
    Start,
    /// The row with this index in the named sheet.
    Row { sheet: String, row: u32 },
    /// Past the last row.
    End,
}

impl Offset {
    #[must_use]
    pub fn row(sheet: impl Into<String>, row: u32) -> Self {
        Offset::Row {
            sheet: sheet.into(),
            row,
        }
    }

    /// Decode an offset string.
    ///
    /// `""` and `"0"` decode to [`Offset::Start`], `"-1"` to [`Offset::End`].
    /// Sheet names may contain `::`; the row number follows the last one.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "" | START_OFFSET => return Ok(Offset::Start),
            END_OFFSET => return Ok(Offset::End),
            _ => {}
        }

        let malformed = || ParserError::MalformedOffset {
            offset: s.to_string(),
        };

        let (sheet, row) = s.rsplit_once(SEPARATOR).ok_or_else(malformed)?;
        if sheet.is_empty() || row.is_empty() || !row.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let row = row.parse::<u32>().map_err(|_| malformed())?;

        Ok(Offset::row(sheet, row))
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::Start => f.write_str(START_OFFSET),
            Offset::Row { sheet, row } => write!(f, "{sheet}{SEPARATOR}{row}"),
            Offset::End => f.write_str(END_OFFSET),
        }
    }
}

impl FromStr for Offset {
    type Err = ParserError;

    fn from_str(s: &str) -> Result<Self> {
        Offset::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_row_offset() {
        assert_eq!(Offset::parse("Sheet1::12").unwrap(), Offset::row("Sheet1", 12));
        assert_eq!(Offset::row("Sheet1", 0).to_string(), "Sheet1::0");
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(Offset::parse("0").unwrap(), Offset::Start);
        assert_eq!(Offset::parse("").unwrap(), Offset::Start);
        assert_eq!(Offset::parse("-1").unwrap(), Offset::End);
        assert_eq!(Offset::End.to_string(), "-1");
        assert_eq!(Offset::Start.to_string(), "0");
    }

    #[test]
    fn test_sheet_name_with_separator() {
        let offset: Offset = "Q1::North::7".parse().unwrap();
        assert_eq!(offset, Offset::row("Q1::North", 7));
        assert_eq!(offset.to_string(), "Q1::North::7");
    }

    #[test]
    fn test_malformed_offsets() {
        for bad in ["Sheet1", "Sheet1::", "::3", "Sheet1::-3", "Sheet1::x", "Sheet1::+3", "Sheet1::99999999999", "5"] {
            let result = Offset::parse(bad);
            assert!(
                matches!(result, Err(ParserError::MalformedOffset { ref offset }) if offset == bad),
                "expected {bad:?} to be malformed"
            );
        }
    }
}
