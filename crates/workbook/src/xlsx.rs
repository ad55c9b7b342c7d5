use crate::book::Workbook;
use crate::cell::{CachedResult, Cell, Formula, Numeric};
use crate::error::{Result, WorkbookError};
use crate::sheet::{Row, Sheet};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sheetstream_formatting::{datetime_to_serial, DateSystem};
use std::path::Path;

impl Workbook {
    /// Load every sheet of a spreadsheet file (xlsx, xlsm, xlsb, xls, ods).
    ///
    /// The file is fully decoded up front; the handle is released before
    /// this returns. Rows without any cell are omitted, so row indices keep
    /// the gaps the file has.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened or a sheet cannot be decoded.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut source = open_workbook_auto(path).map_err(|e| WorkbookError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let sheet_names = source.sheet_names().to_vec();
        // calamine hides the 1904 flag of date cells; serials are read as 1900-based
        let mut book = Workbook::new().with_date_system(DateSystem::Excel1900);

        for name in sheet_names {
            let values = source
                .worksheet_range(&name)
                .map_err(|e| WorkbookError::Sheet {
                    name: name.clone(),
                    message: e.to_string(),
                })?;

            let formulas = match source.worksheet_formula(&name) {
                Ok(range) => Some(range),
                Err(e) => {
                    tracing::debug!(sheet = %name, error = %e, "formulas unavailable, using values only");
                    None
                }
            };

            let sheet = load_sheet(&name, &values, formulas.as_ref());
            tracing::debug!(sheet = %name, rows = sheet.row_count(), "loaded sheet");
            book.add_sheet(sheet)?;
        }

        Ok(book)
    }
}

fn load_sheet(name: &str, values: &Range<Data>, formulas: Option<&Range<String>>) -> Sheet {
    let mut sheet = Sheet::new(name);
    let Some((start_row, start_col)) = values.start() else {
        return sheet;
    };

    for (row_offset, cells) in values.rows().enumerate() {
        let index = start_row + u32::try_from(row_offset).unwrap_or(u32::MAX);
        let mut row = Row::new(index);

        for (col_offset, data) in cells.iter().enumerate() {
            let column = start_col + u32::try_from(col_offset).unwrap_or(u32::MAX);
            let formula = formulas
                .and_then(|range| range.get_value((index, column)))
                .filter(|expr| !expr.is_empty());

            if let Some(cell) = convert_cell(data, formula) {
                row.set_cell(column as usize, cell);
            }
        }

        if !row.is_empty() {
            sheet.add_row(row);
        }
    }

    sheet
}

fn convert_cell(data: &Data, formula: Option<&String>) -> Option<Cell> {
    let value = cached_result(data);
    match formula {
        Some(expression) => Some(Cell::Formula(Formula {
            expression: expression.clone(),
            cached: value,
        })),
        None if matches!(data, Data::Empty) => None,
        None => Some(Cell::from(value)),
    }
}

/// Convert calamine Data to the value a cell (or a formula's cache) holds
fn cached_result(data: &Data) -> CachedResult {
    match data {
        Data::Empty => CachedResult::Blank,
        Data::Bool(b) => CachedResult::Boolean(*b),
        Data::Int(i) => CachedResult::Numeric(Numeric::new(*i as f64)),
        Data::Float(f) => CachedResult::Numeric(Numeric::new(*f)),
        Data::String(s) => CachedResult::String(s.clone()),
        Data::DateTime(dt) => CachedResult::Numeric(Numeric::date(dt.as_f64())),
        Data::DateTimeIso(s) => match parse_iso_datetime(s) {
            Some(serial) => CachedResult::Numeric(Numeric::date(serial)),
            None => CachedResult::String(s.clone()),
        },
        Data::DurationIso(s) => CachedResult::String(s.clone()),
        Data::Error(e) => CachedResult::Error(e.to_string()),
    }
}

/// Convert an ISO 8601 date, time, or date-time to a 1900-based serial
fn parse_iso_datetime(s: &str) -> Option<f64> {
    let dt = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        });

    if let Some(dt) = dt {
        return datetime_to_serial(dt, DateSystem::Excel1900);
    }

    let time = NaiveTime::parse_from_str(s, "%H:%M:%S%.f").ok()?;
    let base = NaiveDate::from_ymd_opt(1899, 12, 31)?.and_time(time);
    datetime_to_serial(base, DateSystem::Excel1900)
}
