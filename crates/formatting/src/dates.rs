//! Serial date conversion for spreadsheet date systems

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Largest serial that still lands in year 9999.
const MAX_SERIAL: f64 = 2_958_466.0;

/// Epoch a workbook counts its serial dates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateSystem {
    /// Day 1 is 1900-01-01, and serial 60 is the phantom 1900-02-29.
    #[default]
    Excel1900,
    /// Day 0 is 1904-01-01 (legacy Mac workbooks).
    Excel1904,
}

impl DateSystem {
    fn base(self) -> Option<NaiveDate> {
        match self {
            DateSystem::Excel1900 => NaiveDate::from_ymd_opt(1899, 12, 31),
            DateSystem::Excel1904 => NaiveDate::from_ymd_opt(1904, 1, 1),
        }
    }
}

/// Convert a serial date to a calendar date/time with millisecond precision.
///
/// Returns `None` for negative, non-finite, or out-of-range serials.
#[must_use]
pub fn serial_to_datetime(serial: f64, system: DateSystem) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..MAX_SERIAL).contains(&serial) {
        return None;
    }

    let mut days = serial.floor() as i64;
    let millis = ((serial - serial.floor()) * MILLIS_PER_DAY).round() as i64;

    // 1900-02-29 never existed; everything after it is one serial ahead
    if system == DateSystem::Excel1900 && days >= 60 {
        days -= 1;
    }

    system
        .base()?
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::days(days))?
        .checked_add_signed(Duration::milliseconds(millis))
}

/// Convert a calendar date/time back to a serial date.
#[must_use]
pub fn datetime_to_serial(dt: NaiveDateTime, system: DateSystem) -> Option<f64> {
    let base = system.base()?;
    let mut days = (dt.date() - base).num_days();
    if days < 0 {
        return None;
    }
    if system == DateSystem::Excel1900 && days >= 60 {
        days += 1;
    }

    let time = dt.time();
    let millis = f64::from(time.num_seconds_from_midnight()) * 1000.0
        + f64::from(time.nanosecond() / 1_000_000);

    Some(days as f64 + millis / MILLIS_PER_DAY)
}
