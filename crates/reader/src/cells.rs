//! Cell coercion.
//!
//! Maps a spreadsheet cell onto the closed set of [`TypedValue`]s. Numbers
//! are read from the text the document displays, not from the stored double,
//! so `0.1 + 0.2` arrives as `0.3` and `0.30` keeps its scale.

use crate::error::CellError;
use crate::record::TypedValue;
use bigdecimal::BigDecimal;
use sheetstream_formatting::{serial_to_datetime, DateSystem};
use sheetstream_workbook::{
    CachedResult, CachedResultEvaluator, Cell, CellKind, Formula, FormulaEvaluator, Numeric,
};
use std::str::FromStr;

/// Converts cells into typed values
#[derive(Debug, Clone, Default)]
pub struct CellCoercer<E = CachedResultEvaluator> {
    evaluator: E,
    date_system: DateSystem,
}

impl CellCoercer<CachedResultEvaluator> {
    /// Coercer that reads formula results from the document's cache
    #[must_use]
    pub fn new(date_system: DateSystem) -> Self {
        Self::with_evaluator(CachedResultEvaluator, date_system)
    }
}

impl<E: FormulaEvaluator> CellCoercer<E> {
    #[must_use]
    pub fn with_evaluator(evaluator: E, date_system: DateSystem) -> Self {
        CellCoercer {
            evaluator,
            date_system,
        }
    }

    /// Convert a cell to a typed value.
    ///
    /// Formula cells are handled as whatever their cached result is.
    /// Error cells and unknown content are rejected.
    pub fn coerce(&self, cell: &Cell) -> Result<TypedValue, CellError> {
        match cell {
            Cell::String(s) => Ok(TypedValue::Text(s.clone())),
            Cell::Boolean(b) => Ok(TypedValue::Boolean(*b)),
            Cell::Blank => Ok(TypedValue::EmptyText),
            Cell::Numeric(n) => self.coerce_numeric(n, None),
            Cell::Formula(formula) => match &formula.cached {
                CachedResult::String(s) => Ok(TypedValue::Text(s.clone())),
                CachedResult::Boolean(b) => Ok(TypedValue::Boolean(*b)),
                CachedResult::Blank => Ok(TypedValue::EmptyText),
                CachedResult::Numeric(n) => self.coerce_numeric(n, Some(formula)),
                CachedResult::Error(_) => Err(CellError::UnsupportedCellType(CellKind::Error)),
            },
            Cell::Error(_) | Cell::Unknown(_) => {
                Err(CellError::UnsupportedCellType(cell.effective_kind()))
            }
        }
    }

    /// The cell's display text, whatever its kind. Never fails.
    #[must_use]
    pub fn coerce_as_display_text(&self, cell: &Cell) -> TypedValue {
        TypedValue::Text(cell.display_text(self.date_system))
    }

    fn coerce_numeric(
        &self,
        numeric: &Numeric,
        formula: Option<&Formula>,
    ) -> Result<TypedValue, CellError> {
        if numeric.is_date_formatted() {
            return serial_to_datetime(numeric.value, self.date_system)
                .map(TypedValue::Date)
                .ok_or(CellError::InvalidDate {
                    serial: numeric.value,
                });
        }

        let text = match formula {
            Some(formula) => self.evaluator.evaluate(formula, self.date_system)?,
            None => numeric.display_text(self.date_system),
        };
        parse_decimal(&text).map(TypedValue::Decimal)
    }
}

/// Parse displayed number text as an exact decimal.
///
/// Accepts grouping commas, a trailing percent sign, accounting-style
/// parentheses for negatives, and scientific notation. There is no range
/// limit, so `1E+30` and `1E-30` parse as exactly those values.
pub fn parse_decimal(text: &str) -> Result<BigDecimal, CellError> {
    let invalid = || CellError::InvalidDecimal {
        text: text.to_string(),
    };

    let mut body = text.trim();
    let percent = match body.strip_suffix('%') {
        Some(rest) => {
            body = rest.trim_end();
            true
        }
        None => false,
    };
    let negative = match body.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
        Some(inner) => {
            body = inner.trim();
            true
        }
        None => false,
    };

    let cleaned: String = body
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Err(invalid());
    }

    let mut value = BigDecimal::from_str(&cleaned).map_err(|_| invalid())?;

    if percent {
        value *= BigDecimal::new(1.into(), 2);
    }
    if negative {
        value = -value;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn coercer() -> CellCoercer {
        CellCoercer::new(DateSystem::Excel1900)
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_plain_kinds() {
        let c = coercer();
        assert_eq!(c.coerce(&Cell::text(" raw ")).unwrap(), TypedValue::Text(" raw ".into()));
        assert_eq!(c.coerce(&Cell::Boolean(false)).unwrap(), TypedValue::Boolean(false));
        assert_eq!(c.coerce(&Cell::Blank).unwrap(), TypedValue::EmptyText);
        assert_eq!(c.coerce(&Cell::number(1.0)).unwrap(), TypedValue::Decimal(dec("1")));
    }

    #[test]
    fn test_decimal_comes_from_display_text() {
        let c = coercer();
        let noisy = c.coerce(&Cell::number(0.1 + 0.2)).unwrap();
        assert_eq!(noisy, TypedValue::Decimal(dec("0.3")));

        let formatted = Cell::Numeric(Numeric::new(0.3).with_format("0.00"));
        let value = c.coerce(&formatted).unwrap();
        assert_eq!(value.as_decimal().unwrap().to_string(), "0.30");
    }

    #[test]
    fn test_date_cell() {
        let value = coercer().coerce(&Cell::date(44562.5)).unwrap();
        let expected = NaiveDate::from_ymd_opt(2022, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(value, TypedValue::Date(expected));
    }

    #[test]
    fn test_negative_date_rejected() {
        let result = coercer().coerce(&Cell::date(-3.0));
        assert!(matches!(result, Err(CellError::InvalidDate { .. })));
    }

    #[test]
    fn test_formula_resolves_to_cached_kind() {
        let c = coercer();
        let numeric = Cell::formula("A2*B2", CachedResult::Numeric(Numeric::new(72.0)));
        assert_eq!(c.coerce(&numeric).unwrap(), TypedValue::Decimal(dec("72")));

        let text = Cell::formula("UPPER(A1)", CachedResult::String("ABC".into()));
        assert_eq!(c.coerce(&text).unwrap(), TypedValue::Text("ABC".into()));

        let flag = Cell::formula("A1>0", CachedResult::Boolean(true));
        assert_eq!(c.coerce(&flag).unwrap(), TypedValue::Boolean(true));

        let empty = Cell::formula("A1", CachedResult::Blank);
        assert_eq!(c.coerce(&empty).unwrap(), TypedValue::EmptyText);
    }

    #[test]
    fn test_formula_matches_fresh_evaluation() {
        let formula = Formula {
            expression: "0.1+0.2".to_string(),
            cached: CachedResult::Numeric(Numeric::new(0.1 + 0.2)),
        };
        let fresh = CachedResultEvaluator
            .evaluate(&formula, DateSystem::Excel1900)
            .unwrap();
        let coerced = coercer().coerce(&Cell::Formula(formula)).unwrap();
        assert_eq!(coerced, TypedValue::Decimal(dec(&fresh)));
    }

    #[test]
    fn test_unsupported_kinds() {
        let c = coercer();
        for cell in [
            Cell::error("#DIV/0!"),
            Cell::formula("1/0", CachedResult::Error("#DIV/0!".into())),
        ] {
            assert!(matches!(
                c.coerce(&cell),
                Err(CellError::UnsupportedCellType(CellKind::Error))
            ));
        }
        assert!(matches!(
            c.coerce(&Cell::Unknown("rich-text".into())),
            Err(CellError::UnsupportedCellType(CellKind::Unknown))
        ));
    }

    #[test]
    fn test_display_text_never_fails() {
        let c = coercer();
        assert_eq!(c.coerce_as_display_text(&Cell::error("#N/A")), TypedValue::Text("#N/A".into()));
        assert_eq!(c.coerce_as_display_text(&Cell::number(2.0)), TypedValue::Text("2".into()));
        assert_eq!(c.coerce_as_display_text(&Cell::Blank), TypedValue::Text(String::new()));
    }

    #[test]
    fn test_parse_decimal_forms() {
        assert_eq!(parse_decimal("1,234.50").unwrap(), dec("1234.50"));
        assert_eq!(parse_decimal("12.5%").unwrap(), dec("0.125"));
        assert_eq!(parse_decimal("(12.3)").unwrap(), dec("-12.3"));
        assert_eq!(parse_decimal("1.23457E+11").unwrap(), dec("123457000000"));
        assert_eq!(parse_decimal("-0.000001").unwrap(), dec("-0.000001"));
    }

    #[test]
    fn test_parse_decimal_beyond_fixed_precision() {
        assert_eq!(parse_decimal("1E+30").unwrap(), dec("1000000000000000000000000000000"));
        assert_eq!(parse_decimal("8E+28").unwrap(), dec("80000000000000000000000000000"));
        assert_eq!(
            parse_decimal("1E-30").unwrap(),
            dec("0.000000000000000000000000000001")
        );
    }

    #[test]
    fn test_huge_and_tiny_numbers_coerce() {
        let c = coercer();
        for (value, expected) in [(1e30, "1E+30"), (8e28, "8E+28"), (1e-30, "1E-30")] {
            assert_eq!(
                c.coerce(&Cell::number(value)).unwrap(),
                TypedValue::Decimal(dec(expected)),
                "{value}"
            );
        }
    }

    #[test]
    fn test_date_formatted_formula_result_is_date() {
        let cell = Cell::formula("TODAY()", CachedResult::Numeric(Numeric::date(44562.5)));
        let expected = NaiveDate::from_ymd_opt(2022, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(coercer().coerce(&cell).unwrap(), TypedValue::Date(expected));

        let patterned = Cell::formula(
            "A1+1",
            CachedResult::Numeric(Numeric::new(44563.0).with_format("yyyy-mm-dd")),
        );
        let expected = NaiveDate::from_ymd_opt(2022, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(coercer().coerce(&patterned).unwrap(), TypedValue::Date(expected));
    }

    #[test]
    fn test_date_in_1904_system() {
        let c = CellCoercer::new(DateSystem::Excel1904);
        let expected = NaiveDate::from_ymd_opt(1904, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(c.coerce(&Cell::date(1.0)).unwrap(), TypedValue::Date(expected));

        let shifted = NaiveDate::from_ymd_opt(2026, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(c.coerce(&Cell::date(44562.0)).unwrap(), TypedValue::Date(shifted));

        let formula = Cell::formula("A1", CachedResult::Numeric(Numeric::date(1.0)));
        assert_eq!(c.coerce(&formula).unwrap(), TypedValue::Date(expected));
    }

    #[test]
    fn test_parse_decimal_rejects_text() {
        for bad in ["", "abc", "$12", "1/1/22"] {
            assert!(matches!(parse_decimal(bad), Err(CellError::InvalidDecimal { .. })));
        }
    }
}
