//! Formula evaluation seam.
//!
//! Readers ask an evaluator for the textual result of a formula cell instead
//! of reading the cached double directly. Recomputing formulas is out of scope
//! for this crate, so the provided evaluator renders the cached result.

use crate::cell::{CachedResult, Formula};
use crate::error::{Result, WorkbookError};
use sheetstream_formatting::{format_general, DateSystem};

/// Produces the formatted result of a formula.
pub trait FormulaEvaluator {
    /// Evaluate a formula and render its result as text.
    fn evaluate(&self, formula: &Formula, date_system: DateSystem) -> Result<String>;
}

/// Evaluator that trusts the result cached in the document.
///
/// Numbers render with the General format so binary noise in the stored
/// double does not leak into the text.
#[derive(Debug, Clone, Copy, Default)]
pub struct CachedResultEvaluator;

impl FormulaEvaluator for CachedResultEvaluator {
    fn evaluate(&self, formula: &Formula, _date_system: DateSystem) -> Result<String> {
        match &formula.cached {
            CachedResult::Numeric(n) => Ok(format_general(n.value)),
            CachedResult::String(s) => Ok(s.clone()),
            CachedResult::Boolean(b) => Ok(if *b { "TRUE" } else { "FALSE" }.to_string()),
            CachedResult::Blank => Ok(String::new()),
            CachedResult::Error(code) => Err(WorkbookError::Evaluation {
                expression: formula.expression.clone(),
                message: code.clone(),
            }),
        }
    }
}
