use crate::error::{Result, WorkbookError};
use crate::sheet::Sheet;
use indexmap::IndexMap;
use sheetstream_formatting::DateSystem;

/// A workbook containing multiple sheets (preserves sheet order)
///
/// The whole document is materialized in memory. [`Workbook::close`]
/// releases it; any further access sees an empty, closed workbook.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: IndexMap<String, Sheet>,
    date_system: DateSystem,
    closed: bool,
}

impl Workbook {
    /// Create a new empty workbook
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the epoch serial dates are counted from
    #[must_use]
    pub fn with_date_system(mut self, date_system: DateSystem) -> Self {
        self.date_system = date_system;
        self
    }

    /// Builder form of [`Workbook::add_sheet`]
    pub fn with_sheet(mut self, sheet: Sheet) -> Result<Self> {
        self.add_sheet(sheet)?;
        Ok(self)
    }

    /// Add a sheet after the existing ones
    pub fn add_sheet(&mut self, sheet: Sheet) -> Result<()> {
        if self.closed {
            return Err(WorkbookError::Closed);
        }
        if self.sheets.contains_key(sheet.name()) {
            return Err(WorkbookError::SheetAlreadyExists {
                name: sheet.name().to_string(),
            });
        }
        self.sheets.insert(sheet.name().to_string(), sheet);
        Ok(())
    }

    /// Epoch used by serial dates in this workbook
    #[must_use]
    pub fn date_system(&self) -> DateSystem {
        self.date_system
    }

    /// Get the number of sheets
    #[must_use]
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Get all sheet names in order
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    /// Iterate over sheets in document order
    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.values()
    }

    /// Get a sheet by name
    pub fn sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .get(name)
            .ok_or_else(|| WorkbookError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Get a sheet by index (0-based)
    #[must_use]
    pub fn sheet_by_index(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get_index(index).map(|(_, sheet)| sheet)
    }

    /// Total number of populated rows across all sheets
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.sheets.values().map(Sheet::row_count).sum()
    }

    /// Check if the workbook has been closed
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Release the document. Calling this again is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        tracing::debug!(sheets = self.sheets.len(), "closing workbook");
        self.sheets = IndexMap::new();
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_order_preserved() {
        let book = Workbook::new()
            .with_sheet(Sheet::new("Zeta"))
            .unwrap()
            .with_sheet(Sheet::new("Alpha"))
            .unwrap();

        assert_eq!(book.sheet_names(), vec!["Zeta", "Alpha"]);
        assert_eq!(book.sheet_by_index(1).unwrap().name(), "Alpha");
    }

    #[test]
    fn test_duplicate_sheet_rejected() {
        let mut book = Workbook::new();
        book.add_sheet(Sheet::new("Data")).unwrap();
        let result = book.add_sheet(Sheet::new("Data"));
        assert!(matches!(result, Err(WorkbookError::SheetAlreadyExists { .. })));
    }

    #[test]
    fn test_row_count_spans_sheets() {
        let book = Workbook::new()
            .with_sheet(Sheet::from_data("A", vec![vec![1.0], vec![2.0]]))
            .unwrap()
            .with_sheet(Sheet::from_data("B", vec![vec![3.0]]))
            .unwrap();
        assert_eq!(book.row_count(), 3);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut book = Workbook::new()
            .with_sheet(Sheet::from_data("A", vec![vec![1.0]]))
            .unwrap();

        book.close().unwrap();
        book.close().unwrap();

        assert!(book.is_closed());
        assert_eq!(book.sheet_count(), 0);
        assert!(matches!(
            book.add_sheet(Sheet::new("B")),
            Err(WorkbookError::Closed)
        ));
    }
}
