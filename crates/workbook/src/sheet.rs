use crate::cell::Cell;

static BLANK: Cell = Cell::Blank;

/// A populated row of a sheet.
///
/// Cells are sparse: a column that was never written is absent rather than
/// blank, and [`Row::cell_or_blank`] materializes it on read.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    index: u32,
    cells: Vec<Option<Cell>>,
}

impl Row {
    /// Create an empty row at a zero-based index
    #[must_use]
    pub fn new(index: u32) -> Self {
        Row {
            index,
            cells: Vec::new(),
        }
    }

    /// Create a row whose cells are all present, starting at column 0
    #[must_use]
    pub fn from_cells<I, C>(index: u32, cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        Row {
            index,
            cells: cells.into_iter().map(|c| Some(c.into())).collect(),
        }
    }

    /// Zero-based index within the owning sheet
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Store a cell, growing the row as needed
    pub fn set_cell(&mut self, column: usize, cell: impl Into<Cell>) {
        if column >= self.cells.len() {
            self.cells.resize(column + 1, None);
        }
        self.cells[column] = Some(cell.into());
    }

    /// One past the last populated column (0 for an empty row)
    #[must_use]
    pub fn last_cell_num(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no cells at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Get a cell if it is present
    #[must_use]
    pub fn cell(&self, column: usize) -> Option<&Cell> {
        self.cells.get(column).and_then(Option::as_ref)
    }

    /// Get a cell, treating an absent one as blank
    #[must_use]
    pub fn cell_or_blank(&self, column: usize) -> &Cell {
        self.cell(column).unwrap_or(&BLANK)
    }

    /// Iterate over present cells with their column numbers
    pub fn cells(&self) -> impl Iterator<Item = (usize, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(col, cell)| cell.as_ref().map(|c| (col, c)))
    }
}

/// A named sheet holding rows in ascending index order
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    rows: Vec<Row>,
}

impl Sheet {
    /// Create an empty sheet
    #[must_use]
    pub fn new(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            rows: Vec::new(),
        }
    }

    /// Create a sheet from contiguous rows starting at index 0
    #[must_use]
    pub fn from_data<R, C>(name: &str, data: Vec<R>) -> Self
    where
        R: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let mut sheet = Sheet::new(name);
        for (idx, cells) in data.into_iter().enumerate() {
            let index = u32::try_from(idx).unwrap_or(u32::MAX);
            sheet.add_row(Row::from_cells(index, cells));
        }
        sheet
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a row, replacing any row already stored at the same index
    pub fn add_row(&mut self, row: Row) {
        match self.rows.binary_search_by_key(&row.index, Row::index) {
            Ok(pos) => self.rows[pos] = row,
            Err(pos) => self.rows.insert(pos, row),
        }
    }

    /// Builder form of [`Sheet::add_row`]
    #[must_use]
    pub fn with_row(mut self, row: Row) -> Self {
        self.add_row(row);
        self
    }

    /// All rows in index order
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Look up a row by its index
    #[must_use]
    pub fn row(&self, index: u32) -> Option<&Row> {
        self.rows
            .binary_search_by_key(&index, Row::index)
            .ok()
            .map(|pos| &self.rows[pos])
    }

    /// Get the number of populated rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_row() {
        let mut row = Row::new(3);
        row.set_cell(2, 7.0);

        assert_eq!(row.index(), 3);
        assert_eq!(row.last_cell_num(), 3);
        assert!(row.cell(0).is_none());
        assert!(row.cell_or_blank(0).is_blank());
        assert_eq!(row.cell_or_blank(2), &Cell::number(7.0));
        assert_eq!(row.cells().count(), 1);
    }

    #[test]
    fn test_rows_kept_in_order() {
        let sheet = Sheet::new("Data")
            .with_row(Row::from_cells(5, ["late"]))
            .with_row(Row::from_cells(0, ["early"]))
            .with_row(Row::from_cells(2, ["middle"]));

        let indices: Vec<u32> = sheet.rows().iter().map(Row::index).collect();
        assert_eq!(indices, vec![0, 2, 5]);
        assert!(sheet.row(1).is_none());
        assert_eq!(sheet.row(2).unwrap().cell(0), Some(&Cell::text("middle")));
    }

    #[test]
    fn test_add_row_replaces_same_index() {
        let mut sheet = Sheet::from_data("S", vec![vec![1.0], vec![2.0]]);
        sheet.add_row(Row::from_cells(1, [9.0]));

        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.row(1).unwrap().cell(0), Some(&Cell::number(9.0)));
    }
}
