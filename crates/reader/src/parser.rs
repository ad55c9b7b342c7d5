//! Row iteration engine.
//!
//! [`WorkbookParser`] walks every row of a workbook in document order (sheet
//! order, then row index) and turns each into a [`Record`]. Rows are indexed
//! once at construction so a checkpointed offset can be found again by
//! (sheet, row) identity.
//!
//! Resuming is inclusive: handing the parser the offset of a record makes
//! that same record the first one emitted. A caller that wants to continue
//! strictly after a record must persist the offset it intends to read next.

use crate::cells::CellCoercer;
use crate::error::{ParserError, Result};
use crate::offset::{Offset, END_OFFSET};
use crate::record::{Record, TypedValue};
use crate::settings::{HeaderMode, ReaderSettings};
use indexmap::IndexMap;
use std::iter::FusedIterator;
use sheetstream_workbook::{
    CachedResultEvaluator, FormulaEvaluator, Row, Sheet, Workbook, WorkbookError,
};

/// Pull-based source of records with a persistable position
pub trait DataParser {
    /// Read the next record, or `None` at the end of the input.
    fn parse(&mut self) -> Result<Option<Record>>;

    /// Offset of the last record read, or `"-1"` once the input is exhausted.
    fn offset(&self) -> String;

    /// Release the underlying input. Safe to call more than once.
    fn close(&mut self) -> Result<()>;
}

/// Where a row lives: sheet position, slot within the sheet, and row index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RowPosition {
    sheet: usize,
    slot: usize,
    index: u32,
}

/// Reads records from every sheet of a workbook
#[derive(Debug)]
pub struct WorkbookParser<E = CachedResultEvaluator> {
    settings: ReaderSettings,
    workbook: Workbook,
    coercer: CellCoercer<E>,
    headers: IndexMap<String, Vec<TypedValue>>,
    positions: Vec<RowPosition>,
    cursor: usize,
    offset: String,
    eof: bool,
    /// Set once the iterator has reported that the workbook is closed.
    fused: bool,
}

impl WorkbookParser<CachedResultEvaluator> {
    /// Create a parser positioned at `offset`.
    ///
    /// `offset` is either `"0"` for the start of the workbook or a value
    /// previously returned by [`WorkbookParser::offset`].
    pub fn new(settings: ReaderSettings, workbook: Workbook, offset: &str) -> Result<Self> {
        let coercer = CellCoercer::new(workbook.date_system());
        Self::build(settings, workbook, coercer, offset)
    }
}

impl<E: FormulaEvaluator> WorkbookParser<E> {
    /// Create a parser that resolves numeric formula results with `evaluator`.
    pub fn with_evaluator(
        settings: ReaderSettings,
        workbook: Workbook,
        evaluator: E,
        offset: &str,
    ) -> Result<Self> {
        let coercer = CellCoercer::with_evaluator(evaluator, workbook.date_system());
        Self::build(settings, workbook, coercer, offset)
    }

    fn build(
        settings: ReaderSettings,
        workbook: Workbook,
        coercer: CellCoercer<E>,
        offset: &str,
    ) -> Result<Self> {
        let positions = index_rows(&workbook);
        if positions.is_empty() {
            return Err(ParserError::EmptyDocument);
        }
        let start = Offset::parse(offset)?;

        let mut parser = WorkbookParser {
            settings,
            workbook,
            coercer,
            headers: IndexMap::new(),
            positions,
            cursor: 0,
            offset: offset.to_string(),
            eof: false,
            fused: false,
        };

        match parser.settings.header {
            HeaderMode::WithHeader => {
                parser.cursor = 1;
                parser.headers = parser.read_headers();
            }
            HeaderMode::IgnoreHeader => parser.cursor = 1,
            HeaderMode::NoHeader => {}
        }

        parser.seek(&start);

        tracing::debug!(
            header = %parser.settings.header,
            rows = parser.positions.len(),
            offset = %start,
            "workbook parser ready"
        );
        Ok(parser)
    }

    /// Read the next row.
    ///
    /// Returns `Ok(None)` at the end of the workbook. A row containing an
    /// unsupported cell fails as a whole; the parser has already moved past
    /// it, so calling `parse` again continues with the following row.
    pub fn parse(&mut self) -> Result<Option<Record>> {
        if self.workbook.is_closed() {
            return Err(WorkbookError::Closed.into());
        }

        let Some(mut position) = self.advance() else {
            self.eof = true;
            return Ok(None);
        };

        // Header rows only ever sit at index 0, whichever sheet we are in
        if self.settings.header.skips_header_row() && position.index == 0 {
            match self.advance() {
                Some(next) => position = next,
                None => {
                    self.eof = true;
                    return Ok(None);
                }
            }
        }

        let offset = match self.sheet_at(position) {
            Some(sheet) => Offset::row(sheet.name(), position.index).to_string(),
            None => return Err(WorkbookError::Closed.into()),
        };
        self.offset.clone_from(&offset);

        let fields = self.read_row(position)?;
        tracing::trace!(offset = %offset, fields = fields.len(), "read row");
        Ok(Some(Record::new(offset, fields)))
    }

    /// Offset of the last row read, or `"-1"` once the workbook is exhausted
    #[must_use]
    pub fn offset(&self) -> String {
        if self.eof {
            END_OFFSET.to_string()
        } else {
            self.offset.clone()
        }
    }

    /// Release the workbook. Calling this again is a no-op.
    pub fn close(&mut self) -> Result<()> {
        self.workbook.close()?;
        Ok(())
    }

    /// Header values per sheet; empty unless the header mode is `WithHeader`
    #[must_use]
    pub fn headers(&self) -> &IndexMap<String, Vec<TypedValue>> {
        &self.headers
    }

    /// Settings the parser was built with
    #[must_use]
    pub fn settings(&self) -> &ReaderSettings {
        &self.settings
    }

    fn advance(&mut self) -> Option<RowPosition> {
        let position = self.positions.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(position)
    }

    fn sheet_at(&self, position: RowPosition) -> Option<&Sheet> {
        self.workbook.sheet_by_index(position.sheet)
    }

    fn row_at(&self, position: RowPosition) -> Option<(&Sheet, &Row)> {
        let sheet = self.sheet_at(position)?;
        let row = sheet.rows().get(position.slot)?;
        Some((sheet, row))
    }

    /// Row 0 of every sheet, read by lookup rather than through the cursor
    fn read_headers(&self) -> IndexMap<String, Vec<TypedValue>> {
        self.workbook
            .sheets()
            .map(|sheet| {
                let values: Vec<TypedValue> = sheet
                    .row(0)
                    .map(|row| {
                        (0..row.last_cell_num())
                            .map(|col| self.coercer.coerce_as_display_text(row.cell_or_blank(col)))
                            .collect()
                    })
                    .unwrap_or_default();
                tracing::debug!(sheet = sheet.name(), columns = values.len(), "read header row");
                (sheet.name().to_string(), values)
            })
            .collect()
    }

    /// Move the cursor so the row named by `start` is the next one read
    fn seek(&mut self, start: &Offset) {
        match start {
            Offset::Start => {}
            Offset::End => self.cursor = self.positions.len(),
            Offset::Row { sheet, row } => {
                while let Some(position) = self.advance() {
                    let same_sheet = self
                        .sheet_at(position)
                        .is_some_and(|s| s.name() == sheet.as_str());
                    if same_sheet && position.index == *row {
                        self.cursor -= 1;
                        tracing::debug!(offset = %start, "resuming at offset");
                        return;
                    }
                }
                tracing::warn!(offset = %start, "offset not found in workbook, nothing left to read");
            }
        }
    }

    fn column_key(&self, sheet: &str, column: usize) -> String {
        if self.headers.is_empty() {
            return column.to_string();
        }
        self.headers
            .get(sheet)
            .and_then(|values| values.get(column))
            .map_or_else(|| column.to_string(), ToString::to_string)
    }

    fn read_row(&self, position: RowPosition) -> Result<IndexMap<String, TypedValue>> {
        let (sheet, row) = self.row_at(position).ok_or(WorkbookError::Closed)?;

        let mut fields = IndexMap::with_capacity(row.last_cell_num());
        for column in 0..row.last_cell_num() {
            let key = self.column_key(sheet.name(), column);
            let value = self
                .coercer
                .coerce(row.cell_or_blank(column))
                .map_err(|source| ParserError::Cell {
                    sheet: sheet.name().to_string(),
                    row: row.index(),
                    column,
                    source,
                })?;
            fields.insert(key, value);
        }
        Ok(fields)
    }
}

impl<E: FormulaEvaluator> DataParser for WorkbookParser<E> {
    fn parse(&mut self) -> Result<Option<Record>> {
        WorkbookParser::parse(self)
    }

    fn offset(&self) -> String {
        WorkbookParser::offset(self)
    }

    fn close(&mut self) -> Result<()> {
        WorkbookParser::close(self)
    }
}

impl<E: FormulaEvaluator> Iterator for WorkbookParser<E> {
    type Item = Result<Record>;

    /// Yields `Err(Closed)` once after the workbook is closed, then `None`.
    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }
        let item = self.parse().transpose();
        if matches!(item, Some(Err(ParserError::Workbook(WorkbookError::Closed)))) {
            self.fused = true;
        }
        item
    }
}

impl<E: FormulaEvaluator> FusedIterator for WorkbookParser<E> {}

/// Flatten the workbook into traversal order
fn index_rows(workbook: &Workbook) -> Vec<RowPosition> {
    workbook
        .sheets()
        .enumerate()
        .flat_map(|(sheet, s)| {
            s.rows()
                .iter()
                .enumerate()
                .map(move |(slot, row)| RowPosition {
                    sheet,
                    slot,
                    index: row.index(),
                })
        })
        .collect()
}
