use sheetstream_formatting::{format_general, format_number, is_date_pattern, DateSystem};
use std::fmt;

/// Pattern used to display date-flagged numbers that carry no pattern of their own.
const DEFAULT_DATE_FORMAT: &str = "m/d/yy";
const DEFAULT_DATETIME_FORMAT: &str = "m/d/yy h:mm";

/// Native value category of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    String,
    Numeric,
    Boolean,
    Blank,
    Formula,
    Error,
    Unknown,
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellKind::String => "STRING",
            CellKind::Numeric => "NUMERIC",
            CellKind::Boolean => "BOOLEAN",
            CellKind::Blank => "BLANK",
            CellKind::Formula => "FORMULA",
            CellKind::Error => "ERROR",
            CellKind::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// A number together with the formatting that decides how it is displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct Numeric {
    pub value: f64,
    /// Number-format pattern, `None` meaning "General".
    pub format: Option<String>,
    /// Set when the source flagged the cell as a date independently of `format`.
    pub date_formatted: bool,
}

impl Numeric {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Numeric {
            value,
            format: None,
            date_formatted: false,
        }
    }

    /// A serial date.
    #[must_use]
    pub fn date(serial: f64) -> Self {
        Numeric {
            value: serial,
            format: None,
            date_formatted: true,
        }
    }

    /// Attach a number-format pattern.
    #[must_use]
    pub fn with_format(mut self, pattern: impl Into<String>) -> Self {
        self.format = Some(pattern.into());
        self
    }

    /// Whether the value should be read as a calendar date/time.
    #[must_use]
    pub fn is_date_formatted(&self) -> bool {
        self.date_formatted || self.format.as_deref().is_some_and(is_date_pattern)
    }

    /// Text as the document displays it.
    #[must_use]
    pub fn display_text(&self, system: DateSystem) -> String {
        match self.format.as_deref() {
            Some(pattern) => format_number(pattern, self.value, system),
            None if self.date_formatted => {
                let pattern = if self.value.fract() == 0.0 {
                    DEFAULT_DATE_FORMAT
                } else {
                    DEFAULT_DATETIME_FORMAT
                };
                format_number(pattern, self.value, system)
            }
            None => format_general(self.value),
        }
    }
}

/// Last value a formula evaluated to, as stored in the document.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedResult {
    String(String),
    Numeric(Numeric),
    Boolean(bool),
    Blank,
    Error(String),
}

impl CachedResult {
    #[must_use]
    pub fn kind(&self) -> CellKind {
        match self {
            CachedResult::String(_) => CellKind::String,
            CachedResult::Numeric(_) => CellKind::Numeric,
            CachedResult::Boolean(_) => CellKind::Boolean,
            CachedResult::Blank => CellKind::Blank,
            CachedResult::Error(_) => CellKind::Error,
        }
    }

    #[must_use]
    pub fn display_text(&self, system: DateSystem) -> String {
        match self {
            CachedResult::String(s) | CachedResult::Error(s) => s.clone(),
            CachedResult::Numeric(n) => n.display_text(system),
            CachedResult::Boolean(b) => bool_text(*b).to_string(),
            CachedResult::Blank => String::new(),
        }
    }
}

/// Formula source plus its cached result
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    pub expression: String,
    pub cached: CachedResult,
}

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    String(String),
    Numeric(Numeric),
    Boolean(bool),
    Blank,
    Formula(Formula),
    /// Error code text such as `#DIV/0!`.
    Error(String),
    /// Content the loader could not classify, described by its source type name.
    Unknown(String),
}

impl Cell {
    /// Create a string cell.
    #[must_use]
    pub fn text<S: Into<String>>(s: S) -> Self {
        Cell::String(s.into())
    }

    /// Create a numeric cell displayed with the General format.
    #[must_use]
    pub fn number(value: f64) -> Self {
        Cell::Numeric(Numeric::new(value))
    }

    /// Create a date-flagged numeric cell from a serial date.
    #[must_use]
    pub fn date(serial: f64) -> Self {
        Cell::Numeric(Numeric::date(serial))
    }

    /// Create a formula cell.
    #[must_use]
    pub fn formula<S: Into<String>>(expression: S, cached: CachedResult) -> Self {
        Cell::Formula(Formula {
            expression: expression.into(),
            cached,
        })
    }

    /// Create an error cell.
    #[must_use]
    pub fn error<S: Into<String>>(code: S) -> Self {
        Cell::Error(code.into())
    }

    /// The cell's native kind.
    #[must_use]
    pub fn kind(&self) -> CellKind {
        match self {
            Cell::String(_) => CellKind::String,
            Cell::Numeric(_) => CellKind::Numeric,
            Cell::Boolean(_) => CellKind::Boolean,
            Cell::Blank => CellKind::Blank,
            Cell::Formula(_) => CellKind::Formula,
            Cell::Error(_) => CellKind::Error,
            Cell::Unknown(_) => CellKind::Unknown,
        }
    }

    /// The kind a reader should treat this cell as: formulas resolve to their cached result.
    #[must_use]
    pub fn effective_kind(&self) -> CellKind {
        match self {
            Cell::Formula(formula) => formula.cached.kind(),
            other => other.kind(),
        }
    }

    /// Check if the cell is blank
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Blank)
    }

    /// Text as the document displays it, for any kind.
    ///
    /// Formula cells render their cached result.
    #[must_use]
    pub fn display_text(&self, system: DateSystem) -> String {
        match self {
            Cell::String(s) | Cell::Error(s) | Cell::Unknown(s) => s.clone(),
            Cell::Numeric(n) => n.display_text(system),
            Cell::Boolean(b) => bool_text(*b).to_string(),
            Cell::Blank => String::new(),
            Cell::Formula(formula) => formula.cached.display_text(system),
        }
    }
}

fn bool_text(b: bool) -> &'static str {
    if b {
        "TRUE"
    } else {
        "FALSE"
    }
}

impl From<CachedResult> for Cell {
    fn from(result: CachedResult) -> Self {
        match result {
            CachedResult::String(s) => Cell::String(s),
            CachedResult::Numeric(n) => Cell::Numeric(n),
            CachedResult::Boolean(b) => Cell::Boolean(b),
            CachedResult::Blank => Cell::Blank,
            CachedResult::Error(e) => Cell::Error(e),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::String(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::String(s)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::number(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::number(f64::from(value))
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Boolean(b)
    }
}

impl From<Numeric> for Cell {
    fn from(n: Numeric) -> Self {
        Cell::Numeric(n)
    }
}
