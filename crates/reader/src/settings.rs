use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the first row of a sheet is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMode {
    /// Every row is data; columns are keyed by position.
    #[default]
    NoHeader,
    /// Row 0 of each sheet names that sheet's columns.
    WithHeader,
    /// The first row is dropped; columns are keyed by position.
    IgnoreHeader,
}

impl HeaderMode {
    /// Whether row 0 is kept out of the emitted records.
    #[must_use]
    pub fn skips_header_row(self) -> bool {
        matches!(self, HeaderMode::WithHeader | HeaderMode::IgnoreHeader)
    }
}

impl fmt::Display for HeaderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HeaderMode::NoHeader => "no_header",
            HeaderMode::WithHeader => "with_header",
            HeaderMode::IgnoreHeader => "ignore_header",
        })
    }
}

impl FromStr for HeaderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "no_header" | "none" => Ok(HeaderMode::NoHeader),
            "with_header" | "header" => Ok(HeaderMode::WithHeader),
            "ignore_header" | "ignore" => Ok(HeaderMode::IgnoreHeader),
            _ => Err(format!(
                "Unknown header mode '{s}'. Expected no_header, with_header or ignore_header"
            )),
        }
    }
}

/// Settings for [`crate::WorkbookParser`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderSettings {
    pub header: HeaderMode,
}

impl ReaderSettings {
    #[must_use]
    pub fn builder() -> ReaderSettingsBuilder {
        ReaderSettingsBuilder::default()
    }
}

/// Builder for [`ReaderSettings`]
#[derive(Debug, Clone, Default)]
pub struct ReaderSettingsBuilder {
    header: HeaderMode,
}

impl ReaderSettingsBuilder {
    #[must_use]
    pub fn with_header(mut self, header: HeaderMode) -> Self {
        self.header = header;
        self
    }

    #[must_use]
    pub fn build(self) -> ReaderSettings {
        ReaderSettings {
            header: self.header,
        }
    }
}
