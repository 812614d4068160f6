//! Spreadsheet decoding
//!
//! Turns uploaded `.xlsx` bytes into a plain grid of strings: the first
//! non-empty row is the header, the rest are data rows. Cell values keep the
//! text a spreadsheet user sees; typing and validation belong to the catalog.

mod xlsx;
mod xml;

use thiserror::Error;

pub use xlsx::read_first_sheet;

/// Errors produced while decoding a spreadsheet
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("not a valid .xlsx archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed XML attribute: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("XML encoding error: {0}")]
    XmlEncoding(#[from] quick_xml::encoding::EncodingError),

    #[error("XML escape error: {0}")]
    XmlEscape(#[from] quick_xml::escape::EscapeError),

    #[error("unknown XML entity '{0}'")]
    Entity(String),

    #[error("workbook part '{0}' is missing")]
    MissingPart(String),

    #[error("shared string #{0} does not exist")]
    SharedString(String),

    #[error("cell reference '{0}' is outside the worksheet")]
    OutOfRange(String),

    #[error("XML part ends before all elements are closed")]
    Truncated,

    #[error("worksheet contains no rows")]
    Empty,
}

/// Last row Excel can address (`1048576`)
pub const MAX_ROWS: usize = 1_048_576;

/// Last column Excel can address (`XFD`)
pub const MAX_COLUMNS: usize = 16_384;

/// Decoded worksheet: header plus data rows, all cells as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    /// Splits a raw grid into header and data rows.
    ///
    /// Leading blank rows are dropped so the first row with any text becomes
    /// the header.
    pub fn from_grid(grid: Vec<Vec<String>>) -> Result<Self, SheetError> {
        let mut rows = grid
            .into_iter()
            .skip_while(|row| row.iter().all(|cell| cell.trim().is_empty()));
        let header = rows.next().ok_or(SheetError::Empty)?;
        Ok(Self {
            header,
            rows: rows.collect(),
        })
    }

    /// Index of a header cell, compared after `normalize` is applied to both sides.
    pub fn column_index(&self, name: &str, normalize: impl Fn(&str) -> String) -> Option<usize> {
        let wanted = normalize(name);
        self.header.iter().position(|cell| normalize(cell) == wanted)
    }
}
