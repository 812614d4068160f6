use serde::Serialize;
use std::fmt;

use super::normalize::{normalize_cell, normalize_code};

/// Required spreadsheet columns, in the order the record stores them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Ean,
    Sap,
    Name,
    Row,
    Rack,
    Shelf,
    Position,
    Facing,
    Packaging,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Ean,
        Column::Sap,
        Column::Name,
        Column::Row,
        Column::Rack,
        Column::Shelf,
        Column::Position,
        Column::Facing,
        Column::Packaging,
    ];

    /// Header text as it appears in the source spreadsheet
    pub fn header(self) -> &'static str {
        match self {
            Column::Ean => "EAN",
            Column::Sap => "SAP",
            Column::Name => "Название",
            Column::Row => "Ряд",
            Column::Rack => "Стеллаж",
            Column::Shelf => "Полка",
            Column::Position => "Позиция",
            Column::Facing => "Фейсинг",
            Column::Packaging => "Упаковка",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// One product location from the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    pub ean: String,
    pub sap: String,
    pub name: String,
    pub row: String,
    pub rack: String,
    pub shelf: String,
    pub position: String,
    pub facing: String,
    pub packaging: String,
}

impl ProductRecord {
    /// Builds a record from raw cells ordered like [`Column::ALL`].
    ///
    /// Codes go through [`normalize_code`], everything else through
    /// [`normalize_cell`]. Returns `None` for a row whose cells are all empty.
    pub fn from_cells(cells: [&str; 9]) -> Option<Self> {
        let [ean, sap, name, row, rack, shelf, position, facing, packaging] = cells;
        let record = Self {
            ean: normalize_code(ean),
            sap: normalize_code(sap),
            name: normalize_cell(name),
            row: normalize_cell(row),
            rack: normalize_cell(rack),
            shelf: normalize_cell(shelf),
            position: normalize_cell(position),
            facing: normalize_cell(facing),
            packaging: normalize_cell(packaging),
        };
        if record.is_blank() {
            None
        } else {
            Some(record)
        }
    }

    fn is_blank(&self) -> bool {
        [
            &self.ean,
            &self.sap,
            &self.name,
            &self.row,
            &self.rack,
            &self.shelf,
            &self.position,
            &self.facing,
            &self.packaging,
        ]
        .iter()
        .all(|value| value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cells_normalizes() {
        let record = ProductRecord::from_cells([
            "4600123456789.0 ",
            " 99",
            " Сыр\u{200B}",
            "5",
            "12",
            "3",
            "1",
            "2",
            "коробка ",
        ])
        .unwrap();

        assert_eq!(record.ean, "4600123456789");
        assert_eq!(record.sap, "99");
        assert_eq!(record.name, "Сыр");
        assert_eq!(record.packaging, "коробка");
    }

    #[test]
    fn test_from_cells_blank_row() {
        assert!(ProductRecord::from_cells(["", " ", "\u{200B}", "", "", "", "", "", ""]).is_none());
    }

    #[test]
    fn test_column_headers_unique() {
        let mut headers: Vec<&str> = Column::ALL.iter().map(|c| c.header()).collect();
        headers.sort_unstable();
        headers.dedup();
        assert_eq!(headers.len(), Column::ALL.len());
    }
}
